use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal;
use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

/// left-hand side of a qwerty keyboard, laid out like the COSMAC hex keypad:
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  <-  |q|w|e|r|
/// |7|8|9|E|  <-  |a|s|d|f|
/// |A|0|B|F|      |z|x|c|v|
/// ```
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// terminals don't report key releases, so a key counts as held for this
/// long after its last press or auto-repeat
const KEY_HOLD: Duration = Duration::from_millis(200);

/// what the keypad looked like when the VM asked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keypad {
    held: u16,
    /// a key that is held now but wasn't in the previous snapshot
    pub newly_pressed: Option<u8>,
}

impl Keypad {
    /// build a snapshot from the held keys, comparing against the last one
    pub fn from_keys(keys: &[u8], previous: &Keypad) -> Self {
        let held = keys
            .iter()
            .filter(|k| **k < 0x10)
            .fold(0u16, |acc, k| acc | (1u16 << *k));
        let newly_pressed = keys
            .iter()
            .copied()
            .find(|k| *k < 0x10 && !previous.is_pressed(*k));
        Keypad {
            held,
            newly_pressed,
        }
    }

    /// only the low nibble of `key` counts; the keypad has 16 keys
    pub fn is_pressed(&self, key: u8) -> bool {
        self.held & (1 << (key & 0xf)) != 0
    }
}

/// reads keypresses
pub trait Input {
    /// get a list of all the mapped keys that are currently held, without
    /// flushing them
    fn peek_keys(&mut self) -> Result<&[u8], io::Error>;

    /// has the user asked to leave
    fn quit_requested(&self) -> bool {
        false
    }
}

/// Input from the terminal keyboard, via crossterm in raw mode
pub struct TermInput {
    buffer: Vec<u8>,
    keymap: HashMap<char, u8>,
    pressed_at: [Option<Instant>; 16],
    quit: bool,
    raw: bool,
}

impl TermInput {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        let mut input = Self::detached();
        input.raw = true;
        Ok(input)
    }

    /// key handling without touching the terminal mode
    fn detached() -> Self {
        TermInput {
            buffer: Vec::new(),
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            pressed_at: [None; 16],
            quit: false,
            raw: false,
        }
    }

    fn read_terminal(&mut self) -> Result<(), io::Error> {
        while poll(Duration::from_millis(0))? {
            if let Event::Key(evt) = read()? {
                self.key_event(evt, Instant::now());
            }
        }
        Ok(())
    }

    fn key_event(&mut self, evt: KeyEvent, now: Instant) {
        match evt.code {
            KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true
            }
            KeyCode::Char(key) => match self.keymap.get(&key.to_ascii_lowercase()) {
                Some(mapped_key) => self.pressed_at[*mapped_key as usize] = Some(now),
                None => log::warn!("can't map {:?} to a COSMAC key", key),
            },
            other => log::debug!("ignoring key {:?}", other),
        }
    }

    /// rebuild the held-key list as of `now`
    fn refresh(&mut self, now: Instant) {
        self.buffer.clear();
        for (key, at) in self.pressed_at.iter_mut().enumerate() {
            if let Some(t) = *at {
                if now.duration_since(t) < KEY_HOLD {
                    self.buffer.push(key as u8);
                } else {
                    *at = None;
                }
            }
        }
    }
}

impl Drop for TermInput {
    fn drop(&mut self) {
        if self.raw {
            if let Err(e) = terminal::disable_raw_mode() {
                log::error!("couldn't restore terminal: {}", e);
            }
        }
    }
}

impl Input for TermInput {
    fn peek_keys(&mut self) -> Result<&[u8], io::Error> {
        self.read_terminal()?;
        self.refresh(Instant::now());
        Ok(self.buffer.as_slice())
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

/// dummy Input implementation for testing; plays back one set of held keys
/// per peek, then holds the last set forever
pub struct DummyInput {
    script: Vec<Vec<u8>>,
    current: Vec<u8>,
}

impl DummyInput {
    pub fn new(keys: &[u8]) -> Self {
        DummyInput {
            script: Vec::new(),
            current: Vec::from(keys),
        }
    }

    pub fn scripted(frames: &[&[u8]]) -> Self {
        let mut script: Vec<Vec<u8>> = frames.iter().map(|f| f.to_vec()).collect();
        script.reverse();
        DummyInput {
            script,
            current: Vec::new(),
        }
    }
}

impl Input for DummyInput {
    fn peek_keys(&mut self) -> Result<&[u8], io::Error> {
        if let Some(next) = self.script.pop() {
            self.current = next;
        }
        Ok(self.current.as_slice())
    }
}
