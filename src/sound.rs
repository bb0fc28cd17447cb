use beep::beep;
use std::error::Error;

/// the VIP had a single-pitch buzzer that sounds while the sound timer is
/// non-zero; this is how the interpreter drives it
pub trait Sound {
    fn beep(&mut self) -> Result<(), Box<dyn Error>>;
    fn stop(&mut self) -> Result<(), Box<dyn Error>>;
    fn is_beeping(&self) -> bool;

    /// follow the sound timer, only touching the device on an edge
    fn follow_timer(&mut self, sound_timer: u8) -> Result<(), Box<dyn Error>> {
        match (sound_timer > 0, self.is_beeping()) {
            (true, false) => self.beep(),
            (false, true) => self.stop(),
            _ => Ok(()),
        }
    }
}

const SIMPLEBEEP_PITCH: u16 = 2093; // C

/// PC speaker beeper, via the beep crate
pub struct SimpleBeep {
    is_beeping: bool,
}

impl SimpleBeep {
    pub fn new() -> Self {
        SimpleBeep { is_beeping: false }
    }
}

impl Default for SimpleBeep {
    fn default() -> Self {
        Self::new()
    }
}

impl Sound for SimpleBeep {
    fn beep(&mut self) -> Result<(), Box<dyn Error>> {
        beep(SIMPLEBEEP_PITCH)?;
        self.is_beeping = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        beep(0)?;
        self.is_beeping = false;
        Ok(())
    }

    fn is_beeping(&self) -> bool {
        self.is_beeping
    }
}

impl Drop for SimpleBeep {
    fn drop(&mut self) {
        if self.is_beeping {
            if let Err(e) = beep(0) {
                log::error!("couldn't silence the beeper: {}", e);
            }
        }
    }
}

/// silence; remembers what it would be doing so tests can check
#[derive(Default)]
pub struct Mute {
    is_beeping: bool,
    pub edges: usize,
}

impl Mute {
    pub fn new() -> Self {
        Mute::default()
    }
}

impl Sound for Mute {
    fn beep(&mut self) -> Result<(), Box<dyn Error>> {
        self.is_beeping = true;
        self.edges += 1;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        self.is_beeping = false;
        self.edges += 1;
        Ok(())
    }

    fn is_beeping(&self) -> bool {
        self.is_beeping
    }
}
