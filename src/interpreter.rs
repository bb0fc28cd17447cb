//! # interpreter
//!
//! the environment around the VM: it owns the machine, borrows the display,
//! keyboard and buzzer, and runs the main loop.
//!
//! main loop, one pass per wake-up:
//!  * poll the keyboard once
//!  * measure elapsed wall clock once; feed both cadences
//!  * run the due instruction cycles (FX0A makes these no-ops until a key goes down)
//!  * run the due 60Hz interrupts: draw the framebuffer, then tick the timers
//!  * sleep until whichever cadence is due next
use std::io;
use std::time::Instant;

use crate::clock::Scheduler;
use crate::config::Settings;
use crate::display::Display;
use crate::error::Chip8Error;
use crate::input::{Input, Keypad};
use crate::sound::Sound;
use crate::vm::Chip8Vm;

pub struct Chip8Interpreter<'a> {
    vm: Chip8Vm,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
    keypad: Keypad,
    instructions_per_second: u64,
    frame_rate: u64,
    cycles: u64,
}

impl<'a> Chip8Interpreter<'a> {
    /// wrap a vm that has already been set up, e.g. with a program loaded
    pub fn with_vm(
        vm: Chip8Vm,
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
        settings: &Settings,
    ) -> Self {
        Chip8Interpreter {
            vm,
            display,
            input,
            sound,
            keypad: Keypad::default(),
            instructions_per_second: settings.instructions_per_second,
            frame_rate: settings.frame_rate,
            cycles: 0,
        }
    }

    pub fn vm(&self) -> &Chip8Vm {
        &self.vm
    }

    /// instruction cycles run so far
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    fn poll_input(&mut self) -> Result<(), io::Error> {
        let keys = self.input.peek_keys()?;
        let mut keypad = Keypad::from_keys(keys, &self.keypad);
        // a press seen on a frame-only pass waits for the next cycle
        keypad.newly_pressed = keypad.newly_pressed.or(self.keypad.newly_pressed);
        self.keypad = keypad;
        Ok(())
    }

    /// one tick of the instruction cadence
    pub fn cycle(&mut self) -> Result<(), Chip8Error> {
        self.vm.step(&self.keypad)?;
        // a press is only news to the first cycle that sees it
        self.keypad.newly_pressed = None;
        self.cycles += 1;
        Ok(())
    }

    /// one tick of the 60Hz cadence: flush the display, then the timers
    pub fn interrupt(&mut self) -> Result<(), Chip8Error> {
        self.display.draw(self.vm.framebuffer())?;
        self.vm.tick_timers();
        if let Err(e) = self.sound.follow_timer(self.vm.registers().sound_timer) {
            log::warn!("sound device: {}", e);
        }
        Ok(())
    }

    /// run until the user quits or `max_cycles` instruction cycles have run;
    /// returns the number of cycles run
    pub fn main_loop(&mut self, max_cycles: Option<u64>) -> Result<u64, Chip8Error> {
        let mut scheduler = Scheduler::new(
            self.instructions_per_second,
            self.frame_rate,
            Instant::now(),
        );
        loop {
            self.poll_input()?;
            if self.input.quit_requested() {
                log::info!("quit after {} cycles", self.cycles);
                break;
            }

            let ticks = scheduler.poll(Instant::now());
            for _ in 0..ticks.cpu {
                if max_cycles.map_or(false, |max| self.cycles >= max) {
                    log::info!("cycle limit reached");
                    return Ok(self.cycles);
                }
                self.cycle()?;
            }
            for _ in 0..ticks.frame {
                self.interrupt()?;
            }

            spin_sleep::sleep(scheduler.until_next());
        }
        Ok(self.cycles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DummyDisplay;
    use crate::error::FaultKind;
    use crate::input::DummyInput;
    use crate::sound::Mute;
    use crate::vm::ExecState;
    use std::path::PathBuf;

    fn fast_settings() -> Settings {
        Settings {
            instructions_per_second: 200_000,
            seed: Some(1),
            ..Settings::new(PathBuf::from("test.ch8"))
        }
    }

    fn with_program<'a>(
        mut prog: &[u8],
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
    ) -> Result<Chip8Interpreter<'a>, Chip8Error> {
        let settings = fast_settings();
        let mut vm = Chip8Vm::with_quirks(settings.quirks, settings.seed);
        vm.load_program(&mut prog)?;
        Ok(Chip8Interpreter::with_vm(vm, display, input, sound, &settings))
    }

    #[test]
    fn test_program_runs_from_0x200() -> Result<(), Chip8Error> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(&[]);
        let mut sound = Mute::new();
        // clear screen
        let mut i = with_program(&[0x00, 0xe0], &mut display, &mut input, &mut sound)?;
        i.cycle()?;
        assert_eq!(i.vm().registers().pc, 0x202);
        assert_eq!(i.cycles(), 1);
        Ok(())
    }

    #[test]
    fn test_interrupt_draws_then_ticks() -> Result<(), Chip8Error> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(&[]);
        let mut sound = Mute::new();
        // ST = DT = 2
        let prog = [0x60, 0x02, 0xf0, 0x15, 0xf0, 0x18];
        let mut i = with_program(&prog, &mut display, &mut input, &mut sound)?;
        for _ in 0..3 {
            i.cycle()?;
        }
        i.interrupt()?;
        assert_eq!(i.vm().registers().delay_timer, 1);
        i.interrupt()?;
        i.interrupt()?;
        assert_eq!(i.vm().registers().delay_timer, 0);
        assert_eq!(i.vm().registers().sound_timer, 0);
        drop(i);
        assert_eq!(display.frames, 3);
        // on after the first tick, off once the timer ran out
        assert_eq!(sound.edges, 2);
        assert!(!sound.is_beeping());
        Ok(())
    }

    #[test]
    fn test_main_loop_stops_at_cycle_limit() -> Result<(), Chip8Error> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(&[]);
        let mut sound = Mute::new();
        // spin forever
        let mut i = with_program(&[0x12, 0x00], &mut display, &mut input, &mut sound)?;
        assert_eq!(i.main_loop(Some(500))?, 500);
        assert_eq!(i.cycles(), 500);
        Ok(())
    }

    #[test]
    fn test_main_loop_reports_fault() -> Result<(), Chip8Error> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(&[]);
        let mut sound = Mute::new();
        let mut i = with_program(&[0x00, 0xee], &mut display, &mut input, &mut sound)?;
        match i.main_loop(None) {
            Err(Chip8Error::Fault(f)) => {
                assert_eq!(f.kind, FaultKind::StackUnderflow);
                assert_eq!(f.registers.pc, 0x200);
            }
            other => panic!("expected a fault, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_key_wait_picks_up_press() -> Result<(), Chip8Error> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::scripted(&[&[], &[], &[0x9]]);
        let mut sound = Mute::new();
        // V2 = key; then two more waits that must not see the same press
        let prog = [0xf2, 0x0a, 0xf3, 0x0a];
        let mut i = with_program(&prog, &mut display, &mut input, &mut sound)?;
        i.poll_input()?;
        i.cycle()?;
        assert_eq!(i.vm().state(), ExecState::AwaitingKey { x: 2 });
        i.poll_input()?;
        i.cycle()?;
        assert_eq!(i.vm().state(), ExecState::AwaitingKey { x: 2 });
        i.poll_input()?;
        i.cycle()?;
        assert_eq!(i.vm().registers().v[2], 0x9);
        i.cycle()?;
        i.cycle()?;
        assert_eq!(i.vm().state(), ExecState::AwaitingKey { x: 3 });
        // still held, not new
        i.poll_input()?;
        i.cycle()?;
        assert_eq!(i.vm().state(), ExecState::AwaitingKey { x: 3 });
        Ok(())
    }

    #[test]
    fn test_press_during_frame_only_pass_is_kept() -> Result<(), Chip8Error> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::scripted(&[&[], &[0x9], &[0x9]]);
        let mut sound = Mute::new();
        let mut i = with_program(&[0xf2, 0x0a], &mut display, &mut input, &mut sound)?;
        i.poll_input()?;
        i.cycle()?;
        assert_eq!(i.vm().state(), ExecState::AwaitingKey { x: 2 });
        // key goes down on a pass that only runs the 60Hz interrupt
        i.poll_input()?;
        i.interrupt()?;
        // next pass sees it as already held
        i.poll_input()?;
        i.cycle()?;
        assert_eq!(i.vm().state(), ExecState::Running);
        assert_eq!(i.vm().registers().v[2], 0x9);
        Ok(())
    }

    #[test]
    fn test_main_loop_keeps_frames_and_timers_while_waiting() -> Result<(), Chip8Error> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(&[]);
        let mut sound = Mute::new();
        // DT = 5, then wait for a key that never comes
        let prog = [0x60, 0x05, 0xf0, 0x15, 0xf0, 0x0a];
        let mut i = with_program(&prog, &mut display, &mut input, &mut sound)?;
        // 10000 cycles at 200kHz is ~50ms, a few 60Hz frames
        i.main_loop(Some(10_000))?;
        assert_eq!(i.vm().state(), ExecState::AwaitingKey { x: 0 });
        assert_eq!(i.vm().registers().pc, 0x206);
        assert!(i.vm().registers().delay_timer < 5);
        drop(i);
        assert!(display.frames > 0);
        Ok(())
    }
}
