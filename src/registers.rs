//! # registers
//!
//! everything the CHIP-8 program can see of the processor:
//!  * V0-VF   general purpose 8bit registers; VF doubles as carry/borrow/collision flag
//!  * I       16bit address register
//!  * PC      program counter                -- 0x200 after reset
//!  * SP      call stack depth
//!  * stack   return addresses, 16 deep
//!  * DT, ST  delay and sound timers, counting down at 60Hz

use std::fmt;

use crate::error::FaultKind;
use crate::memory::CHIP8_PROGRAM_ADDR;

/// how many return addresses fit on the call stack
pub const CHIP8_STACK_DEPTH: usize = 16;

/// index of the flag register
pub const VF: usize = 0xf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterFile {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub stack: [u16; CHIP8_STACK_DEPTH],
    pub delay_timer: u8,
    pub sound_timer: u8,
}

impl RegisterFile {
    pub fn new() -> Self {
        RegisterFile {
            v: [0; 16],
            i: 0,
            pc: CHIP8_PROGRAM_ADDR,
            sp: 0,
            stack: [0; CHIP8_STACK_DEPTH],
            delay_timer: 0,
            sound_timer: 0,
        }
    }

    pub fn push(&mut self, addr: u16) -> Result<(), FaultKind> {
        let depth = self.sp as usize;
        if depth >= CHIP8_STACK_DEPTH {
            return Err(FaultKind::StackOverflow);
        }
        self.stack[depth] = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, FaultKind> {
        if self.sp == 0 {
            return Err(FaultKind::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.stack[self.sp as usize])
    }

    /// one 60Hz tick; both timers stop at zero
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}

/// register dump, for fault reports
impl fmt::Display for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "PC={:03x} I={:03x} SP={} DT={:02x} ST={:02x}",
            self.pc, self.i, self.sp, self.delay_timer, self.sound_timer
        )?;
        for (n, v) in self.v.iter().enumerate() {
            let sep = if n == 7 { "\n" } else if n == 15 { "" } else { " " };
            write!(f, "V{:X}={:02x}{}", n, v, sep)?;
        }
        if self.sp > 0 {
            write!(f, "\nstack:")?;
            for addr in &self.stack[..self.sp as usize] {
                write!(f, " {:03x}", addr)?;
            }
        }
        Ok(())
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}
