use std::io;
use thiserror::Error;

use crate::registers::RegisterFile;

/// anything that can stop a ROM from getting as far as its first instruction
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("couldn't read program: {0}")]
    Io(#[from] io::Error),

    /// `size` counts what was read before giving up, so at most `max + 1`
    #[error("program is more than {max} bytes, too big to fit above 0x200")]
    TooLarge { size: usize, max: usize },
}

/// what went wrong while executing an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FaultKind {
    #[error("memory address 0x{addr:04x} out of range")]
    AddressOutOfRange { addr: usize },

    #[error("call stack overflow")]
    StackOverflow,

    #[error("return with empty call stack")]
    StackUnderflow,

    #[error("pixel ({x}, {y}) outside the framebuffer")]
    PixelOutOfRange { x: usize, y: usize },
}

/// fatal execution fault; `registers` is the machine state as it was before
/// the faulting instruction, so `registers.pc` points at it. `opcode` is
/// None when the fault happened fetching the instruction itself
#[derive(Debug, Clone, Error)]
#[error("{kind} at pc 0x{:03x} {}", .registers.pc, fault_source(.opcode))]
pub struct Fault {
    pub kind: FaultKind,
    pub opcode: Option<u16>,
    pub registers: RegisterFile,
}

fn fault_source(opcode: &Option<u16>) -> String {
    match opcode {
        Some(op) => format!("(opcode 0x{:04x})", op),
        None => String::from("(instruction fetch)"),
    }
}

/// everything the main loop can bail out with
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Fault(#[from] Fault),

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}
