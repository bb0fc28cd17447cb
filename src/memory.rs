use std::io::{self, Read};

use crate::error::{FaultKind, LoadError};

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// Represents the addressable memory of the machine. Every access is bounds
/// checked; running off the end is a fault, never a wraparound.
pub trait MemoryMap {
    /// get a r/w slice of the underlying memory
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8], FaultKind>;

    /// get a r/o slice of the underlying memory
    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8], FaultKind>;

    /// write a chunk of bytes; nothing is written unless all of it fits
    fn write(&mut self, data: &[u8], addr: u16) -> Result<(), FaultKind> {
        self.get_rw_slice(addr, data.len())?.copy_from_slice(data);
        Ok(())
    }

    fn get_byte(&self, addr: u16) -> Result<u8, FaultKind> {
        Ok(self.get_ro_slice(addr, 1)?[0])
    }

    fn set_byte(&mut self, addr: u16, value: u8) -> Result<(), FaultKind> {
        self.get_rw_slice(addr, 1)?[0] = value;
        Ok(())
    }

    /// get a big-endian two-byte word (instruction fetch)
    fn get_word(&self, addr: u16) -> Result<u16, FaultKind> {
        let word = self.get_ro_slice(addr, 2)?;
        Ok(u16::from_be_bytes([word[0], word[1]]))
    }
}

/// Defines the CHIP-8 memory map:
///   0x0000-0x004f  font glyphs
///   0x0050-0x01ff  reserved for the interpreter
///   0x0200-0x0fff  program and data
///
/// call stack, registers and display live outside of this map
#[derive(Clone)]
pub struct Chip8MemoryMap {
    bytes: Box<[u8]>,
}

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// where the program is loaded
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// biggest program that fits between 0x200 and the top of RAM
pub const CHIP8_MAX_PROGRAM_BYTES: usize = CHIP8_RAM_SIZE_BYTES - CHIP8_PROGRAM_ADDR as usize;

/// where the font glyphs live
pub const CHIP8_FONT_ADDR: u16 = 0x000;

/// each glyph is 5 rows of 4 pixels
pub const CHIP8_FONT_GLYPH_BYTES: u16 = 5;

impl MemoryMap for Chip8MemoryMap {
    fn get_rw_slice(&mut self, addr: u16, len: usize) -> Result<&mut [u8], FaultKind> {
        let (a, end) = checked_range(addr, len)?;
        Ok(&mut self.bytes[a..end])
    }

    fn get_ro_slice(&self, addr: u16, len: usize) -> Result<&[u8], FaultKind> {
        let (a, end) = checked_range(addr, len)?;
        Ok(&self.bytes[a..end])
    }
}

/// the half-open range [addr, addr+len), or the first address that falls off the end
fn checked_range(addr: u16, len: usize) -> Result<(usize, usize), FaultKind> {
    let a = addr as usize;
    let end = a + len;
    if end > CHIP8_RAM_SIZE_BYTES {
        let first_bad = a.max(CHIP8_RAM_SIZE_BYTES);
        return Err(FaultKind::AddressOutOfRange { addr: first_bad });
    }
    Ok((a, end))
}

impl Chip8MemoryMap {
    /// zeroed RAM with the font baked in at 0x000
    pub fn new() -> Self {
        let mut bytes = vec![0u8; CHIP8_RAM_SIZE_BYTES].into_boxed_slice();
        let font = CHIP8_FONT_ADDR as usize;
        bytes[font..font + CHIP8_FONT.len()].copy_from_slice(&CHIP8_FONT);
        Chip8MemoryMap { bytes }
    }

    /// load a CHIP-8 program at 0x200; a ROM is raw machine code, no header
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize, LoadError> {
        // read one byte past the limit; that's enough to know it won't fit
        let mut buf = Vec::with_capacity(CHIP8_MAX_PROGRAM_BYTES + 1);
        let len = reader
            .take(CHIP8_MAX_PROGRAM_BYTES as u64 + 1)
            .read_to_end(&mut buf)?;
        if len > CHIP8_MAX_PROGRAM_BYTES {
            return Err(LoadError::TooLarge {
                size: len,
                max: CHIP8_MAX_PROGRAM_BYTES,
            });
        }
        let start = CHIP8_PROGRAM_ADDR as usize;
        self.bytes[start..start + len].copy_from_slice(&buf);
        Ok(len)
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
