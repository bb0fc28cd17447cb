//! # vm
//!
//! the execution core: memory, registers and framebuffer, plus the
//! fetch/decode/execute step. nothing else gets to mutate them once a
//! program is running.
//!
//! every handler says where the PC goes next (`Flow`); the step commits
//! it only once the handler has succeeded, so a faulting instruction leaves
//! the machine exactly as it found it with PC still pointing at it.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;

use crate::error::{Fault, FaultKind, LoadError};
use crate::framebuffer::{Framebuffer, CHIP8_DISPLAY_HEIGHT, CHIP8_DISPLAY_WIDTH};
use crate::input::Keypad;
use crate::instruction::{decode, Instruction};
use crate::memory::{Chip8MemoryMap, MemoryMap, CHIP8_FONT_ADDR, CHIP8_FONT_GLYPH_BYTES};
use crate::registers::{RegisterFile, VF};

/// behaviour that differs between historical interpreters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quirks {
    /// 8XY6/8XYE shift VY into VX, as the COSMAC VIP did
    pub shift_uses_vy: bool,
    /// FX55/FX65 leave I pointing just past the last byte touched
    pub load_store_bumps_i: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecState {
    Running,
    /// FX0A: instruction fetch is suspended until a key goes down
    AwaitingKey { x: u8 },
}

/// where the PC goes after an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Next,
    Skip,
    Jump(u16),
}

fn skip_if(cond: bool) -> Flow {
    if cond {
        Flow::Skip
    } else {
        Flow::Next
    }
}

pub struct Chip8Vm {
    memory: Chip8MemoryMap,
    registers: RegisterFile,
    framebuffer: Framebuffer,
    state: ExecState,
    quirks: Quirks,
    rng: StdRng,
}

impl Chip8Vm {
    pub fn new() -> Self {
        Self::with_quirks(Quirks::default(), None)
    }

    /// `seed` pins the CXNN random stream; None seeds from the OS
    pub fn with_quirks(quirks: Quirks, seed: Option<u64>) -> Self {
        Chip8Vm {
            memory: Chip8MemoryMap::new(),
            registers: RegisterFile::new(),
            framebuffer: Framebuffer::new(),
            state: ExecState::Running,
            quirks,
            rng: match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_entropy(),
            },
        }
    }

    /// copy a ROM image to 0x200; only meant to happen before the first step
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize, LoadError> {
        self.memory.load_program(reader)
    }

    pub fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    pub fn memory(&self) -> &Chip8MemoryMap {
        &self.memory
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn state(&self) -> ExecState {
        self.state
    }

    /// one 60Hz tick of the delay and sound timers
    pub fn tick_timers(&mut self) {
        self.registers.tick_timers();
    }

    /// one instruction cycle. while waiting on FX0A this only looks for a
    /// newly pressed key and fetches nothing
    pub fn step(&mut self, keys: &Keypad) -> Result<(), Fault> {
        if let ExecState::AwaitingKey { x } = self.state {
            if let Some(key) = keys.newly_pressed {
                self.registers.v[x as usize] = key;
                self.state = ExecState::Running;
            }
            return Ok(());
        }

        let before = self.registers;
        let pc = before.pc;
        let opcode = self.memory.get_word(pc).map_err(|kind| Fault {
            kind,
            opcode: None,
            registers: before,
        })?;
        let instruction = decode(opcode);
        log::trace!("{:03x}: {:04x} {}", pc, opcode, instruction);

        match self.execute(instruction, keys) {
            Ok(flow) => {
                self.registers.pc = match flow {
                    Flow::Next => pc + 2,
                    Flow::Skip => pc + 4,
                    Flow::Jump(addr) => addr,
                };
                Ok(())
            }
            Err(kind) => {
                self.registers = before;
                Err(Fault {
                    kind,
                    opcode: Some(opcode),
                    registers: before,
                })
            }
        }
    }

    fn execute(&mut self, instruction: Instruction, keys: &Keypad) -> Result<Flow, FaultKind> {
        use Instruction::*;
        let r = &mut self.registers;
        let flow = match instruction {
            ClearScreen => {
                self.framebuffer.clear();
                Flow::Next
            }
            Return => Flow::Jump(r.pop()?),
            MachineCall { addr } => {
                log::debug!("ignoring machine code call to 0x{:03x}", addr);
                Flow::Next
            }
            Jump { addr } => Flow::Jump(addr),
            Call { addr } => {
                r.push(r.pc + 2)?;
                Flow::Jump(addr)
            }
            SkipEqImm { x, nn } => skip_if(r.v[x as usize] == nn),
            SkipNeImm { x, nn } => skip_if(r.v[x as usize] != nn),
            SkipEqReg { x, y } => skip_if(r.v[x as usize] == r.v[y as usize]),
            SkipNeReg { x, y } => skip_if(r.v[x as usize] != r.v[y as usize]),
            LoadImm { x, nn } => {
                r.v[x as usize] = nn;
                Flow::Next
            }
            AddImm { x, nn } => {
                r.v[x as usize] = r.v[x as usize].wrapping_add(nn);
                Flow::Next
            }
            Move { x, y } => {
                r.v[x as usize] = r.v[y as usize];
                Flow::Next
            }
            Or { x, y } => {
                r.v[x as usize] |= r.v[y as usize];
                Flow::Next
            }
            And { x, y } => {
                r.v[x as usize] &= r.v[y as usize];
                Flow::Next
            }
            Xor { x, y } => {
                r.v[x as usize] ^= r.v[y as usize];
                Flow::Next
            }
            // the flag is written last, so with X = F it wins over the result
            AddReg { x, y } => {
                let (sum, carry) = r.v[x as usize].overflowing_add(r.v[y as usize]);
                r.v[x as usize] = sum;
                r.v[VF] = carry as u8;
                Flow::Next
            }
            SubReg { x, y } => {
                let (vx, vy) = (r.v[x as usize], r.v[y as usize]);
                r.v[x as usize] = vx.wrapping_sub(vy);
                r.v[VF] = (vx >= vy) as u8;
                Flow::Next
            }
            SubReverse { x, y } => {
                let (vx, vy) = (r.v[x as usize], r.v[y as usize]);
                r.v[x as usize] = vy.wrapping_sub(vx);
                r.v[VF] = (vy >= vx) as u8;
                Flow::Next
            }
            ShiftRight { x, y } => {
                let src = if self.quirks.shift_uses_vy {
                    r.v[y as usize]
                } else {
                    r.v[x as usize]
                };
                r.v[x as usize] = src >> 1;
                r.v[VF] = src & 0x1;
                Flow::Next
            }
            ShiftLeft { x, y } => {
                let src = if self.quirks.shift_uses_vy {
                    r.v[y as usize]
                } else {
                    r.v[x as usize]
                };
                r.v[x as usize] = src << 1;
                r.v[VF] = src >> 7;
                Flow::Next
            }
            LoadIndex { addr } => {
                r.i = addr;
                Flow::Next
            }
            JumpOffset { addr } => Flow::Jump(addr + r.v[0] as u16),
            Random { x, nn } => {
                r.v[x as usize] = self.rng.gen::<u8>() & nn;
                Flow::Next
            }
            Draw { x, y, n } => {
                self.draw(x, y, n)?;
                Flow::Next
            }
            SkipKeyPressed { x } => skip_if(keys.is_pressed(r.v[x as usize])),
            SkipKeyReleased { x } => skip_if(!keys.is_pressed(r.v[x as usize])),
            GetDelay { x } => {
                r.v[x as usize] = r.delay_timer;
                Flow::Next
            }
            WaitKey { x } => {
                self.state = ExecState::AwaitingKey { x };
                Flow::Next
            }
            SetDelay { x } => {
                r.delay_timer = r.v[x as usize];
                Flow::Next
            }
            SetSound { x } => {
                r.sound_timer = r.v[x as usize];
                Flow::Next
            }
            AddIndex { x } => {
                r.i = r.i.wrapping_add(r.v[x as usize] as u16);
                Flow::Next
            }
            FontGlyph { x } => {
                let digit = (r.v[x as usize] & 0xf) as u16;
                r.i = CHIP8_FONT_ADDR + digit * CHIP8_FONT_GLYPH_BYTES;
                Flow::Next
            }
            StoreBcd { x } => {
                let vx = r.v[x as usize];
                self.memory.write(&[vx / 100, vx / 10 % 10, vx % 10], r.i)?;
                Flow::Next
            }
            StoreRegs { x } => {
                let count = x as usize + 1;
                self.memory.write(&r.v[..count], r.i)?;
                if self.quirks.load_store_bumps_i {
                    r.i = r.i.wrapping_add(count as u16);
                }
                Flow::Next
            }
            LoadRegs { x } => {
                let count = x as usize + 1;
                let bytes = self.memory.get_ro_slice(r.i, count)?;
                r.v[..count].copy_from_slice(bytes);
                if self.quirks.load_store_bumps_i {
                    r.i = r.i.wrapping_add(count as u16);
                }
                Flow::Next
            }
            Unknown(op) => {
                log::debug!("no such instruction 0x{:04x}, skipping", op);
                Flow::Next
            }
        };
        Ok(flow)
    }

    /// DXYN: XOR an N-row sprite from memory[I..I+N) at (VX, VY), wrapping
    /// at the edges; VF = 1 if any lit pixel went dark
    fn draw(&mut self, x: u8, y: u8, n: u8) -> Result<(), FaultKind> {
        let r = &mut self.registers;
        let x0 = r.v[x as usize] as usize % CHIP8_DISPLAY_WIDTH;
        let y0 = r.v[y as usize] as usize % CHIP8_DISPLAY_HEIGHT;
        let sprite = self.memory.get_ro_slice(r.i, n as usize)?;
        let mut collided = false;
        for (row, bits) in sprite.iter().enumerate() {
            collided |= self.framebuffer.plot_row(x0, y0 + row, *bits)?;
        }
        r.v[VF] = collided as u8;
        Ok(())
    }
}

impl Default for Chip8Vm {
    fn default() -> Self {
        Self::new()
    }
}
