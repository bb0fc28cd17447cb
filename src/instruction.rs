//! # instruction set
//!
//! CHIP-8 instructions are 16 bits, big-endian. The top nibble picks the
//! family; the rest carries operands, some combination of:
//!  * `_nnn` a 12bit address
//!  * `_x__` a register VX (or the range V0..=VX)
//!  * `__y_` a register VY
//!  * `__nn` an 8bit immediate
//!  * `___n` a 4bit immediate (sprite height) or sub-opcode
use std::fmt;

/// fields of an instruction word, derived per decode
pub trait Opcode {
    /// `[i___]`
    fn class(&self) -> u8;
    /// `[_x__]`
    fn x(&self) -> u8;
    /// `[__y_]`
    fn y(&self) -> u8;
    /// `[___n]`
    fn n(&self) -> u8;
    /// `[__nn]`
    fn nn(&self) -> u8;
    /// `[_nnn]`
    fn nnn(&self) -> u16;
}

impl Opcode for u16 {
    fn class(&self) -> u8 {
        (self >> 12) as u8
    }
    fn x(&self) -> u8 {
        ((self >> 8) & 0xf) as u8
    }
    fn y(&self) -> u8 {
        ((self >> 4) & 0xf) as u8
    }
    fn n(&self) -> u8 {
        (self & 0xf) as u8
    }
    fn nn(&self) -> u8 {
        (self & 0xff) as u8
    }
    fn nnn(&self) -> u16 {
        self & 0x0fff
    }
}

/// one decoded operation; every u16 maps to exactly one of these
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 0NNN: call a COSMAC machine code routine
    MachineCall { addr: u16 },
    /// 1NNN
    Jump { addr: u16 },
    /// 2NNN
    Call { addr: u16 },
    /// 3XNN
    SkipEqImm { x: u8, nn: u8 },
    /// 4XNN
    SkipNeImm { x: u8, nn: u8 },
    /// 5XY0
    SkipEqReg { x: u8, y: u8 },
    /// 6XNN
    LoadImm { x: u8, nn: u8 },
    /// 7XNN
    AddImm { x: u8, nn: u8 },
    /// 8XY0
    Move { x: u8, y: u8 },
    /// 8XY1
    Or { x: u8, y: u8 },
    /// 8XY2
    And { x: u8, y: u8 },
    /// 8XY3
    Xor { x: u8, y: u8 },
    /// 8XY4
    AddReg { x: u8, y: u8 },
    /// 8XY5
    SubReg { x: u8, y: u8 },
    /// 8XY6
    ShiftRight { x: u8, y: u8 },
    /// 8XY7
    SubReverse { x: u8, y: u8 },
    /// 8XYE
    ShiftLeft { x: u8, y: u8 },
    /// 9XY0
    SkipNeReg { x: u8, y: u8 },
    /// ANNN
    LoadIndex { addr: u16 },
    /// BNNN
    JumpOffset { addr: u16 },
    /// CXNN
    Random { x: u8, nn: u8 },
    /// DXYN
    Draw { x: u8, y: u8, n: u8 },
    /// EX9E
    SkipKeyPressed { x: u8 },
    /// EXA1
    SkipKeyReleased { x: u8 },
    /// FX07
    GetDelay { x: u8 },
    /// FX0A
    WaitKey { x: u8 },
    /// FX15
    SetDelay { x: u8 },
    /// FX18
    SetSound { x: u8 },
    /// FX1E
    AddIndex { x: u8 },
    /// FX29
    FontGlyph { x: u8 },
    /// FX33
    StoreBcd { x: u8 },
    /// FX55
    StoreRegs { x: u8 },
    /// FX65
    LoadRegs { x: u8 },
    /// anything unassigned; executes as a no-op
    Unknown(u16),
}

/// map an instruction word onto an operation; pure, never fails
pub fn decode(op: u16) -> Instruction {
    use Instruction::*;
    let (x, y, n, nn, addr) = (op.x(), op.y(), op.n(), op.nn(), op.nnn());
    match (op.class(), x, y, n) {
        (0x0, 0x0, 0xe, 0x0) => ClearScreen,
        (0x0, 0x0, 0xe, 0xe) => Return,
        (0x0, ..) => MachineCall { addr },
        (0x1, ..) => Jump { addr },
        (0x2, ..) => Call { addr },
        (0x3, ..) => SkipEqImm { x, nn },
        (0x4, ..) => SkipNeImm { x, nn },
        (0x5, .., 0x0) => SkipEqReg { x, y },
        (0x6, ..) => LoadImm { x, nn },
        (0x7, ..) => AddImm { x, nn },
        (0x8, .., 0x0) => Move { x, y },
        (0x8, .., 0x1) => Or { x, y },
        (0x8, .., 0x2) => And { x, y },
        (0x8, .., 0x3) => Xor { x, y },
        (0x8, .., 0x4) => AddReg { x, y },
        (0x8, .., 0x5) => SubReg { x, y },
        (0x8, .., 0x6) => ShiftRight { x, y },
        (0x8, .., 0x7) => SubReverse { x, y },
        (0x8, .., 0xe) => ShiftLeft { x, y },
        (0x9, .., 0x0) => SkipNeReg { x, y },
        (0xa, ..) => LoadIndex { addr },
        (0xb, ..) => JumpOffset { addr },
        (0xc, ..) => Random { x, nn },
        (0xd, ..) => Draw { x, y, n },
        (0xe, _, 0x9, 0xe) => SkipKeyPressed { x },
        (0xe, _, 0xa, 0x1) => SkipKeyReleased { x },
        (0xf, _, 0x0, 0x7) => GetDelay { x },
        (0xf, _, 0x0, 0xa) => WaitKey { x },
        (0xf, _, 0x1, 0x5) => SetDelay { x },
        (0xf, _, 0x1, 0x8) => SetSound { x },
        (0xf, _, 0x1, 0xe) => AddIndex { x },
        (0xf, _, 0x2, 0x9) => FontGlyph { x },
        (0xf, _, 0x3, 0x3) => StoreBcd { x },
        (0xf, _, 0x5, 0x5) => StoreRegs { x },
        (0xf, _, 0x6, 0x5) => LoadRegs { x },
        _ => Unknown(op),
    }
}

/// conventional mnemonics, for fault reports and tracing
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match *self {
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            MachineCall { addr } => write!(f, "SYS 0x{:03x}", addr),
            Jump { addr } => write!(f, "JP 0x{:03x}", addr),
            Call { addr } => write!(f, "CALL 0x{:03x}", addr),
            SkipEqImm { x, nn } => write!(f, "SE V{:X}, 0x{:02x}", x, nn),
            SkipNeImm { x, nn } => write!(f, "SNE V{:X}, 0x{:02x}", x, nn),
            SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadImm { x, nn } => write!(f, "LD V{:X}, 0x{:02x}", x, nn),
            AddImm { x, nn } => write!(f, "ADD V{:X}, 0x{:02x}", x, nn),
            Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            SubReg { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            SubReverse { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            SkipNeReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadIndex { addr } => write!(f, "LD I, 0x{:03x}", addr),
            JumpOffset { addr } => write!(f, "JP V0, 0x{:03x}", addr),
            Random { x, nn } => write!(f, "RND V{:X}, 0x{:02x}", x, nn),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipKeyPressed { x } => write!(f, "SKP V{:X}", x),
            SkipKeyReleased { x } => write!(f, "SKNP V{:X}", x),
            GetDelay { x } => write!(f, "LD V{:X}, DT", x),
            WaitKey { x } => write!(f, "LD V{:X}, K", x),
            SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            SetSound { x } => write!(f, "LD ST, V{:X}", x),
            AddIndex { x } => write!(f, "ADD I, V{:X}", x),
            FontGlyph { x } => write!(f, "LD F, V{:X}", x),
            StoreBcd { x } => write!(f, "LD B, V{:X}", x),
            StoreRegs { x } => write!(f, "LD [I], V{:X}", x),
            LoadRegs { x } => write!(f, "LD V{:X}, [I]", x),
            Unknown(op) => write!(f, "??? 0x{:04x}", op),
        }
    }
}
