use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

use crate::vm::Quirks;

pub const DEFAULT_INSTRUCTIONS_PER_SECOND: u64 = 700;

/// the display/timer interrupt rate; fixed by the hardware
pub const FRAME_RATE: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Renderer {
    /// bordered canvas drawn with tui
    Tui,
    /// plain grid of block glyphs
    Glyph,
}

/// run a CHIP-8 program in the terminal
///
/// keypad is the left-hand block of the keyboard (1234/qwer/asdf/zxcv);
/// Esc quits
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// path to the ROM image
    pub rom: PathBuf,

    /// instructions per second
    #[arg(long, default_value_t = DEFAULT_INSTRUCTIONS_PER_SECOND)]
    pub ips: u64,

    #[arg(long, value_enum, default_value_t = Renderer::Tui)]
    pub renderer: Renderer,

    /// sound the PC speaker while the sound timer runs
    #[arg(long)]
    pub beep: bool,

    /// stop after this many instruction cycles
    #[arg(long)]
    pub max_cycles: Option<u64>,

    /// 8XY6/8XYE shift VY rather than VX
    #[arg(long)]
    pub shift_uses_vy: bool,

    /// FX55/FX65 advance I past the registers they copy
    #[arg(long)]
    pub load_store_bumps_i: bool,

    /// seed for the random number instruction
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value_t = LevelFilter::Warn)]
    pub log_level: LevelFilter,
}

/// everything the interpreter needs to know, independent of where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub rom: PathBuf,
    pub instructions_per_second: u64,
    pub frame_rate: u64,
    pub renderer: Renderer,
    pub beep: bool,
    pub max_cycles: Option<u64>,
    pub quirks: Quirks,
    pub seed: Option<u64>,
}

impl Settings {
    pub fn new(rom: PathBuf) -> Self {
        Settings {
            rom,
            instructions_per_second: DEFAULT_INSTRUCTIONS_PER_SECOND,
            frame_rate: FRAME_RATE,
            renderer: Renderer::Tui,
            beep: false,
            max_cycles: None,
            quirks: Quirks::default(),
            seed: None,
        }
    }
}

impl From<&Args> for Settings {
    fn from(args: &Args) -> Self {
        Settings {
            instructions_per_second: args.ips,
            renderer: args.renderer,
            beep: args.beep,
            max_cycles: args.max_cycles,
            quirks: Quirks {
                shift_uses_vy: args.shift_uses_vy,
                load_store_bumps_i: args.load_store_bumps_i,
            },
            seed: args.seed,
            ..Settings::new(args.rom.clone())
        }
    }
}
