use clap::Parser;
use simple_logger::SimpleLogger;
use std::fs::File;
use std::io;
use std::process::ExitCode;

use chip8_vm::config::{Args, Renderer, Settings};
use chip8_vm::display::{Display, GlyphDisplay, MonoTermDisplay};
use chip8_vm::input::TermInput;
use chip8_vm::sound::{Mute, SimpleBeep, Sound};
use chip8_vm::{Chip8Error, Chip8Interpreter, Chip8Vm, LoadError};

fn run(settings: &Settings) -> Result<u64, Chip8Error> {
    // load the program before touching the terminal, so a bad ROM never
    // gets as far as raw mode
    let mut vm = Chip8Vm::with_quirks(settings.quirks, settings.seed);
    let mut f = File::open(&settings.rom).map_err(LoadError::from)?;
    let len = vm.load_program(&mut f)?;
    log::info!("loaded {} bytes from {}", len, settings.rom.display());

    let mut display: Box<dyn Display> = match settings.renderer {
        Renderer::Tui => Box::new(MonoTermDisplay::new()?),
        Renderer::Glyph => Box::new(GlyphDisplay::new(io::stdout())),
    };
    let mut input = TermInput::new()?;
    let mut sound: Box<dyn Sound> = if settings.beep {
        Box::new(SimpleBeep::new())
    } else {
        Box::new(Mute::new())
    };

    let mut interpreter = Chip8Interpreter::with_vm(
        vm,
        display.as_mut(),
        &mut input,
        sound.as_mut(),
        settings,
    );
    interpreter.main_loop(settings.max_cycles)
}

fn main() -> ExitCode {
    // clap prints usage and exits non-zero on a missing or extra ROM path
    let args = Args::parse();
    if let Err(e) = SimpleLogger::new().with_level(args.log_level).init() {
        eprintln!("can't set up logging: {}", e);
    }
    let settings = Settings::from(&args);

    let result = run(&settings);

    // shove some junk on stdout to stop the cli messing up the last frame
    println!();

    match result {
        Ok(cycles) => {
            log::info!("ran {} cycles", cycles);
            ExitCode::SUCCESS
        }
        Err(Chip8Error::Fault(fault)) => {
            eprintln!("fault: {}", fault);
            eprintln!("{}", fault.registers);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
