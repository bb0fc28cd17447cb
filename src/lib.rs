///
/// ## Design
///
/// * one CHIP-8 instruction per cycle, ~700 cycles a second, with a separate
///   60Hz interrupt for the display and the two timers
/// * abstract display so can plug alternatives; TUI and a plain glyph grid
///   in-console to start with
/// * every memory, stack and framebuffer access is checked; a ROM that runs
///   off the end of something stops with a fault naming the PC and opcode
///   rather than scribbling on its neighbours
///
/// Pieces:
///
/// * memory map: 4K, font at 0x000, programs at 0x200
/// * register file: V0-VF, I, PC, call stack, timers
/// * framebuffer: 64x32 bits, XOR plotting, wraps at the edges
/// * instruction set: pure decoder from u16 to an operation
/// * the vm itself
///    - pub .step(keys) -- fetch, decode, execute one instruction
///    - pub .tick_timers() -- the 60Hz part of the interrupt
///    - each instruction reports where the PC goes next; nothing else moves it
///    - FX0A parks the vm in a waiting state; .step() does nothing until a
///      key goes down, but the interrupt keeps firing
/// * clock: two independent cadences off the one wall clock
/// * config: command line and quirks
/// * the environment (interpreter)
///    - owns the vm, borrows display, input and sound
///    - runs the main loop
/// * display, with trait for rendering
/// * input device, with trait for reading key-presses
/// * audio device, with trait for making beeps
///
/// Model
///
/// Environment
///  |-- display, input, audio, settings
///  |-- interpreter(display, input, audio, settings)
///  |    `-- vm(memory, registers, framebuffer, quirks)
///  `-- main loop
///       |-- keys = input.peek_keys()
///       |-- ticks = scheduler.poll(now)
///       |-- ticks.cpu times: vm.step(keys)
///       |-- ticks.frame times: display.draw(vm.framebuffer); vm.tick_timers()
///       `-- sleep(scheduler.until_next())
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod memory;
pub mod registers;
pub mod sound;
pub mod vm;

pub use error::{Chip8Error, Fault, FaultKind, LoadError};
pub use interpreter::Chip8Interpreter;
pub use vm::{Chip8Vm, ExecState, Quirks};
