//! A CHIP-8 virtual machine.
//!
//! ## Design
//!
//! * the machine is one owned aggregate (`Machine`) handed by `&mut` to every
//!   instruction; no globals
//! * instructions are decoded into an `Instruction` enum from a table on the
//!   word's nibbles, then executed; each is testable on its own
//! * one `step()` is one fetch/decode/execute; nothing in the core blocks.
//!   wait-key "waits" by rewinding PC so the same word runs again next cycle
//! * the core never decrements timers itself; the host ticks them at 60Hz,
//!   independent of instruction rate
//! * display and input are traits, so the interpreter doesn't need to know
//!   how the screen or keyboard works; a terminal implementation is included
//! * some config (display size, clock rates, unknown opcode policy)
//!
//! Model
//!
//! Environment
//!  |-- display, input, config
//!  |-- interpreter(config)
//!  |    |-- machine: memory(font, program), registers, stack, timers,
//!  |    |            frame buffer, keypad
//!  |    `-- instruction set
//!  `-- main loop, once per timer tick
//!       |-- input.poll(keypad)
//!       |-- interpreter.run_cycles(cycles_per_frame)
//!       |-- machine.tick_timers()
//!       |-- display.draw(frame buffer) if it changed
//!       `-- sleep until the next tick
pub mod config;
pub mod display;
pub mod environment;
pub mod error;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod machine;
pub mod memory;

pub use config::{Config, UnknownOpcodePolicy};
pub use error::{Chip8Error, Result};
pub use instruction::Instruction;
pub use interpreter::Chip8Interpreter;
pub use machine::Machine;
