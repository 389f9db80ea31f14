use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use chip8_vm::display::{DummyDisplay, MonoTermDisplay};
use chip8_vm::environment::Environment;
use chip8_vm::input::{DummyInput, TermInput};
use chip8_vm::instruction::listing;
use chip8_vm::memory::CHIP8_PROGRAM_ADDR;
use chip8_vm::{Config, UnknownOpcodePolicy};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OnUnknown {
    Fatal,
    Skip,
}

/// Run a CHIP-8 program
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// program image, loaded at 0x200
    rom: PathBuf,

    /// instructions per second
    #[arg(long, default_value_t = 700)]
    cycles: u32,

    /// timer and frame rate
    #[arg(long, default_value_t = 60)]
    timer_hz: u32,

    #[arg(long, default_value_t = 64)]
    width: usize,

    #[arg(long, default_value_t = 32)]
    height: usize,

    /// what to do with words that aren't instructions
    #[arg(long, value_enum, default_value_t = OnUnknown::Fatal)]
    on_unknown: OnUnknown,

    /// seed for the random number instruction
    #[arg(long)]
    seed: Option<u64>,

    /// frames a terminal key press stays down
    #[arg(long, default_value_t = 6)]
    key_hold: u32,

    /// stop after this many frames
    #[arg(long)]
    frames: Option<u64>,

    /// no terminal; run --frames (default 600) then print the screen
    #[arg(long)]
    headless: bool,

    /// print a listing of the program and exit
    #[arg(long)]
    disassemble: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            display_width: self.width,
            display_height: self.height,
            cycles_per_second: self.cycles,
            timer_hz: self.timer_hz,
            unknown_opcode: match self.on_unknown {
                OnUnknown::Fatal => UnknownOpcodePolicy::Fatal,
                OnUnknown::Skip => UnknownOpcodePolicy::Skip,
            },
            seed: self.seed,
            key_hold_frames: self.key_hold,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let program = fs::read(&args.rom)?;
    let config = args.config();
    config.validate()?;

    if args.disassemble {
        for line in listing(&program, CHIP8_PROGRAM_ADDR) {
            println!("{}", line);
        }
        return Ok(());
    }

    if args.headless {
        let mut env = Environment::new(&config, DummyDisplay::new(), DummyInput::new(&[]))?;
        env.load_program(&program)?;
        env.run_unpaced(args.frames.unwrap_or(600))?;
        print!("{}", env.interpreter.machine.display);
        return Ok(());
    }

    // the terminal has to be restored before an error is reported
    let result = {
        let display = MonoTermDisplay::new(config.display_width, config.display_height)?;
        let input = TermInput::new(config.key_hold_frames)?;
        let mut env = Environment::new(&config, display, input)?;
        env.load_program(&program)?;
        env.run(args.frames)
    };
    result?;
    Ok(())
}
