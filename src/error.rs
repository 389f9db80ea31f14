use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Chip8Error>;

/// Everything that can stop the interpreter. All of these are fatal to a run;
/// a skipped unknown opcode never gets this far.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("program is {len} bytes but only {capacity} bytes fit above 0x200")]
    Load { len: usize, capacity: usize },
    #[error("program counter 0x{pc:04x} is outside memory")]
    Fetch { pc: u16 },
    #[error("unknown instruction 0x{word:04x} at 0x{pc:03x}")]
    Decode { word: u16, pc: u16 },
    #[error("call stack overflow at 0x{pc:03x}")]
    StackOverflow { pc: u16 },
    #[error("return with empty call stack at 0x{pc:03x}")]
    StackUnderflow { pc: u16 },
    #[error("access of {len} byte(s) at 0x{addr:04x} is outside memory")]
    MemoryOutOfBounds { addr: usize, len: usize },
    #[error("bad configuration: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
