use crate::error::{Chip8Error, Result};

/// What to do with an instruction word that decodes to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownOpcodePolicy {
    /// stop the run with `Chip8Error::Decode`
    Fatal,
    /// log it and carry on as if it were a no-op
    Skip,
}

/// Machine and host settings. The defaults give the canonical 64x32 machine
/// running ~700 instructions a second against 60Hz timers.
#[derive(Debug, Clone)]
pub struct Config {
    pub display_width: usize,
    pub display_height: usize,
    pub cycles_per_second: u32,
    pub timer_hz: u32,
    pub unknown_opcode: UnknownOpcodePolicy,
    pub seed: Option<u64>,
    /// terminals don't report key releases, so a press is held this long
    pub key_hold_frames: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            display_width: 64,
            display_height: 32,
            cycles_per_second: 700,
            timer_hz: 60,
            unknown_opcode: UnknownOpcodePolicy::Fatal,
            seed: None,
            key_hold_frames: 6,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.display_width == 0 || self.display_height == 0 {
            return Err(Chip8Error::Config(format!(
                "display must be at least 1x1, got {}x{}",
                self.display_width, self.display_height
            )));
        }
        if self.cycles_per_second == 0 {
            return Err(Chip8Error::Config("cycles per second must be > 0".into()));
        }
        if self.timer_hz == 0 {
            return Err(Chip8Error::Config("timer rate must be > 0".into()));
        }
        Ok(())
    }

    /// instructions executed between two timer ticks
    pub fn cycles_per_frame(&self) -> u32 {
        (self.cycles_per_second / self.timer_hz.max(1)).max(1)
    }
}
