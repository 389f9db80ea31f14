//! # machine
//!
//! Everything the running program can see:
//!  * 4K of memory, font at 0x050, program from 0x200
//!  * V0-VF, with VF doubling as carry/borrow/collision flag
//!  * I, the 16bit index register
//!  * the program counter
//!  * a 16 deep call stack
//!  * delay and sound timers, counted down at 60Hz by the host
//!  * the frame buffer and the keypad
use crate::config::Config;
use crate::display::FrameBuffer;
use crate::error::{Chip8Error, Result};
use crate::input::Keypad;
use crate::memory::{Chip8MemoryMap, CHIP8_PROGRAM_ADDR};

pub const STACK_DEPTH: usize = 16;

/// Fixed depth stack of return addresses.
#[derive(Debug, Clone, Default)]
pub struct CallStack {
    entries: [u16; STACK_DEPTH],
    pointer: usize,
}

impl CallStack {
    /// `pc` is only used to report where an overflow happened
    pub fn push(&mut self, addr: u16, pc: u16) -> Result<()> {
        if self.pointer == STACK_DEPTH {
            return Err(Chip8Error::StackOverflow { pc });
        }
        self.entries[self.pointer] = addr;
        self.pointer += 1;
        Ok(())
    }

    pub fn pop(&mut self, pc: u16) -> Result<u16> {
        if self.pointer == 0 {
            return Err(Chip8Error::StackUnderflow { pc });
        }
        self.pointer -= 1;
        Ok(self.entries[self.pointer])
    }

    pub fn depth(&self) -> usize {
        self.pointer
    }

    /// return addresses, oldest first
    pub fn frames(&self) -> &[u16] {
        &self.entries[..self.pointer]
    }
}

pub struct Machine {
    pub memory: Chip8MemoryMap,
    pub registers: [u8; 16],
    pub index_register: u16,
    pub program_counter: u16,
    pub stack: CallStack,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub display: FrameBuffer,
    pub keys: Keypad,
}

impl Machine {
    /// fails if `config` doesn't validate
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Machine {
            memory: Chip8MemoryMap::new(),
            registers: [0; 16],
            index_register: 0,
            program_counter: CHIP8_PROGRAM_ADDR,
            stack: CallStack::default(),
            delay_timer: 0,
            sound_timer: 0,
            display: FrameBuffer::new(config.display_width, config.display_height),
            keys: Keypad::new(),
        })
    }

    /// Put the machine into its power-on state with `program` at 0x200. On
    /// error nothing has changed.
    pub fn load(&mut self, program: &[u8]) -> Result<()> {
        let capacity = self.memory.program_capacity();
        if program.len() > capacity {
            return Err(Chip8Error::Load {
                len: program.len(),
                capacity,
            });
        }
        self.memory.clear();
        self.memory.load_program(program)?;
        self.registers = [0; 16];
        self.index_register = 0;
        self.program_counter = self.memory.program_addr;
        self.stack = CallStack::default();
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.display.clear();
        self.keys.release_all();
        log::debug!("loaded {} byte program at 0x{:03x}", program.len(), self.program_counter);
        Ok(())
    }

    pub fn register(&self, register_index: u8) -> u8 {
        self.registers[(register_index & 0xf) as usize]
    }

    pub fn register_mut(&mut self, register_index: u8) -> &mut u8 {
        &mut self.registers[(register_index & 0xf) as usize]
    }

    pub fn set_flag(&mut self, flag: bool) {
        self.registers[0xf] = flag as u8;
    }

    /// one 60Hz tick of both timers
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryMap;

    #[test]
    fn test_power_on_state() -> Result<()> {
        let m = Machine::new(&Config::default())?;
        assert_eq!(m.program_counter, 0x200);
        assert_eq!(m.registers, [0; 16]);
        assert_eq!(m.stack.depth(), 0);
        assert_eq!(m.display.width(), 64);
        assert_eq!(m.display.height(), 32);
        assert_eq!(m.memory.read_byte(0x50)?, 0xf0);
        Ok(())
    }

    #[test]
    fn test_load_resets_everything() -> Result<()> {
        let mut m = Machine::new(&Config::default())?;
        m.registers[3] = 9;
        m.index_register = 0x300;
        m.program_counter = 0x456;
        m.delay_timer = 5;
        m.sound_timer = 5;
        m.stack.push(0x222, 0x200)?;
        m.display.draw_sprite(0, 0, &[0xff]);
        m.keys.press(4);
        m.memory.write(&[0xaa; 4], 0x400)?;

        m.load(&[0x00, 0xe0])?;
        assert_eq!(m.registers, [0; 16]);
        assert_eq!(m.index_register, 0);
        assert_eq!(m.program_counter, 0x200);
        assert_eq!((m.delay_timer, m.sound_timer), (0, 0));
        assert_eq!(m.stack.depth(), 0);
        assert_eq!(m.display.lit_count(), 0);
        assert_eq!(m.keys.first_pressed(), None);
        assert_eq!(m.memory.get_ro_slice(0x400, 4)?, &[0; 4]);
        assert_eq!(m.memory.get_word(0x200)?, 0x00e0);
        Ok(())
    }

    #[test]
    fn test_load_too_big_leaves_state() -> Result<()> {
        let mut m = Machine::new(&Config::default())?;
        m.load(&[0x12, 0x00])?;
        m.registers[1] = 7;
        assert!(matches!(m.load(&[0; 0xe01]), Err(Chip8Error::Load { .. })));
        assert_eq!(m.registers[1], 7);
        assert_eq!(m.memory.get_word(0x200)?, 0x1200);
        Ok(())
    }

    #[test]
    fn test_stack_is_sixteen_deep() -> Result<()> {
        let mut s = CallStack::default();
        for i in 0..16 {
            s.push(0x200 + 2 * i, 0x300)?;
        }
        assert!(matches!(
            s.push(0x400, 0x300),
            Err(Chip8Error::StackOverflow { pc: 0x300 })
        ));
        assert_eq!(s.depth(), 16);
        assert_eq!(s.pop(0x300)?, 0x21e);
        Ok(())
    }

    #[test]
    fn test_stack_underflow() {
        let mut s = CallStack::default();
        assert!(matches!(
            s.pop(0x204),
            Err(Chip8Error::StackUnderflow { pc: 0x204 })
        ));
    }

    #[test]
    fn test_rejects_empty_display() {
        for (w, h) in [(0, 32), (64, 0)] {
            let config = Config {
                display_width: w,
                display_height: h,
                ..Config::default()
            };
            assert!(matches!(Machine::new(&config), Err(Chip8Error::Config(_))));
        }
    }

    #[test]
    fn test_timers_stop_at_zero() -> Result<()> {
        let mut m = Machine::new(&Config::default())?;
        m.delay_timer = 2;
        m.sound_timer = 1;
        m.tick_timers();
        assert_eq!((m.delay_timer, m.sound_timer), (1, 0));
        assert!(!m.sound_active());
        m.tick_timers();
        m.tick_timers();
        assert_eq!((m.delay_timer, m.sound_timer), (0, 0));
        Ok(())
    }
}
