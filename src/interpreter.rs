//! # interpreter
//!
//! One `step()` is one fetch/decode/execute cycle:
//!  1. fetch the big-endian word at PC
//!  2. PC += 2, before anything else, so jumps and calls just overwrite it
//!  3. decode into an `Instruction` (see `instruction.rs`)
//!  4. execute against the `Machine`
//!
//! If any part of a cycle fails the machine is left exactly as it was before
//! the fetch, including PC.
use crate::config::{Config, UnknownOpcodePolicy};
use crate::error::{Chip8Error, Result};
use crate::instruction::Instruction;
use crate::machine::Machine;
use crate::memory::MemoryMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io;

pub struct Chip8Interpreter {
    pub machine: Machine,
    rng: StdRng,
    unknown_opcode: UnknownOpcodePolicy,
    cycles: u64,
}

impl Chip8Interpreter {
    pub fn new(config: &Config) -> Result<Chip8Interpreter> {
        let machine = Machine::new(config)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Chip8Interpreter {
            machine,
            rng,
            unknown_opcode: config.unknown_opcode,
            cycles: 0,
        })
    }

    /// load a chip8 program
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<()> {
        let mut program = Vec::new();
        reader.read_to_end(&mut program)?;
        self.load_bytes(&program)
    }

    pub fn load_bytes(&mut self, program: &[u8]) -> Result<()> {
        self.machine.load(program)?;
        self.cycles = 0;
        Ok(())
    }

    /// instructions executed since the last load
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run one cycle. Returns what was executed, or `None` for an unknown
    /// word skipped under `UnknownOpcodePolicy::Skip`.
    pub fn step(&mut self) -> Result<Option<Instruction>> {
        let pc = self.machine.program_counter;
        match self.cycle(pc) {
            Ok(executed) => {
                self.cycles += 1;
                Ok(executed)
            }
            Err(e) => {
                self.machine.program_counter = pc;
                Err(e)
            }
        }
    }

    pub fn run_cycles(&mut self, n: u32) -> Result<()> {
        for _ in 0..n {
            self.step()?;
        }
        Ok(())
    }

    fn cycle(&mut self, pc: u16) -> Result<Option<Instruction>> {
        let word = self
            .machine
            .memory
            .get_word(pc)
            .map_err(|_| Chip8Error::Fetch { pc })?;
        self.machine.program_counter = pc + 2;

        match Instruction::decode(word) {
            Some(instruction) => {
                log::trace!("{:03x}: {:04x}  {}", pc, word, instruction);
                self.execute(instruction, pc)?;
                Ok(Some(instruction))
            }
            None => match self.unknown_opcode {
                UnknownOpcodePolicy::Fatal => Err(Chip8Error::Decode { word, pc }),
                UnknownOpcodePolicy::Skip => {
                    log::warn!("skipping unknown instruction 0x{:04x} at 0x{:03x}", word, pc);
                    Ok(None)
                }
            },
        }
    }

    /// Apply one instruction. `at` is where it was fetched from; PC has
    /// already moved past it. Every fallible check happens before any write.
    pub fn execute(&mut self, instruction: Instruction, at: u16) -> Result<()> {
        use Instruction::*;
        let m = &mut self.machine;

        match instruction {
            ClearDisplay => m.display.clear(),
            Return => {
                m.program_counter = m.stack.pop(at)?;
                log::debug!("return to 0x{:03x} (depth {})", m.program_counter, m.stack.depth());
            }
            Jump(addr) => m.program_counter = addr,
            Call(addr) => {
                m.stack.push(m.program_counter, at)?;
                m.program_counter = addr;
                log::debug!("call 0x{:03x} (depth {})", addr, m.stack.depth());
            }
            SkipEqImm(x, nn) => {
                if m.register(x) == nn {
                    m.program_counter += 2;
                }
            }
            SkipNeImm(x, nn) => {
                if m.register(x) != nn {
                    m.program_counter += 2;
                }
            }
            SkipEqReg(x, y) => {
                if m.register(x) == m.register(y) {
                    m.program_counter += 2;
                }
            }
            SkipNeReg(x, y) => {
                if m.register(x) != m.register(y) {
                    m.program_counter += 2;
                }
            }
            SetImm(x, nn) => *m.register_mut(x) = nn,
            AddImm(x, nn) => *m.register_mut(x) = m.register(x).wrapping_add(nn),
            SetReg(x, y) => *m.register_mut(x) = m.register(y),
            Or(x, y) => *m.register_mut(x) |= m.register(y),
            And(x, y) => *m.register_mut(x) &= m.register(y),
            Xor(x, y) => *m.register_mut(x) ^= m.register(y),
            // VF is written last throughout, so it ends up holding the flag
            // even when X is F
            AddReg(x, y) => {
                let (result, carry) = m.register(x).overflowing_add(m.register(y));
                *m.register_mut(x) = result;
                m.set_flag(carry);
            }
            Sub(x, y) => {
                let (vx, vy) = (m.register(x), m.register(y));
                *m.register_mut(x) = vx.wrapping_sub(vy);
                m.set_flag(vx > vy);
            }
            SubReverse(x, y) => {
                let (vx, vy) = (m.register(x), m.register(y));
                *m.register_mut(x) = vy.wrapping_sub(vx);
                m.set_flag(vy > vx);
            }
            ShiftRight(x) => {
                let vx = m.register(x);
                *m.register_mut(x) = vx >> 1;
                m.set_flag(vx & 0x01 != 0);
            }
            ShiftLeft(x) => {
                let vx = m.register(x);
                *m.register_mut(x) = vx << 1;
                m.set_flag(vx & 0x80 != 0);
            }
            SetIndex(addr) => m.index_register = addr,
            JumpOffset(addr) => m.program_counter = addr + m.register(0x0) as u16,
            RandomAnd(x, nn) => *m.register_mut(x) = self.rng.gen::<u8>() & nn,
            Draw(x, y, n) => {
                let (vx, vy) = (m.register(x), m.register(y));
                let rows = m.memory.get_ro_slice(m.index_register, n as usize)?;
                let collision = m.display.draw_sprite(vx, vy, rows);
                m.set_flag(collision);
            }
            SkipKeyPressed(x) => {
                if m.keys.is_pressed(m.register(x)) {
                    m.program_counter += 2;
                }
            }
            SkipKeyNotPressed(x) => {
                if !m.keys.is_pressed(m.register(x)) {
                    m.program_counter += 2;
                }
            }
            GetDelay(x) => *m.register_mut(x) = m.delay_timer,
            WaitKey(x) => match m.keys.first_pressed() {
                Some(key) => *m.register_mut(x) = key,
                // come back here next cycle
                None => m.program_counter -= 2,
            },
            SetDelay(x) => m.delay_timer = m.register(x),
            SetSound(x) => m.sound_timer = m.register(x),
            AddIndex(x) => {
                let (result, overflow) = m.index_register.overflowing_add(m.register(x) as u16);
                m.index_register = result;
                m.set_flag(overflow);
            }
            FontChar(x) => m.index_register = m.memory.font_address(m.register(x)),
            Bcd(x) => {
                let value = m.register(x);
                m.memory
                    .write(&[value / 100, value / 10 % 10, value % 10], m.index_register)?;
            }
            StoreRegs(x) => {
                let last = (x & 0xf) as usize;
                m.memory.write(&m.registers[..=last], m.index_register)?;
            }
            LoadRegs(x) => {
                let last = (x & 0xf) as usize;
                let src = m.memory.get_ro_slice(m.index_register, last + 1)?;
                m.registers[..=last].copy_from_slice(src);
            }
        }
        Ok(())
    }
}
