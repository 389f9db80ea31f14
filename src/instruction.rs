//! The instruction set and the nibble-table decoder.
//!
//! An instruction word is four nibbles `[op, x, y, n]`; `nn` is the low byte
//! and `nnn` the low twelve bits. `op` picks the family, and for families
//! 0x0, 0x8, 0xE and 0xF the low byte or low nibble picks the operation.
use std::fmt;

/// register index, always 0x0..=0xF
pub type Reg = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearDisplay,
    /// 00EE
    Return,
    /// 1NNN
    Jump(u16),
    /// 2NNN
    Call(u16),
    /// 3XNN
    SkipEqImm(Reg, u8),
    /// 4XNN
    SkipNeImm(Reg, u8),
    /// 5XY0
    SkipEqReg(Reg, Reg),
    /// 6XNN
    SetImm(Reg, u8),
    /// 7XNN
    AddImm(Reg, u8),
    /// 8XY0
    SetReg(Reg, Reg),
    /// 8XY1
    Or(Reg, Reg),
    /// 8XY2
    And(Reg, Reg),
    /// 8XY3
    Xor(Reg, Reg),
    /// 8XY4
    AddReg(Reg, Reg),
    /// 8XY5
    Sub(Reg, Reg),
    /// 8XY6
    ShiftRight(Reg),
    /// 8XY7
    SubReverse(Reg, Reg),
    /// 8XYE
    ShiftLeft(Reg),
    /// 9XY0
    SkipNeReg(Reg, Reg),
    /// ANNN
    SetIndex(u16),
    /// BNNN
    JumpOffset(u16),
    /// CXNN
    RandomAnd(Reg, u8),
    /// DXYN
    Draw(Reg, Reg, u8),
    /// EX9E
    SkipKeyPressed(Reg),
    /// EXA1
    SkipKeyNotPressed(Reg),
    /// FX07
    GetDelay(Reg),
    /// FX0A
    WaitKey(Reg),
    /// FX15
    SetDelay(Reg),
    /// FX18
    SetSound(Reg),
    /// FX1E
    AddIndex(Reg),
    /// FX29
    FontChar(Reg),
    /// FX33
    Bcd(Reg),
    /// FX55
    StoreRegs(Reg),
    /// FX65
    LoadRegs(Reg),
}

/// split a word into its four nibbles, most significant first
pub fn nibbles(word: u16) -> [u8; 4] {
    [
        (word >> 12) as u8 & 0xf,
        (word >> 8) as u8 & 0xf,
        (word >> 4) as u8 & 0xf,
        word as u8 & 0xf,
    ]
}

impl Instruction {
    /// `None` if the word matches no operation
    pub fn decode(word: u16) -> Option<Instruction> {
        use Instruction::*;

        let [op, x, y, n] = nibbles(word);
        let nn = word as u8;
        let nnn = word & 0x0fff;

        let instruction = match (op, n) {
            (0x0, _) => match nnn {
                0x0e0 => ClearDisplay,
                0x0ee => Return,
                _ => return None,
            },
            (0x1, _) => Jump(nnn),
            (0x2, _) => Call(nnn),
            (0x3, _) => SkipEqImm(x, nn),
            (0x4, _) => SkipNeImm(x, nn),
            (0x5, 0x0) => SkipEqReg(x, y),
            (0x6, _) => SetImm(x, nn),
            (0x7, _) => AddImm(x, nn),
            (0x8, 0x0) => SetReg(x, y),
            (0x8, 0x1) => Or(x, y),
            (0x8, 0x2) => And(x, y),
            (0x8, 0x3) => Xor(x, y),
            (0x8, 0x4) => AddReg(x, y),
            (0x8, 0x5) => Sub(x, y),
            (0x8, 0x6) => ShiftRight(x),
            (0x8, 0x7) => SubReverse(x, y),
            (0x8, 0xe) => ShiftLeft(x),
            (0x9, 0x0) => SkipNeReg(x, y),
            (0xa, _) => SetIndex(nnn),
            (0xb, _) => JumpOffset(nnn),
            (0xc, _) => RandomAnd(x, nn),
            (0xd, _) => Draw(x, y, n),
            (0xe, _) => match nn {
                0x9e => SkipKeyPressed(x),
                0xa1 => SkipKeyNotPressed(x),
                _ => return None,
            },
            (0xf, _) => match nn {
                0x07 => GetDelay(x),
                0x0a => WaitKey(x),
                0x15 => SetDelay(x),
                0x18 => SetSound(x),
                0x1e => AddIndex(x),
                0x29 => FontChar(x),
                0x33 => Bcd(x),
                0x55 => StoreRegs(x),
                0x65 => LoadRegs(x),
                _ => return None,
            },
            _ => return None,
        };
        Some(instruction)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match *self {
            ClearDisplay => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump(a) => write!(f, "JP 0x{:03x}", a),
            Call(a) => write!(f, "CALL 0x{:03x}", a),
            SkipEqImm(x, nn) => write!(f, "SE V{:X}, 0x{:02x}", x, nn),
            SkipNeImm(x, nn) => write!(f, "SNE V{:X}, 0x{:02x}", x, nn),
            SkipEqReg(x, y) => write!(f, "SE V{:X}, V{:X}", x, y),
            SetImm(x, nn) => write!(f, "LD V{:X}, 0x{:02x}", x, nn),
            AddImm(x, nn) => write!(f, "ADD V{:X}, 0x{:02x}", x, nn),
            SetReg(x, y) => write!(f, "LD V{:X}, V{:X}", x, y),
            Or(x, y) => write!(f, "OR V{:X}, V{:X}", x, y),
            And(x, y) => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor(x, y) => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg(x, y) => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub(x, y) => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight(x) => write!(f, "SHR V{:X}", x),
            SubReverse(x, y) => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft(x) => write!(f, "SHL V{:X}", x),
            SkipNeReg(x, y) => write!(f, "SNE V{:X}, V{:X}", x, y),
            SetIndex(a) => write!(f, "LD I, 0x{:03x}", a),
            JumpOffset(a) => write!(f, "JP V0, 0x{:03x}", a),
            RandomAnd(x, nn) => write!(f, "RND V{:X}, 0x{:02x}", x, nn),
            Draw(x, y, n) => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipKeyPressed(x) => write!(f, "SKP V{:X}", x),
            SkipKeyNotPressed(x) => write!(f, "SKNP V{:X}", x),
            GetDelay(x) => write!(f, "LD V{:X}, DT", x),
            WaitKey(x) => write!(f, "LD V{:X}, K", x),
            SetDelay(x) => write!(f, "LD DT, V{:X}", x),
            SetSound(x) => write!(f, "LD ST, V{:X}", x),
            AddIndex(x) => write!(f, "ADD I, V{:X}", x),
            FontChar(x) => write!(f, "LD F, V{:X}", x),
            Bcd(x) => write!(f, "LD B, V{:X}", x),
            StoreRegs(x) => write!(f, "LD [I], V{:X}", x),
            LoadRegs(x) => write!(f, "LD V{:X}, [I]", x),
        }
    }
}

/// One line per word of `image` as if loaded at `origin`: address, raw word,
/// mnemonic. Words that don't decode (usually sprite data) print as `.word`.
pub fn listing(image: &[u8], origin: u16) -> Vec<String> {
    image
        .chunks(2)
        .enumerate()
        .map(|(i, chunk)| {
            let addr = origin as usize + 2 * i;
            match chunk {
                &[hi, lo] => {
                    let word = u16::from_be_bytes([hi, lo]);
                    match Instruction::decode(word) {
                        Some(instr) => format!("{:03x}: {:04x}  {}", addr, word, instr),
                        None => format!("{:03x}: {:04x}  .word 0x{:04x}", addr, word, word),
                    }
                }
                &[b] => format!("{:03x}: {:02x}    .byte 0x{:02x}", addr, b, b),
                _ => unreachable!(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::Instruction::*;
    use super::*;

    #[test]
    fn test_nibbles() {
        assert_eq!(nibbles(0xd125), [0xd, 0x1, 0x2, 0x5]);
    }

    #[test]
    fn test_decode_families() {
        assert_eq!(Instruction::decode(0x00e0), Some(ClearDisplay));
        assert_eq!(Instruction::decode(0x00ee), Some(Return));
        assert_eq!(Instruction::decode(0x1abc), Some(Jump(0xabc)));
        assert_eq!(Instruction::decode(0x2abc), Some(Call(0xabc)));
        assert_eq!(Instruction::decode(0x3a42), Some(SkipEqImm(0xa, 0x42)));
        assert_eq!(Instruction::decode(0x4a42), Some(SkipNeImm(0xa, 0x42)));
        assert_eq!(Instruction::decode(0x5ab0), Some(SkipEqReg(0xa, 0xb)));
        assert_eq!(Instruction::decode(0x6a42), Some(SetImm(0xa, 0x42)));
        assert_eq!(Instruction::decode(0x7a42), Some(AddImm(0xa, 0x42)));
        assert_eq!(Instruction::decode(0x9ab0), Some(SkipNeReg(0xa, 0xb)));
        assert_eq!(Instruction::decode(0xa250), Some(SetIndex(0x250)));
        assert_eq!(Instruction::decode(0xb300), Some(JumpOffset(0x300)));
        assert_eq!(Instruction::decode(0xc30f), Some(RandomAnd(0x3, 0x0f)));
        assert_eq!(Instruction::decode(0xd015), Some(Draw(0x0, 0x1, 5)));
    }

    #[test]
    fn test_decode_8_series() {
        let expect = [
            (0x0, SetReg(1, 2)),
            (0x1, Or(1, 2)),
            (0x2, And(1, 2)),
            (0x3, Xor(1, 2)),
            (0x4, AddReg(1, 2)),
            (0x5, Sub(1, 2)),
            (0x6, ShiftRight(1)),
            (0x7, SubReverse(1, 2)),
            (0xe, ShiftLeft(1)),
        ];
        for (n, instr) in expect {
            assert_eq!(Instruction::decode(0x8120 | n), Some(instr));
        }
        for n in [0x8, 0x9, 0xa, 0xb, 0xc, 0xd, 0xf] {
            assert_eq!(Instruction::decode(0x8120 | n), None);
        }
    }

    #[test]
    fn test_decode_e_and_f_series() {
        assert_eq!(Instruction::decode(0xe39e), Some(SkipKeyPressed(3)));
        assert_eq!(Instruction::decode(0xe3a1), Some(SkipKeyNotPressed(3)));
        assert_eq!(Instruction::decode(0xf307), Some(GetDelay(3)));
        assert_eq!(Instruction::decode(0xf30a), Some(WaitKey(3)));
        assert_eq!(Instruction::decode(0xf315), Some(SetDelay(3)));
        assert_eq!(Instruction::decode(0xf318), Some(SetSound(3)));
        assert_eq!(Instruction::decode(0xf31e), Some(AddIndex(3)));
        assert_eq!(Instruction::decode(0xf329), Some(FontChar(3)));
        assert_eq!(Instruction::decode(0xf333), Some(Bcd(3)));
        assert_eq!(Instruction::decode(0xf355), Some(StoreRegs(3)));
        assert_eq!(Instruction::decode(0xf365), Some(LoadRegs(3)));
    }

    #[test]
    fn test_decode_unknown() {
        for word in [0x0000, 0x0123, 0x00e1, 0x5121, 0x912f, 0xe100, 0xf100, 0xf1ff] {
            assert_eq!(Instruction::decode(word), None, "0x{:04x}", word);
        }
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(Draw(0, 1, 5).to_string(), "DRW V0, V1, 5");
        assert_eq!(SetIndex(0x50).to_string(), "LD I, 0x050");
        assert_eq!(StoreRegs(0xf).to_string(), "LD [I], VF");
    }

    #[test]
    fn test_listing() {
        let lines = listing(&[0xa0, 0x50, 0xf0, 0x90, 0x12], 0x200);
        assert_eq!(
            lines,
            vec![
                "200: a050  LD I, 0x050".to_string(),
                "202: f090  .word 0xf090".to_string(),
                "204: 12    .byte 0x12".to_string(),
            ]
        );
    }
}
