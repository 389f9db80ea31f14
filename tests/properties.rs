use chip8_vm::memory::MemoryMap;
use chip8_vm::{Chip8Interpreter, Config, Instruction};
use proptest::prelude::*;

fn interpreter() -> Chip8Interpreter {
    let config = Config {
        seed: Some(0),
        ..Config::default()
    };
    Chip8Interpreter::new(&config).unwrap()
}

proptest! {
    #[test]
    fn add_reg_carries_past_255(a in any::<u8>(), b in any::<u8>()) {
        let mut i = interpreter();
        i.machine.registers[0x1] = a;
        i.machine.registers[0x2] = b;
        i.execute(Instruction::AddReg(0x1, 0x2), 0x200).unwrap();
        prop_assert_eq!(i.machine.registers[0x1] as u16, (a as u16 + b as u16) % 256);
        prop_assert_eq!(i.machine.registers[0xf], (a as u16 + b as u16 > 255) as u8);
    }

    #[test]
    fn sub_flags_no_borrow(a in any::<u8>(), b in any::<u8>()) {
        let mut i = interpreter();
        i.machine.registers[0x1] = a;
        i.machine.registers[0x2] = b;
        i.execute(Instruction::Sub(0x1, 0x2), 0x200).unwrap();
        prop_assert_eq!(i.machine.registers[0x1], a.wrapping_sub(b));
        prop_assert_eq!(i.machine.registers[0xf], (a > b) as u8);
    }

    #[test]
    fn sub_reverse_flags_no_borrow(a in any::<u8>(), b in any::<u8>()) {
        let mut i = interpreter();
        i.machine.registers[0x1] = a;
        i.machine.registers[0x2] = b;
        i.execute(Instruction::SubReverse(0x1, 0x2), 0x200).unwrap();
        prop_assert_eq!(i.machine.registers[0x1], b.wrapping_sub(a));
        prop_assert_eq!(i.machine.registers[0xf], (b > a) as u8);
    }

    #[test]
    fn draw_twice_restores_screen(
        x in any::<u8>(),
        y in any::<u8>(),
        sprite in prop::collection::vec(any::<u8>(), 1..16),
        background in prop::collection::vec(any::<u8>(), 1..16),
    ) {
        let mut i = interpreter();
        let n = sprite.len() as u8;
        i.machine.memory.write(&background, 0x300).unwrap();
        i.machine.memory.write(&sprite, 0x400).unwrap();
        i.machine.registers[0x0] = 5;
        i.machine.registers[0x1] = 9;
        i.machine.registers[0x2] = x;
        i.machine.registers[0x3] = y;

        i.machine.index_register = 0x300;
        i.execute(Instruction::Draw(0x0, 0x1, background.len() as u8), 0x200).unwrap();
        let before = i.machine.display.clone();

        i.machine.index_register = 0x400;
        i.execute(Instruction::Draw(0x2, 0x3, n), 0x200).unwrap();
        let turned_off = before.lit().any(|(px, py)| !i.machine.display.get(px, py));
        prop_assert_eq!(i.machine.registers[0xf], turned_off as u8);

        i.execute(Instruction::Draw(0x2, 0x3, n), 0x200).unwrap();
        prop_assert_eq!(i.machine.display.pixels(), before.pixels());
    }

    #[test]
    fn clear_then_draw_shows_only_sprite(
        x in 0u8..56,
        y in 0u8..24,
        sprite in prop::collection::vec(any::<u8>(), 1..8),
    ) {
        let mut i = interpreter();
        i.machine.display.draw_sprite(0, 0, &[0xff; 15]);
        i.machine.memory.write(&sprite, 0x300).unwrap();
        i.machine.index_register = 0x300;
        i.machine.registers[0x4] = x;
        i.machine.registers[0x5] = y;

        i.execute(Instruction::ClearDisplay, 0x200).unwrap();
        i.execute(Instruction::Draw(0x4, 0x5, sprite.len() as u8), 0x200).unwrap();

        let ones: u32 = sprite.iter().map(|row| row.count_ones()).sum();
        prop_assert_eq!(i.machine.display.lit_count(), ones as usize);
        prop_assert_eq!(i.machine.registers[0xf], 0);
        for (r, row) in sprite.iter().enumerate() {
            for c in 0..8 {
                let on = (row >> (7 - c)) & 1 == 1;
                prop_assert_eq!(
                    i.machine.display.get(x as usize + c, y as usize + r),
                    on
                );
            }
        }
    }

    #[test]
    fn store_then_load_round_trips(
        regs in any::<[u8; 16]>(),
        x in 0u8..16,
        index in 0x200u16..0xff0,
    ) {
        let mut i = interpreter();
        i.machine.registers = regs;
        i.machine.index_register = index;
        i.execute(Instruction::StoreRegs(x), 0x200).unwrap();
        i.machine.registers = [0; 16];
        i.execute(Instruction::LoadRegs(x), 0x200).unwrap();
        let last = x as usize;
        prop_assert_eq!(&i.machine.registers[..=last], &regs[..=last]);
        prop_assert!(i.machine.registers[last + 1..].iter().all(|r| *r == 0));
    }

    #[test]
    fn bcd_digits_recompose(v in any::<u8>()) {
        let mut i = interpreter();
        i.machine.registers[0x6] = v;
        i.machine.index_register = 0x500;
        i.execute(Instruction::Bcd(0x6), 0x200).unwrap();
        let d = i.machine.memory.get_ro_slice(0x500, 3).unwrap();
        prop_assert!(d.iter().all(|digit| *digit < 10));
        prop_assert_eq!(d[0] as u16 * 100 + d[1] as u16 * 10 + d[2] as u16, v as u16);
    }

    #[test]
    fn decode_never_panics(word in any::<u16>()) {
        if let Some(instr) = Instruction::decode(word) {
            prop_assert!(!instr.to_string().is_empty());
        }
    }
}
