use crate::error::Result;
use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal;
use std::collections::HashMap;
use std::time::Duration;

/// The 16 hex keys and whether each is down. Written by an `Input` between
/// cycles, read by the skip-key and wait-key instructions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; 16],
}

impl Keypad {
    pub fn new() -> Self {
        Keypad::default()
    }

    /// only the low nibble of `key` is significant
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0xf) as usize]
    }

    pub fn set(&mut self, key: u8, down: bool) {
        self.keys[(key & 0xf) as usize] = down;
    }

    pub fn press(&mut self, key: u8) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: u8) {
        self.set(key, false);
    }

    pub fn release_all(&mut self) {
        self.keys = [false; 16];
    }

    /// lowest numbered key that is down
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|k| *k).map(|k| k as u8)
    }
}

/// Whether the host should keep running after a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Run,
    Quit,
}

/// reads keypresses into the keypad, once per frame
pub trait Input {
    fn poll(&mut self, keys: &mut Keypad) -> Result<Control>;
}

/// hex keypad laid over the left-hand side of a qwerty keyboard
///   1 2 3 C      1 2 3 4
///   4 5 6 D  =>  q w e r
///   7 8 9 E      a s d f
///   A 0 B F      z x c v
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// Terminal keyboard via crossterm raw mode. Terminals only send presses
/// (and autorepeat), so each press holds its key down for `hold_frames` polls.
pub struct TermInput {
    keymap: HashMap<char, u8>,
    held: [u32; 16],
    hold_frames: u32,
}

impl TermInput {
    pub fn new(hold_frames: u32) -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(TermInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            held: [0; 16],
            hold_frames,
        })
    }

    fn on_key(&mut self, evt: KeyEvent) -> Control {
        match evt.code {
            KeyCode::Esc => Control::Quit,
            KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => Control::Quit,
            KeyCode::Char(key) => {
                match self.keymap.get(&key.to_ascii_lowercase()) {
                    Some(mapped_key) => self.held[*mapped_key as usize] = self.hold_frames,
                    None => log::warn!("can't map {:?} to a hex key", key),
                }
                Control::Run
            }
            _ => Control::Run,
        }
    }
}

impl Drop for TermInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for TermInput {
    fn poll(&mut self, keys: &mut Keypad) -> Result<Control> {
        self.held.iter_mut().for_each(|h| *h = h.saturating_sub(1));

        let mut control = Control::Run;
        while poll(Duration::from_millis(0))? {
            if let Event::Key(evt) = read()? {
                if self.on_key(evt) == Control::Quit {
                    control = Control::Quit;
                }
            }
        }

        for (key, held) in self.held.iter().enumerate() {
            keys.set(key as u8, *held > 0);
        }
        Ok(control)
    }
}

/// dummy Input implementation for testing and headless runs: holds a fixed
/// set of keys down, optionally asking to quit after some polls
pub struct DummyInput {
    pressed: Vec<u8>,
    quit_after: Option<u64>,
    pub polls: u64,
}

impl DummyInput {
    pub fn new(keys: &[u8]) -> Self {
        DummyInput {
            pressed: Vec::from(keys),
            quit_after: None,
            polls: 0,
        }
    }

    pub fn quit_after(mut self, polls: u64) -> Self {
        self.quit_after = Some(polls);
        self
    }
}

impl Input for DummyInput {
    fn poll(&mut self, keys: &mut Keypad) -> Result<Control> {
        self.polls += 1;
        keys.release_all();
        for k in &self.pressed {
            keys.press(*k);
        }
        match self.quit_after {
            Some(n) if self.polls > n => Ok(Control::Quit),
            _ => Ok(Control::Run),
        }
    }
}
