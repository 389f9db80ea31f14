//! The host side: sets everything up and runs the main loop.
//!
//! One frame is one timer tick (60Hz by default):
//!  * poll the input into the keypad
//!  * run `cycles_per_second / timer_hz` instructions
//!  * tick the delay and sound timers
//!  * hand the frame buffer to the display if it changed
//!  * sleep off whatever is left of the frame
use crate::config::Config;
use crate::display::Display;
use crate::error::Result;
use crate::input::{Control, Input};
use crate::interpreter::Chip8Interpreter;
use spin_sleep::LoopHelper;

pub struct Environment<D: Display, I: Input> {
    pub interpreter: Chip8Interpreter,
    pub display: D,
    pub input: I,
    cycles_per_frame: u32,
    timer_hz: u32,
    frames: u64,
}

impl<D: Display, I: Input> Environment<D, I> {
    pub fn new(config: &Config, display: D, input: I) -> Result<Self> {
        Ok(Environment {
            interpreter: Chip8Interpreter::new(config)?,
            display,
            input,
            cycles_per_frame: config.cycles_per_frame(),
            timer_hz: config.timer_hz,
            frames: 0,
        })
    }

    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        self.frames = 0;
        self.interpreter.load_bytes(program)
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// one frame, without any pacing
    pub fn run_frame(&mut self) -> Result<Control> {
        let machine = &mut self.interpreter.machine;
        if self.input.poll(&mut machine.keys)? == Control::Quit {
            return Ok(Control::Quit);
        }

        self.interpreter.run_cycles(self.cycles_per_frame)?;

        let machine = &mut self.interpreter.machine;
        machine.tick_timers();
        if machine.display.take_dirty() {
            self.display.draw(&machine.display)?;
        }
        self.frames += 1;
        Ok(Control::Run)
    }

    /// Run frames paced to the timer rate until the input asks to quit,
    /// `max_frames` have run, or the program hits a fatal error.
    pub fn run(&mut self, max_frames: Option<u64>) -> Result<()> {
        let mut loop_helper = LoopHelper::builder()
            .report_interval_s(5.0)
            .build_with_target_rate(self.timer_hz as f64);

        log::info!(
            "running at {} cycles per frame, {} frames per second",
            self.cycles_per_frame,
            self.timer_hz
        );
        loop {
            if max_frames.map_or(false, |max| self.frames >= max) {
                break;
            }
            loop_helper.loop_start();
            if self.run_frame()? == Control::Quit {
                log::info!("quit after {} frames", self.frames);
                break;
            }
            if let Some(fps) = loop_helper.report_rate() {
                log::info!("{:.1} frames per second", fps);
            }
            loop_helper.loop_sleep();
        }
        Ok(())
    }

    /// run `frames` frames as fast as possible
    pub fn run_unpaced(&mut self, frames: u64) -> Result<()> {
        for _ in 0..frames {
            if self.run_frame()? == Control::Quit {
                break;
            }
        }
        Ok(())
    }
}
