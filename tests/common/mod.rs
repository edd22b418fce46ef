//! Host side stand-ins for the board: an HD44780 behind a PCF8574 that decodes the enable
//! pulses into display RAM, a delay that records what it was asked to wait, and a joystick
//! with settable axes.
#![allow(dead_code)]

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};
use lcd_joystick_menu::input::{Axis, Joystick};

const ENABLE: u8 = 0x04;
const RS: u8 = 0x01;
const ROW_START: [usize; 2] = [0x00, 0x40];

pub struct Hd44780Sim {
    pub address: u8,
    /// Every byte written to the expander, in order
    pub frames: Vec<u8>,
    /// Every instruction the controller executed
    pub commands: Vec<u8>,
    pub ddram: [u8; 0x80],
    pub address_counter: u8,
    pub display_on: bool,
    pub cursor_visible: bool,
    pub four_bit: bool,
    last_frame: u8,
    pending_high: Option<u8>,
    fail_after: Option<usize>,
}

impl Hd44780Sim {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            frames: Vec::new(),
            commands: Vec::new(),
            ddram: [b' '; 0x80],
            address_counter: 0,
            display_on: false,
            cursor_visible: false,
            four_bit: false,
            last_frame: 0,
            pending_high: None,
            fail_after: None,
        }
    }

    /// Reject every write after `frames` more bytes were accepted.
    pub fn fail_after(&mut self, frames: usize) {
        self.fail_after = Some(self.frames.len() + frames);
    }

    /// Visible text of a row with trailing blanks removed.
    pub fn row(&self, row: usize) -> String {
        let start = ROW_START[row];
        let text: String = self.ddram[start..start + 16]
            .iter()
            .map(|b| *b as char)
            .collect();
        text.trim_end().to_string()
    }

    /// Cursor position decoded from the address counter.
    pub fn cursor(&self) -> (u8, u8) {
        if self.address_counter >= 0x40 {
            (1, self.address_counter - 0x40)
        } else {
            (0, self.address_counter)
        }
    }

    fn accept(&mut self, frame: u8) -> Result<(), ErrorKind> {
        if let Some(limit) = self.fail_after {
            if self.frames.len() >= limit {
                return Err(ErrorKind::Other);
            }
        }
        self.frames.push(frame);
        if self.last_frame & ENABLE != 0 && frame & ENABLE == 0 {
            self.latch(frame);
        }
        self.last_frame = frame;
        Ok(())
    }

    fn latch(&mut self, frame: u8) {
        let nibble = frame & 0xf0;
        let data = frame & RS != 0;
        if !self.four_bit {
            self.execute(nibble, data);
            return;
        }
        match self.pending_high.take() {
            Some(high) => self.execute(high | (nibble >> 4), data),
            None => self.pending_high = Some(nibble),
        }
    }

    fn execute(&mut self, value: u8, data: bool) {
        if data {
            self.ddram[(self.address_counter & 0x7f) as usize] = value;
            self.address_counter = (self.address_counter + 1) & 0x7f;
            return;
        }
        self.commands.push(value);
        if value & 0x80 != 0 {
            self.address_counter = value & 0x7f;
        } else if value & 0x40 != 0 {
            // CGRAM address, unused
        } else if value & 0x20 != 0 {
            self.four_bit = value & 0x10 == 0;
        } else if value & 0x08 != 0 {
            self.display_on = value & 0x04 != 0;
            self.cursor_visible = value & 0x02 != 0;
        } else if value & 0x04 != 0 {
            // entry mode, only increment is modelled
        } else if value & 0x02 != 0 {
            self.address_counter = 0;
        } else if value == 0x01 {
            self.ddram = [b' '; 0x80];
            self.address_counter = 0;
        }
    }
}

impl ErrorType for Hd44780Sim {
    type Error = ErrorKind;
}

impl I2c for Hd44780Sim {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        assert_eq!(address, self.address, "write to wrong device");
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    for byte in bytes.iter() {
                        self.accept(*byte)?;
                    }
                }
                Operation::Read(_) => panic!("the backpack is never read"),
            }
        }
        Ok(())
    }
}

/// Delay that only records the requested durations in nanoseconds.
#[derive(Default)]
pub struct RecordingDelay {
    pub calls: Vec<u32>,
}

impl RecordingDelay {
    pub fn total_ns(&self) -> u64 {
        self.calls.iter().map(|ns| *ns as u64).sum()
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls.push(ns);
    }
}

pub const MS: u32 = 1_000_000;
pub const US: u32 = 1_000;

/// Joystick with both axes set by the test
pub struct Stick {
    pub x: u16,
    pub y: u16,
}

impl Stick {
    pub fn centered() -> Self {
        Self { x: 512, y: 512 }
    }
}

impl Joystick for Stick {
    fn read(&mut self, axis: Axis) -> u16 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }
}
