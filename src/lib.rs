#![no_std]
//! Firmware core for a 16x2 HD44780 character LCD behind a PCF8574 I2C backpack and a two item
//! menu driven by an analog joystick and its push button.
//!
//! The LCD driver ([`sync_lcd::Lcd`], or [`async_lcd::Lcd`] with the `async` feature) needs an I2C
//! bus implementing [`embedded_hal::i2c::I2c`] and a delay implementing
//! [`embedded_hal::delay::DelayNs`]. The menu ([`menu::Menu`]) owns the LED and buzzer pins and is
//! stepped from the main loop, while the button interrupt only posts into a [`events::Mailbox`].
//!
//! Usage:
//! ```ignore
//! use lcd_joystick_menu::{events::Mailbox, input::Button, menu::Menu, sync_lcd::Lcd};
//!
//! static BUTTON_EVENTS: Mailbox = Mailbox::new();
//!
//! let mut lcd = Lcd::new(&mut i2c, &mut delay)
//!     .with_address(lcd_joystick_menu::DEFAULT_ADDRESS)
//!     .init()?;
//! let mut menu = Menu::new(led, buzzer);
//! menu.start(&mut lcd)?;
//! loop {
//!     menu.step(&mut lcd, &mut joystick, &BUTTON_EVENTS)?;
//!     main_delay.delay_ms(menu.config().poll_interval_ms);
//! }
//!
//! // In the INT0 handler:
//! button.on_falling_edge(&BUTTON_EVENTS);
//! ```
//!
//! Wiring of the backpack: P7..P4 carry D7..D4, P3 switches the backlight, P2 is the enable
//! line, P1 is R/W (always write) and P0 is RS.

#[cfg(feature = "async")]
pub mod async_lcd;
pub mod events;
pub mod input;
pub mod menu;
pub mod sync_lcd;

/// 7-bit I2C address of the backpack used on the demo board.
pub const DEFAULT_ADDRESS: u8 = 0x3F;
/// 7-bit address of the other common PCF8574 backpack variant.
pub const ALT_ADDRESS: u8 = 0x27;

/// Visible columns per row.
pub const COLUMNS: u8 = 16;

/// Enable line of the backpack. The controller latches on its falling edge.
const ENABLE: u8 = 0x04;
/// DDRAM address of the first column of the second row.
const ROW1_OFFSET: u8 = 0x40;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Backlight {
    Off = 0x00,
    On = 0x08,
}

/// Register selected by the RS line.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Command = 0x00,
    Data = 0x01,
}

#[repr(u8)]
#[derive(Copy, Clone)]
enum Instruction {
    Clear = 0x01,
    ReturnHome = 0x02,
    EntrySet = 0x04,
    DisplayControl = 0x08,
    FunctionSet = 0x20,
    DDRAMAddr = 0x80,
}

enum DisplayControl {
    DisplayOn = 0x04,
    CursorOn = 0x02,
}

enum BitMode {
    Bit4 = 0x0 << 4,
    Bit8 = 0x1 << 4,
}

enum Lines {
    Two = 0x08,
}

enum EntryMode {
    Increment = 0x02,
}

/// 8-bit interface wake-up nibble, sent three times after power on.
const WAKE_UP: u8 = Instruction::FunctionSet as u8 | BitMode::Bit8 as u8;
/// Switches the interface to 4-bit transfers.
const FOUR_BIT: u8 = Instruction::FunctionSet as u8 | BitMode::Bit4 as u8;
/// 4-bit interface, 2 lines, 5x8 font.
const FUNCTION_SET: u8 = FOUR_BIT | Lines::Two as u8;
const DISPLAY_ON_CURSOR_OFF: u8 =
    Instruction::DisplayControl as u8 | DisplayControl::DisplayOn as u8;
const DISPLAY_ON_CURSOR_ON: u8 = DISPLAY_ON_CURSOR_OFF | DisplayControl::CursorOn as u8;
/// Cursor moves right after each write, display does not shift.
const ENTRY_LEFT_TO_RIGHT: u8 = Instruction::EntrySet as u8 | EntryMode::Increment as u8;

/// High nibble first, each left aligned to the D7..D4 lines.
fn split_nibbles(value: u8) -> [u8; 2] {
    [value & 0xf0, (value << 4) & 0xf0]
}

fn nibble_frame(nibble: u8, mode: Mode, backlight: Backlight) -> u8 {
    nibble | backlight as u8 | mode as u8
}

/// Set DDRAM address command for the given position. Any row but 0 is the second row.
/// Columns are not checked, an out of range one wraps within the 8-bit command.
fn set_address_command(row: u8, col: u8) -> u8 {
    let address = if row == 0 { col } else { ROW1_OFFSET.wrapping_add(col) };
    Instruction::DDRAMAddr as u8 | address
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nibbles_are_left_aligned() {
        assert_eq!(split_nibbles(0x28), [0x20, 0x80]);
        assert_eq!(split_nibbles(b'B'), [0x40, 0x20]);
        assert_eq!(split_nibbles(0xff), [0xf0, 0xf0]);
    }

    #[test]
    fn frame_carries_backlight_and_rs() {
        assert_eq!(nibble_frame(0x40, Mode::Data, Backlight::On), 0x49);
        assert_eq!(nibble_frame(0x20, Mode::Command, Backlight::On), 0x28);
        assert_eq!(nibble_frame(0x20, Mode::Command, Backlight::Off), 0x20);
    }

    #[test]
    fn init_commands_match_controller_values() {
        assert_eq!(WAKE_UP, 0x30);
        assert_eq!(FOUR_BIT, 0x20);
        assert_eq!(FUNCTION_SET, 0x28);
        assert_eq!(DISPLAY_ON_CURSOR_OFF, 0x0c);
        assert_eq!(DISPLAY_ON_CURSOR_ON, 0x0e);
        assert_eq!(ENTRY_LEFT_TO_RIGHT, 0x06);
    }

    #[test]
    fn cursor_addresses() {
        for col in 0..COLUMNS {
            assert_eq!(set_address_command(0, col), 0x80 | col);
            assert_eq!(set_address_command(1, col), 0x80 | (0x40 + col));
        }
    }

    #[test]
    fn out_of_range_column_wraps_instead_of_overflowing() {
        assert_eq!(set_address_command(1, 200), 0x80 | 0x08);
        assert_eq!(set_address_command(1, 255), 0x80 | 0x3f);
        assert_eq!(set_address_command(0, 200), 0x80 | 200);
    }
}
