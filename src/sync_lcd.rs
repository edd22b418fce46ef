use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use ufmt_write::uWrite;

use crate::{
    nibble_frame, set_address_command, split_nibbles, Backlight, Instruction, Mode,
    DEFAULT_ADDRESS, DISPLAY_ON_CURSOR_OFF, DISPLAY_ON_CURSOR_ON, ENABLE, ENTRY_LEFT_TO_RIGHT,
    FOUR_BIT, FUNCTION_SET, WAKE_UP,
};

/// API to write to the LCD.
pub struct Lcd<'a, I, D>
where
    I: I2c,
    D: DelayNs,
{
    i2c: &'a mut I,
    address: u8,
    delay: &'a mut D,
    backlight_state: Backlight,
    cursor_row: u8,
    cursor_col: u8,
}

impl<'a, I, D> Lcd<'a, I, D>
where
    I: I2c,
    D: DelayNs,
{
    /// Create new instance with only the I2C and delay instance.
    pub fn new(i2c: &'a mut I, delay: &'a mut D) -> Self {
        Self {
            i2c,
            delay,
            address: DEFAULT_ADDRESS,
            backlight_state: Backlight::On,
            cursor_row: 0,
            cursor_col: 0,
        }
    }

    /// Set the 7-bit I2C address, usually [`DEFAULT_ADDRESS`] or [`crate::ALT_ADDRESS`].
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Backlight bit carried by every frame once initialized.
    pub fn with_backlight(mut self, backlight: Backlight) -> Self {
        self.backlight_state = backlight;
        self
    }

    /// Initializes the hardware.
    ///
    /// The controller powers up in 8-bit mode with an unknown nibble phase, so the wake-up
    /// nibble goes out three times before switching to 4-bit transfers. The order and the
    /// delays between the steps are required by the controller's reset state machine.
    pub fn init(mut self) -> Result<Self, I::Error> {
        // Wait for the supply to settle.
        self.delay.delay_ms(50);

        self.write_nibble(WAKE_UP, Mode::Command)?;
        self.delay.delay_ms(5);
        self.write_nibble(WAKE_UP, Mode::Command)?;
        self.delay.delay_ms(5);
        self.write_nibble(WAKE_UP, Mode::Command)?;
        self.delay.delay_ms(1);
        self.write_nibble(FOUR_BIT, Mode::Command)?;

        self.command(FUNCTION_SET)?;
        self.command(DISPLAY_ON_CURSOR_OFF)?;
        self.command(ENTRY_LEFT_TO_RIGHT)?;
        self.command(Instruction::Clear as u8)?;
        self.delay.delay_ms(5);

        Ok(self)
    }

    /// Latch one frame: enable high, settle, enable low, wait out the controller cycle.
    fn enable_pulse(&mut self, data: u8) -> Result<(), I::Error> {
        self.i2c.write(self.address, &[data | ENABLE])?;
        self.delay.delay_us(1);
        self.i2c.write(self.address, &[data & !ENABLE])?;
        self.delay.delay_us(50);
        Ok(())
    }

    fn write_nibble(&mut self, nibble: u8, mode: Mode) -> Result<(), I::Error> {
        self.enable_pulse(nibble_frame(nibble, mode, self.backlight_state))
    }

    /// Send a full byte as two nibble transfers, high nibble first.
    pub fn send(&mut self, value: u8, mode: Mode) -> Result<(), I::Error> {
        let [high_bits, low_bits] = split_nibbles(value);
        self.write_nibble(high_bits, mode)?;
        self.write_nibble(low_bits, mode)
    }

    fn command(&mut self, data: u8) -> Result<(), I::Error> {
        self.send(data, Mode::Command)
    }

    /// Switch the backlight and remember it for all following frames.
    pub fn backlight(&mut self, backlight: Backlight) -> Result<(), I::Error> {
        self.backlight_state = backlight;
        self.i2c.write(self.address, &[backlight as u8])
    }

    pub fn backlight_on(&mut self) -> Result<(), I::Error> {
        self.backlight(Backlight::On)
    }

    /// Write string to display.
    ///
    /// There is no wrapping, writes past the last column follow the controller's own
    /// address counter.
    pub fn print(&mut self, text: &str) -> Result<(), I::Error> {
        for byte in text.bytes() {
            self.send(byte, Mode::Data)?;
        }
        Ok(())
    }

    /// Print `text` starting at the first column of `row`.
    pub fn print_row(&mut self, row: u8, text: &str) -> Result<(), I::Error> {
        self.set_cursor(row, 0)?;
        self.print(text)
    }

    /// Clear the display
    pub fn clear(&mut self) -> Result<(), I::Error> {
        self.command(Instruction::Clear as u8)?;
        self.delay.delay_ms(5);
        Ok(())
    }

    /// Return cursor to upper left corner, i.e. (0,0).
    pub fn return_home(&mut self) -> Result<(), I::Error> {
        self.command(Instruction::ReturnHome as u8)?;
        self.delay.delay_ms(5);
        Ok(())
    }

    /// Set the cursor to (row, col). Coordinates are zero-based.
    pub fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), I::Error> {
        self.command(set_address_command(row, col))?;
        self.cursor_row = row;
        self.cursor_col = col;
        Ok(())
    }

    pub fn show_cursor(&mut self) -> Result<(), I::Error> {
        self.command(DISPLAY_ON_CURSOR_ON)
    }

    pub fn hide_cursor(&mut self) -> Result<(), I::Error> {
        self.command(DISPLAY_ON_CURSOR_OFF)
    }

    /// Position passed to the last [`Lcd::set_cursor`] as (row, col). Printing, clearing and
    /// homing leave it alone, and the display itself is never read.
    pub fn cursor(&self) -> (u8, u8) {
        (self.cursor_row, self.cursor_col)
    }

    pub fn cursor_row(&self) -> u8 {
        self.cursor_row
    }

    pub fn cursor_col(&self) -> u8 {
        self.cursor_col
    }

    /// Borrow the underlying bus, e.g. to share it with another device between calls.
    pub fn i2c(&mut self) -> &mut I {
        self.i2c
    }

    pub fn address(&self) -> u8 {
        self.address
    }
}

impl<'a, I, D> uWrite for Lcd<'a, I, D>
where
    I: I2c,
    D: DelayNs,
{
    type Error = I::Error;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.print(s)
    }
}
