use embedded_hal_async::{delay::DelayNs, i2c::I2c};

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

    /// Set the 7-bit I2C address.
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub fn with_backlight(mut self, backlight: Backlight) -> Self {
        self.backlight_state = backlight;
        self
    }

    /// Initializes the hardware, same sequence as [`crate::sync_lcd::Lcd::init`].
    pub async fn init(mut self) -> Result<Self, I::Error> {
        self.delay.delay_ms(50).await;

        self.write_nibble(WAKE_UP, Mode::Command).await?;
        self.delay.delay_ms(5).await;
        self.write_nibble(WAKE_UP, Mode::Command).await?;
        self.delay.delay_ms(5).await;
        self.write_nibble(WAKE_UP, Mode::Command).await?;
        self.delay.delay_ms(1).await;
        self.write_nibble(FOUR_BIT, Mode::Command).await?;

        self.command(FUNCTION_SET).await?;
        self.command(DISPLAY_ON_CURSOR_OFF).await?;
        self.command(ENTRY_LEFT_TO_RIGHT).await?;
        self.command(Instruction::Clear as u8).await?;
        self.delay.delay_ms(5).await;

        Ok(self)
    }

    async fn enable_pulse(&mut self, data: u8) -> Result<(), I::Error> {
        self.i2c.write(self.address, &[data | ENABLE]).await?;
        self.delay.delay_us(1).await;
        self.i2c.write(self.address, &[data & !ENABLE]).await?;
        self.delay.delay_us(50).await;
        Ok(())
    }

    async fn write_nibble(&mut self, nibble: u8, mode: Mode) -> Result<(), I::Error> {
        self.enable_pulse(nibble_frame(nibble, mode, self.backlight_state))
            .await
    }

    pub async fn send(&mut self, value: u8, mode: Mode) -> Result<(), I::Error> {
        let [high_bits, low_bits] = split_nibbles(value);
        self.write_nibble(high_bits, mode).await?;
        self.write_nibble(low_bits, mode).await
    }

    async fn command(&mut self, data: u8) -> Result<(), I::Error> {
        self.send(data, Mode::Command).await
    }

    pub async fn backlight(&mut self, backlight: Backlight) -> Result<(), I::Error> {
        self.backlight_state = backlight;
        self.i2c.write(self.address, &[backlight as u8]).await
    }

    pub async fn backlight_on(&mut self) -> Result<(), I::Error> {
        self.backlight(Backlight::On).await
    }

    /// Write string to display.
    pub async fn print(&mut self, text: &str) -> Result<(), I::Error> {
        for byte in text.bytes() {
            self.send(byte, Mode::Data).await?;
        }
        Ok(())
    }

    pub async fn print_row(&mut self, row: u8, text: &str) -> Result<(), I::Error> {
        self.set_cursor(row, 0).await?;
        self.print(text).await
    }

    /// Clear the display
    pub async fn clear(&mut self) -> Result<(), I::Error> {
        self.command(Instruction::Clear as u8).await?;
        self.delay.delay_ms(5).await;
        Ok(())
    }

    /// Return cursor to upper left corner, i.e. (0,0).
    pub async fn return_home(&mut self) -> Result<(), I::Error> {
        self.command(Instruction::ReturnHome as u8).await?;
        self.delay.delay_ms(5).await;
        Ok(())
    }

    /// Set the cursor to (row, col). Coordinates are zero-based.
    pub async fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), I::Error> {
        self.command(set_address_command(row, col)).await?;
        self.cursor_row = row;
        self.cursor_col = col;
        Ok(())
    }

    pub async fn show_cursor(&mut self) -> Result<(), I::Error> {
        self.command(DISPLAY_ON_CURSOR_ON).await
    }

    pub async fn hide_cursor(&mut self) -> Result<(), I::Error> {
        self.command(DISPLAY_ON_CURSOR_OFF).await
    }

    /// Position passed to the last [`Lcd::set_cursor`] as (row, col).
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
