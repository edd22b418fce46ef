//! Two item menu: blink the LED or sound the buzzer
//!
//! The selection lives in the LCD's cursor row. The main loop calls [`Menu::step`] which drains
//! the button mailbox, follows the joystick and toggles the LED while blinking is active.

use core::convert::Infallible;
use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::i2c::I2c;

use crate::events::{Event, Mailbox};
use crate::input::{Gesture, Joystick, Sample};
use crate::sync_lcd::Lcd;

pub const MENU_ITEM_1: &str = "Blink LED";
pub const MENU_ITEM_2: &str = "Turn on Buzzer";
pub const BLINK_TEXT: &str = "Blinking";
pub const BUZZ_TEXT: &str = "Buzzing";

/// Joystick reading at rest, the midpoint of the 10-bit ADC range.
pub const CENTER: u16 = 512;
/// Deflection from [`CENTER`] needed to navigate.
pub const NAV_THRESHOLD: u16 = 200;
/// Main loop period.
pub const POLL_INTERVAL_MS: u32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuConfig {
    pub center: u16,
    pub threshold: u16,
    pub poll_interval_ms: u32,
}

impl MenuConfig {
    pub const fn new() -> Self {
        Self {
            center: CENTER,
            threshold: NAV_THRESHOLD,
            poll_interval_ms: POLL_INTERVAL_MS,
        }
    }

    /// Vertical deflection wins over horizontal. Values inside the band give `None`.
    pub fn classify(&self, sample: Sample) -> Option<Gesture> {
        let low = self.center.saturating_sub(self.threshold);
        let high = self.center.saturating_add(self.threshold);

        if sample.y < low {
            Some(Gesture::Up)
        } else if sample.y > high {
            Some(Gesture::Down)
        } else if sample.x > high {
            Some(Gesture::Home)
        } else {
            None
        }
    }
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// What the display currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    /// Both items listed, cursor on the selected row
    Menu,
    /// "Blinking", LED toggles every loop
    Blinking,
    /// "Buzzing", buzzer held on
    Buzzing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E, P> {
    /// I2C error while talking to the LCD
    Display(E),
    /// LED or buzzer pin could not be driven
    Pin(P),
}

impl<E: fmt::Debug, P: fmt::Debug> fmt::Display for Error<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Display(e) => write!(f, "display bus error: {:?}", e),
            Error::Pin(e) => write!(f, "output pin error: {:?}", e),
        }
    }
}

/// Menu state owned by the main loop.
pub struct Menu<L, B>
where
    L: OutputPin,
    B: OutputPin<Error = L::Error>,
{
    led: L,
    buzzer: B,
    config: MenuConfig,
    screen: Screen,
    selected_row: u8,
    led_blinking: bool,
    led_on: bool,
}

impl<L, B> Menu<L, B>
where
    L: OutputPin,
    B: OutputPin<Error = L::Error>,
{
    pub fn new(led: L, buzzer: B) -> Self {
        Self {
            led,
            buzzer,
            config: MenuConfig::new(),
            screen: Screen::Menu,
            selected_row: 0,
            led_blinking: false,
            led_on: false,
        }
    }

    pub fn with_config(mut self, config: MenuConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Row the joystick last selected.
    pub fn selected_row(&self) -> u8 {
        self.selected_row
    }

    pub fn is_blinking(&self) -> bool {
        self.led_blinking
    }

    pub fn led_is_on(&self) -> bool {
        self.led_on
    }

    /// Draw the boot screen.
    pub fn start<I, D>(
        &mut self,
        lcd: &mut Lcd<'_, I, D>,
    ) -> Result<(), Error<I::Error, L::Error>>
    where
        I: I2c,
        D: DelayNs,
    {
        self.show_menu(lcd)
    }

    /// Stop both outputs and list the items with the cursor on the first one.
    pub fn show_menu<I, D>(
        &mut self,
        lcd: &mut Lcd<'_, I, D>,
    ) -> Result<(), Error<I::Error, L::Error>>
    where
        I: I2c,
        D: DelayNs,
    {
        self.led_stop().map_err(Error::Pin)?;
        self.buzzer.set_low().map_err(Error::Pin)?;

        lcd.clear().map_err(Error::Display)?;
        lcd.print_row(0, MENU_ITEM_1).map_err(Error::Display)?;
        lcd.print_row(1, MENU_ITEM_2).map_err(Error::Display)?;
        lcd.set_cursor(0, 0).map_err(Error::Display)?;
        lcd.show_cursor().map_err(Error::Display)?;

        self.screen = Screen::Menu;
        self.selected_row = 0;
        #[cfg(feature = "defmt")]
        defmt::info!("menu shown");
        Ok(())
    }

    /// Apply one joystick sample. Row changes only take effect while the menu is shown, the
    /// home gesture works from every screen.
    pub fn navigate<I, D>(
        &mut self,
        lcd: &mut Lcd<'_, I, D>,
        sample: Sample,
    ) -> Result<(), Error<I::Error, L::Error>>
    where
        I: I2c,
        D: DelayNs,
    {
        match self.config.classify(sample) {
            Some(Gesture::Up) if self.screen == Screen::Menu => self.selected_row = 0,
            Some(Gesture::Down) if self.screen == Screen::Menu => self.selected_row = 1,
            Some(Gesture::Home) => self.show_menu(lcd)?,
            _ => {}
        }

        if self.screen == Screen::Menu {
            lcd.set_cursor(self.selected_row, 0).map_err(Error::Display)?;
        }
        Ok(())
    }

    /// Act on an event drained from the mailbox.
    pub fn handle<I, D>(
        &mut self,
        lcd: &mut Lcd<'_, I, D>,
        event: Event,
    ) -> Result<(), Error<I::Error, L::Error>>
    where
        I: I2c,
        D: DelayNs,
    {
        match event {
            Event::ButtonPressed => {
                if self.screen != Screen::Menu {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("button ignored on {}", self.screen);
                    return Ok(());
                }
                match lcd.cursor_row() {
                    0 => {
                        self.led_blinking = true;
                        lcd.clear().map_err(Error::Display)?;
                        lcd.print_row(0, BLINK_TEXT).map_err(Error::Display)?;
                        self.screen = Screen::Blinking;
                    }
                    1 => {
                        self.buzzer.set_high().map_err(Error::Pin)?;
                        lcd.clear().map_err(Error::Display)?;
                        lcd.print_row(1, BUZZ_TEXT).map_err(Error::Display)?;
                        self.screen = Screen::Buzzing;
                    }
                    _ => return Ok(()),
                }
                #[cfg(feature = "defmt")]
                defmt::info!("selected {}", self.screen);
            }
        }
        Ok(())
    }

    /// One main loop iteration without the pacing delay.
    pub fn step<I, D, J>(
        &mut self,
        lcd: &mut Lcd<'_, I, D>,
        joystick: &mut J,
        mailbox: &Mailbox,
    ) -> Result<(), Error<I::Error, L::Error>>
    where
        I: I2c,
        D: DelayNs,
        J: Joystick,
    {
        if let Some(event) = mailbox.take() {
            self.handle(lcd, event)?;
        }
        self.navigate(lcd, Sample::read(joystick))?;
        self.led_toggle().map_err(Error::Pin)
    }

    /// Main loop. Only returns on error.
    pub fn run<I, D, J, T>(
        &mut self,
        lcd: &mut Lcd<'_, I, D>,
        joystick: &mut J,
        mailbox: &Mailbox,
        delay: &mut T,
    ) -> Result<Infallible, Error<I::Error, L::Error>>
    where
        I: I2c,
        D: DelayNs,
        J: Joystick,
        T: DelayNs,
    {
        loop {
            self.step(lcd, joystick, mailbox)?;
            delay.delay_ms(self.config.poll_interval_ms);
        }
    }

    /// Give the output pins back.
    pub fn release(self) -> (L, B) {
        (self.led, self.buzzer)
    }

    fn led_toggle(&mut self) -> Result<(), L::Error> {
        if self.led_blinking {
            self.led_on = !self.led_on;
            self.led.set_state(PinState::from(self.led_on))?;
        }
        Ok(())
    }

    fn led_stop(&mut self) -> Result<(), L::Error> {
        self.led.set_low()?;
        self.led_on = false;
        self.led_blinking = false;
        Ok(())
    }
}
