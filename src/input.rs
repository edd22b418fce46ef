//! Joystick axes and the debounced push button
//!
//! The joystick is two potentiometers on ADC channels 0 and 1, the button pulls its pin low
//! and raises a falling edge interrupt.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::events::{Event, Mailbox};

/// Default settle time before the button pin is sampled again.
pub const DEBOUNCE_MS: u32 = 50;

/// Joystick axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// Horizontal, ADC0
    X,
    /// Vertical, ADC1
    Y,
}

impl Axis {
    /// ADC channel the axis is wired to
    pub fn channel(&self) -> u8 {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

/// Source of 10-bit joystick readings.
///
/// Conversions are treated as infallible, a board without an ADC error path implements this
/// directly on its ADC driver.
pub trait Joystick {
    /// Read one axis, 0..=1023 with 512 at rest
    fn read(&mut self, axis: Axis) -> u16;
}

/// One reading of both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    pub x: u16,
    pub y: u16,
}

impl Sample {
    /// Vertical axis first, then horizontal.
    pub fn read<J: Joystick>(joystick: &mut J) -> Self {
        let y = joystick.read(Axis::Y);
        let x = joystick.read(Axis::X);
        Self { x, y }
    }
}

/// Navigation derived from a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
    /// Select the first row
    Up,
    /// Select the second row
    Down,
    /// Redraw the menu
    Home,
}

/// Push button on an interrupt capable pin, active low.
pub struct Button<P, D>
where
    P: InputPin,
    D: DelayNs,
{
    pin: P,
    delay: D,
    debounce_ms: u32,
}

impl<P, D> Button<P, D>
where
    P: InputPin,
    D: DelayNs,
{
    pub fn new(pin: P, delay: D) -> Self {
        Self {
            pin,
            delay,
            debounce_ms: DEBOUNCE_MS,
        }
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u32) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// A read error counts as released.
    pub fn is_pressed(&mut self) -> bool {
        matches!(self.pin.is_low(), Ok(true))
    }

    /// Call from the falling edge interrupt.
    ///
    /// Blocks for the debounce window, then posts [`Event::ButtonPressed`] if the pin is still
    /// low. Returns whether an event was posted.
    pub fn on_falling_edge(&mut self, mailbox: &Mailbox) -> bool {
        self.delay.delay_ms(self.debounce_ms);
        if !self.is_pressed() {
            #[cfg(feature = "defmt")]
            defmt::debug!("button released within debounce window");
            return false;
        }
        mailbox.post(Event::ButtonPressed);
        true
    }

    pub fn release(self) -> (P, D) {
        (self.pin, self.delay)
    }
}
