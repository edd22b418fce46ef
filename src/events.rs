//! Events raised in interrupt context and handled by the main loop

use core::cell::Cell;

use critical_section::Mutex;

/// Events posted from interrupt handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Joystick button held past the debounce window
    ButtonPressed,
}

/// Single slot mailbox between an interrupt handler and the main loop.
///
/// Posting overwrites a pending event, so presses that arrive before the main loop drains the
/// slot collapse into one. Every access runs inside a critical section.
pub struct Mailbox {
    slot: Mutex<Cell<Option<Event>>>,
}

impl Mailbox {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(None)),
        }
    }

    pub fn post(&self, event: Event) {
        critical_section::with(|cs| self.slot.borrow(cs).set(Some(event)));
    }

    /// Remove and return the pending event, if any.
    pub fn take(&self) -> Option<Event> {
        critical_section::with(|cs| self.slot.borrow(cs).take())
    }

    pub fn is_pending(&self) -> bool {
        critical_section::with(|cs| self.slot.borrow(cs).get().is_some())
    }
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static SHARED: Mailbox = Mailbox::new();

    #[test]
    fn take_drains_the_slot() {
        let mailbox = Mailbox::new();
        assert_eq!(mailbox.take(), None);

        mailbox.post(Event::ButtonPressed);
        assert!(mailbox.is_pending());
        assert_eq!(mailbox.take(), Some(Event::ButtonPressed));
        assert!(!mailbox.is_pending());
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn repeated_posts_collapse() {
        let mailbox = Mailbox::default();
        mailbox.post(Event::ButtonPressed);
        mailbox.post(Event::ButtonPressed);
        assert_eq!(mailbox.take(), Some(Event::ButtonPressed));
        assert_eq!(mailbox.take(), None);
    }

    #[test]
    fn usable_from_a_static() {
        SHARED.post(Event::ButtonPressed);
        assert_eq!(SHARED.take(), Some(Event::ButtonPressed));
    }
}
