//! # gpiohub-adapter-virtual
//!
//! Virtual pin access that keeps every pin in memory. Useful to run the
//! daemon on a machine without GPIO hardware, and as a deterministic backend
//! for end-to-end tests.
//!
//! Inputs can be driven from the outside with
//! [`VirtualPins::set_input_level`] to simulate a button press.
//!
//! ## Dependency rule
//!
//! Depends on `gpiohub-app` (port traits) and `gpiohub-domain` only.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use gpiohub_app::ports::PinAccess;
use gpiohub_domain::board::BoardRevision;
use gpiohub_domain::error::HardwareError;
use gpiohub_domain::pin::{Direction, Level};

#[derive(Debug, Clone, Copy, Default)]
struct VirtualPin {
    direction: Direction,
    level: Level,
}

/// In-memory stand-in for the board's pins.
pub struct VirtualPins {
    pins: Mutex<HashMap<u8, VirtualPin>>,
}

impl VirtualPins {
    /// Simulate the pins of `revision`, all inputs reading low.
    #[must_use]
    pub fn new(revision: BoardRevision) -> Self {
        let pins = revision
            .pin_numbers()
            .into_iter()
            .map(|number| (number, VirtualPin::default()))
            .collect();
        Self {
            pins: Mutex::new(pins),
        }
    }

    /// Current direction and level of `pin`, if it exists.
    #[must_use]
    pub fn snapshot(&self, pin: u8) -> Option<(Direction, Level)> {
        self.lock()
            .get(&pin)
            .map(|state| (state.direction, state.level))
    }

    /// Change the level seen on an input, as an external circuit would.
    ///
    /// # Errors
    ///
    /// Returns [`HardwareError::UnknownPin`] if `pin` is not on the board.
    pub fn set_input_level(&self, pin: u8, level: Level) -> Result<(), HardwareError> {
        self.with_pin(pin, |state| state.level = level)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<u8, VirtualPin>> {
        self.pins.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_pin<T>(
        &self,
        pin: u8,
        f: impl FnOnce(&mut VirtualPin) -> T,
    ) -> Result<T, HardwareError> {
        self.lock()
            .get_mut(&pin)
            .map(f)
            .ok_or(HardwareError::UnknownPin(pin))
    }
}

impl Default for VirtualPins {
    fn default() -> Self {
        Self::new(BoardRevision::default())
    }
}

impl PinAccess for VirtualPins {
    fn read(&self, pin: u8) -> impl Future<Output = Result<Level, HardwareError>> + Send {
        let result = self.with_pin(pin, |state| state.level);
        async move { result }
    }

    fn write(
        &self,
        pin: u8,
        level: Level,
    ) -> impl Future<Output = Result<(), HardwareError>> + Send {
        let result = self.with_pin(pin, |state| {
            if state.direction == Direction::Input {
                tracing::warn!(pin, %level, "virtual write to an input pin");
            }
            state.level = level;
        });
        async move { result }
    }

    fn set_direction(
        &self,
        pin: u8,
        direction: Direction,
    ) -> impl Future<Output = Result<(), HardwareError>> + Send {
        let result = self.with_pin(pin, |state| state.direction = direction);
        async move { result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_start_with_low_inputs() {
        let pins = VirtualPins::default();
        assert_eq!(pins.snapshot(0), Some((Direction::Input, Level::Low)));
        assert_eq!(pins.snapshot(16), Some((Direction::Input, Level::Low)));
    }

    #[test]
    fn should_not_simulate_missing_pins() {
        let pins = VirtualPins::new(BoardRevision(3));
        assert!(pins.snapshot(18).is_none());
        assert!(pins.snapshot(21).is_some());
    }

    #[tokio::test]
    async fn should_read_back_written_level() {
        let pins = VirtualPins::default();
        pins.set_direction(5, Direction::Output).await.unwrap();
        pins.write(5, Level::High).await.unwrap();

        assert_eq!(pins.read(5).await.unwrap(), Level::High);
        assert_eq!(pins.snapshot(5), Some((Direction::Output, Level::High)));
    }

    #[tokio::test]
    async fn should_expose_externally_driven_input() {
        let pins = VirtualPins::default();
        pins.set_input_level(6, Level::High).unwrap();

        assert_eq!(pins.read(6).await.unwrap(), Level::High);
    }

    #[tokio::test]
    async fn should_fail_for_unknown_pin() {
        let pins = VirtualPins::default();

        assert!(matches!(
            pins.read(40).await,
            Err(HardwareError::UnknownPin(40))
        ));
        assert!(pins.write(40, Level::High).await.is_err());
        assert!(pins.set_direction(40, Direction::Output).await.is_err());
    }
}
