//! Pins — one per addressable line of the board.
//!
//! A [`Pin`] tracks its configured direction and forwards every level
//! query to the [`PinAccess`] port. Hardware calls on one pin are serialized
//! through an async lock so that reads and writes keep their receipt order
//! even if requests are ever processed concurrently.

use std::sync::{Arc, Mutex, PoisonError};

use gpiohub_domain::board::BoardRevision;
use gpiohub_domain::error::HardwareError;
use gpiohub_domain::pin::{Direction, Level};

use crate::ports::PinAccess;
use crate::registry::EntityRegistry;

/// A physical line of the board.
pub struct Pin<A> {
    number: u8,
    direction: Mutex<Direction>,
    io: tokio::sync::Mutex<()>,
    access: Arc<A>,
}

impl<A: PinAccess> Pin<A> {
    /// Create a pin tracked as [`Direction::Input`]. No hardware call is made.
    pub fn new(number: u8, access: Arc<A>) -> Self {
        Self {
            number,
            direction: Mutex::new(Direction::Input),
            io: tokio::sync::Mutex::new(()),
            access,
        }
    }

    /// Hardware pin number.
    #[must_use]
    pub fn number(&self) -> u8 {
        self.number
    }

    /// Configured direction, without touching the hardware.
    #[must_use]
    pub fn direction(&self) -> Direction {
        *self
            .direction
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Sample the current level.
    ///
    /// # Errors
    ///
    /// Returns the [`HardwareError`] reported by the port.
    pub async fn read(&self) -> Result<Level, HardwareError> {
        let _guard = self.io.lock().await;
        let level = self.access.read(self.number).await?;
        tracing::trace!(pin = self.number, %level, "pin read");
        Ok(level)
    }

    /// Drive the pin. Callers must make sure the pin is an output.
    ///
    /// # Errors
    ///
    /// Returns the [`HardwareError`] reported by the port.
    pub async fn write(&self, level: Level) -> Result<(), HardwareError> {
        let _guard = self.io.lock().await;
        self.access.write(self.number, level).await?;
        tracing::debug!(pin = self.number, %level, "pin written");
        Ok(())
    }

    /// Invert the level and return the new one.
    ///
    /// The read and the write happen under the same lock, so no other call on
    /// this pin can slip in between.
    ///
    /// # Errors
    ///
    /// Returns the [`HardwareError`] reported by the port. If the read fails
    /// nothing is written.
    pub async fn toggle(&self) -> Result<Level, HardwareError> {
        let _guard = self.io.lock().await;
        let previous = self.access.read(self.number).await?;
        let next = !previous;
        self.access.write(self.number, next).await?;
        tracing::debug!(pin = self.number, %previous, %next, "pin toggled");
        Ok(next)
    }

    /// Reconfigure the hardware direction.
    ///
    /// The tracked direction only changes once the hardware accepted it.
    ///
    /// # Errors
    ///
    /// Returns the [`HardwareError`] reported by the port.
    pub async fn set_direction(&self, direction: Direction) -> Result<(), HardwareError> {
        let _guard = self.io.lock().await;
        self.access.set_direction(self.number, direction).await?;
        *self
            .direction
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = direction;
        tracing::debug!(pin = self.number, %direction, "pin direction set");
        Ok(())
    }
}

/// Every addressable pin of the board, indexed the way entities refer to them.
pub struct PinBank<A> {
    pins: Vec<Pin<A>>,
}

impl<A: PinAccess> PinBank<A> {
    /// Create one [`Pin`] per pin number of `revision`, sharing `access`.
    pub fn new(revision: BoardRevision, access: A) -> Self {
        Self::with_shared_access(revision, Arc::new(access))
    }

    /// Same as [`new`](Self::new) for an access handle the caller keeps too.
    pub fn with_shared_access(revision: BoardRevision, access: Arc<A>) -> Self {
        let pins = revision
            .pin_numbers()
            .into_iter()
            .map(|number| Pin::new(number, Arc::clone(&access)))
            .collect();
        Self { pins }
    }

    /// Pin at position `index` of the collection.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Pin<A>> {
        self.pins.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pin<A>> {
        self.pins.iter()
    }

    /// Startup pass: every pin becomes an input, then each pin used by an
    /// output entity becomes an output driven low.
    ///
    /// Input pins are never written.
    ///
    /// # Errors
    ///
    /// Returns the first [`HardwareError`]; the bank must not serve requests
    /// in that case.
    pub async fn initialize(&self, entities: &EntityRegistry) -> Result<(), HardwareError> {
        for pin in &self.pins {
            pin.set_direction(Direction::Input).await?;
        }

        let mut outputs: Vec<usize> = entities
            .list_all()
            .iter()
            .filter(|entity| entity.is_output())
            .map(|entity| entity.pin_index)
            .collect();
        outputs.sort_unstable();
        outputs.dedup();

        for index in outputs {
            // The registry has already checked the index against this bank.
            let Some(pin) = self.get(index) else {
                continue;
            };
            pin.set_direction(Direction::Output).await?;
            pin.write(Level::Low).await?;
        }

        tracing::info!(
            pins = self.pins.len(),
            entities = entities.len(),
            "pins configured"
        );
        Ok(())
    }
}
