//! Pin access port — the physical I/O capability, addressed by pin number.

use std::future::Future;
use std::sync::Arc;

use gpiohub_domain::error::HardwareError;
use gpiohub_domain::pin::{Direction, Level};

/// Raw hardware access to the pins of a board.
///
/// Every call performs a real interaction and may be slow or fail.
/// Implementations must not cache levels: inputs change under our feet.
pub trait PinAccess: Send + Sync {
    /// Sample the current electrical level of `pin`.
    fn read(&self, pin: u8) -> impl Future<Output = Result<Level, HardwareError>> + Send;

    /// Drive `pin` to `level`.
    fn write(&self, pin: u8, level: Level)
    -> impl Future<Output = Result<(), HardwareError>> + Send;

    /// Reconfigure `pin` as input or output. Idempotent.
    fn set_direction(
        &self,
        pin: u8,
        direction: Direction,
    ) -> impl Future<Output = Result<(), HardwareError>> + Send;
}

impl<A: PinAccess> PinAccess for Arc<A> {
    fn read(&self, pin: u8) -> impl Future<Output = Result<Level, HardwareError>> + Send {
        A::read(self, pin)
    }

    fn write(
        &self,
        pin: u8,
        level: Level,
    ) -> impl Future<Output = Result<(), HardwareError>> + Send {
        A::write(self, pin, level)
    }

    fn set_direction(
        &self,
        pin: u8,
        direction: Direction,
    ) -> impl Future<Output = Result<(), HardwareError>> + Send {
        A::set_direction(self, pin, direction)
    }
}
