//! Recording fake of the [`PinAccess`] port for unit tests.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Mutex;

use gpiohub_domain::error::HardwareError;
use gpiohub_domain::pin::{Direction, Level};

use crate::ports::PinAccess;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PinCall {
    Read(u8),
    Write(u8, Level),
    SetDirection(u8, Direction),
}

#[derive(Default)]
pub struct FakePins {
    levels: Mutex<HashMap<u8, Level>>,
    broken: Mutex<HashSet<u8>>,
    read_only: Mutex<HashSet<u8>>,
    calls: Mutex<Vec<PinCall>>,
}

impl FakePins {
    pub fn set_level(&self, pin: u8, level: Level) {
        self.levels.lock().unwrap().insert(pin, level);
    }

    pub fn level(&self, pin: u8) -> Level {
        self.levels
            .lock()
            .unwrap()
            .get(&pin)
            .copied()
            .unwrap_or_default()
    }

    pub fn break_pin(&self, pin: u8) {
        self.broken.lock().unwrap().insert(pin);
    }

    /// Let reads through but fail every write to `pin`.
    pub fn break_writes(&self, pin: u8) {
        self.read_only.lock().unwrap().insert(pin);
    }

    pub fn calls(&self) -> Vec<PinCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<PinCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, PinCall::Write(..)))
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: PinCall, pin: u8) -> Result<(), HardwareError> {
        self.calls.lock().unwrap().push(call);
        if self.broken.lock().unwrap().contains(&pin) {
            return Err(HardwareError::UnknownPin(pin));
        }
        Ok(())
    }
}

impl PinAccess for FakePins {
    fn read(&self, pin: u8) -> impl Future<Output = Result<Level, HardwareError>> + Send {
        let result = self
            .record(PinCall::Read(pin), pin)
            .map(|()| self.level(pin));
        async move { result }
    }

    fn write(
        &self,
        pin: u8,
        level: Level,
    ) -> impl Future<Output = Result<(), HardwareError>> + Send {
        let result = self.record(PinCall::Write(pin, level), pin).and_then(|()| {
            if self.read_only.lock().unwrap().contains(&pin) {
                Err(HardwareError::UnknownPin(pin))
            } else {
                Ok(())
            }
        });
        if result.is_ok() {
            self.set_level(pin, level);
        }
        async move { result }
    }

    fn set_direction(
        &self,
        pin: u8,
        direction: Direction,
    ) -> impl Future<Output = Result<(), HardwareError>> + Send {
        let result = self.record(PinCall::SetDirection(pin, direction), pin);
        async move { result }
    }
}
