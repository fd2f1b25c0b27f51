//! # gpiohub-app
//!
//! Application layer — the command dispatch and device-state core.
//!
//! ## Responsibilities
//! - Define the **port trait** that hardware adapters implement:
//!   - `PinAccess` — read / write / set-direction of pin N
//! - Model the board: `Pin` and `PinBank` (one pin per addressable number)
//! - Hold the read-only `EntityRegistry` built from the board file
//! - Register named operations in the `CommandTable`
//! - Run the request pipeline in the `Dispatcher`:
//!   decode → resolve entity → resolve command → execute → respond
//!
//! ## Dependency rule
//! Depends on `gpiohub-domain` only (plus `tokio::sync` for pin locks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod commands;
pub mod dispatcher;
pub mod pin;
pub mod ports;
pub mod registry;

#[cfg(test)]
mod fake;
