//! # gpiohub-domain
//!
//! Pure domain model for the gpiohub pin server.
//!
//! ## Responsibilities
//! - Electrical vocabulary: [`Direction`](pin::Direction) and [`Level`](pin::Level)
//! - Define **Entities** (named, user-facing devices bound to one pin)
//! - Describe the **board layout** (which pin numbers exist for a revision)
//! - Define the **wire messages** exchanged with clients
//! - Define the error taxonomy shared by every layer
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod board;
pub mod entity;
pub mod error;
pub mod pin;
pub mod protocol;
