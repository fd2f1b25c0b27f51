//! Board layout — which pin numbers a board revision exposes.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// Pin numbers that exist in the numbering scheme but not on the header.
/// Driving them crashes the board.
const MISSING_PINS: std::ops::RangeInclusive<u8> = 17..=20;

/// Board revision identifier from the board file.
///
/// | Revision | Highest pin |
/// |----------|-------------|
/// | 2 (model 1 rev. 2) | 20 |
/// | 3 (model 1 B+ / model 2) | 31 |
/// | anything else | 16 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardRevision(pub u8);

impl BoardRevision {
    /// Highest pin number addressable on this revision.
    #[must_use]
    pub fn highest_pin(self) -> u8 {
        match self.0 {
            2 => 20,
            3 => 31,
            _ => 16,
        }
    }

    /// Addressable pin numbers in ascending order.
    ///
    /// An entity's pin index refers to a position in this list.
    #[must_use]
    pub fn pin_numbers(self) -> Vec<u8> {
        (0..=self.highest_pin())
            .filter(|number| !MISSING_PINS.contains(number))
            .collect()
    }
}

/// Contents of the board file: revision plus the ordered entity list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BoardDefinition {
    #[serde(default)]
    pub board: BoardRevision,
    #[serde(default)]
    pub entities: Vec<Entity>,
}
