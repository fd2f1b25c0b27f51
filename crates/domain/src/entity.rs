//! Entity — a named, user-facing device bound to one pin.
//!
//! Entities are declared in the board file and never change at runtime.
//! The serialized form (`Name`, `FriendlyName`, `Pin`, `Type`) is shared by
//! the board file and the `list` command.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;
use crate::pin::Direction;

/// Whether an entity reads from or drives its pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Input,
    Output,
}

impl EntityKind {
    /// The pin direction this kind configures at startup.
    #[must_use]
    pub fn direction(self) -> Direction {
        match self {
            Self::Input => Direction::Input,
            Self::Output => Direction::Output,
        }
    }

    #[must_use]
    pub fn is_output(self) -> bool {
        matches!(self, Self::Output)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.direction().as_str())
    }
}

impl FromStr for EntityKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "input" => Ok(Self::Input),
            "output" => Ok(Self::Output),
            _ => Err(ValidationError::UnknownKind(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for EntityKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A named device bound to a pin of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Entity {
    /// Unique, case-sensitive lookup key.
    pub name: String,
    /// Display label only.
    #[serde(default)]
    pub friendly_name: String,
    /// Index into the board's pin collection.
    #[serde(rename = "Pin")]
    pub pin_index: usize,
    #[serde(rename = "Type")]
    pub kind: EntityKind,
}

impl Entity {
    /// Create a builder for constructing an [`Entity`].
    #[must_use]
    pub fn builder() -> EntityBuilder {
        EntityBuilder::default()
    }

    /// Check domain invariants that do not depend on the board.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] when `name` is empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(())
    }

    #[must_use]
    pub fn is_output(&self) -> bool {
        self.kind.is_output()
    }
}

/// Step-by-step builder for [`Entity`].
#[derive(Debug, Default)]
pub struct EntityBuilder {
    name: Option<String>,
    friendly_name: Option<String>,
    pin_index: usize,
    kind: Option<EntityKind>,
}

impl EntityBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn friendly_name(mut self, friendly_name: impl Into<String>) -> Self {
        self.friendly_name = Some(friendly_name.into());
        self
    }

    #[must_use]
    pub fn pin(mut self, pin_index: usize) -> Self {
        self.pin_index = pin_index;
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: EntityKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Consume the builder, validate, and return an [`Entity`].
    ///
    /// The kind defaults to [`EntityKind::Input`], which never drives a pin.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] if `name` is missing or empty.
    pub fn build(self) -> Result<Entity, ValidationError> {
        let entity = Entity {
            name: self.name.unwrap_or_default(),
            friendly_name: self.friendly_name.unwrap_or_default(),
            pin_index: self.pin_index,
            kind: self.kind.unwrap_or(EntityKind::Input),
        };
        entity.validate()?;
        Ok(entity)
    }
}
