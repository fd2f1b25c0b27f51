//! Entity registry — the read-only table of named entities.

use std::collections::HashMap;

use gpiohub_domain::entity::Entity;
use gpiohub_domain::error::ValidationError;

/// Entities in board-file order, with an exact-match name index.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
    by_name: HashMap<String, usize>,
}

impl EntityRegistry {
    /// Build the registry and check it against a board of `pin_count` pins.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when an entity has no name, a name is
    /// declared twice, or a pin index is outside the pin collection.
    pub fn new(entities: Vec<Entity>, pin_count: usize) -> Result<Self, ValidationError> {
        let mut by_name = HashMap::with_capacity(entities.len());

        for (position, entity) in entities.iter().enumerate() {
            entity.validate()?;
            if entity.pin_index >= pin_count {
                return Err(ValidationError::PinOutOfRange {
                    entity: entity.name.clone(),
                    index: entity.pin_index,
                    pin_count,
                });
            }
            if by_name.insert(entity.name.clone(), position).is_some() {
                return Err(ValidationError::DuplicateEntityName(entity.name.clone()));
            }
        }

        Ok(Self { entities, by_name })
    }

    /// Case-sensitive lookup.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        self.by_name.get(name).map(|&position| &self.entities[position])
    }

    /// All entities in board-file order.
    #[must_use]
    pub fn list_all(&self) -> &[Entity] {
        &self.entities
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
