//! Command table — named operations clients can trigger.
//!
//! | Trigger | Entity | Arguments | Data on success |
//! |---------|--------|-----------|-----------------|
//! | `state` | required | none | current level, `"0"` or `"1"` |
//! | `state` | required | integer | the argument, after driving the pin (`0` is low, anything else high) |
//! | `direction` | required | none | `"input"` or `"output"` |
//! | `toggle` | required | none | the level after toggling |
//! | `list` | ignored | none | JSON array of all entities |
//!
//! Handlers are the only code that calls into [`Pin`] operations.

use std::collections::HashMap;
use std::fmt;

use gpiohub_domain::entity::Entity;
use gpiohub_domain::error::{CommandError, GpioHubError, ValidationError};
use gpiohub_domain::pin::Level;
use gpiohub_domain::protocol::Response;

use crate::pin::{Pin, PinBank};
use crate::ports::PinAccess;
use crate::registry::EntityRegistry;

/// Shared state a handler operates on.
pub struct CommandContext<'a, A> {
    pub pins: &'a PinBank<A>,
    pub entities: &'a EntityRegistry,
}

impl<A: PinAccess> CommandContext<'_, A> {
    fn pin_for(&self, entity: &Entity) -> Result<&Pin<A>, CommandError> {
        self.pins.get(entity.pin_index).ok_or_else(|| {
            CommandError::Internal(GpioHubError::Validation(ValidationError::PinOutOfRange {
                entity: entity.name.clone(),
                index: entity.pin_index,
                pin_count: self.pins.len(),
            }))
        })
    }
}

/// Built-in operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    State,
    Direction,
    Toggle,
    List,
}

impl CommandKind {
    /// Whether the dispatcher must resolve an entity before running this.
    #[must_use]
    pub fn requires_entity(self) -> bool {
        !matches!(self, Self::List)
    }

    /// Default trigger for the built-in.
    #[must_use]
    pub fn trigger(self) -> &'static str {
        match self {
            Self::State => "state",
            Self::Direction => "direction",
            Self::Toggle => "toggle",
            Self::List => "list",
        }
    }

    /// Run the handler.
    ///
    /// `entity` is `Some` whenever [`requires_entity`](Self::requires_entity)
    /// holds; entityless commands receive `None`.
    ///
    /// # Errors
    ///
    /// Returns a [`CommandError`] describing why the request was refused.
    pub async fn execute<A: PinAccess>(
        self,
        ctx: &CommandContext<'_, A>,
        entity: Option<&Entity>,
        args: &[String],
    ) -> Result<Response, CommandError> {
        let required = || entity.ok_or(CommandError::InvalidEntity);
        match self {
            Self::State => state(ctx, required()?, args).await,
            Self::Direction => direction(ctx, required()?),
            Self::Toggle => toggle(ctx, required()?).await,
            Self::List => list(ctx),
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.trigger())
    }
}

async fn state<A: PinAccess>(
    ctx: &CommandContext<'_, A>,
    entity: &Entity,
    args: &[String],
) -> Result<Response, CommandError> {
    let pin = ctx.pin_for(entity)?;

    let Some(arg) = args.first() else {
        let level = pin.read().await?;
        return Ok(Response::ok(level.as_str()));
    };

    if !entity.is_output() {
        return Err(CommandError::EntityIsInput);
    }
    let value: i64 = arg.parse().map_err(CommandError::StateNotInteger)?;
    pin.write(Level::from(value != 0)).await?;
    Ok(Response::ok(arg.as_str()))
}

fn direction<A: PinAccess>(
    ctx: &CommandContext<'_, A>,
    entity: &Entity,
) -> Result<Response, CommandError> {
    let pin = ctx.pin_for(entity)?;
    Ok(Response::ok(pin.direction().as_str()))
}

async fn toggle<A: PinAccess>(
    ctx: &CommandContext<'_, A>,
    entity: &Entity,
) -> Result<Response, CommandError> {
    if !entity.is_output() {
        return Err(CommandError::EntityIsInput);
    }
    let level = ctx.pin_for(entity)?.toggle().await?;
    Ok(Response::ok(level.as_str()))
}

fn list<A>(ctx: &CommandContext<'_, A>) -> Result<Response, CommandError> {
    let data = serde_json::to_string(ctx.entities.list_all())
        .map_err(|err| CommandError::Internal(err.into()))?;
    Ok(Response::ok(data))
}

/// A registered operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    trigger: String,
    kind: CommandKind,
}

impl Command {
    /// Lowercased trigger.
    #[must_use]
    pub fn trigger(&self) -> &str {
        &self.trigger
    }

    #[must_use]
    pub fn kind(&self) -> CommandKind {
        self.kind
    }

    #[must_use]
    pub fn requires_entity(&self) -> bool {
        self.kind.requires_entity()
    }
}

/// Case-insensitive trigger → command map.
#[derive(Debug, Default)]
pub struct CommandTable {
    commands: HashMap<String, Command>,
}

impl CommandTable {
    /// Table holding `state`, `direction`, `toggle` and `list`.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut table = Self::default();
        for kind in [
            CommandKind::State,
            CommandKind::Direction,
            CommandKind::Toggle,
            CommandKind::List,
        ] {
            table
                .commands
                .insert(kind.trigger().to_string(), Command {
                    trigger: kind.trigger().to_string(),
                    kind,
                });
        }
        table
    }

    /// Register `kind` under an additional trigger.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateTrigger`] if the trigger is taken
    /// (in any case), or [`ValidationError::EmptyTrigger`] for an empty one.
    pub fn register(
        &mut self,
        trigger: impl AsRef<str>,
        kind: CommandKind,
    ) -> Result<(), ValidationError> {
        let trigger = trigger.as_ref().to_lowercase();
        if trigger.is_empty() {
            return Err(ValidationError::EmptyTrigger);
        }
        if self.commands.contains_key(&trigger) {
            return Err(ValidationError::DuplicateTrigger(trigger));
        }
        self.commands
            .insert(trigger.clone(), Command { trigger, kind });
        Ok(())
    }

    /// Case-insensitive lookup.
    #[must_use]
    pub fn resolve(&self, trigger: &str) -> Option<&Command> {
        self.commands.get(&trigger.to_lowercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
