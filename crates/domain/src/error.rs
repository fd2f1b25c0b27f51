//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts via `#[from]`.
//! [`CommandError`] is special: its `Display` output is the exact reason
//! string sent back to clients, so its messages are part of the wire format.

/// Umbrella error for the gpiohub core.
#[derive(Debug, thiserror::Error)]
pub enum GpioHubError {
    /// A domain invariant was violated (usually while loading configuration).
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The physical I/O capability failed.
    #[error("hardware error")]
    Hardware(#[from] HardwareError),

    /// A payload could not be serialized.
    #[error("encoding error")]
    Encoding(#[from] serde_json::Error),
}

/// Invariant violations detected while building the pin/entity model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// An entity was declared without a name.
    #[error("entity name must not be empty")]
    EmptyName,

    /// Two entities share the same name.
    #[error("entity name {0:?} is declared more than once")]
    DuplicateEntityName(String),

    /// An entity points past the end of the pin collection.
    #[error("entity {entity:?} points to pin {index} but the board only has {pin_count} pins")]
    PinOutOfRange {
        entity: String,
        index: usize,
        pin_count: usize,
    },

    /// An entity type other than `input` or `output`.
    #[error("unknown entity type {0:?}, expected \"input\" or \"output\"")]
    UnknownKind(String),

    /// A command trigger was registered twice.
    #[error("command trigger {0:?} is already registered")]
    DuplicateTrigger(String),

    /// A command trigger was empty.
    #[error("command trigger must not be empty")]
    EmptyTrigger,
}

/// Failure originating from the physical I/O capability.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// The backing tool could not be started.
    #[error("failed to run {program:?}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The backing tool ran but reported a failure.
    #[error("{program:?} exited with {status}: {stderr}")]
    ExitStatus {
        program: String,
        status: String,
        stderr: String,
    },

    /// The pin level could not be decoded from the tool output.
    #[error("unexpected pin level output {0:?}")]
    UnexpectedOutput(String),

    /// The call did not complete within the configured bound.
    #[error("pin {pin} did not answer within {timeout_ms}ms")]
    Timeout { pin: u8, timeout_ms: u64 },

    /// The pin is not addressable by this backend.
    #[error("pin {0} is not available")]
    UnknownPin(u8),
}

/// Request-level rejection. The `Display` text is what clients receive.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The payload is not a well-formed request.
    #[error("invalid request format")]
    InvalidRequestFormat(#[source] serde_json::Error),

    /// No command matches the trigger.
    #[error("invalid command")]
    InvalidCommand,

    /// The command needs an entity and none matched.
    #[error("invalid entity")]
    InvalidEntity,

    /// An output-only command targeted an input entity.
    #[error("entity is input")]
    EntityIsInput,

    /// The `state` argument is not an integer.
    #[error("state not an integer")]
    StateNotInteger(#[source] std::num::ParseIntError),

    /// Anything the client cannot act on (hardware failures, encoding).
    #[error("internal error")]
    Internal(#[source] GpioHubError),
}

impl From<HardwareError> for CommandError {
    fn from(err: HardwareError) -> Self {
        Self::Internal(GpioHubError::Hardware(err))
    }
}
