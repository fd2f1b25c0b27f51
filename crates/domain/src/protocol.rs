//! Wire messages — one JSON request per datagram, one JSON response back.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CommandError;

/// An inbound request.
///
/// `EntityName` and `Args` may be omitted or `null` for entityless
/// commands. Lowercase and camelCase keys are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Request {
    #[serde(alias = "command")]
    pub command: String,
    #[serde(
        default,
        alias = "entityName",
        alias = "entityname",
        deserialize_with = "null_as_default"
    )]
    pub entity_name: String,
    #[serde(default, alias = "args", deserialize_with = "null_as_default")]
    pub args: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Request {
    /// Decode a raw datagram payload.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvalidRequestFormat`] when the payload is not
    /// a JSON object of the expected shape.
    pub fn decode(payload: &[u8]) -> Result<Self, CommandError> {
        serde_json::from_slice(payload).map_err(CommandError::InvalidRequestFormat)
    }
}

/// Outcome of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
}

/// The single answer to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Response {
    pub status: Status,
    pub data: String,
}

impl Response {
    /// Payload sent when a response cannot be encoded.
    pub const ENCODING_FALLBACK: &'static [u8] =
        br#"{"Status":"error","Data":"error json marshal"}"#;

    #[must_use]
    pub fn ok(data: impl Into<String>) -> Self {
        Self {
            status: Status::Ok,
            data: data.into(),
        }
    }

    #[must_use]
    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            data: reason.into(),
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    /// Encode for transmission, falling back to [`Self::ENCODING_FALLBACK`].
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_else(|_| Self::ENCODING_FALLBACK.to_vec())
    }
}

impl From<CommandError> for Response {
    fn from(err: CommandError) -> Self {
        Self::error(err.to_string())
    }
}
