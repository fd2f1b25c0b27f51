//! UDP adapter error types.

/// Errors that stop the listener. Per-datagram failures are only logged.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The socket could not be bound.
    #[error("failed to bind UDP socket on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The bound address could not be queried.
    #[error("failed to read local address")]
    LocalAddr(#[source] std::io::Error),

    /// The configured datagram buffer is empty.
    #[error("datagram buffer must hold at least one byte")]
    EmptyBuffer,
}
