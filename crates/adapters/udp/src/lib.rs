//! # gpiohub-adapter-udp
//!
//! UDP transport for the request dispatcher.
//!
//! One socket, one datagram at a time: receive, run the full dispatch
//! pipeline (including hardware I/O), send the encoded response back to the
//! datagram's source, then receive the next one. Requests are therefore
//! handled in arrival order and a slow pin call delays every client.
//!
//! - Empty datagrams are ignored and get no answer.
//! - Receive and send failures are logged; the loop keeps going.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `gpiohub-app` and `gpiohub-domain`.

pub mod error;

use std::future::Future;
use std::net::SocketAddr;

use tokio::net::{ToSocketAddrs, UdpSocket};

use gpiohub_app::dispatcher::Dispatcher;
use gpiohub_app::ports::PinAccess;

pub use error::TransportError;

/// Default receive buffer, in bytes. Longer datagrams are truncated.
pub const DEFAULT_MAX_DATAGRAM_SIZE: usize = 1024;

/// Sequential receive → dispatch → send loop.
pub struct UdpListener<A> {
    socket: UdpSocket,
    dispatcher: Dispatcher<A>,
    max_datagram_size: usize,
}

impl<A: PinAccess> UdpListener<A> {
    /// Bind the socket.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Bind`] when the address is unavailable, or
    /// [`TransportError::EmptyBuffer`] when `max_datagram_size` is zero.
    pub async fn bind(
        addr: impl ToSocketAddrs + std::fmt::Display,
        dispatcher: Dispatcher<A>,
        max_datagram_size: usize,
    ) -> Result<Self, TransportError> {
        if max_datagram_size == 0 {
            return Err(TransportError::EmptyBuffer);
        }
        let display = addr.to_string();
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| TransportError::Bind {
                addr: display,
                source,
            })?;
        Ok(Self {
            socket,
            dispatcher,
            max_datagram_size,
        })
    }

    /// Address the socket is bound to.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::LocalAddr`] if the OS cannot report it.
    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        self.socket.local_addr().map_err(TransportError::LocalAddr)
    }

    /// Serve until `shutdown` resolves.
    ///
    /// A request already being handled is completed before shutdown is
    /// observed.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) {
        let mut shutdown = std::pin::pin!(shutdown);
        let mut buffer = vec![0_u8; self.max_datagram_size];

        if let Ok(addr) = self.local_addr() {
            tracing::info!(%addr, "listening for UDP requests");
        }

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("UDP listener shutting down");
                    return;
                }
                received = self.socket.recv_from(&mut buffer) => match received {
                    Ok((0, peer)) => tracing::trace!(%peer, "ignoring empty datagram"),
                    Ok((len, peer)) => self.respond(&buffer[..len], peer).await,
                    Err(err) => tracing::warn!(%err, "failed to receive datagram"),
                },
            }
        }
    }

    async fn respond(&self, payload: &[u8], peer: SocketAddr) {
        tracing::debug!(%peer, bytes = payload.len(), "datagram received");
        let response = self.dispatcher.dispatch(payload).await;
        let encoded = response.encode();
        if let Err(err) = self.socket.send_to(&encoded, peer).await {
            tracing::warn!(%err, %peer, "failed to send response");
        }
    }
}
