//! # gpiohubd — gpiohub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (CLI args, env vars, config file)
//! - Initialize logging
//! - Load the board file and build the entity registry
//! - Construct the pin access backend (adapter) and the pin bank
//! - Configure every pin before serving
//! - Bind the UDP listener and serve until SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use gpiohub_adapter_gpio_cli::GpioCli;
use gpiohub_adapter_udp::UdpListener;
use gpiohub_adapter_virtual::VirtualPins;
use gpiohub_app::commands::CommandTable;
use gpiohub_app::dispatcher::Dispatcher;
use gpiohub_app::pin::PinBank;
use gpiohub_app::ports::PinAccess;
use gpiohub_app::registry::EntityRegistry;
use gpiohub_domain::board::BoardDefinition;
use tracing_subscriber::EnvFilter;

use crate::config::{Backend, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(std::env::args().skip(1))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let board = config.load_board()?;
    tracing::info!(
        path = %config.board.path.display(),
        revision = board.board.0,
        entities = board.entities.len(),
        "board loaded"
    );

    match config.hardware.backend {
        Backend::Gpio => {
            let access = GpioCli::new(config.hardware.gpio.clone());
            serve(&config, board, access).await
        }
        Backend::Virtual => {
            tracing::warn!("using simulated pins, no hardware will be driven");
            let access = VirtualPins::new(board.board);
            serve(&config, board, access).await
        }
    }
}

async fn serve<A: PinAccess>(
    config: &Config,
    board: BoardDefinition,
    access: A,
) -> Result<(), Box<dyn std::error::Error>> {
    // Pins & entities
    let pins = PinBank::new(board.board, access);
    let entities = EntityRegistry::new(board.entities, pins.len())?;
    pins.initialize(&entities).await?;

    // Dispatch
    let dispatcher = Dispatcher::new(
        Arc::new(pins),
        Arc::new(entities),
        Arc::new(CommandTable::with_builtins()),
    );

    // Transport
    let listener = UdpListener::bind(
        config.bind_addr(),
        dispatcher,
        config.server.max_datagram_size,
    )
    .await?;
    listener.run_until(shutdown_signal()).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
