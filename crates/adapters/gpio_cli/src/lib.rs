//! # gpiohub-adapter-gpio-cli
//!
//! Pin access backed by the `gpio` command-line utility:
//!
//! | Operation | Invocation |
//! |-----------|------------|
//! | read | `gpio read <pin>` (prints `0` or `1`) |
//! | write | `gpio write <pin> 0\|1` |
//! | set direction | `gpio mode <pin> in\|out` |
//!
//! Each call spawns a process and waits for it, bounded by the configured
//! timeout. A timed-out process is killed.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `gpiohub-app` and `gpiohub-domain`.

pub mod config;

use std::process::Output;

use tokio::process::Command;

use gpiohub_app::ports::PinAccess;
use gpiohub_domain::error::HardwareError;
use gpiohub_domain::pin::{Direction, Level};

pub use config::GpioCliConfig;

/// [`PinAccess`] implementation shelling out to `gpio`.
#[derive(Debug, Clone)]
pub struct GpioCli {
    config: GpioCliConfig,
}

impl GpioCli {
    #[must_use]
    pub fn new(config: GpioCliConfig) -> Self {
        Self { config }
    }

    async fn run(&self, pin: u8, args: &[&str]) -> Result<String, HardwareError> {
        tracing::debug!(program = %self.config.program, ?args, "running gpio");

        let mut command = Command::new(&self.config.program);
        command
            .args(&self.config.prefix_args)
            .args(args)
            .kill_on_drop(true);

        let output = match self.config.timeout() {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| HardwareError::Timeout {
                    pin,
                    timeout_ms: self.config.timeout_ms,
                })?,
            None => command.output().await,
        }
        .map_err(|source| HardwareError::Spawn {
            program: self.config.program.clone(),
            source,
        })?;

        self.check(output)
    }

    fn check(&self, output: Output) -> Result<String, HardwareError> {
        if !output.status.success() {
            return Err(HardwareError::ExitStatus {
                program: self.config.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for GpioCli {
    fn default() -> Self {
        Self::new(GpioCliConfig::default())
    }
}

/// Decode the output of `gpio read`.
fn parse_level(output: &str) -> Result<Level, HardwareError> {
    match output.trim() {
        "0" => Ok(Level::Low),
        "1" => Ok(Level::High),
        other => Err(HardwareError::UnexpectedOutput(other.to_string())),
    }
}

impl PinAccess for GpioCli {
    async fn read(&self, pin: u8) -> Result<Level, HardwareError> {
        let output = self.run(pin, &["read", &pin.to_string()]).await?;
        parse_level(&output)
    }

    async fn write(&self, pin: u8, level: Level) -> Result<(), HardwareError> {
        self.run(pin, &["write", &pin.to_string(), level.as_str()])
            .await
            .map(drop)
    }

    async fn set_direction(&self, pin: u8, direction: Direction) -> Result<(), HardwareError> {
        let mode = match direction {
            Direction::Input => "in",
            Direction::Output => "out",
        };
        self.run(pin, &["mode", &pin.to_string(), mode])
            .await
            .map(drop)
    }
}
