//! `gpio` utility configuration.

use std::time::Duration;

use serde::Deserialize;

/// How to invoke the `gpio` utility.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GpioCliConfig {
    /// Program to run, looked up in `PATH`.
    pub program: String,
    /// Arguments placed before every sub-command (e.g. `["-g"]` for
    /// Broadcom numbering).
    pub prefix_args: Vec<String>,
    /// Upper bound for a single call, in milliseconds. `0` waits forever.
    pub timeout_ms: u64,
}

impl GpioCliConfig {
    /// The call bound, if any.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

impl Default for GpioCliConfig {
    fn default() -> Self {
        Self {
            program: "gpio".to_string(),
            prefix_args: Vec::new(),
            timeout_ms: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_sensible_defaults() {
        let config = GpioCliConfig::default();
        assert_eq!(config.program, "gpio");
        assert!(config.prefix_args.is_empty());
        assert_eq!(config.timeout(), Some(Duration::from_secs(2)));
    }

    #[test]
    fn should_disable_timeout_when_zero() {
        let config = GpioCliConfig {
            timeout_ms: 0,
            ..GpioCliConfig::default()
        };
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn should_deserialize_from_toml() {
        let toml = r#"
            program = "/usr/local/bin/gpio"
            prefix_args = ["-g"]
            timeout_ms = 500
        "#;
        let config: GpioCliConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.program, "/usr/local/bin/gpio");
        assert_eq!(config.prefix_args, vec!["-g".to_string()]);
        assert_eq!(config.timeout_ms, 500);
    }

    #[test]
    fn should_use_defaults_for_missing_fields() {
        let config: GpioCliConfig = toml::from_str("timeout_ms = 10").unwrap();
        assert_eq!(config.program, "gpio");
        assert_eq!(config.timeout_ms, 10);
    }
}
