//! Layered application configuration
//!
//! Precedence, lowest first: built-in defaults, YAML file (`--config`),
//! `SEGMENTER_*` environment variables (nested keys split on `__`), CLI flags.

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result, bail};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use segmenter::{SegmenterConfig, SegmenterSettings};
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "SEGMENTER_";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; ignored when `RUST_LOG` is set.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_listen_address() -> String {
    "0.0.0.0:8080".to_owned()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(flatten)]
    pub segmenter: SegmenterConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            logging: LoggingConfig::default(),
            segmenter: SegmenterConfig::default(),
        }
    }
}

/// Validated configuration the server runs with
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub listen_address: SocketAddr,
    pub segmenter: SegmenterSettings,
}

impl AppConfig {
    /// Load defaults, then the YAML file if given, then the environment.
    ///
    /// # Errors
    /// Fails if `path` is given but is not a file, or if any layer cannot be
    /// parsed into the config structure.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if !path.is_file() {
                bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("failed to load configuration")
    }

    /// Apply `--port` and `-v` overrides.
    pub fn apply_cli_overrides(&mut self, port: Option<u16>, verbose: u8) {
        if let Some(port) = port {
            self.listen_address = match self.listen_address.rsplit_once(':') {
                Some((host, _)) => format!("{host}:{port}"),
                None => format!("{}:{port}", self.listen_address),
            };
        }

        match verbose {
            0 => {}
            1 => "info".clone_into(&mut self.logging.level),
            2 => "debug".clone_into(&mut self.logging.level),
            _ => "trace".clone_into(&mut self.logging.level),
        }
    }

    /// # Errors
    /// Fails on an unparsable listen address or any segmenter config error.
    pub fn validate(&self) -> Result<ServerSettings> {
        let listen_address: SocketAddr = self
            .listen_address
            .parse()
            .with_context(|| format!("invalid listen_address '{}'", self.listen_address))?;
        let segmenter = self
            .segmenter
            .validate()
            .context("invalid segmenter configuration")?;
        Ok(ServerSettings {
            listen_address,
            segmenter,
        })
    }

    /// # Errors
    /// Fails if YAML serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).context("failed to render configuration as YAML")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn yaml_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn no_segmenter_env<F: FnOnce()>(f: F) {
        temp_env::with_vars_unset(
            [
                "SEGMENTER_CHUNK_SIZE",
                "SEGMENTER_DESTINATION_ADDRESS",
                "SEGMENTER_LISTEN_ADDRESS",
                "SEGMENTER_LOGGING__LEVEL",
            ],
            f,
        );
    }

    #[test]
    fn defaults_without_file() {
        no_segmenter_env(|| {
            let cfg = AppConfig::load(None).unwrap();
            assert_eq!(cfg.listen_address, "0.0.0.0:8080");
            assert_eq!(cfg.logging.level, "info");
            assert_eq!(cfg.logging.format, LogFormat::Text);
            assert_eq!(cfg.segmenter.chunk_size, None);
            assert_eq!(cfg.segmenter.route_path, "/split");
        });
    }

    #[test]
    fn yaml_file_is_applied() {
        let file = yaml_file(
            "listen_address: 127.0.0.1:9090\nchunk_size: 120\ndestination_address: localhost:8000/api/delivery/\nlogging:\n  format: json\n",
        );
        no_segmenter_env(|| {
            let cfg = AppConfig::load(Some(file.path())).unwrap();
            assert_eq!(cfg.listen_address, "127.0.0.1:9090");
            assert_eq!(cfg.segmenter.chunk_size, Some(120));
            assert_eq!(cfg.logging.format, LogFormat::Json);
            assert_eq!(cfg.logging.level, "info");

            let settings = cfg.validate().unwrap();
            assert_eq!(settings.listen_address.port(), 9090);
            assert_eq!(
                settings.segmenter.destination,
                "http://localhost:8000/api/delivery/"
            );
        });
    }

    #[test]
    fn env_overrides_yaml() {
        let file = yaml_file("chunk_size: 120\ndestination_address: localhost:8000\n");
        temp_env::with_vars(
            [
                ("SEGMENTER_CHUNK_SIZE", Some("4")),
                ("SEGMENTER_LOGGING__LEVEL", Some("debug")),
            ],
            || {
                let cfg = AppConfig::load(Some(file.path())).unwrap();
                assert_eq!(cfg.segmenter.chunk_size, Some(4));
                assert_eq!(cfg.logging.level, "debug");
            },
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/segmenter.yaml"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn cli_overrides() {
        let mut cfg = AppConfig::default();
        cfg.apply_cli_overrides(Some(9999), 2);
        assert_eq!(cfg.listen_address, "0.0.0.0:9999");
        assert_eq!(cfg.logging.level, "debug");

        let mut cfg = AppConfig {
            listen_address: "[::1]:8080".to_owned(),
            ..AppConfig::default()
        };
        cfg.apply_cli_overrides(Some(7000), 0);
        assert_eq!(cfg.listen_address, "[::1]:7000");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn validate_reports_zero_chunk_size() {
        let mut cfg = AppConfig::default();
        cfg.segmenter.chunk_size = Some(0);
        cfg.segmenter.destination_address = Some("localhost:8000".to_owned());
        let err = cfg.validate().unwrap_err();
        assert!(format!("{err:#}").contains("chunk_size must be greater than zero"));
    }

    #[test]
    fn validate_reports_bad_listen_address() {
        let cfg = AppConfig {
            listen_address: "not-an-address".to_owned(),
            ..AppConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("listen_address"));
    }

    #[test]
    fn yaml_rendering_round_trips() {
        let mut cfg = AppConfig::default();
        cfg.segmenter.chunk_size = Some(8);
        let yaml = cfg.to_yaml().unwrap();
        assert!(yaml.contains("chunk_size: 8"));
        assert!(yaml.contains("listen_address:"));

        let parsed: AppConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(parsed.segmenter.chunk_size, Some(8));
    }
}
