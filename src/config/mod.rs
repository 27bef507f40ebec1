//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `FACEVERIFY_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_MAX_IMAGE_DIMENSION, DEFAULT_MAX_IMAGE_SIZE_MB, DimConfig, SAME_PERSON_THRESHOLD,
};
use crate::detector::{DEFAULT_DETECTOR_TIMEOUT_SECS, RemoteDetectorConfig};
use crate::imaging::DecodeLimits;
use crate::pipeline::PipelineConfig;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `FACEVERIFY_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8000`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Root directory for verified uploads. Default: `uploads`.
    pub upload_dir: PathBuf,

    /// Face-embedding service endpoint. Required by [`Config::validate`].
    pub detector_url: Option<String>,

    /// Detector request timeout, in seconds. Default: `30`.
    pub detector_timeout_secs: u64,

    /// Value expected in the `X-API-Key` header. `None` disables the check.
    pub api_key: Option<String>,

    /// Allowed CORS origins. `["*"]` allows any origin.
    pub cors_origins: Vec<String>,

    /// Upload size limit, in megabytes. Default: `10`.
    pub max_image_size_mb: u64,

    /// Longest image side after downscaling. Default: `1920`.
    pub max_image_dimension: u32,

    /// Fixed embedding width. `None` infers it per call.
    pub embedding_dim: Option<usize>,

    /// Minimum pairwise similarity for a same-person verdict. Default: `0.75`.
    pub same_person_threshold: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            upload_dir: PathBuf::from("uploads"),
            detector_url: None,
            detector_timeout_secs: DEFAULT_DETECTOR_TIMEOUT_SECS,
            api_key: None,
            cors_origins: vec!["*".to_string()],
            max_image_size_mb: DEFAULT_MAX_IMAGE_SIZE_MB,
            max_image_dimension: DEFAULT_MAX_IMAGE_DIMENSION,
            embedding_dim: None,
            same_person_threshold: SAME_PERSON_THRESHOLD,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "FACEVERIFY_PORT";
    const ENV_BIND_ADDR: &'static str = "FACEVERIFY_BIND_ADDR";
    const ENV_UPLOAD_DIR: &'static str = "FACEVERIFY_UPLOAD_DIR";
    const ENV_DETECTOR_URL: &'static str = "FACEVERIFY_DETECTOR_URL";
    const ENV_DETECTOR_TIMEOUT_SECS: &'static str = "FACEVERIFY_DETECTOR_TIMEOUT_SECS";
    const ENV_API_KEY: &'static str = "FACEVERIFY_API_KEY";
    const ENV_CORS_ORIGINS: &'static str = "FACEVERIFY_CORS_ORIGINS";
    const ENV_MAX_IMAGE_SIZE_MB: &'static str = "FACEVERIFY_MAX_IMAGE_SIZE_MB";
    const ENV_MAX_IMAGE_DIMENSION: &'static str = "FACEVERIFY_MAX_IMAGE_DIMENSION";
    const ENV_EMBEDDING_DIM: &'static str = "FACEVERIFY_EMBEDDING_DIM";
    const ENV_SAME_PERSON_THRESHOLD: &'static str = "FACEVERIFY_SAME_PERSON_THRESHOLD";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let upload_dir = Self::parse_path_from_env(Self::ENV_UPLOAD_DIR, defaults.upload_dir);
        let detector_url = Self::parse_optional_string_from_env(Self::ENV_DETECTOR_URL);
        let detector_timeout_secs = Self::parse_positive_from_env(
            Self::ENV_DETECTOR_TIMEOUT_SECS,
            defaults.detector_timeout_secs,
        )?;
        let api_key = Self::parse_optional_string_from_env(Self::ENV_API_KEY);
        let cors_origins = Self::parse_list_from_env(Self::ENV_CORS_ORIGINS, defaults.cors_origins);
        let max_image_size_mb =
            Self::parse_positive_from_env(Self::ENV_MAX_IMAGE_SIZE_MB, defaults.max_image_size_mb)?;
        let max_image_dimension = Self::parse_positive_from_env(
            Self::ENV_MAX_IMAGE_DIMENSION,
            defaults.max_image_dimension,
        )?;
        let embedding_dim = match Self::parse_optional_string_from_env(Self::ENV_EMBEDDING_DIM) {
            Some(value) => Some(value.parse().map_err(|_| ConfigError::InvalidNumber {
                name: Self::ENV_EMBEDDING_DIM,
                value,
            })?),
            None => defaults.embedding_dim,
        };
        let same_person_threshold = Self::parse_threshold_from_env(defaults.same_person_threshold)?;

        Ok(Self {
            port,
            bind_addr,
            upload_dir,
            detector_url,
            detector_timeout_secs,
            api_key,
            cors_origins,
            max_image_size_mb,
            max_image_dimension,
            embedding_dim,
            same_person_threshold,
        })
    }

    /// Checks invariants needed to start the server (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upload_dir.exists() && !self.upload_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.upload_dir.clone(),
            });
        }

        if self.detector_url.is_none() {
            return Err(ConfigError::MissingEnvVar {
                name: Self::ENV_DETECTOR_URL,
            });
        }

        if !(0.0..=1.0).contains(&self.same_person_threshold) {
            return Err(ConfigError::InvalidThreshold {
                value: self.same_person_threshold.to_string(),
            });
        }

        self.dim_config().validate()?;

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn dim_config(&self) -> DimConfig {
        DimConfig {
            embedding_dim: self.embedding_dim,
        }
    }

    pub fn decode_limits(&self) -> DecodeLimits {
        DecodeLimits {
            max_bytes: (self.max_image_size_mb.saturating_mul(1024 * 1024))
                .try_into()
                .unwrap_or(usize::MAX),
            max_dimension: self.max_image_dimension,
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            dims: self.dim_config(),
            same_person_threshold: self.same_person_threshold,
            ..Default::default()
        }
    }

    /// Detector settings, or `None` when no URL is configured.
    pub fn detector_config(&self) -> Option<RemoteDetectorConfig> {
        self.detector_url.as_ref().map(|url| {
            RemoteDetectorConfig::new(url.clone())
                .with_timeout(Duration::from_secs(self.detector_timeout_secs))
        })
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_threshold_from_env(default: f32) -> Result<f32, ConfigError> {
        match Self::parse_optional_string_from_env(Self::ENV_SAME_PERSON_THRESHOLD) {
            Some(value) => match value.parse::<f32>() {
                Ok(t) if (0.0..=1.0).contains(&t) => Ok(t),
                _ => Err(ConfigError::InvalidThreshold { value }),
            },
            None => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_list_from_env(var_name: &str, default: Vec<String>) -> Vec<String> {
        let Some(raw) = Self::parse_optional_string_from_env(var_name) else {
            return default;
        };
        let items: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if items.is_empty() { default } else { items }
    }

    fn parse_positive_from_env<T>(var_name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr + PartialEq + Default,
    {
        match Self::parse_optional_string_from_env(var_name) {
            Some(value) => match value.parse::<T>() {
                Ok(n) if n != T::default() => Ok(n),
                _ => Err(ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                }),
            },
            None => Ok(default),
        }
    }
}
