use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_COMMISSION: f64 = 0.03;
const DEFAULT_TICKS_PER_UNIT: u32 = 100;
const DEFAULT_MAX_DECK_SIZE: usize = 13;
const DEFAULT_CACHE_CAPACITY: usize = 64;
const DEFAULT_LOG_PATH: &str = "hilo-guide.log.jsonl";
/// Largest value accepted for `limits.max_deck_size`.
pub const MAX_SUPPORTED_DECK_SIZE: usize = 64;

/// Root configuration, loaded from YAML. Every block is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct GuideConfig {
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GuideConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: GuideConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.pricing.validate()?;
        self.limits.validate()?;
        self.logging.normalize();
        self.logging.validate()?;
        Ok(())
    }
}

/// Exchange pricing: commission charged on net winnings and the price
/// granularity (ticks per unit of decimal odds).
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PricingConfig {
    #[serde(default = "default_commission")]
    pub commission: f64,
    #[serde(default = "default_ticks_per_unit")]
    pub ticks_per_unit: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            commission: DEFAULT_COMMISSION,
            ticks_per_unit: DEFAULT_TICKS_PER_UNIT,
        }
    }
}

impl PricingConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if !self.commission.is_finite() || !(0.0..1.0).contains(&self.commission) {
            return Err(ValidationError::InvalidField {
                field: "pricing.commission".to_string(),
                message: format!("commission must lie in [0, 1), got {}", self.commission),
            });
        }

        if self.ticks_per_unit == 0 {
            return Err(ValidationError::InvalidField {
                field: "pricing.ticks_per_unit".to_string(),
                message: "ticks per unit must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

fn default_commission() -> f64 {
    DEFAULT_COMMISSION
}

fn default_ticks_per_unit() -> u32 {
    DEFAULT_TICKS_PER_UNIT
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LimitsConfig {
    #[serde(default = "default_max_deck_size")]
    pub max_deck_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_deck_size: DEFAULT_MAX_DECK_SIZE,
        }
    }
}

impl LimitsConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if !(2..=MAX_SUPPORTED_DECK_SIZE).contains(&self.max_deck_size) {
            return Err(ValidationError::InvalidField {
                field: "limits.max_deck_size".to_string(),
                message: format!(
                    "max deck size must lie in [2, {MAX_SUPPORTED_DECK_SIZE}], got {}",
                    self.max_deck_size
                ),
            });
        }
        Ok(())
    }
}

fn default_max_deck_size() -> usize {
    DEFAULT_MAX_DECK_SIZE
}

/// Result memoisation; a capacity of zero disables it.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CacheConfig {
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

/// Logging defaults to human-readable output on stderr.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default = "default_log_path")]
    pub log_path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            log_path: default_log_path(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.level().is_none() {
            return Err(ValidationError::InvalidField {
                field: "logging.tracing_level".to_string(),
                message: format!("unknown tracing level '{}'", self.tracing_level),
            });
        }

        if self.enable_structured && self.log_path.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "logging.log_path".to_string(),
                message: "structured logging needs a log path".to_string(),
            });
        }

        Ok(())
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }

    pub fn log_path(&self) -> PathBuf {
        PathBuf::from(self.log_path.trim())
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn default_log_path() -> String {
    DEFAULT_LOG_PATH.to_string()
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
pricing:
  commission: 0.05
  ticks_per_unit: 50
limits:
  max_deck_size: 20
cache:
  capacity: 8
logging:
  enable_structured: true
  tracing_level: "debug"
  log_path: "out/hilo.jsonl"
"#;

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg: GuideConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        assert_eq!(cfg.pricing.commission, 0.05);
        assert_eq!(cfg.pricing.ticks_per_unit, 50);
        assert_eq!(cfg.limits.max_deck_size, 20);
        assert_eq!(cfg.cache.capacity, 8);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));
        assert_eq!(cfg.logging.log_path(), PathBuf::from("out/hilo.jsonl"));
    }

    #[test]
    fn empty_document_uses_defaults() {
        let mut cfg: GuideConfig = serde_yaml::from_str("{}").expect("parse");
        cfg.validate().expect("defaults are valid");
        assert_eq!(cfg, GuideConfig::default());
        assert_eq!(cfg.pricing.commission, DEFAULT_COMMISSION);
        assert_eq!(cfg.limits.max_deck_size, DEFAULT_MAX_DECK_SIZE);
        assert!(!cfg.logging.enable_structured);
    }

    #[test]
    fn blank_tracing_level_falls_back_to_info() {
        let mut cfg: GuideConfig =
            serde_yaml::from_str("logging:\n  tracing_level: \"  \"\n").expect("parse");
        cfg.validate().expect("normalized");
        assert_eq!(cfg.logging.level(), Some(Level::INFO));
    }

    #[test]
    fn rejects_commission_of_one() {
        let yaml = BASIC_YAML.replace("commission: 0.05", "commission: 1.0");
        let mut cfg: GuideConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "pricing.commission"
        ));
    }

    #[test]
    fn rejects_zero_ticks() {
        let yaml = BASIC_YAML.replace("ticks_per_unit: 50", "ticks_per_unit: 0");
        let mut cfg: GuideConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "pricing.ticks_per_unit"
        ));
    }

    #[test]
    fn rejects_out_of_range_deck_limits() {
        for bad in ["1", "65"] {
            let yaml = BASIC_YAML.replace("max_deck_size: 20", &format!("max_deck_size: {bad}"));
            let mut cfg: GuideConfig = serde_yaml::from_str(&yaml).expect("parse");
            let err = cfg.validate().expect_err("should fail");
            assert!(matches!(
                err,
                ValidationError::InvalidField { field, .. } if field == "limits.max_deck_size"
            ));
        }
    }

    #[test]
    fn rejects_unknown_tracing_level() {
        let yaml = BASIC_YAML.replace("\"debug\"", "\"chatty\"");
        let mut cfg: GuideConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "logging.tracing_level"
        ));
    }

    #[test]
    fn structured_logging_needs_a_path() {
        let yaml = BASIC_YAML.replace("\"out/hilo.jsonl\"", "\"\"");
        let mut cfg: GuideConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "logging.log_path"
        ));
    }
}
