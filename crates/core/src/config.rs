use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::eligibility::{Thresholds, DEFAULT_MIN_RATING, DEFAULT_MIN_REVIEWS, DEFAULT_MIN_SOLD};
use crate::ranking::DEFAULT_LEADERBOARD_COUNT;

pub const DEFAULT_CONFIG_FILE: &str = "sellerbot.toml";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub data: DataConfig,
    pub eligibility: EligibilityConfig,
    pub leaderboard: LeaderboardConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DataConfig {
    pub sellers_path: PathBuf,
    pub enrichment_path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct EligibilityConfig {
    pub min_rating: f64,
    pub min_sold: f64,
    pub min_reviews: f64,
}

#[derive(Clone, Debug)]
pub struct LeaderboardConfig {
    pub default_count: usize,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub sellers_path: Option<PathBuf>,
    pub enrichment_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig {
                sellers_path: PathBuf::from("clean_seller_data.json"),
                enrichment_path: Some(PathBuf::from("enriched_top_5.json")),
            },
            eligibility: EligibilityConfig {
                min_rating: DEFAULT_MIN_RATING,
                min_sold: DEFAULT_MIN_SOLD,
                min_reviews: DEFAULT_MIN_REVIEWS,
            },
            leaderboard: LeaderboardConfig { default_count: DEFAULT_LEADERBOARD_COUNT },
            logging: LoggingConfig { level: "warn".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            min_rating: self.eligibility.min_rating,
            min_sold: self.eligibility.min_sold,
            min_reviews: self.eligibility.min_reviews,
        }
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(data) = patch.data {
            if let Some(sellers_path) = data.sellers_path {
                self.data.sellers_path = sellers_path;
            }
            if let Some(enrichment_path) = data.enrichment_path {
                self.data.enrichment_path = optional_path(enrichment_path);
            }
        }

        if let Some(eligibility) = patch.eligibility {
            if let Some(min_rating) = eligibility.min_rating {
                self.eligibility.min_rating = min_rating;
            }
            if let Some(min_sold) = eligibility.min_sold {
                self.eligibility.min_sold = min_sold;
            }
            if let Some(min_reviews) = eligibility.min_reviews {
                self.eligibility.min_reviews = min_reviews;
            }
        }

        if let Some(leaderboard) = patch.leaderboard {
            if let Some(default_count) = leaderboard.default_count {
                self.leaderboard.default_count = default_count;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("SELLERBOT_DATA_SELLERS_PATH") {
            self.data.sellers_path = PathBuf::from(value);
        }
        if let Some(value) = read_env("SELLERBOT_DATA_ENRICHMENT_PATH") {
            self.data.enrichment_path = optional_path(PathBuf::from(value));
        }

        if let Some(value) = read_env("SELLERBOT_ELIGIBILITY_MIN_RATING") {
            self.eligibility.min_rating = parse_f64("SELLERBOT_ELIGIBILITY_MIN_RATING", &value)?;
        }
        if let Some(value) = read_env("SELLERBOT_ELIGIBILITY_MIN_SOLD") {
            self.eligibility.min_sold = parse_f64("SELLERBOT_ELIGIBILITY_MIN_SOLD", &value)?;
        }
        if let Some(value) = read_env("SELLERBOT_ELIGIBILITY_MIN_REVIEWS") {
            self.eligibility.min_reviews = parse_f64("SELLERBOT_ELIGIBILITY_MIN_REVIEWS", &value)?;
        }

        if let Some(value) = read_env("SELLERBOT_LEADERBOARD_DEFAULT_COUNT") {
            self.leaderboard.default_count =
                parse_usize("SELLERBOT_LEADERBOARD_DEFAULT_COUNT", &value)?;
        }

        let log_level =
            read_env("SELLERBOT_LOGGING_LEVEL").or_else(|| read_env("SELLERBOT_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("SELLERBOT_LOGGING_FORMAT").or_else(|| read_env("SELLERBOT_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(sellers_path) = overrides.sellers_path {
            self.data.sellers_path = sellers_path;
        }
        if let Some(enrichment_path) = overrides.enrichment_path {
            self.data.enrichment_path = optional_path(enrichment_path);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_data(&self.data)?;
        validate_eligibility(&self.eligibility)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// An empty path disables the optional enrichment file.
fn optional_path(path: PathBuf) -> Option<PathBuf> {
    (!path.as_os_str().is_empty()).then_some(path)
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from("config").join(DEFAULT_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

/// Config file that [`AppConfig::load`] would read for these options.
pub fn detect_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    resolve_config_path(explicit_path)
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_data(data: &DataConfig) -> Result<(), ConfigError> {
    if data.sellers_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation("data.sellers_path must not be empty".to_string()));
    }
    Ok(())
}

fn validate_eligibility(eligibility: &EligibilityConfig) -> Result<(), ConfigError> {
    if !eligibility.min_rating.is_finite() || !(0.0..=5.0).contains(&eligibility.min_rating) {
        return Err(ConfigError::Validation(
            "eligibility.min_rating must be in range 0.0..=5.0".to_string(),
        ));
    }

    if !eligibility.min_sold.is_finite() || eligibility.min_sold < 0.0 {
        return Err(ConfigError::Validation(
            "eligibility.min_sold must be a non-negative number".to_string(),
        ));
    }

    if !eligibility.min_reviews.is_finite() || eligibility.min_reviews < 0.0 {
        return Err(ConfigError::Validation(
            "eligibility.min_reviews must be a non-negative number".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.trim().parse::<f64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    data: Option<DataPatch>,
    eligibility: Option<EligibilityPatch>,
    leaderboard: Option<LeaderboardPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DataPatch {
    sellers_path: Option<PathBuf>,
    enrichment_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct EligibilityPatch {
    min_rating: Option<f64>,
    min_sold: Option<f64>,
    min_reviews: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct LeaderboardPatch {
    default_count: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
