use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use sellerbot_core::config::{detect_config_path, AppConfig, LoadOptions};
use toml::Value;

use crate::commands::CommandResult;

struct Field {
    key_path: &'static str,
    value: String,
    env_keys: &'static [&'static str],
    overridden: bool,
}

pub fn run(config: &AppConfig, options: &LoadOptions) -> CommandResult {
    CommandResult::text(render(config, options))
}

pub fn render(config: &AppConfig, options: &LoadOptions) -> String {
    let config_file_path = detect_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let overrides = &options.overrides;

    let fields = [
        Field {
            key_path: "data.sellers_path",
            value: config.data.sellers_path.display().to_string(),
            env_keys: &["SELLERBOT_DATA_SELLERS_PATH"],
            overridden: overrides.sellers_path.is_some(),
        },
        Field {
            key_path: "data.enrichment_path",
            value: display_optional_path(config.data.enrichment_path.as_deref()),
            env_keys: &["SELLERBOT_DATA_ENRICHMENT_PATH"],
            overridden: overrides.enrichment_path.is_some(),
        },
        Field {
            key_path: "eligibility.min_rating",
            value: config.eligibility.min_rating.to_string(),
            env_keys: &["SELLERBOT_ELIGIBILITY_MIN_RATING"],
            overridden: false,
        },
        Field {
            key_path: "eligibility.min_sold",
            value: config.eligibility.min_sold.to_string(),
            env_keys: &["SELLERBOT_ELIGIBILITY_MIN_SOLD"],
            overridden: false,
        },
        Field {
            key_path: "eligibility.min_reviews",
            value: config.eligibility.min_reviews.to_string(),
            env_keys: &["SELLERBOT_ELIGIBILITY_MIN_REVIEWS"],
            overridden: false,
        },
        Field {
            key_path: "leaderboard.default_count",
            value: config.leaderboard.default_count.to_string(),
            env_keys: &["SELLERBOT_LEADERBOARD_DEFAULT_COUNT"],
            overridden: false,
        },
        Field {
            key_path: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["SELLERBOT_LOGGING_LEVEL", "SELLERBOT_LOG_LEVEL"],
            overridden: overrides.log_level.is_some(),
        },
        Field {
            key_path: "logging.format",
            value: format!("{:?}", config.logging.format),
            env_keys: &["SELLERBOT_LOGGING_FORMAT", "SELLERBOT_LOG_FORMAT"],
            overridden: overrides.log_format.is_some(),
        },
    ];

    let mut lines =
        vec!["effective config (source precedence: override > env > file > default):".to_string()];
    lines.extend(fields.iter().map(|field| {
        let source = field_source(field, config_file_doc.as_ref(), config_file_path.as_deref());
        format!("- {} = {} (source: {source})", field.key_path, field.value)
    }));
    lines.join("\n")
}

fn display_optional_path(path: Option<&Path>) -> String {
    path.map(|path| path.display().to_string()).unwrap_or_else(|| "<disabled>".to_string())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    field: &Field,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if field.overridden {
        return "override".to_string();
    }

    if let Some(env_key) = field.env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if config_file_doc.is_some_and(|doc| contains_path(doc, field.key_path)) {
        let file_path = config_file_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("config file"));
        return format!("file ({})", file_path.display());
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
