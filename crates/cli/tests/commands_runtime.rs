use std::env;
use std::fs;
use std::io::{self, Cursor, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use sellerbot_cli::commands::{ask, chat, config, report};
use sellerbot_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use serde_json::Value;
use tempfile::TempDir;

const SELLERS: &str = r#"[
    {"UserID": "alpha", "UserName": "Alpha Cards", "Seller Rating": 5.0, "Sold": "1.2K", "Reviews": "800"},
    {"UserID": "bravo", "UserName": "Bravo Collectibles", "Seller Rating": 5.0, "Sold": "3K", "Reviews": "2K"},
    {"UserID": "charlie", "UserName": "Charlie Cards", "Seller Rating": "5.0", "Sold": "900", "Reviews": "12"},
    {"UserID": "delta", "UserName": "Delta Deals", "Seller Rating": 4.95, "Sold": 500, "Reviews": "600"},
    {"UserID": "echo", "UserName": "Echo Cards", "Seller Rating": "N/A", "Sold": "2M", "Reviews": null}
]"#;

const ENRICHMENT: &str = r#"[
    {"UserID": "bravo", "enrichment": {
        "reddit_mentions": [{"text": "fast shipping", "sentiment": "positive", "date": "2025-01-01"}],
        "sentiment_analysis": {"total_mentions": 1, "positive": 1, "negative": 0, "neutral": 0, "overall_sentiment": "positive"},
        "pricing_analysis": {"note": "Competitive"},
        "last_updated": "2025-01-02"
    }}
]"#;

fn fixture_dir() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("sellers.json"), SELLERS).expect("write sellers");
    fs::write(dir.path().join("enriched.json"), ENRICHMENT).expect("write enrichment");
    dir
}

fn path_str(path: &Path) -> String {
    path.display().to_string()
}

fn load_config() -> AppConfig {
    AppConfig::load(LoadOptions::default()).expect("config should load")
}

#[test]
fn ask_renders_leaderboard_from_env_configured_data() {
    let dir = fixture_dir();
    let sellers = path_str(&dir.path().join("sellers.json"));

    with_env(&[("SELLERBOT_DATA_SELLERS_PATH", sellers.as_str())], || {
        let result = ask::run(&load_config(), "top 3 sold", false);
        assert_eq!(result.exit_code, 0);

        let echo = result.output.find("Echo Cards").expect("echo row");
        let bravo = result.output.find("Bravo Collectibles").expect("bravo row");
        let alpha = result.output.find("Alpha Cards").expect("alpha row");
        assert!(echo < bravo && bravo < alpha);
        assert!(!result.output.contains("Delta Deals"));
    });
}

#[test]
fn ask_json_emits_structured_verdict_with_enrichment() {
    let dir = fixture_dir();
    let sellers = path_str(&dir.path().join("sellers.json"));
    let enrichment = path_str(&dir.path().join("enriched.json"));

    with_env(
        &[
            ("SELLERBOT_DATA_SELLERS_PATH", sellers.as_str()),
            ("SELLERBOT_DATA_ENRICHMENT_PATH", enrichment.as_str()),
        ],
        || {
            let result = ask::run(&load_config(), "BRAVO", true);
            assert_eq!(result.exit_code, 0);

            let payload = parse_payload(&result.output);
            assert_eq!(payload["kind"], "seller_verdict");
            assert_eq!(payload["seller"]["user_id"], "bravo");
            assert_eq!(payload["decision"]["approved"], true);
            assert_eq!(payload["enrichment"]["overall_sentiment"], "positive");
        },
    );
}

#[test]
fn ask_reports_every_failed_rule() {
    let dir = fixture_dir();
    let sellers = path_str(&dir.path().join("sellers.json"));

    with_env(&[("SELLERBOT_DATA_SELLERS_PATH", sellers.as_str())], || {
        let result = ask::run(&load_config(), "echo", false);
        assert!(result.output.contains("RESULT: NOT APPROVED"));
        assert!(result.output.contains("Rating is unavailable"));
        assert!(result.output.contains("Review count (N/A) is too low (< 500)"));
        assert!(result.output.contains("Failed rules: rating-floor, review-floor"));
    });
}

#[test]
fn ask_respects_env_thresholds() {
    let dir = fixture_dir();
    let sellers = path_str(&dir.path().join("sellers.json"));

    with_env(
        &[
            ("SELLERBOT_DATA_SELLERS_PATH", sellers.as_str()),
            ("SELLERBOT_ELIGIBILITY_MIN_REVIEWS", "10"),
        ],
        || {
            let result = ask::run(&load_config(), "charlie", false);
            assert!(result.output.contains("RESULT: APPROVED FOR ONBOARDING"));
        },
    );
}

#[test]
fn missing_seller_data_returns_catalog_failure() {
    let dir = TempDir::new().expect("tempdir");
    let missing = path_str(&dir.path().join("absent.json"));

    with_env(&[("SELLERBOT_DATA_SELLERS_PATH", missing.as_str())], || {
        let result = ask::run(&load_config(), "top 3", false);
        assert_eq!(result.exit_code, 3, "expected catalog load failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "ask");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "catalog_load");
    });
}

#[test]
fn invalid_env_threshold_fails_config_load() {
    with_env(&[("SELLERBOT_ELIGIBILITY_MIN_RATING", "seven")], || {
        assert!(AppConfig::load(LoadOptions::default()).is_err());
    });
}

#[test]
fn chat_answers_follow_up_and_says_goodbye() {
    let dir = fixture_dir();
    let sellers = path_str(&dir.path().join("sellers.json"));

    with_env(&[("SELLERBOT_DATA_SELLERS_PATH", sellers.as_str())], || {
        let mut output = Vec::new();
        let input = Cursor::new(b"top 3 sold\nwhy\nzyx123\nwhy\nQuit\n".to_vec());

        let result = chat::run(&load_config(), input, &mut output);
        assert_eq!(result.exit_code, 0);
        assert!(result.output.is_empty());

        let transcript = String::from_utf8(output).expect("utf-8 transcript");
        assert!(transcript.contains("Criteria: Rating >= 4.9 | Sold >= 100 | Reviews >= 500"));
        assert!(transcript.contains("User 'zyx123' not found in database."));
        assert_eq!(transcript.matches("I looked at the 'sold' field").count(), 2);
        assert!(transcript.trim_end().ends_with("Goodbye!"));
    });
}

#[test]
fn chat_ends_silently_at_end_of_input() {
    let dir = fixture_dir();
    let sellers = path_str(&dir.path().join("sellers.json"));

    with_env(&[("SELLERBOT_DATA_SELLERS_PATH", sellers.as_str())], || {
        let mut output = Vec::new();
        let result = chat::run(&load_config(), Cursor::new(b"best seller".to_vec()), &mut output);
        assert_eq!(result.exit_code, 0);

        let transcript = String::from_utf8(output).expect("utf-8 transcript");
        assert!(transcript.contains("User:     Bravo Collectibles (@bravo)"));
        assert!(!transcript.contains("Goodbye!"));
    });
}

struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn chat_reports_output_failure_as_io_error() {
    let dir = fixture_dir();
    let sellers = path_str(&dir.path().join("sellers.json"));

    with_env(&[("SELLERBOT_DATA_SELLERS_PATH", sellers.as_str())], || {
        let result = chat::run(&load_config(), Cursor::new(b"best seller\n".to_vec()), ClosedPipe);
        assert_eq!(result.exit_code, 1);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "chat");
        assert_eq!(payload["error_class"], "io");
        let message = payload["message"].as_str().expect("message");
        assert!(message.starts_with("Reading input or writing output failed."));
        assert!(message.contains("failed to write chat banner"));
        assert!(message.contains("pipe closed"));
    });
}

#[test]
fn report_limits_and_orders_candidates() {
    let dir = fixture_dir();
    let sellers = path_str(&dir.path().join("sellers.json"));
    let enrichment = path_str(&dir.path().join("enriched.json"));

    with_env(
        &[
            ("SELLERBOT_DATA_SELLERS_PATH", sellers.as_str()),
            ("SELLERBOT_DATA_ENRICHMENT_PATH", enrichment.as_str()),
        ],
        || {
            let result = report::run(&load_config(), Some(2));
            assert_eq!(result.exit_code, 0);
            assert!(result.output.contains("#1: Bravo Collectibles (@bravo)"));
            assert!(result.output.contains("#2: Alpha Cards (@alpha)"));
            assert!(!result.output.contains("Delta Deals"));
            assert!(result.output.contains("HIGHLY RECOMMENDED"));
            assert!(result.output.contains("Total Candidates Analyzed: 2"));
        },
    );
}

#[test]
fn config_attributes_env_and_override_sources() {
    with_env(&[("SELLERBOT_LEADERBOARD_DEFAULT_COUNT", "5")], || {
        let options = LoadOptions {
            overrides: ConfigOverrides {
                sellers_path: Some("custom.json".into()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        };
        let effective = AppConfig::load(options.clone()).expect("config should load");

        let result = config::run(&effective, &options);
        let output = result.output;
        assert!(output.contains("- data.sellers_path = custom.json (source: override)"));
        assert!(output.contains(
            "- leaderboard.default_count = 5 (source: env (SELLERBOT_LEADERBOARD_DEFAULT_COUNT))"
        ));
        assert!(output.contains("- eligibility.min_rating = 4.9 (source: default)"));
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "SELLERBOT_DATA_SELLERS_PATH",
        "SELLERBOT_DATA_ENRICHMENT_PATH",
        "SELLERBOT_ELIGIBILITY_MIN_RATING",
        "SELLERBOT_ELIGIBILITY_MIN_SOLD",
        "SELLERBOT_ELIGIBILITY_MIN_REVIEWS",
        "SELLERBOT_LEADERBOARD_DEFAULT_COUNT",
        "SELLERBOT_LOGGING_LEVEL",
        "SELLERBOT_LOGGING_FORMAT",
        "SELLERBOT_LOG_LEVEL",
        "SELLERBOT_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
