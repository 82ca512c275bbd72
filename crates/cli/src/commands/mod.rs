pub mod ask;
pub mod chat;
pub mod config;
pub mod report;

use serde::Serialize;
use sellerbot_agent::AssistantRuntime;
use sellerbot_core::config::AppConfig;
use sellerbot_core::{ApplicationError, SellerCatalog};

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: String,
    message: String,
}

impl CommandResult {
    /// Plain output that is printed as-is.
    pub fn text(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: error_class.to_string(),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_error(command: &str, error: &ApplicationError) -> Self {
        Self::failure(
            command,
            error.error_class(),
            format!("{} ({error})", error.user_message()),
            error.exit_code(),
        )
    }
}

/// Loads the seller catalog (plus enrichment, when configured and present)
/// and builds the assistant around it.
pub fn load_runtime(config: &AppConfig) -> Result<AssistantRuntime, ApplicationError> {
    let mut catalog = SellerCatalog::load(&config.data.sellers_path)?;
    if let Some(enrichment_path) = &config.data.enrichment_path {
        catalog.merge_enrichment_if_present(enrichment_path)?;
    }
    Ok(AssistantRuntime::new(catalog, config.thresholds(), config.leaderboard.default_count))
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
