use sellerbot_agent::ConversationMemory;
use sellerbot_core::config::AppConfig;

use crate::commands::{load_runtime, CommandResult};

pub fn run(config: &AppConfig, query: &str, json: bool) -> CommandResult {
    let runtime = match load_runtime(config) {
        Ok(runtime) => runtime,
        Err(error) => return CommandResult::from_error("ask", &error),
    };

    let mut memory = ConversationMemory::new();
    let response = runtime.handle_query(query, &mut memory);

    if !json {
        return CommandResult::text(response.render().trim_end());
    }
    match serde_json::to_string_pretty(&response) {
        Ok(output) => CommandResult::text(output),
        Err(error) => CommandResult::failure("ask", "serialization", error.to_string(), 1),
    }
}
