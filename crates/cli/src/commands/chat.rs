use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use sellerbot_agent::{AssistantRuntime, LoopSummary, QueryLoop};
use sellerbot_core::config::AppConfig;
use sellerbot_core::ApplicationError;

use crate::commands::{load_runtime, CommandResult};

pub fn run<R, W>(config: &AppConfig, input: R, mut output: W) -> CommandResult
where
    R: BufRead,
    W: Write,
{
    let runtime = match load_runtime(config) {
        Ok(runtime) => runtime,
        Err(error) => return CommandResult::from_error("chat", &error),
    };

    match session(&runtime, input, &mut output) {
        Ok(_) => CommandResult::text(""),
        Err(error) => CommandResult::from_error("chat", &into_io_error(error)),
    }
}

/// Folds the context chain into the message so the failure payload keeps it.
fn into_io_error(error: anyhow::Error) -> ApplicationError {
    let kind = error.downcast_ref::<io::Error>().map_or(io::ErrorKind::Other, io::Error::kind);
    ApplicationError::Io(io::Error::new(kind, format!("{error:#}")))
}

fn session<R, W>(runtime: &AssistantRuntime, input: R, output: &mut W) -> Result<LoopSummary>
where
    R: BufRead,
    W: Write,
{
    write_banner(runtime, output).context("failed to write chat banner")?;
    QueryLoop::new(runtime, input, output).run().context("interactive session failed")
}

fn write_banner<W: Write>(runtime: &AssistantRuntime, output: &mut W) -> io::Result<()> {
    writeln!(output, "\n--- Seller Onboarding Assistant ---")?;
    writeln!(output, "Loaded {} sellers.", runtime.catalog().len())?;
    writeln!(output, "Criteria: {}", runtime.thresholds().describe())?;
    writeln!(output, "Type a username, or try 'Who is the best seller?' ('q' to quit)")
}
