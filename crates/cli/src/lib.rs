pub mod commands;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use sellerbot_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};
use sellerbot_core::ApplicationError;

#[derive(Debug, Parser)]
#[command(
    name = "sellerbot",
    about = "Seller onboarding assistant",
    long_about = "Answer onboarding questions about scraped marketplace sellers: who qualifies, \
                  who is best, leaderboards, and per-seller verdicts.",
    after_help = "Examples:\n  sellerbot\n  sellerbot ask top 5 sold\n  sellerbot ask --json \
                  cardking\n  sellerbot report --limit 5\n  sellerbot config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a sellerbot.toml config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Seller data JSON file")]
    data: Option<PathBuf>,
    #[arg(long, global = true, help = "Enrichment JSON file (empty disables enrichment)")]
    enrichment: Option<PathBuf>,
    #[arg(long, global = true, help = "Log level: trace|debug|info|warn|error")]
    log_level: Option<String>,
    #[arg(long, global = true, help = "Log format: compact|pretty|json")]
    log_format: Option<LogFormat>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Interactive question loop (default)")]
    Chat,
    #[command(about = "Answer a single query and exit")]
    Ask {
        #[arg(required = true, num_args = 1.., help = "Query text")]
        query: Vec<String>,
        #[arg(long, help = "Emit the structured answer as JSON")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Print the onboarding report for approved sellers")]
    Report {
        #[arg(long, help = "Only include the first N sellers")]
        limit: Option<usize>,
    },
}

impl Cli {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                sellers_path: self.data.clone(),
                enrichment_path: self.enrichment.clone(),
                log_level: self.log_level.clone(),
                log_format: self.log_format,
            },
        }
    }

    fn command_name(&self) -> &'static str {
        match self.command {
            None | Some(Command::Chat) => "chat",
            Some(Command::Ask { .. }) => "ask",
            Some(Command::Config) => "config",
            Some(Command::Report { .. }) => "report",
        }
    }
}

/// Installs the global subscriber on stderr. Safe to call more than once.
pub fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::WARN);
    let builder =
        tracing_subscriber::fmt().with_target(false).with_max_level(log_level).with_writer(io::stderr);

    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.load_options();

    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => {
            let error = ApplicationError::from(error);
            let result = commands::CommandResult::from_error(cli.command_name(), &error);
            println!("{}", result.output);
            return ExitCode::from(result.exit_code);
        }
    };
    init_logging(&config);

    let result = match cli.command {
        None | Some(Command::Chat) => {
            commands::chat::run(&config, io::stdin().lock(), io::stdout().lock())
        }
        Some(Command::Ask { query, json }) => commands::ask::run(&config, &query.join(" "), json),
        Some(Command::Config) => commands::config::run(&config, &options),
        Some(Command::Report { limit }) => commands::report::run(&config, limit),
    };

    if !result.output.is_empty() {
        println!("{}", result.output);
    }
    ExitCode::from(result.exit_code)
}
