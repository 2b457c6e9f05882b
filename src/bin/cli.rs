//! Homework bot CLI
//!
//! Local execution entry point. Secrets come from the environment (or a
//! `.env` file); everything else from the TOML config.

use std::io::Write;
use std::path::PathBuf;

use chrono::Local;
use clap::{Parser, Subcommand};
use env_logger::{Builder, Env};
use homework_bot::{
    error::{AppError, Result},
    models::{Config, Credentials, PRACTICUM_TOKEN_VAR},
    pipeline::{self, PollState, Poller},
    services::{HttpTransport, Notifier, PracticumClient, TelegramBot},
    utils::{http, unix_now},
};
use log::LevelFilter;

/// Log target rendered as the CRITICAL level.
const CRITICAL: &str = "critical";

/// homework-bot - Practicum review status notifier
#[derive(Parser, Debug)]
#[command(
    name = "homework-bot",
    version,
    about = "Reports Practicum homework review status changes to Telegram"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll the homework API and notify on status changes
    Run {
        /// Stop after this many cycles (default: run forever)
        #[arg(long)]
        cycles: Option<u64>,
    },

    /// Validate configuration and required environment variables
    Validate,

    /// Fetch current statuses once and print them without notifying
    Status {
        /// Lower bound for the request, Unix seconds (default: now minus lookback)
        #[arg(long)]
        from_date: Option<i64>,
    },
}

/// Filter used when `RUST_LOG` is unset: `level` for this crate, `warn` for
/// dependencies.
fn default_filter(level: &str) -> String {
    format!("warn,{}={}", env!("CARGO_CRATE_NAME"), level)
}

/// Builder reading filters from `env`, with the CRITICAL target always on.
fn logger_builder(env: Env<'_>) -> Builder {
    let mut builder = Builder::from_env(env);
    builder.filter_module(CRITICAL, LevelFilter::Error);
    builder
}

/// Initialize logging as `<timestamp>, <LEVEL>, <message>` lines on stdout.
fn init_logging(verbose: bool, default_level: &str) {
    let level = if verbose { "debug" } else { default_level };
    logger_builder(Env::default().default_filter_or(default_filter(level)))
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            let level = if record.target() == CRITICAL {
                "CRITICAL".to_string()
            } else {
                record.level().to_string()
            };
            writeln!(
                buf,
                "{}, {}, {}",
                Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                level,
                record.args()
            )
        })
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (config, load_error) = match Config::load(&cli.config) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    init_logging(cli.verbose, &config.logging.level);

    if let Some(e) = load_error {
        log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            cli.config.display(),
            e
        );
    }
    if let Err(e) = dotenvy::dotenv() {
        log::debug!("No .env file loaded: {}", e);
    }
    let credentials = Credentials::from_env();

    match cli.command {
        Command::Run { cycles } => {
            if !credentials.check_tokens() {
                let missing = credentials.missing().join(", ");
                log::error!(target: CRITICAL, "Missing required environment variables: {}", missing);
                return Err(AppError::config(format!(
                    "missing required environment variables: {missing}"
                )));
            }
            config.validate()?;

            let client = http::create_async_client(&config.api)?;
            let api = PracticumClient::new(
                HttpTransport::new(client.clone()),
                &config.api.endpoint,
                &credentials.practicum_token,
            );
            let bot = TelegramBot::new(
                client,
                &config.telegram.api_base,
                &credentials.telegram_token,
            )?;
            let notifier = Notifier::new(bot, &credentials.telegram_chat_id);
            let state = PollState::starting_now(config.poll.initial_lookback_secs);

            log::info!(
                "Bot started: polling every {}s from {}, on_error={:?}",
                config.poll.retry_secs,
                state.cursor(),
                config.poll.on_error
            );

            let mut poller = Poller::new(api, notifier, state, &config.poll);
            poller.run(cycles).await?;

            log::info!("Polling finished after the requested number of cycles");
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            let missing = credentials.missing();
            if !missing.is_empty() {
                log::error!("Missing environment variables: {}", missing.join(", "));
                return Err(AppError::validation("required environment variables are missing"));
            }
            log::info!("✓ Credentials present");

            log::info!("All validations passed!");
        }

        Command::Status { from_date } => {
            if credentials.practicum_token.is_empty() {
                return Err(AppError::config(format!("{PRACTICUM_TOKEN_VAR} is not set")));
            }
            config.validate()?;

            let client = http::create_async_client(&config.api)?;
            let api = PracticumClient::new(
                HttpTransport::new(client),
                &config.api.endpoint,
                &credentials.practicum_token,
            );
            let from_date =
                from_date.unwrap_or_else(|| unix_now() - config.poll.initial_lookback_secs);

            let response = api.get_api_answer(from_date).await?;
            let homeworks = pipeline::check_response(&response)?;
            log::info!(
                "{} homework record(s) since {} (current_date: {:?})",
                homeworks.len(),
                from_date,
                pipeline::current_date(&response)
            );
            for homework in &homeworks {
                match pipeline::parse_status(homework) {
                    Ok(message) => log::info!("{}", message),
                    Err(e) => log::warn!("Skipping record {:?}: {}", homework.id, e),
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use log::{Level, Log, Metadata};

    use super::*;

    const UNSET_VAR: &str = "HOMEWORK_BOT_TEST_FILTER_UNSET";

    fn logger(filters: &str) -> env_logger::Logger {
        logger_builder(Env::new().filter_or(UNSET_VAR, filters)).build()
    }

    fn enabled(logger: &env_logger::Logger, target: &str, level: Level) -> bool {
        logger.enabled(&Metadata::builder().target(target).level(level).build())
    }

    #[test]
    fn test_default_filter_quiets_dependencies() {
        let logger = logger(&default_filter("info"));

        assert!(enabled(&logger, "homework_bot::pipeline::poll", Level::Info));
        assert!(!enabled(&logger, "homework_bot::pipeline::poll", Level::Debug));
        assert!(!enabled(&logger, "hyper_util::client::legacy", Level::Info));
        assert!(enabled(&logger, "reqwest::connect", Level::Warn));
    }

    #[test]
    fn test_critical_survives_module_scoped_filter() {
        let logger = logger("homework_bot::pipeline=info");

        assert!(enabled(&logger, CRITICAL, Level::Error));
        assert!(enabled(&logger, "homework_bot::pipeline::poll", Level::Info));
        assert!(!enabled(&logger, "homework_bot::services::telegram", Level::Info));
    }

    #[test]
    fn test_critical_survives_off_filter() {
        let logger = logger("off");

        assert!(enabled(&logger, CRITICAL, Level::Error));
        assert!(!enabled(&logger, "homework_bot", Level::Error));
    }
}
