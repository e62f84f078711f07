use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use paynotify::application::validator::NotificationValidator;
use paynotify::config::{ResolvedSettings, Settings};
use paynotify::domain::checksum;
use paynotify::domain::notification::{Notification, RawParams};
use paynotify::domain::ports::NotificationLoggerBox;
use paynotify::infrastructure::logging::{ChannelLogger, FileLogSink, FilteredLogger, TracingLogger};
use paynotify::interfaces::csv::callback_reader::CallbackReader;
use paynotify::interfaces::csv::verdict_writer::VerdictWriter;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Merchant id, overrides the settings file
    #[arg(long, env = "PAYNOTIFY_MERCHANT_ID", global = true)]
    merchant_id: Option<u64>,

    /// Shared secret, overrides the settings file
    #[arg(long, env = "PAYNOTIFY_SECRET_CODE", hide_env_values = true, global = true)]
    secret_code: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate captured callbacks from a CSV file and print one verdict per row
    Replay {
        /// Input CSV with columns mode,method,query,current_status
        input: PathBuf,
    },
    /// Print the digest the gateway is expected to send for a query string
    Sign {
        /// URL-encoded callback parameters
        query: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path).into_diagnostic()?,
        None => Settings::default(),
    }
    .with_overrides(cli.merchant_id, cli.secret_code);
    let settings = ResolvedSettings::try_from(settings).into_diagnostic()?;

    match cli.command {
        Command::Sign { query } => {
            let params = RawParams::from_query(&query);
            let notification = Notification::from_params(&params, settings.credentials.merchant_id);
            println!(
                "{}",
                checksum::compute(&notification, &settings.credentials.secret_code)
            );
        }
        Command::Replay { input } => replay(&settings, input).await?,
    }

    Ok(())
}

async fn replay(settings: &ResolvedSettings, input: PathBuf) -> Result<()> {
    let filter = settings.logging.filter;

    // Records go to the file through a background drain, or straight to tracing.
    let (logger, drain_task) = match &settings.logging.file {
        Some(path) => {
            let sink = FileLogSink::open(path).await.into_diagnostic()?;
            let (logger, drain) = ChannelLogger::new(settings.logging.channel_capacity);
            let logger: NotificationLoggerBox = Box::new(FilteredLogger::new(logger, filter));
            (logger, Some(tokio::spawn(drain.run(sink))))
        }
        None => {
            let logger: NotificationLoggerBox =
                Box::new(FilteredLogger::new(TracingLogger, filter));
            (logger, None)
        }
    };
    let validator = NotificationValidator::from_provider(settings, logger);

    let file = File::open(input).into_diagnostic()?;
    let reader = CallbackReader::new(file);
    let stdout = io::stdout();
    let mut writer = VerdictWriter::new(stdout.lock());

    for callback in reader.callbacks() {
        match callback {
            Ok(callback) => {
                let verdict = callback.replay(&validator);
                writer.write_verdict(&verdict).into_diagnostic()?;
            }
            Err(e) => {
                eprintln!("Error reading callback: {}", e);
            }
        }
    }
    writer.finish().into_diagnostic()?;

    // Closes the channel so the drain can finish.
    drop(validator);
    if let Some(task) = drain_task {
        let written = task.await.into_diagnostic()?;
        tracing::debug!(written, "notification log drained");
    }

    Ok(())
}
