//! dirwatcher - poll a directory and report lines containing a magic string.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use chrono::Utc;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, EnvFilter};

use dirwatcher::config::{ConfigError, ConfigLoader, WatchConfig, WatchOptions};
use dirwatcher::display;
use dirwatcher::shutdown;
use dirwatcher::watcher::{run_until_cancelled, JsonSink, WatchEngine};

#[derive(Parser, Debug)]
#[command(
    name = "dirwatcher",
    about = "Watch a directory for text files containing magic text",
    version
)]
struct Cli {
    /// Directory path to watch.
    path: PathBuf,

    /// String to watch for.
    magic: String,

    /// Text file extension to watch [default: .txt]
    #[arg(short, long)]
    ext: Option<String>,

    /// Number of seconds between polling [default: 1.0]
    #[arg(short, long, allow_negative_numbers = true)]
    interval: Option<f64>,

    /// Config file to read instead of the default search paths.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rescan a file from line 1 when it shrinks below its resume offset.
    #[arg(long)]
    reset_on_truncate: bool,

    /// Print events as JSON lines on stdout (logs move to stderr).
    #[arg(long)]
    json: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Layer command line flags over options from the config file.
    fn apply(&self, mut options: WatchOptions) -> WatchOptions {
        if let Some(ext) = &self.ext {
            options.extension.clone_from(ext);
        }
        if let Some(interval) = self.interval {
            options.interval = interval;
        }
        if self.reset_on_truncate {
            options.reset_on_truncate = true;
        }
        options
    }

    fn load_config(&self) -> Result<WatchConfig, ConfigError> {
        let options = match &self.config {
            Some(path) => ConfigLoader::load_file(path)?,
            None => ConfigLoader::new().load()?,
        };
        WatchConfig::new(&self.path, self.magic.clone(), self.apply(options))
    }
}

fn init_tracing(verbosity: u8, json: bool) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let writer = if json {
        BoxMakeWriter::new(std::io::stderr)
    } else {
        BoxMakeWriter::new(std::io::stdout)
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json);

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            display::print_error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    let signals = match shutdown::install(cancel.clone()) {
        Ok(handle) => handle,
        Err(e) => {
            display::print_error(&format!("Failed to install signal handlers: {e}"));
            return ExitCode::FAILURE;
        }
    };

    let started = Instant::now();
    display::print_start_banner(&config, Utc::now());
    tracing::info!(
        directory = %config.directory().display(),
        extension = %config.extension(),
        interval_secs = config.interval().as_secs_f64(),
        marker = %config.marker(),
        "Starting dirwatcher"
    );

    let summary = if cli.json {
        let mut engine = WatchEngine::new(config, JsonSink::new(std::io::stdout()));
        run_until_cancelled(&mut engine, &cancel).await
    } else {
        let mut engine = WatchEngine::with_tracing(config);
        run_until_cancelled(&mut engine, &cancel).await
    };

    signals.abort();
    display::print_stop_banner(started.elapsed(), &summary);
    ExitCode::SUCCESS
}
