// CLI module - small driver for exercising the logger from a shell

use crate::bridge::FacadeLayer;
use crate::config::LogConfig;
use crate::global;
use crate::logs::{field, Field, FieldValue, Level, Logger};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// teelog - leveled logging to rotating files and the console
#[derive(Parser)]
#[command(name = "teelog")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (.toml or .json); built-in defaults when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the log directory from the configuration
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit a single record
    Emit {
        /// Severity (debug, info, warn, error, dpanic)
        #[arg(short, long, default_value = "info")]
        level: String,

        /// Record message
        #[arg(short, long)]
        message: String,

        /// Structured fields (KEY=VALUE format)
        #[arg(short, long)]
        field: Vec<String>,
    },

    /// Emit one record per level, then one through `tracing`
    Demo,

    /// Emit a fatal record and exit with status 1
    Fatal {
        #[arg(short, long)]
        message: String,

        /// Structured fields (KEY=VALUE format)
        #[arg(short, long)]
        field: Vec<String>,
    },
}

impl Cli {
    /// Run the CLI application
    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        cli.execute()
    }

    fn load_config(&self) -> Result<LogConfig> {
        let mut config = match &self.config {
            Some(path) => LogConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => LogConfig::default(),
        };
        if let Some(dir) = &self.log_dir {
            config.log_dir = dir.clone();
        }
        Ok(config)
    }

    fn execute(self) -> Result<()> {
        let config = self.load_config()?;
        // Startup failure ends the run before any command executes
        let logger = Logger::from_config(&config).context("failed to initialize logger")?;
        global::install(logger.clone())?;

        tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
            .with(FacadeLayer::new(logger.clone()))
            .try_init()?;

        match self.command {
            Commands::Emit {
                level,
                message,
                field,
            } => {
                let level: Level = level.parse()?;
                let fields = parse_fields(&field)?;
                emit(&logger, level, &message, &fields)?;
            }
            Commands::Demo => run_demo(&logger)?,
            Commands::Fatal { message, field } => {
                let fields = parse_fields(&field)?;
                logger.fatal(&message, &fields);
            }
        }

        logger.sync();
        Ok(())
    }
}

fn emit(logger: &Logger, level: Level, message: &str, fields: &[Field]) -> Result<()> {
    match level {
        Level::Panic | Level::Fatal => {
            bail!("use the `fatal` command, or `demo` for panic-level records")
        }
        Level::DPanic => {
            if let Some(signal) = logger.dpanic(message, fields) {
                return Err(signal.into());
            }
        }
        _ => logger.log(level, message, fields),
    }
    Ok(())
}

fn run_demo(logger: &Logger) -> Result<()> {
    let started = Instant::now();
    let request = logger.with(&[field("component", "demo")]);

    request.debug("cache warmed", &[field("entries", 128)]);
    request.info("server started", &[field("port", 8080)]);
    request.warn("slow response", &[field("latency", Duration::from_millis(1250))]);
    request.error("db connect failed", &[field("attempt", 3)]);
    if let Some(signal) = request.dpanic("unexpected state", &[field("state", "draining")]) {
        return Err(signal.into());
    }

    let signal = request.panic("worker crashed", &[field("worker", 2)]);
    global::info("recovered from panic signal", &[field("signal", signal.to_string())]);

    tracing::info!(elapsed_ms = started.elapsed().as_millis() as u64, "demo finished");
    Ok(())
}

/// Parse `KEY=VALUE` pairs; values become integers, floats or booleans
/// when they parse as such, strings otherwise
pub fn parse_fields(raw: &[String]) -> Result<Vec<Field>> {
    raw.iter()
        .map(|pair| {
            let (key, value) = pair
                .split_once('=')
                .with_context(|| format!("field `{}` is not KEY=VALUE", pair))?;
            if key.is_empty() {
                bail!("field `{}` has an empty key", pair);
            }
            Ok(Field::new(key, parse_value(value)))
        })
        .collect()
}

fn parse_value(value: &str) -> FieldValue {
    if let Ok(i) = value.parse::<i64>() {
        FieldValue::Int(i)
    } else if let Ok(f) = value.parse::<f64>() {
        FieldValue::Float(f)
    } else if let Ok(b) = value.parse::<bool>() {
        FieldValue::Bool(b)
    } else {
        FieldValue::Str(value.to_string())
    }
}
