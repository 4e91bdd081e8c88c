use clap::{Parser, ValueEnum};
use std::time::Duration;
use tracing::metadata::LevelFilter;
use tracing::Level;

use crate::synth::{DEFAULT_BASE_URL, DEFAULT_MODEL};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
        .into()
    }
}

/// Every option also reads from the environment, so a bare invocation works
#[derive(Parser, Debug)]
#[command(name = "retail-datagen")]
#[command(version, about = "Continuously insert synthetic retail traffic into a database")]
pub struct Cli {
    /// Database connection string (SQLite path, attached as the `retail` schema)
    #[arg(long, env = "PG_DSN", hide_env_values = true)]
    pub dsn: Option<String>,

    /// Key for the review text service; canned reviews without it
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Base URL of the review text service
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub openai_base_url: String,

    /// Model used for review text
    #[arg(long, env = "DATAGEN_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Pause between iterations, in milliseconds
    #[arg(long = "interval", env = "DATAGEN_INTERVAL_MS", default_value_t = 1000)]
    pub interval_ms: u64,

    /// Stop after this many iterations
    #[arg(long, env = "DATAGEN_MAX_ITERATIONS")]
    pub max_iterations: Option<u64>,

    /// Seed the random stream for a reproducible run
    #[arg(long, env = "DATAGEN_SEED")]
    pub seed: Option<u64>,

    /// Create the retail tables if they are missing
    #[arg(long, env = "DATAGEN_BOOTSTRAP_SCHEMA")]
    pub bootstrap_schema: bool,

    #[arg(long, value_enum, env = "DATAGEN_LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Connection string, treating an empty value as unset
    pub fn dsn(&self) -> Option<&str> {
        self.dsn.as_deref().map(str::trim).filter(|dsn| !dsn.is_empty())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
