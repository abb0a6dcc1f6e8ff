use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors (default)
    Warn,
    /// Informational messages
    Info,
    /// Debug messages (default for verbose)
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Parser)]
#[command(name = "lch")]
#[command(about = "lch - decorate wikilinks with attributes from the notes they point to")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/linkcharge/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Vault directory
    #[arg(short = 'd', long, global = true, default_value = ".")]
    pub vault: PathBuf,
}

impl Cli {
    /// Effective log level: explicit level, else debug when verbose, else warn.
    pub fn level(&self) -> LevelFilter {
        match (self.log_level, self.verbose) {
            (Some(level), _) => level.into(),
            (None, true) => LevelFilter::DEBUG,
            (None, false) => LevelFilter::WARN,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a link and print the attributes it would receive
    Resolve {
        /// Link text as written, e.g. `Note#Heading|Alias`
        link: String,

        /// Vault path of the note containing the link
        #[arg(short = 'f', long, default_value = "")]
        from: String,
    },

    /// Print the live-view decorations of a note
    Decorate {
        /// Vault path of the note, e.g. `folder/Note.md`
        note: String,

        /// First visible byte (defaults to the start of the note)
        #[arg(long)]
        start: Option<usize>,

        /// End of the visible range (defaults to the end of the note)
        #[arg(long)]
        end: Option<usize>,
    },

    /// Validate configuration and report diagnostics
    Check {
        /// Exit with an error if any diagnostic is reported
        #[arg(long)]
        strict: bool,
    },

    /// Keep a panel of every note decorated while the vault changes
    Watch {
        /// Panel type to mirror
        #[arg(short = 'p', long, default_value = "file-explorer")]
        panel: String,

        /// Filesystem debounce in milliseconds
        #[arg(long, default_value = "200")]
        debounce_ms: u64,
    },
}
