use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "dockhand",
    version,
    about = "A keyboard-driven terminal dashboard for local Docker containers."
)]
pub struct CliArgs {
    /// Docker engine endpoint (unix:///path, /path/to.sock or tcp://host:port)
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Path to a YAML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// tracing filter (for example: info,debug,trace)
    #[arg(long, default_value = "info")]
    pub log_filter: String,

    /// Append logs to this file instead of discarding them
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
