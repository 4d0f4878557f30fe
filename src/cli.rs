use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "podji",
    version,
    about = "A keyboard-driven terminal navigator for cluster resources."
)]
pub struct CliArgs {
    /// Start in a specific namespace
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Start with all namespaces selected
    #[arg(short = 'A', long)]
    pub all_namespaces: bool,

    /// Start in a specific context
    #[arg(long)]
    pub context: Option<String>,

    /// Start on a resource kind, by name or alias (po, deploy, svc, ...)
    #[arg(short, long)]
    pub kind: Option<String>,

    /// Config file; defaults to podji.yaml, podji.yml or .podji.yaml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// tracing filter (for example: info,debug,trace)
    #[arg(long, default_value = "info")]
    pub log_filter: String,

    /// Write logs to this file instead of discarding them
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
