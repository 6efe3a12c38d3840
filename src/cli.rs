use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "kokkai-minutes",
    version,
    about = "Topic and bill-action extraction for Diet meeting minutes"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Topics(TopicsArgs),
    Actions(ActionsArgs),
    Numeral(NumeralArgs),
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct TopicsArgs {
    /// Meeting batch JSON as returned by the minutes API.
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub no_clean: bool,

    #[arg(long, default_value_t = false)]
    pub no_split: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ActionsArgs {
    #[arg(long, default_value = ".cache/kokkai")]
    pub cache_root: PathBuf,

    /// Meeting batch JSON as returned by the minutes API.
    #[arg(long)]
    pub input: PathBuf,

    /// Bill snapshot: `[{"id", "name"}]` or `{"<id>": "<name>"}`.
    #[arg(long)]
    pub bills: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Scan every speech instead of moderator speeches only.
    #[arg(long, default_value_t = false)]
    pub all_speakers: bool,
}

#[derive(Args, Debug, Clone)]
pub struct NumeralArgs {
    #[arg(long)]
    pub text: String,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".cache/kokkai")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub db_path: Option<PathBuf>,
}

pub fn default_db_path(cache_root: &std::path::Path) -> PathBuf {
    cache_root.join("kokkai_facts.sqlite")
}
