use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "winsweep",
    about = "Bounded storage cleanup for managed endpoints",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Estimate reclaimable space per category (read-only, no deletion)
    Estimate {
        /// Only estimate a specific category
        #[arg(long)]
        category: Option<String>,
    },

    /// Run the full cleanup pass (requires --confirm to actually delete)
    Clean {
        /// Actually delete files. Without this flag, behaves like a dry run.
        #[arg(long)]
        confirm: bool,

        /// Only clean a specific category
        #[arg(long)]
        category: Option<String>,

        /// Wall-clock budget per category, in seconds
        #[arg(long, default_value_t = 300)]
        budget_secs: u64,

        /// Run component-store cleanup even when a reboot is pending
        #[arg(long)]
        force: bool,

        /// Skip the external tool steps (DISM, CleanMgr)
        #[arg(long)]
        no_external: bool,

        /// Directory for the run log, main log, and archive
        #[arg(long)]
        log_dir: Option<String>,
    },

    /// Sweep a single directory tree (requires --confirm to actually delete)
    Sweep {
        /// Root path to sweep
        #[arg(long)]
        path: String,

        /// Actually delete files. Without this flag, behaves like a dry run.
        #[arg(long)]
        confirm: bool,

        /// Wall-clock budget for the pass, in seconds
        #[arg(long, default_value_t = 300)]
        budget_secs: u64,

        /// Directory for the run log, main log, and archive
        #[arg(long)]
        log_dir: Option<String>,
    },
}
