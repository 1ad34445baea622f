mod categories;
mod classify;
mod cli;
mod config;
mod disk_info;
mod error;
mod external;
mod output;
mod probe;
mod remover;
mod run;
mod runlog;
mod sweep;
mod utils;
mod walker;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::config::SweepConfig;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    output::print_banner();

    let code = match cli.command {
        Command::Estimate { category } => {
            let config = SweepConfig::new(SweepConfig::default_log_dir());
            match run::select_categories(category.as_deref()) {
                Some(selected) => run::run_estimate(&config, selected),
                None => unknown_category(category.as_deref()),
            }
        }

        Command::Clean {
            confirm,
            category,
            budget_secs,
            force,
            no_external,
            log_dir,
        } => {
            if !confirm {
                output::print_no_confirm_warning();
            }
            let mut config = SweepConfig::new(resolve_log_dir(log_dir));
            config.dry_run = !confirm;
            config.sweep_budget = Duration::from_secs(budget_secs);
            match run::select_categories(category.as_deref()) {
                Some(selected) => run::run_clean(&config, selected, force, no_external),
                None => unknown_category(category.as_deref()),
            }
        }

        Command::Sweep {
            path,
            confirm,
            budget_secs,
            log_dir,
        } => {
            if !confirm {
                output::print_no_confirm_warning();
            }
            let mut config = SweepConfig::new(resolve_log_dir(log_dir));
            config.dry_run = !confirm;
            config.sweep_budget = Duration::from_secs(budget_secs);
            run::run_single_sweep(&config, &PathBuf::from(path))
        }
    };

    ExitCode::from(code as u8)
}

fn resolve_log_dir(flag: Option<String>) -> PathBuf {
    flag.map(PathBuf::from)
        .unwrap_or_else(SweepConfig::default_log_dir)
}

fn unknown_category(name: Option<&str>) -> i32 {
    output::print_warning(&format!(
        "unknown category '{}'; available: {}",
        name.unwrap_or(""),
        categories::all()
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join(", ")
    ));
    2
}
