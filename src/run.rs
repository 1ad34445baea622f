use std::path::Path;

use tracing::error;

use crate::categories::{self, Category};
use crate::classify::Classifier;
use crate::config::SweepConfig;
use crate::disk_info;
use crate::external;
use crate::output;
use crate::probe;
use crate::runlog::{Level, RunLog};
use crate::sweep::{StopReason, SweepController};
use crate::utils;

/// Full remediation pass: every selected category swept in sequence, then
/// the external tools, then log consolidation. Exit code 0 unless the run
/// log could not be established; per-category and per-tool failures only
/// shape log content.
pub fn run_clean(
    config: &SweepConfig,
    selected: Vec<Box<dyn Category>>,
    force: bool,
    no_external: bool,
) -> i32 {
    let mut log = match RunLog::open(config) {
        Ok(log) => log,
        Err(e) => {
            error!("cannot establish run log: {e}");
            return 1;
        }
    };

    log.log(
        Level::Info,
        &format!(
            "winsweep run starting ({} mode, {} categor{})",
            if config.dry_run { "dry-run" } else { "delete" },
            selected.len(),
            if selected.len() == 1 { "y" } else { "ies" }
        ),
    );

    let disk_before = disk_info::get_disk_info();
    if let Some(d) = &disk_before {
        log.log(
            Level::Info,
            &format!(
                "disk before: {} free of {}",
                utils::format_size(d.available),
                utils::format_size(d.total)
            ),
        );
    }

    let classifier = Classifier::new(config);
    let controller = SweepController::new(&classifier, config);
    let mut total_freed = 0u64;

    for category in &selected {
        let roots = category.roots();
        let before = probe::total_bytes(&probe::probe(&roots, true, &classifier));

        let mut deleted = 0u64;
        let mut skipped = 0u64;
        let mut pruned = 0u64;
        for root in &roots {
            let result = controller.sweep(root, config.sweep_budget, config.dry_run, &mut log);
            deleted += result.deleted;
            skipped += result.skipped;
            pruned += result.pruned;
            if result.stop_reason == StopReason::TimeBudgetExceeded {
                log.log(
                    Level::Warn,
                    &format!("{}: stopped on time budget", category.label()),
                );
            }
        }

        let after = probe::total_bytes(&probe::probe(&roots, true, &classifier));
        let freed = before.saturating_sub(after);
        total_freed += freed;

        log.log(
            Level::Info,
            &format!(
                "{}: deleted {deleted}, skipped {skipped} ({pruned} branch(es) pruned), freed {}",
                category.label(),
                utils::format_size(freed)
            ),
        );
        output::print_category_result(
            category.label(),
            deleted,
            skipped,
            &utils::format_size(freed),
        );
    }

    if no_external || config.dry_run {
        log.log(Level::Info, "external tool steps skipped");
    } else {
        let dism_ok = external::component_store_cleanup(force, &mut log)
            .map(|outcome| outcome.succeeded());
        let cleanmgr_ok = external::run_cleanmgr(&mut log).succeeded();
        if dism_ok == Some(false) || !cleanmgr_ok {
            log.log(
                Level::Warn,
                "one or more external tools reported errors; run continues",
            );
        }
    }

    if let (Some(before), Some(after)) = (disk_before, disk_info::get_disk_info()) {
        log.log(
            Level::Info,
            &format!(
                "disk after: {} free of {}, {:.0}% used (was {} free)",
                utils::format_size(after.available),
                utils::format_size(after.total),
                after.usage_percent() * 100.0,
                utils::format_size(before.available)
            ),
        );
        output::print_disk_line(
            "Free space now",
            &utils::format_size(after.available),
            &utils::format_size(after.total),
        );
    }

    output::print_separator();
    output::print_grand_total(&utils::format_size(total_freed));
    if config.dry_run {
        output::print_dry_run_footer();
    }

    log.log(Level::Info, "winsweep run complete");
    log.finish();
    0
}

/// One bounded pass over a single explicit root.
pub fn run_single_sweep(config: &SweepConfig, root: &Path) -> i32 {
    let mut log = match RunLog::open(config) {
        Ok(log) => log,
        Err(e) => {
            error!("cannot establish run log: {e}");
            return 1;
        }
    };

    let classifier = Classifier::new(config);
    let controller = SweepController::new(&classifier, config);
    let result = controller.sweep(root, config.sweep_budget, config.dry_run, &mut log);

    output::print_category_result(
        &utils::display_path(root),
        result.deleted,
        result.skipped,
        &utils::format_size(result.bytes_freed),
    );
    if config.dry_run {
        output::print_dry_run_footer();
    }

    log.finish();
    0
}

/// Estimate-only mode: probe the category roots and report, no sweeping.
pub fn run_estimate(config: &SweepConfig, selected: Vec<Box<dyn Category>>) -> i32 {
    let classifier = Classifier::new(config);

    output::print_estimate_header();
    let mut total = 0u64;
    for category in &selected {
        let snapshots = probe::probe(&category.roots(), true, &classifier);
        let bytes = probe::total_bytes(&snapshots);
        total += bytes;
        output::print_estimate_row(category.label(), &utils::format_size(bytes));
    }
    output::print_separator();
    output::print_grand_total(&utils::format_size(total));
    output::print_estimate_note();
    0
}

/// Resolve --category, falling back to the full registry.
pub fn select_categories(name: Option<&str>) -> Option<Vec<Box<dyn Category>>> {
    match name {
        Some(n) => categories::by_name(n).map(|c| vec![c]),
        None => Some(categories::all()),
    }
}
