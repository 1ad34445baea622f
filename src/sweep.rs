use std::path::Path;
use std::time::{Duration, Instant, SystemTime};

use crate::classify::Classifier;
use crate::config::SweepConfig;
use crate::remover::{Disposition, Remover};
use crate::runlog::{Level, RunLog};
use crate::utils;
use crate::walker::Walk;

/// Why a sweep stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Completed,
    TimeBudgetExceeded,
}

/// Aggregate counters for one sweep pass over one root.
#[derive(Debug)]
pub struct SweepResult {
    pub deleted: u64,
    pub skipped: u64,
    pub pruned: u64,
    pub bytes_freed: u64,
    #[allow(dead_code)]
    pub started_at: SystemTime,
    pub stop_reason: StopReason,
}

/// Drives one bounded cleanup pass: walk, re-check protection, delete.
///
/// The wall-clock budget is soft: it is checked before each candidate, an
/// in-flight deletion is allowed to finish, and no new one starts after
/// exhaustion. Per-item failures are counted, never raised.
pub struct SweepController<'a> {
    classifier: &'a Classifier,
    remover: Remover<'a>,
}

impl<'a> SweepController<'a> {
    pub fn new(classifier: &'a Classifier, config: &SweepConfig) -> SweepController<'a> {
        SweepController {
            classifier,
            remover: Remover::new(classifier, config),
        }
    }

    pub fn sweep(
        &self,
        root: &Path,
        budget: Duration,
        dry_run: bool,
        log: &mut RunLog,
    ) -> SweepResult {
        let started = Instant::now();
        let started_at = SystemTime::now();
        let mut deleted = 0u64;
        let mut skipped = 0u64;
        let mut bytes_freed = 0u64;
        let mut stop_reason = StopReason::Completed;

        if !root.exists() {
            log.log(
                Level::Info,
                &format!("{}: not present, nothing to sweep", root.display()),
            );
            return SweepResult {
                deleted,
                skipped,
                pruned: 0,
                bytes_freed,
                started_at,
                stop_reason,
            };
        }

        let mut walk = Walk::new(self.classifier, root, true);
        loop {
            if started.elapsed() > budget {
                stop_reason = StopReason::TimeBudgetExceeded;
                log.log(
                    Level::Warn,
                    &format!(
                        "{}: time budget of {}s exhausted, stopping sweep",
                        root.display(),
                        budget.as_secs()
                    ),
                );
                break;
            }
            let entry = match walk.next() {
                Some(e) => e,
                None => break,
            };

            // Second safety gate: the walker already prunes protected
            // branches, but "never touch the log" must hold even if it has
            // a gap.
            if self.classifier.is_protected(&entry.path) {
                skipped += 1;
                continue;
            }

            if dry_run {
                log.log(
                    Level::Info,
                    &format!(
                        "dry-run: would remove {} ({})",
                        entry.path.display(),
                        utils::format_size(entry.size_bytes)
                    ),
                );
                deleted += 1;
                bytes_freed += entry.size_bytes;
                continue;
            }

            let outcome = self.remover.remove(&entry.path);
            if outcome.disposition == Disposition::Removed {
                deleted += 1;
                bytes_freed += entry.size_bytes;
            } else {
                skipped += 1;
                if !outcome.ok() {
                    if let Some(err) = &outcome.error {
                        log.log(
                            Level::Error,
                            &format!(
                                "{err} (gave up after {:.1}s)",
                                outcome.elapsed.as_secs_f32()
                            ),
                        );
                    }
                }
            }
        }

        // Enumeration failures already continued the walk; the durable log
        // still gets a line per abandoned node.
        for err in walk.errors() {
            log.log(Level::Warn, &err.to_string());
        }

        // A pruned branch was deliberately left alone; it reports as
        // skipped work alongside per-item refusals.
        let pruned = walk.pruned().len() as u64;
        skipped += pruned;
        log.log(
            Level::Info,
            &format!(
                "{}: deleted {deleted}, skipped {skipped}, pruned {pruned} branch(es), freed {}{}",
                root.display(),
                utils::format_size(bytes_freed),
                if dry_run { " (dry run)" } else { "" }
            ),
        );

        SweepResult {
            deleted,
            skipped,
            pruned,
            bytes_freed,
            started_at,
            stop_reason,
        }
    }
}
