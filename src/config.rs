use std::path::PathBuf;
use std::time::Duration;

/// Skip patterns applied to every path seen during a walk. Authored as
/// case-insensitive regexes; a pattern that fails to compile degrades to a
/// substring token (see `classify::SkipPattern`). `[\\/]` keeps them valid
/// on both separator styles.
const DEFAULT_SKIP_PATTERNS: &[&str] = &[
    // Sync-engine roots, anchored to the profile level so OneDrive's own
    // log/cache dirs under AppData stay sweepable.
    r"Users[\\/][^\\/]+[\\/]OneDrive",
    r"Users[\\/][^\\/]+[\\/]Dropbox",
    r"Windows[\\/](System32|SysWOW64)",
    "Program Files",
    r"\.evtx$",
    r"\.(edb|jfm|chk)$",
    r"System Volume Information",
];

/// Temp log rotation: archive a leftover temp log bigger than this.
const DEFAULT_TEMP_LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Temp log rotation: archive a leftover temp log older than this.
const DEFAULT_TEMP_LOG_MAX_AGE_DAYS: u64 = 14;

/// Everything one run needs, built once in `main` and passed by reference.
/// Nothing in the engine reads configuration from globals.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Per-run temp log, merged into `main_log` at the end of the run.
    pub temp_log: PathBuf,
    /// Durable main log at its canonical path.
    pub main_log: PathBuf,
    /// Archive directory for rotated and unmerged logs.
    pub archive_dir: PathBuf,
    /// Raw skip patterns, compiled by the classifier at startup.
    pub skip_patterns: Vec<String>,
    /// Total delete attempts per entry.
    pub max_retries: u32,
    /// Wait between delete attempts.
    pub retry_delay: Duration,
    /// Wall-clock budget for one sweep pass.
    pub sweep_budget: Duration,
    pub temp_log_max_bytes: u64,
    pub temp_log_max_age_days: u64,
    /// Report intents without deleting.
    pub dry_run: bool,
    /// Shrink retries/backoff to keep automated runs fast.
    pub fast_io: bool,
}

impl SweepConfig {
    /// Build a config with all engine-owned paths derived from `log_dir`.
    pub fn new(log_dir: PathBuf) -> Self {
        SweepConfig {
            temp_log: log_dir.join("winsweep-run.log"),
            main_log: log_dir.join("winsweep.log"),
            archive_dir: log_dir.join("archive"),
            skip_patterns: DEFAULT_SKIP_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_retries: 3,
            retry_delay: Duration::from_secs(2),
            sweep_budget: Duration::from_secs(300),
            temp_log_max_bytes: DEFAULT_TEMP_LOG_MAX_BYTES,
            temp_log_max_age_days: DEFAULT_TEMP_LOG_MAX_AGE_DAYS,
            dry_run: true,
            fast_io: fast_io_from_env(),
        }
    }

    /// Default log location: the OS data dir when resolvable, else the
    /// system temp dir. Both are stable across runs on the same machine.
    pub fn default_log_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("winsweep")
    }

    /// Paths the engine owns and must never delete, whatever the rules say.
    pub fn protected_paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![
            self.temp_log.clone(),
            self.main_log.clone(),
            self.archive_dir.clone(),
        ];
        if let Some(dir) = self.main_log.parent() {
            paths.push(dir.to_path_buf());
        }
        paths
    }

    /// Delete attempts after the fast-I/O switch is applied.
    pub fn effective_retries(&self) -> u32 {
        if self.fast_io {
            1
        } else {
            self.max_retries
        }
    }

    /// Backoff between attempts after the fast-I/O switch is applied.
    pub fn effective_delay(&self) -> Duration {
        if self.fast_io {
            Duration::ZERO
        } else {
            self.retry_delay
        }
    }
}

/// The host sets WINSWEEP_FAST_IO=1 to keep automated runs from sitting in
/// real backoff sleeps.
pub fn fast_io_from_env() -> bool {
    std::env::var("WINSWEEP_FAST_IO")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_paths_cover_logs_and_archive() {
        let config = SweepConfig::new(PathBuf::from("/var/log/winsweep"));
        let protected = config.protected_paths();
        assert!(protected.contains(&config.temp_log));
        assert!(protected.contains(&config.main_log));
        assert!(protected.contains(&config.archive_dir));
        assert!(protected.contains(&PathBuf::from("/var/log/winsweep")));
    }

    #[test]
    fn fast_io_shrinks_retries_and_delay() {
        let mut config = SweepConfig::new(PathBuf::from("/tmp/ws"));
        config.max_retries = 5;
        config.retry_delay = Duration::from_secs(3);
        config.fast_io = false;
        assert_eq!(config.effective_retries(), 5);
        assert_eq!(config.effective_delay(), Duration::from_secs(3));

        config.fast_io = true;
        assert_eq!(config.effective_retries(), 1);
        assert_eq!(config.effective_delay(), Duration::ZERO);
    }
}
