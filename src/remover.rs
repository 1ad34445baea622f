use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::classify::Classifier;
use crate::config::SweepConfig;
use crate::error::SweepError;

/// What happened to one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The entry was deleted.
    Removed,
    /// The entry was refused by a pre-flight guard; nothing was touched.
    Skipped,
    /// Every attempt failed.
    Failed,
}

/// Per-entry result of the remover. Aggregated into sweep counters.
#[derive(Debug)]
pub struct RemovalOutcome {
    pub disposition: Disposition,
    pub attempts: u32,
    pub elapsed: Duration,
    pub error: Option<SweepError>,
}

impl RemovalOutcome {
    /// True unless retries were exhausted. A safe refusal counts as ok.
    pub fn ok(&self) -> bool {
        self.disposition != Disposition::Failed
    }
}

/// Deletes a single filesystem entry with bounded retries. All safety
/// checks run before the first destructive call: a path that does not
/// normalize, a filesystem root, or anything the classifier refuses is
/// skipped without being touched.
pub struct Remover<'a> {
    classifier: &'a Classifier,
    max_retries: u32,
    retry_delay: Duration,
}

impl<'a> Remover<'a> {
    pub fn new(classifier: &'a Classifier, config: &SweepConfig) -> Remover<'a> {
        Remover {
            classifier,
            max_retries: config.effective_retries().max(1),
            retry_delay: config.effective_delay(),
        }
    }

    pub fn remove(&self, path: &Path) -> RemovalOutcome {
        let started = Instant::now();

        let norm = match crate::utils::absolutize(path) {
            Some(p) => p,
            None => {
                debug!("refusing {}: path does not normalize", path.display());
                return skipped(started);
            }
        };
        if norm.parent().is_none() {
            warn!("refusing {}: filesystem root", norm.display());
            return skipped(started);
        }
        if self.classifier.is_skip(&norm) {
            debug!("refusing {}: matches skip pattern", norm.display());
            return skipped(started);
        }
        if self.classifier.is_protected(&norm) {
            debug!("refusing {}: protected", norm.display());
            return skipped(started);
        }

        let (attempts, last_error) =
            retry_loop(&norm, self.max_retries, self.retry_delay, delete_entry);
        match last_error {
            None => RemovalOutcome {
                disposition: Disposition::Removed,
                attempts,
                elapsed: started.elapsed(),
                error: None,
            },
            Some(e) => {
                let err = SweepError::Deletion {
                    path: norm,
                    attempts,
                    source: e,
                };
                warn!("{err}");
                RemovalOutcome {
                    disposition: Disposition::Failed,
                    attempts,
                    elapsed: started.elapsed(),
                    error: Some(err),
                }
            }
        }
    }
}

fn skipped(started: Instant) -> RemovalOutcome {
    RemovalOutcome {
        disposition: Disposition::Skipped,
        attempts: 0,
        elapsed: started.elapsed(),
        error: None,
    }
}

/// Run `op` against `path` up to `max_retries` times, sleeping `delay`
/// between attempts. Returns the attempt count and the terminal error
/// (None on success).
fn retry_loop(
    path: &Path,
    max_retries: u32,
    delay: Duration,
    mut op: impl FnMut(&Path) -> io::Result<()>,
) -> (u32, Option<io::Error>) {
    let mut last_error = None;
    for attempt in 1..=max_retries {
        match op(path) {
            Ok(()) => return (attempt, None),
            Err(e) => {
                last_error = Some(e);
                if attempt < max_retries && !delay.is_zero() {
                    std::thread::sleep(delay);
                }
            }
        }
    }
    (max_retries, last_error)
}

/// Forced recursive delete of a file or directory tree.
fn delete_entry(path: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SweepConfig;
    use std::fs;
    use tempfile::tempdir;

    fn fixture(log_dir: &Path) -> (SweepConfig, Classifier) {
        let mut config = SweepConfig::new(log_dir.to_path_buf());
        config.fast_io = true;
        config.skip_patterns.push("OneDrive".to_string());
        let classifier = Classifier::new(&config);
        (config, classifier)
    }

    #[test]
    fn removes_a_plain_file() {
        let dir = tempdir().unwrap();
        let (config, classifier) = fixture(&dir.path().join("logs"));
        let remover = Remover::new(&classifier, &config);

        let file = dir.path().join("junk.tmp");
        fs::write(&file, "x").unwrap();
        let outcome = remover.remove(&file);

        assert_eq!(outcome.disposition, Disposition::Removed);
        assert_eq!(outcome.attempts, 1);
        assert!(!file.exists());
    }

    #[test]
    fn removes_a_directory_tree() {
        let dir = tempdir().unwrap();
        let (config, classifier) = fixture(&dir.path().join("logs"));
        let remover = Remover::new(&classifier, &config);

        let tree = dir.path().join("cache");
        fs::create_dir_all(tree.join("deep")).unwrap();
        fs::write(tree.join("deep").join("f.bin"), "x").unwrap();

        assert_eq!(remover.remove(&tree).disposition, Disposition::Removed);
        assert!(!tree.exists());
    }

    #[test]
    fn declines_to_delete_its_own_log() {
        let dir = tempdir().unwrap();
        let log_dir = dir.path().join("logs");
        fs::create_dir_all(&log_dir).unwrap();
        let (config, classifier) = fixture(&log_dir);
        fs::write(&config.temp_log, "log content").unwrap();
        let remover = Remover::new(&classifier, &config);

        // Directly instructed to delete the temp log; must refuse.
        let outcome = remover.remove(&config.temp_log);
        assert_eq!(outcome.disposition, Disposition::Skipped);
        assert!(config.temp_log.exists());
    }

    #[test]
    fn declines_filesystem_root() {
        let dir = tempdir().unwrap();
        let (config, classifier) = fixture(&dir.path().join("logs"));
        let remover = Remover::new(&classifier, &config);

        let root = Path::new("/");
        assert_eq!(remover.remove(root).disposition, Disposition::Skipped);
    }

    #[test]
    fn declines_skip_pattern_match() {
        let dir = tempdir().unwrap();
        let (config, classifier) = fixture(&dir.path().join("logs"));
        let remover = Remover::new(&classifier, &config);

        let skip_dir = dir.path().join("OneDrive");
        fs::create_dir(&skip_dir).unwrap();
        fs::write(skip_dir.join("doc.txt"), "x").unwrap();

        let outcome = remover.remove(&skip_dir.join("doc.txt"));
        assert_eq!(outcome.disposition, Disposition::Skipped);
        assert!(skip_dir.join("doc.txt").exists());
    }

    #[test]
    fn retry_loop_exhausts_exactly_max_retries() {
        let dir = tempdir().unwrap();
        let mut calls = 0u32;
        let (attempts, err) = retry_loop(dir.path(), 3, Duration::ZERO, |_| {
            calls += 1;
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked"))
        });
        assert_eq!(calls, 3);
        assert_eq!(attempts, 3);
        assert!(err.is_some());
    }

    #[test]
    fn retry_loop_recovers_on_second_attempt() {
        let dir = tempdir().unwrap();
        let mut calls = 0u32;
        let (attempts, err) = retry_loop(dir.path(), 3, Duration::ZERO, |_| {
            calls += 1;
            if calls == 1 {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked"))
            } else {
                Ok(())
            }
        });
        assert_eq!(attempts, 2);
        assert!(err.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn locked_file_fails_after_retries() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let (config, classifier) = fixture(&dir.path().join("logs"));
        let remover = Remover::new(&classifier, &config);

        let locked_dir = dir.path().join("held");
        fs::create_dir(&locked_dir).unwrap();
        let victim = locked_dir.join("f.txt");
        fs::write(&victim, "x").unwrap();
        // Read-only parent makes unlink fail.
        fs::set_permissions(&locked_dir, fs::Permissions::from_mode(0o555)).unwrap();

        let outcome = remover.remove(&victim);
        fs::set_permissions(&locked_dir, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(outcome.disposition, Disposition::Failed);
        assert!(!outcome.ok());
        assert_eq!(outcome.attempts, 1); // fast_io collapses retries to 1
        assert!(outcome.error.is_some());
    }
}
