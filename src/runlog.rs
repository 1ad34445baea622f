use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::Local;
use tracing::{error, info, warn};

use crate::config::SweepConfig;
use crate::error::{Result, SweepError};

/// Severity of one log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

/// Backoff between merge attempts. Small and fixed, never unbounded.
const MERGE_BACKOFF_MS: [u64; 3] = [250, 500, 1000];

/// Byte buffer for the merge copy.
const CHUNK_SIZE: usize = 65536;

/// Per-run logging with durable consolidation.
///
/// Lines go to a temp log while the run is active. At the end of the run
/// the temp log is appended into the main log (with retry, then an archive
/// fallback), and the main log is rotated into the archive directory with
/// a fresh empty file recreated at the canonical path. Once written, a
/// line is never mutated, only relocated.
pub struct RunLog {
    temp_path: PathBuf,
    main_path: PathBuf,
    archive_dir: PathBuf,
    file: File,
    fast_io: bool,
}

impl RunLog {
    /// Create the working temp log. This is the only setup step allowed to
    /// abort a run: without a writable temp log there is no safe way to
    /// account for deletions.
    pub fn open(config: &SweepConfig) -> Result<RunLog> {
        if let Some(dir) = config.temp_log.parent() {
            fs::create_dir_all(dir).map_err(|e| SweepError::LogIo {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }
        fs::create_dir_all(&config.archive_dir).map_err(|e| SweepError::LogIo {
            path: config.archive_dir.clone(),
            source: e,
        })?;

        rotate_stale_temp(config);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.temp_log)
            .map_err(|e| SweepError::LogIo {
                path: config.temp_log.clone(),
                source: e,
            })?;

        Ok(RunLog {
            temp_path: config.temp_log.clone(),
            main_path: config.main_log.clone(),
            archive_dir: config.archive_dir.clone(),
            file,
            fast_io: config.fast_io,
        })
    }

    /// Append one line to the temp log and echo it to the console. Write
    /// failures degrade to a console warning; they never stop the run.
    pub fn log(&mut self, level: Level, msg: &str) {
        let line = format!(
            "{} [{:5}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            level.as_str(),
            msg
        );
        match level {
            Level::Info => info!("{msg}"),
            Level::Warn => warn!("{msg}"),
            Level::Error => error!("{msg}"),
        }
        if let Err(e) = writeln!(self.file, "{line}") {
            warn!("cannot write to {}: {e}", self.temp_path.display());
        }
    }

    /// Consolidate and rotate at end of run. Consumes the log so the temp
    /// file handle is closed before any rename. Returns false when any
    /// stage had to degrade; the run itself is unaffected either way.
    pub fn finish(mut self) -> bool {
        let _ = self.file.flush();
        let temp_path = self.temp_path.clone();
        let main_path = self.main_path.clone();
        let archive_dir = self.archive_dir.clone();
        let fast_io = self.fast_io;
        drop(self);

        let merged = merge_into_main(&temp_path, &main_path, &archive_dir, fast_io);
        let archived = archive_main(&main_path, &archive_dir);
        merged && archived
    }
}

/// A leftover temp log beyond the configured size or age is moved into the
/// archive rather than appended to forever.
fn rotate_stale_temp(config: &SweepConfig) {
    let meta = match fs::metadata(&config.temp_log) {
        Ok(m) => m,
        Err(_) => return,
    };
    let too_big = meta.len() > config.temp_log_max_bytes;
    let too_old = meta
        .modified()
        .ok()
        .and_then(|m| SystemTime::now().duration_since(m).ok())
        .map(|age| age > Duration::from_secs(config.temp_log_max_age_days * 86400))
        .unwrap_or(false);
    if !too_big && !too_old {
        return;
    }

    let target = config
        .archive_dir
        .join(format!("winsweep-temp-{}.log", archive_stamp()));
    match fs::rename(&config.temp_log, &target) {
        Ok(()) => info!("rotated stale temp log to {}", target.display()),
        Err(e) => warn!(
            "cannot rotate stale temp log {}: {e}",
            config.temp_log.display()
        ),
    }
}

/// Append the temp log into the main log, retrying over a fixed backoff
/// sequence. On exhaustion the temp log is copied into the archive so its
/// content is never lost; the temp file is deleted only after a successful
/// merge.
fn merge_into_main(temp: &Path, main: &Path, archive_dir: &Path, fast_io: bool) -> bool {
    if !temp.exists() {
        return true;
    }

    let mut last_err: Option<std::io::Error> = None;
    for (i, wait_ms) in MERGE_BACKOFF_MS.iter().enumerate() {
        match append_file(temp, main) {
            Ok(()) => {
                if let Err(e) = fs::remove_file(temp) {
                    warn!("merged but cannot remove temp log {}: {e}", temp.display());
                }
                return true;
            }
            Err(e) => {
                warn!(
                    "merge attempt {} into {} failed: {e}",
                    i + 1,
                    main.display()
                );
                last_err = Some(e);
                if !fast_io {
                    std::thread::sleep(Duration::from_millis(*wait_ms));
                }
            }
        }
    }

    // Degraded path: park the temp log content in the archive. The temp
    // file itself stays put for the next run's rotation to deal with.
    let fallback = archive_dir.join(format!("winsweep-unmerged-{}.log", archive_stamp()));
    match fs::copy(temp, &fallback) {
        Ok(_) => {
            warn!(
                "main log unavailable ({}); temp log preserved and copied to {}",
                last_err
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "unknown".into()),
                fallback.display()
            );
        }
        Err(e) => {
            write_diagnostic(
                archive_dir,
                &format!(
                    "merge into {} failed and fallback copy to {} failed: {e}",
                    main.display(),
                    fallback.display()
                ),
            );
        }
    }
    false
}

/// Rotate the main log to a per-run archive file and recreate an empty one
/// at the canonical path. Prefers an atomic rename; degrades to
/// copy-then-truncate so an externally held handle on the canonical path
/// stays valid.
fn archive_main(main: &Path, archive_dir: &Path) -> bool {
    if !main.exists() {
        return true;
    }
    let target = archive_dir.join(format!("winsweep-{}.log", archive_stamp()));

    match fs::rename(main, &target) {
        Ok(()) => {
            if let Err(e) = File::create(main) {
                warn!("cannot recreate main log {}: {e}", main.display());
                return false;
            }
            true
        }
        Err(rename_err) => {
            warn!(
                "cannot rename {} to {}: {rename_err}; falling back to copy",
                main.display(),
                target.display()
            );
            match fs::copy(main, &target).and_then(|_| {
                OpenOptions::new()
                    .write(true)
                    .truncate(true)
                    .open(main)
                    .map(|_| ())
            }) {
                Ok(()) => true,
                Err(e) => {
                    write_diagnostic(
                        archive_dir,
                        &format!("archiving {} failed: {e}", main.display()),
                    );
                    false
                }
            }
        }
    }
}

/// Chunked append of `src` onto `dst`.
fn append_file(src: &Path, dst: &Path) -> std::io::Result<()> {
    let mut reader = File::open(src)?;
    let mut writer = OpenOptions::new().create(true).append(true).open(dst)?;
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        writer.write_all(&buf[..n])?;
    }
    writer.flush()
}

/// Last resort when even the archive fallback fails: leave a small
/// diagnostic note. A failure here only warns.
fn write_diagnostic(archive_dir: &Path, context: &str) {
    let path = archive_dir.join(format!("winsweep-diagnostic-{}.txt", archive_stamp()));
    if let Err(e) = fs::write(&path, context) {
        warn!("cannot write diagnostic {}: {e} ({context})", path.display());
    } else {
        warn!("{context} (diagnostic written to {})", path.display());
    }
}

/// Timestamp component for per-run archive filenames. Nanoseconds keep
/// names unique even for runs within the same second.
fn archive_stamp() -> String {
    Local::now().format("%Y%m%d-%H%M%S%.9f").to_string().replace('.', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_config(base: &Path) -> SweepConfig {
        let mut config = SweepConfig::new(base.join("logs"));
        config.fast_io = true;
        config
    }

    #[test]
    fn open_fails_when_log_dir_is_not_creatable() {
        let dir = tempdir().unwrap();
        // A file where the log dir should be.
        let blocker = dir.path().join("logs");
        fs::write(&blocker, "not a directory").unwrap();

        let config = test_config(dir.path());
        assert!(RunLog::open(&config).is_err());
    }

    #[test]
    fn lines_reach_the_temp_log() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        let mut log = RunLog::open(&config).unwrap();

        log.log(Level::Info, "first line");
        log.log(Level::Warn, "second line");
        drop(log);

        let content = fs::read_to_string(&config.temp_log).unwrap();
        assert!(content.contains("[INFO ] first line"));
        assert!(content.contains("[WARN ] second line"));
    }

    #[test]
    fn finish_merges_content_into_main_exactly_once() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        let mut log = RunLog::open(&config).unwrap();
        log.log(Level::Info, "merge me");
        assert!(log.finish());

        // Temp log is gone; main log was rotated into the archive.
        assert!(!config.temp_log.exists());
        let archived: Vec<_> = fs::read_dir(&config.archive_dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| fs::read_to_string(e.path()).unwrap_or_default())
            .collect();
        let occurrences: usize = archived
            .iter()
            .map(|c| c.matches("merge me").count())
            .sum();
        assert_eq!(occurrences, 1);
        // Canonical main log path holds a fresh empty file.
        assert!(config.main_log.exists());
        assert_eq!(fs::read_to_string(&config.main_log).unwrap(), "");
    }

    #[test]
    fn merge_appends_to_existing_main_content() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        fs::create_dir_all(config.main_log.parent().unwrap()).unwrap();
        fs::write(&config.main_log, "older run\n").unwrap();

        let mut log = RunLog::open(&config).unwrap();
        log.log(Level::Info, "newer run");
        log.finish();

        // After rotation the archive holds both, in order.
        let archived = fs::read_dir(&config.archive_dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| fs::read_to_string(e.path()).unwrap_or_default())
            .find(|c| c.contains("older run"))
            .expect("archived main log");
        let older = archived.find("older run").unwrap();
        let newer = archived.find("newer run").unwrap();
        assert!(older < newer);
    }

    #[test]
    fn unmergeable_main_log_preserves_temp_and_archives_copy() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        let mut log = RunLog::open(&config).unwrap();
        log.log(Level::Info, "precious line");

        // A directory at the main-log path makes every append attempt fail.
        fs::create_dir_all(&config.main_log).unwrap();
        assert!(!log.finish());

        // Temp log preserved, and a copy parked in the archive.
        assert!(config.temp_log.exists());
        let copy = fs::read_dir(&config.archive_dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .find(|e| {
                e.file_name()
                    .to_string_lossy()
                    .starts_with("winsweep-unmerged-")
            })
            .expect("fallback archive copy");
        assert!(fs::read_to_string(copy.path())
            .unwrap()
            .contains("precious line"));
    }

    #[test]
    fn stale_temp_log_is_rotated_aside_on_open() {
        let dir = tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.temp_log_max_bytes = 8;
        fs::create_dir_all(config.temp_log.parent().unwrap()).unwrap();
        fs::create_dir_all(&config.archive_dir).unwrap();
        fs::write(&config.temp_log, "a line well over eight bytes\n").unwrap();

        let log = RunLog::open(&config).unwrap();
        drop(log);

        let rotated = fs::read_dir(&config.archive_dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .find(|e| {
                e.file_name()
                    .to_string_lossy()
                    .starts_with("winsweep-temp-")
            })
            .expect("rotated temp log");
        assert!(fs::read_to_string(rotated.path())
            .unwrap()
            .contains("eight bytes"));
        // The fresh temp log starts empty.
        assert_eq!(fs::metadata(&config.temp_log).unwrap().len(), 0);
    }
}
