use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, warn};

use crate::classify::{self, Classifier};
use crate::error::SweepError;

/// One filesystem node observed during a walk. Transient; consumed as soon
/// as it is yielded.
#[derive(Debug, Clone)]
pub struct PathEntry {
    pub path: PathBuf,
    pub is_dir: bool,
    #[allow(dead_code)]
    pub modified: Option<SystemTime>,
    pub size_bytes: u64,
}

/// Explicit-stack traversal of one root. Directories are classified before
/// their children are enumerated; a skip or protected match prunes the
/// whole branch. Reparse points are never descended into and never
/// yielded, so symlinked cycles cannot occur.
///
/// Yield order is stack order (roughly depth-first) and deliberately
/// unspecified; no consumer may depend on it.
pub struct Walk<'a> {
    classifier: &'a Classifier,
    stack: Vec<PathBuf>,
    files_only: bool,
    pruned: BTreeSet<PathBuf>,
    errors: Vec<SweepError>,
}

impl<'a> Walk<'a> {
    pub fn new(classifier: &'a Classifier, root: &Path, files_only: bool) -> Walk<'a> {
        Walk {
            classifier,
            stack: vec![root.to_path_buf()],
            files_only,
            pruned: BTreeSet::new(),
            errors: Vec::new(),
        }
    }

    /// Branches that were not descended into, deduplicated, for summary
    /// reporting. Scoped to this walk only.
    pub fn pruned(&self) -> &BTreeSet<PathBuf> {
        &self.pruned
    }

    /// Nodes that could not be stat'ed or listed. Each one was logged and
    /// abandoned without stopping the walk.
    pub fn errors(&self) -> &[SweepError] {
        &self.errors
    }

    pub fn enumeration_errors(&self) -> usize {
        self.errors.len()
    }
}

impl Iterator for Walk<'_> {
    type Item = PathEntry;

    fn next(&mut self) -> Option<PathEntry> {
        while let Some(path) = self.stack.pop() {
            let meta = match fs::symlink_metadata(&path) {
                Ok(m) => m,
                Err(e) => {
                    let err = SweepError::Enumeration { path, source: e };
                    warn!("{err}");
                    self.errors.push(err);
                    continue;
                }
            };

            if classify::is_reparse(&meta) {
                // Reparse points surface both at prune checks and as plain
                // enumerated entries; exclude them in either position.
                debug!("not following reparse point {}", path.display());
                self.pruned.insert(path);
                continue;
            }

            if meta.is_dir() {
                if self.classifier.is_skip(&path) || self.classifier.is_protected(&path) {
                    self.pruned.insert(path);
                    continue;
                }
                match fs::read_dir(&path) {
                    Ok(entries) => {
                        for entry in entries.flatten() {
                            self.stack.push(entry.path());
                        }
                    }
                    Err(e) => {
                        let err = SweepError::Enumeration {
                            path: path.clone(),
                            source: e,
                        };
                        warn!("{err}");
                        self.errors.push(err);
                    }
                }
                if self.files_only {
                    continue;
                }
                return Some(PathEntry {
                    path,
                    is_dir: true,
                    modified: meta.modified().ok(),
                    size_bytes: 0,
                });
            }

            return Some(PathEntry {
                path,
                is_dir: false,
                modified: meta.modified().ok(),
                size_bytes: meta.len(),
            });
        }
        None
    }
}
