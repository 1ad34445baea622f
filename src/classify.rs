use std::fs;
use std::path::{Path, PathBuf};

use regex::RegexBuilder;
use tracing::debug;

use crate::config::SweepConfig;
use crate::error::SweepError;
use crate::utils;

/// One configured skip rule. Patterns are authored as regexes, but the set
/// mixes strict regex with human-authored glob-like tokens, so a pattern
/// that fails to compile degrades to a sanitized containment token instead
/// of disabling classification.
#[derive(Debug, Clone)]
pub enum SkipPattern {
    Regex(regex::Regex),
    Token(String),
}

impl SkipPattern {
    /// Compile a raw pattern, falling back to a substring token when the
    /// regex is malformed.
    pub fn compile(raw: &str) -> SkipPattern {
        match RegexBuilder::new(raw).case_insensitive(true).build() {
            Ok(re) => SkipPattern::Regex(re),
            Err(e) => {
                debug!("pattern {raw:?} is not a valid regex ({e}); using token match");
                SkipPattern::Token(sanitize_token(raw))
            }
        }
    }

    /// Case-insensitive match against a path rendered as a string.
    pub fn matches(&self, haystack: &str) -> bool {
        match self {
            SkipPattern::Regex(re) => re.is_match(haystack),
            SkipPattern::Token(token) => {
                !token.is_empty() && haystack.to_lowercase().contains(token)
            }
        }
    }
}

/// Strip regex metacharacters and lowercase, leaving a plain substring to
/// match by containment.
fn sanitize_token(raw: &str) -> String {
    raw.chars()
        .filter(|c| !r"\^$.|?*+()[]{}".contains(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Decides, for any path, whether it is protected (never touched) or
/// matches a configured skip pattern. Built once per run; both predicates
/// are pure reads of configuration plus filesystem metadata.
pub struct Classifier {
    protected_roots: Vec<PathBuf>,
    patterns: Vec<SkipPattern>,
}

impl Classifier {
    pub fn new(config: &SweepConfig) -> Classifier {
        Classifier {
            protected_roots: config
                .protected_paths()
                .iter()
                .filter_map(|p| utils::absolutize(p))
                .collect(),
            patterns: config
                .skip_patterns
                .iter()
                .map(|raw| SkipPattern::compile(raw))
                .collect(),
        }
    }

    /// True when the path is engine-owned (equal to or nested under a log
    /// or archive path), is a reparse point, or cannot be stat'ed at all.
    /// Unresolvable paths classify as protected, not as deletable.
    pub fn is_protected(&self, path: &Path) -> bool {
        let norm = match utils::absolutize(path) {
            Some(p) => p,
            None => return true,
        };
        if self
            .protected_roots
            .iter()
            .any(|root| norm == *root || norm.starts_with(root))
        {
            return true;
        }
        match fs::symlink_metadata(&norm) {
            Ok(meta) => is_reparse(&meta),
            Err(e) => {
                debug!(
                    "{}",
                    SweepError::Classification {
                        path: norm,
                        source: e
                    }
                );
                true
            }
        }
    }

    /// True when the path matches any configured skip pattern.
    pub fn is_skip(&self, path: &Path) -> bool {
        let haystack = path.to_string_lossy();
        self.patterns.iter().any(|p| p.matches(&haystack))
    }
}

/// Reparse points (symlinks, junctions, mount points) redirect elsewhere;
/// traversing or deleting through them can escape the sweep root.
pub fn is_reparse(meta: &fs::Metadata) -> bool {
    if meta.file_type().is_symlink() {
        return true;
    }
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        const FILE_ATTRIBUTE_REPARSE_POINT: u32 = 0x0400;
        if meta.file_attributes() & FILE_ATTRIBUTE_REPARSE_POINT != 0 {
            return true;
        }
    }
    false
}
