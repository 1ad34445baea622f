use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::classify::Classifier;
use crate::utils;
use crate::walker::Walk;

/// Aggregate byte count for one probed root at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSnapshot {
    pub bytes: u64,
}

impl ProbeSnapshot {
    pub fn megabytes(&self) -> f64 {
        self.bytes as f64 / 1_048_576.0
    }

    pub fn gigabytes(&self) -> f64 {
        self.bytes as f64 / 1_073_741_824.0
    }
}

/// Read-only size aggregation over candidate roots; never deletes.
///
/// With `ignore_prune` the whole tree is summed (trusted roots where an
/// accurate total matters for reporting). Without it, sizes ride the
/// pruning walker so the estimate reflects what a sweep would actually
/// reach — which is why a before/after delta must use the same mode, and
/// why an unpruned estimate can exceed what a pruned sweep frees.
///
/// Missing paths report zero; per-subtree enumeration failures are
/// tolerated.
pub fn probe(
    paths: &[PathBuf],
    ignore_prune: bool,
    classifier: &Classifier,
) -> BTreeMap<PathBuf, ProbeSnapshot> {
    let mut snapshots = BTreeMap::new();
    for path in paths {
        let bytes = if !path.exists() {
            0
        } else if ignore_prune {
            utils::entry_size(path)
        } else {
            pruned_size(path, classifier)
        };
        snapshots.insert(path.clone(), ProbeSnapshot { bytes });
    }
    snapshots
}

/// Sum of all bytes in a set of snapshots.
pub fn total_bytes(snapshots: &BTreeMap<PathBuf, ProbeSnapshot>) -> u64 {
    snapshots.values().map(|s| s.bytes).sum()
}

fn pruned_size(root: &Path, classifier: &Classifier) -> u64 {
    Walk::new(classifier, root, true)
        .map(|entry| entry.size_bytes)
        .sum()
}
