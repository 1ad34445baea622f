use super::{system_root, Category};
use std::path::PathBuf;

/// Downloaded update payloads. Windows Update re-downloads anything it
/// still needs.
pub struct WindowsUpdate;

impl Category for WindowsUpdate {
    fn name(&self) -> &'static str {
        "windows-update"
    }

    fn label(&self) -> &'static str {
        "Windows Update Cache"
    }

    fn roots(&self) -> Vec<PathBuf> {
        vec![system_root().join("SoftwareDistribution").join("Download")]
    }
}
