use super::{local_app_data, Category};
use std::path::PathBuf;

/// OneDrive diagnostic logs and setup leftovers. The sync root itself is
/// covered by the skip patterns and never swept.
pub struct OneDriveCache;

impl Category for OneDriveCache {
    fn name(&self) -> &'static str {
        "onedrive-cache"
    }

    fn label(&self) -> &'static str {
        "OneDrive Logs"
    }

    fn roots(&self) -> Vec<PathBuf> {
        let Some(base) = local_app_data() else {
            return vec![];
        };
        let onedrive = base.join("Microsoft").join("OneDrive");
        vec![
            onedrive.join("logs"),
            onedrive.join("setup").join("logs"),
        ]
    }
}
