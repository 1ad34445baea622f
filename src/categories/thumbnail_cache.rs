use super::{local_app_data, Category};
use std::path::PathBuf;

/// Explorer thumbnail caches. Explorer rebuilds them on demand; the files
/// are often transiently locked, which is what the remover's retries are
/// for.
pub struct ThumbnailCache;

impl Category for ThumbnailCache {
    fn name(&self) -> &'static str {
        "thumbnail-cache"
    }

    fn label(&self) -> &'static str {
        "Thumbnail Cache"
    }

    fn roots(&self) -> Vec<PathBuf> {
        let Some(base) = local_app_data() else {
            return vec![];
        };
        let explorer = base.join("Microsoft").join("Windows").join("Explorer");
        if !explorer.exists() {
            return vec![];
        }

        let mut roots = Vec::new();
        if let Ok(read_dir) = std::fs::read_dir(&explorer) {
            for entry in read_dir.flatten() {
                let name = entry.file_name();
                let name = name.to_string_lossy();
                if name.starts_with("thumbcache_") || name.starts_with("iconcache_") {
                    roots.push(entry.path());
                }
            }
        }
        roots
    }
}
