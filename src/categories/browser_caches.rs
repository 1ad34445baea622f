use super::{local_app_data, Category};
use std::path::{Path, PathBuf};

pub struct BrowserCaches;

impl BrowserCaches {
    /// Chromium-family browsers keep caches per profile: Default,
    /// Profile 1, etc. Each profile has Cache and Code Cache.
    fn chromium_cache_dirs(user_data: &Path) -> Vec<PathBuf> {
        if !user_data.exists() {
            return vec![];
        }

        let mut dirs = Vec::new();
        if let Ok(read_dir) = std::fs::read_dir(user_data) {
            for entry in read_dir.flatten() {
                let profile_path = entry.path();
                if !profile_path.is_dir() {
                    continue;
                }
                let cache = profile_path.join("Cache");
                if cache.exists() {
                    dirs.push(cache);
                }
                let code_cache = profile_path.join("Code Cache");
                if code_cache.exists() {
                    dirs.push(code_cache);
                }
            }
        }
        dirs
    }

    fn firefox_cache_dirs() -> Vec<PathBuf> {
        let profiles_dir = match local_app_data() {
            Some(base) => base.join("Mozilla").join("Firefox").join("Profiles"),
            None => return vec![],
        };
        if !profiles_dir.exists() {
            return vec![];
        }

        let mut dirs = Vec::new();
        if let Ok(read_dir) = std::fs::read_dir(&profiles_dir) {
            for entry in read_dir.flatten() {
                let profile_path = entry.path();
                if !profile_path.is_dir() {
                    continue;
                }
                let cache2 = profile_path.join("cache2");
                if cache2.exists() {
                    dirs.push(cache2);
                }
            }
        }
        dirs
    }
}

impl Category for BrowserCaches {
    fn name(&self) -> &'static str {
        "browser-caches"
    }

    fn label(&self) -> &'static str {
        "Browser Caches"
    }

    fn roots(&self) -> Vec<PathBuf> {
        let Some(base) = local_app_data() else {
            return vec![];
        };
        let chrome = base.join("Google").join("Chrome").join("User Data");
        let edge = base.join("Microsoft").join("Edge").join("User Data");

        [
            Self::chromium_cache_dirs(&chrome),
            Self::chromium_cache_dirs(&edge),
            Self::firefox_cache_dirs(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
