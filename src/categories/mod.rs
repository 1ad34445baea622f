mod browser_caches;
mod crash_dumps;
mod delivery_optimization;
mod global_temp;
mod onedrive_cache;
mod thumbnail_cache;
mod user_temp;
mod windows_update;

pub use browser_caches::BrowserCaches;
pub use crash_dumps::CrashDumps;
pub use delivery_optimization::DeliveryOptimization;
pub use global_temp::GlobalTemp;
pub use onedrive_cache::OneDriveCache;
pub use thumbnail_cache::ThumbnailCache;
pub use user_temp::UserTemp;
pub use windows_update::WindowsUpdate;

use std::path::PathBuf;

/// One remediation target: a named set of candidate roots the orchestrator
/// probes and sweeps. Roots that do not exist contribute nothing.
pub trait Category {
    /// Machine-readable name used in --category (e.g. "browser-caches").
    fn name(&self) -> &'static str;

    /// Human-readable label for display (e.g. "Browser Caches").
    fn label(&self) -> &'static str;

    /// Candidate roots for this category on this machine.
    fn roots(&self) -> Vec<PathBuf>;
}

/// Every category, in the order the orchestrator runs them.
pub fn all() -> Vec<Box<dyn Category>> {
    vec![
        Box::new(UserTemp),
        Box::new(GlobalTemp),
        Box::new(BrowserCaches),
        Box::new(OneDriveCache),
        Box::new(WindowsUpdate),
        Box::new(DeliveryOptimization),
        Box::new(CrashDumps),
        Box::new(ThumbnailCache),
    ]
}

/// Look up a category by its machine name.
pub fn by_name(name: &str) -> Option<Box<dyn Category>> {
    all().into_iter().find(|c| c.name() == name)
}

/// %SystemRoot%, defaulting to the standard install location.
pub(crate) fn system_root() -> PathBuf {
    std::env::var_os("SystemRoot")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(r"C:\Windows"))
}

/// %ProgramData%, defaulting to the standard location.
pub(crate) fn program_data() -> PathBuf {
    std::env::var_os("ProgramData")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(r"C:\ProgramData"))
}

/// The per-user local app data dir, when resolvable.
pub(crate) fn local_app_data() -> Option<PathBuf> {
    dirs::cache_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        let mut names: Vec<&str> = all().iter().map(|c| c.name()).collect();
        let before = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), before);
    }

    #[test]
    fn by_name_resolves_every_category() {
        for cat in all() {
            assert!(by_name(cat.name()).is_some());
        }
        assert!(by_name("no-such-category").is_none());
    }
}
