use std::path::Path;

use sysinfo::Disks;

pub struct DiskInfo {
    pub total: u64,
    pub available: u64,
    pub used: u64,
}

impl DiskInfo {
    pub fn usage_percent(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.used as f32 / self.total as f32
    }
}

/// Snapshot of the disk backing the OS volume, for before/after free-space
/// reporting. Falls back to the largest mounted disk when no mount point
/// matches the system root.
pub fn get_disk_info() -> Option<DiskInfo> {
    let disks = Disks::new_with_refreshed_list();
    let system_root = if cfg!(windows) {
        Path::new("C:\\")
    } else {
        Path::new("/")
    };

    let disk = disks
        .list()
        .iter()
        .find(|d| d.mount_point() == system_root)
        .or_else(|| disks.list().iter().max_by_key(|d| d.total_space()))?;

    let total = disk.total_space();
    let available = disk.available_space();
    Some(DiskInfo {
        total,
        available,
        used: total.saturating_sub(available),
    })
}
