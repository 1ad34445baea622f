use super::{system_root, Category};
use std::path::PathBuf;

pub struct GlobalTemp;

impl Category for GlobalTemp {
    fn name(&self) -> &'static str {
        "global-temp"
    }

    fn label(&self) -> &'static str {
        "Global Temp"
    }

    fn roots(&self) -> Vec<PathBuf> {
        vec![system_root().join("Temp")]
    }
}
