use super::Category;
use std::path::PathBuf;

pub struct UserTemp;

impl Category for UserTemp {
    fn name(&self) -> &'static str {
        "user-temp"
    }

    fn label(&self) -> &'static str {
        "User Temp"
    }

    fn roots(&self) -> Vec<PathBuf> {
        vec![std::env::temp_dir()]
    }
}
