use super::{local_app_data, program_data, Category};
use std::path::PathBuf;

/// Windows Error Reporting queues and per-user crash dumps.
pub struct CrashDumps;

impl Category for CrashDumps {
    fn name(&self) -> &'static str {
        "crash-dumps"
    }

    fn label(&self) -> &'static str {
        "Crash Dumps"
    }

    fn roots(&self) -> Vec<PathBuf> {
        let wer = program_data().join("Microsoft").join("Windows").join("WER");
        let mut roots = vec![wer.join("ReportQueue"), wer.join("ReportArchive")];
        if let Some(base) = local_app_data() {
            roots.push(base.join("CrashDumps"));
        }
        roots
    }
}
