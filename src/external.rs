use std::path::Path;
use std::process::Command;

use crate::error::SweepError;
use crate::runlog::{Level, RunLog};

/// CleanMgr sageset profile the remediation owns. The matching sageset
/// registration is provisioned by device management, not by this tool.
const SAGESET_ID: u32 = 64;

/// Marker left by component servicing while an update awaits a reboot.
const REBOOT_MARKERS: &[&str] = &[
    r"C:\Windows\WinSxS\pending.xml",
    r"C:\Windows\System32\config\RegBack\pending.xml",
];

/// Captured result of one external tool invocation.
#[derive(Debug)]
pub struct ToolOutcome {
    pub exit_code: Option<i32>,
    pub output_tail: String,
}

impl ToolOutcome {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Invoke an out-of-process tool, wait for it, capture exit code and a
/// tail of its output, and log the outcome. A failure to even spawn is
/// logged the same way; nothing here aborts the run.
pub fn run_tool(program: &str, args: &[&str], log: &mut RunLog) -> ToolOutcome {
    log.log(
        Level::Info,
        &format!("invoking {program} {}", args.join(" ")),
    );
    match Command::new(program).args(args).output() {
        Ok(out) => {
            let mut combined = String::from_utf8_lossy(&out.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&out.stderr));
            let tail = output_tail(&combined, 20);
            let code = out.status.code();
            if out.status.success() {
                log.log(Level::Info, &format!("{program} completed"));
            } else {
                let err = SweepError::ExternalTool {
                    tool: program.to_string(),
                    code,
                };
                log.log(Level::Warn, &format!("{err}: {tail}"));
            }
            ToolOutcome {
                exit_code: code,
                output_tail: tail,
            }
        }
        Err(e) => {
            log.log(Level::Warn, &format!("cannot start {program}: {e}"));
            ToolOutcome {
                exit_code: None,
                output_tail: e.to_string(),
            }
        }
    }
}

/// True when the OS reports a servicing operation waiting on a reboot.
/// Component-store cleanup on such a machine can wedge the update, so DISM
/// is gated on this unless forced. WINSWEEP_PENDING_REBOOT overrides the
/// marker probe for tests and non-Windows hosts.
pub fn pending_reboot() -> bool {
    if let Ok(v) = std::env::var("WINSWEEP_PENDING_REBOOT") {
        return v == "1" || v.eq_ignore_ascii_case("true");
    }
    REBOOT_MARKERS.iter().any(|m| Path::new(m).exists())
}

/// DISM component-store cleanup, gated on the pending-reboot check.
pub fn component_store_cleanup(force: bool, log: &mut RunLog) -> Option<ToolOutcome> {
    if pending_reboot() && !force {
        log.log(
            Level::Warn,
            "pending reboot detected; skipping component store cleanup (use --force to override)",
        );
        return None;
    }
    Some(run_tool(
        "dism.exe",
        &["/Online", "/Cleanup-Image", "/StartComponentCleanup"],
        log,
    ))
}

/// CleanMgr with the pre-configured category profile.
pub fn run_cleanmgr(log: &mut RunLog) -> ToolOutcome {
    let arg = format!("/sagerun:{SAGESET_ID}");
    run_tool("cleanmgr.exe", &[&arg], log)
}

fn output_tail(s: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = s.lines().collect();
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SweepConfig;
    use tempfile::tempdir;

    fn open_log(base: &Path) -> (SweepConfig, RunLog) {
        let mut config = SweepConfig::new(base.join("logs"));
        config.fast_io = true;
        let log = RunLog::open(&config).unwrap();
        (config, log)
    }

    #[test]
    fn output_tail_keeps_last_lines() {
        let s = (0..30).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let tail = output_tail(&s, 20);
        assert!(tail.starts_with("10"));
        assert!(tail.ends_with("29"));
    }

    // One test owns the env var; parallel tests must not share it.
    #[test]
    fn env_flag_gates_pending_reboot_and_dism() {
        let dir = tempdir().unwrap();
        let (_config, mut log) = open_log(dir.path());

        std::env::set_var("WINSWEEP_PENDING_REBOOT", "1");
        assert!(pending_reboot());
        assert!(component_store_cleanup(false, &mut log).is_none());

        std::env::set_var("WINSWEEP_PENDING_REBOOT", "0");
        assert!(!pending_reboot());

        std::env::remove_var("WINSWEEP_PENDING_REBOOT");
    }

    #[test]
    fn missing_tool_reports_without_panicking() {
        let dir = tempdir().unwrap();
        let (_config, mut log) = open_log(dir.path());

        let outcome = run_tool("winsweep-no-such-tool", &[], &mut log);
        assert_eq!(outcome.exit_code, None);
        assert!(!outcome.succeeded());
    }
}
