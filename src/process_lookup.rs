//! Resolve the target process PID from a process name.

use anyhow::{bail, Context, Result};
use std::fs;

use crate::domain::Pid;

/// A process matched during lookup.
#[derive(Debug)]
pub struct ProcessInfo {
    pub pid: Pid,
    pub command: String,
}

/// Find a process by name.
///
/// Scans `/proc` and matches the command name from `/proc/<pid>/comm`,
/// exactly or as a substring. Exactly one process must match.
///
/// # Errors
/// - No processes found
/// - Multiple processes found (ambiguous)
pub fn find_process_by_name(name: &str) -> Result<ProcessInfo> {
    let mut matches: Vec<ProcessInfo> = Vec::new();

    let proc_dir = fs::read_dir("/proc").context("failed to read /proc")?;

    for entry in proc_dir.flatten() {
        let file_name = entry.file_name();
        let Ok(pid) = file_name.to_string_lossy().parse::<i32>() else {
            continue;
        };

        let Ok(command) = fs::read_to_string(format!("/proc/{pid}/comm")) else {
            continue;
        };
        let command = command.trim().to_string();

        if is_match(&command, name) {
            matches.push(ProcessInfo { pid: Pid(pid), command });
        }
    }

    match matches.len() {
        0 => bail!(
            "no process matching '{name}' found.\n\
             Check running processes with: ps aux | grep {name}"
        ),
        1 => Ok(matches.remove(0)),
        _ => {
            let list: Vec<String> =
                matches.iter().map(|m| format!("  {} ({})", m.pid, m.command)).collect();
            bail!(
                "multiple processes match '{name}':\n{}\n\n\
                 Specify PID explicitly: blockwatch --pid <PID>",
                list.join("\n")
            )
        }
    }
}

/// Exact match first; substring match for convenience.
fn is_match(command: &str, pattern: &str) -> bool {
    command == pattern || command.contains(pattern)
}
