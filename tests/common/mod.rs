//! Scripted platform shared by the integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cmdline_probe::{
    CancellationToken, Inspection, ProbeError, ProbeResult, ProcessId, ProcessPlatform,
    ReadFailure, ReadStep, SnapshotEntry,
};

/// What inspecting a scripted process yields
#[derive(Debug, Clone)]
pub enum Outcome {
    Readable {
        module_name: Option<String>,
        command_line: String,
    },
    Unreadable {
        module_name: Option<String>,
    },
    Exited,
    Denied,
}

impl Outcome {
    pub fn readable(command_line: &str) -> Self {
        Outcome::Readable {
            module_name: None,
            command_line: command_line.to_string(),
        }
    }

    fn inspect(&self, pid: ProcessId) -> Inspection {
        match self {
            Outcome::Readable {
                module_name,
                command_line,
            } => Inspection::CommandLine {
                image_name: module_name.clone(),
                command_line: command_line.clone(),
            },
            Outcome::Unreadable { module_name } => Inspection::NameOnly {
                image_name: module_name.clone(),
                failure: ReadFailure::new(
                    ReadStep::ProcessParameters,
                    ProbeError::read_failed("0x7FF000", "short read: 0 of 128 bytes"),
                ),
            },
            Outcome::Exited => Inspection::Skipped {
                failure: ReadFailure::new(
                    ReadStep::OpenProcess,
                    ProbeError::ProcessNotFound(format!("PID: {}", pid)),
                ),
            },
            Outcome::Denied => Inspection::Skipped {
                failure: ReadFailure::new(
                    ReadStep::OpenProcess,
                    ProbeError::access_denied(pid, "OpenProcess"),
                ),
            },
        }
    }
}

/// Platform whose snapshot and per-process outcomes are fixed up front
pub struct ScriptedPlatform {
    pub processes: Vec<(SnapshotEntry, Outcome)>,
    pub privilege_error: bool,
    pub snapshot_error: bool,
    /// Cancel this token once the given number of processes were inspected
    pub cancel_after: Option<(usize, CancellationToken)>,
    pub inspected: Arc<AtomicUsize>,
}

impl ScriptedPlatform {
    pub fn new(processes: Vec<(SnapshotEntry, Outcome)>) -> Self {
        ScriptedPlatform {
            processes,
            privilege_error: false,
            snapshot_error: false,
            cancel_after: None,
            inspected: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// `count` readable processes with pids 4, 8, 12, ...
    pub fn readable(count: u32) -> Self {
        Self::new(
            (1..=count)
                .map(|i| {
                    (
                        SnapshotEntry::new(i * 4, format!("proc{}.exe", i)),
                        Outcome::readable(&format!("proc{}.exe --index {}", i, i)),
                    )
                })
                .collect(),
        )
    }

    pub fn inspected(&self) -> usize {
        self.inspected.load(Ordering::SeqCst)
    }
}

impl ProcessPlatform for ScriptedPlatform {
    type Snapshot = std::vec::IntoIter<SnapshotEntry>;

    fn enable_debug_privilege(&self) -> ProbeResult<()> {
        if self.privilege_error {
            Err(ProbeError::InsufficientPrivileges(
                "SeDebugPrivilege is not held by this token".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn snapshot(&self) -> ProbeResult<Self::Snapshot> {
        if self.snapshot_error {
            return Err(ProbeError::SnapshotFailed("scripted failure".to_string()));
        }
        let entries: Vec<_> = self.processes.iter().map(|(entry, _)| entry.clone()).collect();
        Ok(entries.into_iter())
    }

    fn inspect(&self, pid: ProcessId) -> Inspection {
        let seen = self.inspected.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((after, token)) = &self.cancel_after {
            if seen == *after {
                token.cancel();
            }
        }

        self.processes
            .iter()
            .find(|(entry, _)| entry.pid == pid)
            .map(|(_, outcome)| outcome.inspect(pid))
            .unwrap_or_else(|| Outcome::Exited.inspect(pid))
    }
}
