//! Point-in-time process listing using the ToolHelp32 API

use crate::core::types::{ProbeError, SnapshotEntry};
use crate::core::wide::wide_to_string;
use crate::windows::types::Handle;
use crate::windows::utils::{ErrorCode, WinError};
use std::mem;
use tracing::warn;
use winapi::shared::minwindef::FALSE;
use winapi::um::tlhelp32::{
    CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W,
    TH32CS_SNAPPROCESS,
};

/// Pid of the System Idle Process, which has no process object to open
const IDLE_PROCESS_ID: u32 = 0;

/// Walks a ToolHelp32 process snapshot first to last.
///
/// The first entry is fetched when the snapshot is taken so an unusable
/// snapshot is reported as an error instead of an empty walk. The idle
/// process pseudo-entry is never yielded.
pub struct ProcessSnapshot {
    snapshot: Handle,
    pending: Option<SnapshotEntry>,
}

impl ProcessSnapshot {
    /// Capture all running processes
    pub fn take() -> Result<Self, ProbeError> {
        let raw = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) };
        let snapshot = Handle::from_raw(raw).ok_or_else(|| {
            ProbeError::SnapshotFailed(format!(
                "CreateToolhelp32Snapshot: {}",
                ErrorCode::last_error()
            ))
        })?;

        let mut entry = empty_entry();
        if unsafe { Process32FirstW(snapshot.raw(), &mut entry) } == FALSE {
            return Err(ProbeError::SnapshotFailed(format!(
                "Process32FirstW: {}",
                ErrorCode::last_error()
            )));
        }

        let mut walker = ProcessSnapshot {
            snapshot,
            pending: Some(to_snapshot_entry(&entry)),
        };
        walker.skip_idle_process();
        Ok(walker)
    }

    fn fetch_next(&mut self) -> Option<SnapshotEntry> {
        let mut entry = empty_entry();
        if unsafe { Process32NextW(self.snapshot.raw(), &mut entry) } != FALSE {
            return Some(to_snapshot_entry(&entry));
        }

        let code = ErrorCode::last_error();
        if !is_end_of_snapshot(code) {
            let err = WinError::with_code(code, "Process32NextW").into_probe_error();
            warn!(error = %err, "Process snapshot walk ended early");
        }
        None
    }

    fn skip_idle_process(&mut self) {
        while matches!(&self.pending, Some(entry) if entry.pid == IDLE_PROCESS_ID) {
            self.pending = self.fetch_next();
        }
    }
}

impl Iterator for ProcessSnapshot {
    type Item = SnapshotEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.pending.take()?;
        self.pending = self.fetch_next();
        self.skip_idle_process();
        Some(current)
    }
}

fn is_end_of_snapshot(code: ErrorCode) -> bool {
    code == ErrorCode::NoMoreFiles
}

fn empty_entry() -> PROCESSENTRY32W {
    let mut entry: PROCESSENTRY32W = unsafe { mem::zeroed() };
    entry.dwSize = mem::size_of::<PROCESSENTRY32W>() as u32;
    entry
}

fn to_snapshot_entry(entry: &PROCESSENTRY32W) -> SnapshotEntry {
    let name = &entry.szExeFile;
    let len = name.iter().position(|&c| c == 0).unwrap_or(name.len());
    SnapshotEntry::new(entry.th32ProcessID, wide_to_string(&name[..len]))
}
