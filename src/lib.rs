//! cmdline-probe: Windows process enumeration with command-line recovery
//!
//! The engine walks a process snapshot and reports, for every process, its
//! id, its name and its command line when that can be read out of the
//! target's environment block. Results are delivered one at a time to a
//! sink, a lazy iterator, an async channel or a native callback.

pub mod config;
pub mod core;
pub mod engine;
pub mod ffi;

#[cfg(windows)]
pub mod process;
#[cfg(windows)]
pub mod windows;

// Re-export main types from core module
pub use core::types::{
    FailureKind, Inspection, ProbeError, ProbeResult, ProcessId, ProcessRecord, ReadFailure,
    ReadStep, SnapshotEntry, UNKNOWN_PROCESS_NAME,
};

pub use engine::{
    collect_processes, enumerate, spawn_enumeration, start, CancellationToken,
    EnumerationSummary, PrivilegePolicy, ProcessPlatform, ResultSink, SortKey,
};

#[cfg(windows)]
pub use process::WindowsPlatform;

// Re-export core directly for full access
pub use core::{AUTHORS, VERSION};
