//! Core type definitions for cmdline-probe
//!
//! Records delivered per process, the per-process inspection outcome,
//! and the crate-wide error type.

mod error;
mod record;

// Re-export all public types
pub use error::{ProbeError, ProbeResult};
pub use record::{
    FailureKind, Inspection, ProcessRecord, ReadFailure, ReadStep, SnapshotEntry,
    UNKNOWN_PROCESS_NAME,
};

// Common type aliases
pub type ProcessId = u32;
