//! Core module containing fundamental types for cmdline-probe
//!
//! Process records, inspection outcomes, error types and the
//! wide-string helpers shared by the engine and the native boundary.

pub mod types;
pub mod wide;

// Re-export commonly used types for convenience
pub use types::{
    FailureKind, Inspection, ProbeError, ProbeResult, ProcessId, ProcessRecord, ReadFailure,
    ReadStep, SnapshotEntry,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
