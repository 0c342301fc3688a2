//! Error types for cmdline-probe

use std::fmt;
use thiserror::Error;

use super::record::FailureKind;

/// Main error type for process introspection
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Access denied to process {pid}: {reason}")]
    AccessDenied { pid: u32, reason: String },

    #[error("Failed to read memory at {address}: {reason}")]
    ReadFailed { address: String, reason: String },

    #[error("Insufficient privileges: {0}")]
    InsufficientPrivileges(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Failed to create process snapshot: {0}")]
    SnapshotFailed(String),

    #[error("System routine unavailable: {0}")]
    RoutineUnavailable(String),

    #[error("{routine} failed with status 0x{status:08X}")]
    NtStatus { routine: &'static str, status: u32 },

    #[error("Architecture mismatch reading process {pid}")]
    ArchitectureMismatch { pid: u32 },

    #[error("Invalid handle: {0}")]
    InvalidHandle(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsApiError(#[from] ::windows::core::Error),

    #[error("Windows API: {0}")]
    WindowsApi(String),
}

/// Result type alias for probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

// NTSTATUS values the classifier cares about
const STATUS_ACCESS_DENIED: u32 = 0xC000_0022;
const STATUS_PROCESS_IS_TERMINATING: u32 = 0xC000_010A;
const STATUS_INVALID_CID: u32 = 0xC000_000B;

impl ProbeError {
    /// Creates an access denied error for a process
    pub fn access_denied(pid: u32, reason: impl Into<String>) -> Self {
        ProbeError::AccessDenied {
            pid,
            reason: reason.into(),
        }
    }

    /// Creates a read failed error
    pub fn read_failed(address: impl fmt::Display, reason: impl Into<String>) -> Self {
        ProbeError::ReadFailed {
            address: address.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates an error for a failed native routine call
    pub fn nt_status(routine: &'static str, status: i32) -> Self {
        ProbeError::NtStatus {
            routine,
            status: status as u32,
        }
    }

    /// Coarse classification used for per-process diagnostics
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            ProbeError::AccessDenied { .. }
            | ProbeError::PermissionDenied(_)
            | ProbeError::InsufficientPrivileges(_) => FailureKind::AccessDenied,
            ProbeError::ProcessNotFound(_) => FailureKind::ProcessExited,
            ProbeError::ArchitectureMismatch { .. } => FailureKind::ArchitectureMismatch,
            ProbeError::RoutineUnavailable(_) => FailureKind::RoutineUnavailable,
            ProbeError::UnsupportedOperation(_) => FailureKind::Unsupported,
            ProbeError::NtStatus { status, .. } => match *status {
                STATUS_ACCESS_DENIED => FailureKind::AccessDenied,
                STATUS_PROCESS_IS_TERMINATING | STATUS_INVALID_CID => FailureKind::ProcessExited,
                _ => FailureKind::Unreadable,
            },
            _ => FailureKind::Unreadable,
        }
    }
}
