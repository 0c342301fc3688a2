//! Windows error code handling utilities

use crate::core::types::ProbeError;
use std::fmt;
use winapi::um::errhandlingapi::GetLastError;

/// Win32 error codes the process layer distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success,
    AccessDenied,
    InvalidHandle,
    NoMoreFiles,
    InvalidParameter,
    PartialCopy,
    NoAccess,
    NotAllAssigned,
    Unknown(u32),
}

impl From<u32> for ErrorCode {
    fn from(code: u32) -> Self {
        match code {
            0 => ErrorCode::Success,
            5 => ErrorCode::AccessDenied,
            6 => ErrorCode::InvalidHandle,
            18 => ErrorCode::NoMoreFiles,
            87 => ErrorCode::InvalidParameter,
            299 => ErrorCode::PartialCopy,
            998 => ErrorCode::NoAccess,
            1300 => ErrorCode::NotAllAssigned,
            _ => ErrorCode::Unknown(code),
        }
    }
}

impl ErrorCode {
    /// Get the calling thread's last Windows error
    pub fn last_error() -> Self {
        unsafe { ErrorCode::from(GetLastError()) }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Success => write!(f, "Success"),
            ErrorCode::AccessDenied => write!(f, "Access denied"),
            ErrorCode::InvalidHandle => write!(f, "Invalid handle"),
            ErrorCode::NoMoreFiles => write!(f, "No more entries"),
            ErrorCode::InvalidParameter => write!(f, "Invalid parameter"),
            ErrorCode::PartialCopy => write!(f, "Partial copy"),
            ErrorCode::NoAccess => write!(f, "Invalid access to memory location"),
            ErrorCode::NotAllAssigned => write!(f, "Not all privileges assigned"),
            ErrorCode::Unknown(code) => write!(f, "Unknown error: {}", code),
        }
    }
}

/// Windows error code paired with the operation that produced it
#[derive(Debug)]
pub struct WinError {
    code: ErrorCode,
    context: String,
}

impl WinError {
    /// Capture the last error for `context`
    pub fn new(context: impl Into<String>) -> Self {
        WinError {
            code: ErrorCode::last_error(),
            context: context.into(),
        }
    }

    pub fn with_code(code: ErrorCode, context: impl Into<String>) -> Self {
        WinError {
            code,
            context: context.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Convert to ProbeError
    pub fn into_probe_error(self) -> ProbeError {
        ProbeError::WindowsApi(format!("{}: {}", self.context, self.code))
    }
}
