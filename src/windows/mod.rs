//! Windows API layer for process inspection
//!
//! Safe wrappers around the Win32 and native routines the Windows
//! platform is built from. All raw FFI calls live in this module.

pub mod bindings;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use types::Handle;
pub use utils::{ErrorCode, WinError};

// Re-export key bindings
pub use bindings::{kernel32, ntdll, psapi};
