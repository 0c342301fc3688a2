//! Windows API bindings
//!
//! Low-level FFI wrappers over kernel32, ntdll and psapi.

pub mod kernel32;
pub mod ntdll;
pub mod psapi;
