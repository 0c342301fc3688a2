//! NTDLL.dll bindings for process information queries
//!
//! `NtQueryInformationProcess` is resolved at runtime from the already
//! loaded ntdll and cached for the life of the process.

use super::kernel32::{get_module_handle, get_proc_address};
use crate::core::types::{ProbeError, ProbeResult};
use lazy_static::lazy_static;
use std::mem;
use tracing::warn;
use winapi::shared::minwindef::ULONG;
use winapi::shared::ntdef::{NTSTATUS, PVOID};
use winapi::um::processthreadsapi::GetCurrentProcess;
use winapi::um::winnt::HANDLE;

pub const STATUS_SUCCESS: NTSTATUS = 0x00000000;
pub const STATUS_ACCESS_DENIED: NTSTATUS = 0xC0000022_u32 as i32;

const ROUTINE_NAME: &str = "NtQueryInformationProcess";

/// Process information class for NtQueryInformationProcess
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessInfoClass {
    ProcessBasicInformation = 0,
    ProcessWow64Information = 26,
}

/// PROCESS_BASIC_INFORMATION
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ProcessBasicInfo {
    pub exit_status: NTSTATUS,
    pub peb_base_address: usize,
    pub affinity_mask: usize,
    pub base_priority: i32,
    pub unique_process_id: usize,
    pub inherited_from_unique_process_id: usize,
}

pub type NtQueryInformationProcessFn = unsafe extern "system" fn(
    process_handle: HANDLE,
    process_info_class: ULONG,
    process_info: PVOID,
    process_info_length: ULONG,
    return_length: *mut ULONG,
) -> NTSTATUS;

lazy_static! {
    static ref NT_QUERY_INFORMATION_PROCESS: Option<NtQueryInformationProcessFn> = resolve();
}

fn resolve() -> Option<NtQueryInformationProcessFn> {
    let routine = get_module_handle("ntdll.dll")
        .and_then(|ntdll| unsafe { get_proc_address(ntdll, ROUTINE_NAME) });

    match routine {
        // SAFETY: the export has exactly this signature on every supported release
        Some(address) => Some(unsafe { mem::transmute(address) }),
        None => {
            warn!(routine = ROUTINE_NAME, "Native routine could not be resolved");
            None
        }
    }
}

/// The cached routine, resolving it on first use
pub fn query_routine() -> ProbeResult<NtQueryInformationProcessFn> {
    (*NT_QUERY_INFORMATION_PROCESS).ok_or_else(|| {
        ProbeError::RoutineUnavailable(format!("{} not exported by ntdll.dll", ROUTINE_NAME))
    })
}

/// Check if NTSTATUS indicates success
pub fn nt_success(status: NTSTATUS) -> bool {
    status >= 0
}

unsafe fn query<T>(handle: HANDLE, class: ProcessInfoClass, out: &mut T) -> ProbeResult<()> {
    let routine = query_routine()?;
    let mut return_length = 0u32;

    let status = routine(
        handle,
        class as ULONG,
        out as *mut T as PVOID,
        mem::size_of::<T>() as ULONG,
        &mut return_length,
    );

    if nt_success(status) {
        Ok(())
    } else {
        Err(ProbeError::nt_status(ROUTINE_NAME, status))
    }
}

/// Query PROCESS_BASIC_INFORMATION, which carries the PEB address
///
/// # Safety
/// The handle must be a valid process handle with query access
pub unsafe fn query_basic_information(handle: HANDLE) -> ProbeResult<ProcessBasicInfo> {
    let mut info: ProcessBasicInfo = mem::zeroed();
    query(handle, ProcessInfoClass::ProcessBasicInformation, &mut info)?;
    Ok(info)
}

/// Whether the process runs under WoW64 (32-bit on 64-bit Windows)
///
/// # Safety
/// The handle must be a valid process handle with query access
pub unsafe fn query_wow64(handle: HANDLE) -> ProbeResult<bool> {
    let mut wow64_peb: usize = 0;
    query(handle, ProcessInfoClass::ProcessWow64Information, &mut wow64_peb)?;
    Ok(wow64_peb != 0)
}

/// Whether this process runs under WoW64
pub fn current_process_is_wow64() -> ProbeResult<bool> {
    unsafe { query_wow64(GetCurrentProcess()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ptr;

    #[test]
    fn test_nt_success() {
        assert!(nt_success(STATUS_SUCCESS));
        assert!(nt_success(0x40000000));
        assert!(!nt_success(STATUS_ACCESS_DENIED));
        assert!(!nt_success(0x80000000u32 as i32));
    }

    #[test]
    fn test_process_info_class_values() {
        assert_eq!(ProcessInfoClass::ProcessBasicInformation as u32, 0);
        assert_eq!(ProcessInfoClass::ProcessWow64Information as u32, 26);
    }

    #[test]
    fn test_basic_info_layout() {
        #[cfg(target_pointer_width = "64")]
        assert_eq!(mem::size_of::<ProcessBasicInfo>(), 48);
        #[cfg(target_pointer_width = "32")]
        assert_eq!(mem::size_of::<ProcessBasicInfo>(), 24);
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_routine_resolves() {
        assert!(query_routine().is_ok());
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_null_handle_query_fails() {
        let result = unsafe { query_basic_information(ptr::null_mut()) };
        assert!(matches!(result, Err(ProbeError::NtStatus { .. })));
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_query_self() {
        let info = unsafe { query_basic_information(GetCurrentProcess()) }.unwrap();
        assert_ne!(info.peb_base_address, 0);
        assert_eq!(info.unique_process_id, std::process::id() as usize);
        assert!(current_process_is_wow64().is_ok());
    }
}
