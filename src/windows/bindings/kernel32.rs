//! Kernel32.dll bindings for process access and module lookup

use crate::core::types::{ProbeError, ProbeResult};
use crate::core::wide::to_wide_null;
use crate::windows::utils::{ErrorCode, WinError};
use std::ffi::CString;
use winapi::shared::minwindef::{FALSE, FARPROC, HMODULE, LPCVOID, LPVOID};
use winapi::um::handleapi::CloseHandle;
use winapi::um::libloaderapi::{GetModuleHandleW, GetProcAddress};
use winapi::um::memoryapi::ReadProcessMemory;
use winapi::um::processthreadsapi::OpenProcess;
use winapi::um::winnt::HANDLE;

/// Safe wrapper for OpenProcess.
///
/// Access denial and vanished processes are reported as distinct errors so
/// callers can tell them apart in diagnostics.
pub fn open_process(pid: u32, desired_access: u32) -> ProbeResult<HANDLE> {
    let handle = unsafe { OpenProcess(desired_access, FALSE, pid) };
    if !handle.is_null() {
        return Ok(handle);
    }

    match ErrorCode::last_error() {
        ErrorCode::AccessDenied => Err(ProbeError::access_denied(pid, "OpenProcess")),
        ErrorCode::InvalidParameter => Err(ProbeError::ProcessNotFound(format!("PID: {}", pid))),
        code => Err(WinError::with_code(code, format!("OpenProcess({})", pid)).into_probe_error()),
    }
}

/// Safe wrapper for CloseHandle
///
/// # Safety
/// The handle must be a valid Windows handle not closed elsewhere
pub unsafe fn close_handle(handle: HANDLE) -> ProbeResult<()> {
    if handle.is_null() {
        return Ok(());
    }

    if CloseHandle(handle) == FALSE {
        Err(WinError::new("CloseHandle").into_probe_error())
    } else {
        Ok(())
    }
}

/// Safe wrapper for ReadProcessMemory, returning the number of bytes read
///
/// # Safety
/// The handle must be a valid process handle with `PROCESS_VM_READ`
pub unsafe fn read_process_memory(
    handle: HANDLE,
    address: usize,
    buffer: &mut [u8],
) -> ProbeResult<usize> {
    let mut bytes_read = 0;

    let result = ReadProcessMemory(
        handle,
        address as LPCVOID,
        buffer.as_mut_ptr() as LPVOID,
        buffer.len(),
        &mut bytes_read,
    );

    if result == FALSE {
        Err(ProbeError::read_failed(
            format!("0x{:X}", address),
            format!("ReadProcessMemory failed: {}", ErrorCode::last_error()),
        ))
    } else {
        Ok(bytes_read)
    }
}

/// Handle of a module already loaded into this process
pub fn get_module_handle(name: &str) -> Option<HMODULE> {
    let wide = to_wide_null(name);
    let module = unsafe { GetModuleHandleW(wide.as_ptr()) };
    if module.is_null() {
        None
    } else {
        Some(module)
    }
}

/// Address of an exported routine
///
/// # Safety
/// `module` must be a loaded module handle
pub unsafe fn get_proc_address(module: HMODULE, name: &str) -> Option<FARPROC> {
    let name = CString::new(name).ok()?;
    let routine = GetProcAddress(module, name.as_ptr());
    if routine.is_null() {
        None
    } else {
        Some(routine)
    }
}
