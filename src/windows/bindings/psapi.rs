//! PSAPI.dll bindings for module naming

use crate::core::types::ProbeResult;
use crate::core::wide::wide_to_string;
use crate::windows::utils::WinError;
use std::ptr;
use winapi::shared::minwindef::MAX_PATH;
use winapi::um::psapi::GetModuleBaseNameW;
use winapi::um::winnt::HANDLE;

/// Base name of the process's main executable module
///
/// # Safety
/// The handle must be a valid process handle with query and read access
pub unsafe fn get_module_base_name(handle: HANDLE) -> ProbeResult<String> {
    let mut buffer = vec![0u16; MAX_PATH];

    let len = GetModuleBaseNameW(
        handle,
        ptr::null_mut(),
        buffer.as_mut_ptr(),
        buffer.len() as u32,
    );

    if len == 0 {
        return Err(WinError::new("GetModuleBaseNameW").into_probe_error());
    }

    Ok(wide_to_string(&buffer[..len as usize]))
}
