//! Token privilege handling for the current process

pub mod checker;
pub mod debug;

pub use checker::{debug_privilege_state, PrivilegeState};
pub use debug::enable_debug_privilege;

use crate::core::types::{ProbeError, ProbeResult};
use crate::core::wide::to_wide_null;
use crate::windows::types::Handle;
use crate::windows::utils::ErrorCode;
use winapi::shared::minwindef::FALSE;
use winapi::um::processthreadsapi::{GetCurrentProcess, OpenProcessToken};
use winapi::um::winbase::LookupPrivilegeValueW;
use winapi::um::winnt::LUID;

const SE_DEBUG_NAME: &str = "SeDebugPrivilege";

/// Open this process's access token
fn open_current_token(access: u32) -> ProbeResult<Handle> {
    let mut token = std::ptr::null_mut();
    let opened = unsafe { OpenProcessToken(GetCurrentProcess(), access, &mut token) };
    if opened == FALSE {
        return Err(ProbeError::PermissionDenied(format!(
            "Failed to open process token: {}",
            ErrorCode::last_error()
        )));
    }

    Handle::from_raw(token)
        .ok_or_else(|| ProbeError::InvalidHandle("OpenProcessToken returned no token".to_string()))
}

/// Locally unique identifier of SeDebugPrivilege on this system
fn debug_privilege_luid() -> ProbeResult<LUID> {
    let mut luid = LUID {
        LowPart: 0,
        HighPart: 0,
    };
    let name = to_wide_null(SE_DEBUG_NAME);

    if unsafe { LookupPrivilegeValueW(std::ptr::null(), name.as_ptr(), &mut luid) } == FALSE {
        return Err(ProbeError::PermissionDenied(format!(
            "Failed to look up {}: {}",
            SE_DEBUG_NAME,
            ErrorCode::last_error()
        )));
    }
    Ok(luid)
}
