//! Privilege state queries

use super::{debug_privilege_luid, open_current_token};
use crate::core::types::{ProbeError, ProbeResult};
use crate::windows::utils::ErrorCode;
use serde::Serialize;
use std::fmt;
use winapi::shared::minwindef::{DWORD, FALSE};
use winapi::um::securitybaseapi::GetTokenInformation;
use winapi::um::winnt::{
    TokenPrivileges, LUID_AND_ATTRIBUTES, SE_PRIVILEGE_ENABLED, TOKEN_PRIVILEGES, TOKEN_QUERY,
};

/// State of a privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivilegeState {
    /// Privilege is enabled
    Enabled,
    /// Privilege is held but disabled
    Disabled,
    /// Privilege is not available to the token
    NotPresent,
}

impl fmt::Display for PrivilegeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrivilegeState::Enabled => write!(f, "enabled"),
            PrivilegeState::Disabled => write!(f, "disabled"),
            PrivilegeState::NotPresent => write!(f, "not present"),
        }
    }
}

/// Current state of SeDebugPrivilege on this process's token
pub fn debug_privilege_state() -> ProbeResult<PrivilegeState> {
    let luid = debug_privilege_luid()?;
    let privileges = token_privileges()?;

    let state = privileges
        .iter()
        .find(|p| p.Luid.LowPart == luid.LowPart && p.Luid.HighPart == luid.HighPart)
        .map(|p| {
            if p.Attributes & SE_PRIVILEGE_ENABLED != 0 {
                PrivilegeState::Enabled
            } else {
                PrivilegeState::Disabled
            }
        })
        .unwrap_or(PrivilegeState::NotPresent);
    Ok(state)
}

fn token_privileges() -> ProbeResult<Vec<LUID_AND_ATTRIBUTES>> {
    let token = open_current_token(TOKEN_QUERY)?;

    let mut size: DWORD = 0;
    unsafe {
        GetTokenInformation(token.raw(), TokenPrivileges, std::ptr::null_mut(), 0, &mut size);
    }
    if size == 0 {
        return Err(ProbeError::PermissionDenied(format!(
            "Failed to size token privileges: {}",
            ErrorCode::last_error()
        )));
    }

    // u32 storage keeps the buffer aligned for TOKEN_PRIVILEGES
    let mut buffer = vec![0u32; (size as usize).div_ceil(4)];
    let queried = unsafe {
        GetTokenInformation(
            token.raw(),
            TokenPrivileges,
            buffer.as_mut_ptr() as *mut _,
            size,
            &mut size,
        )
    };
    if queried == FALSE {
        return Err(ProbeError::PermissionDenied(format!(
            "Failed to query token privileges: {}",
            ErrorCode::last_error()
        )));
    }

    let privileges = unsafe {
        let header = &*(buffer.as_ptr() as *const TOKEN_PRIVILEGES);
        std::slice::from_raw_parts(header.Privileges.as_ptr(), header.PrivilegeCount as usize)
            .to_vec()
    };
    Ok(privileges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_debug_privilege_state_queries() {
        assert!(debug_privilege_state().is_ok());
    }

    #[test]
    fn test_state_display() {
        assert_eq!(PrivilegeState::NotPresent.to_string(), "not present");
        assert_eq!(
            serde_json::to_string(&PrivilegeState::Enabled).unwrap(),
            "\"enabled\""
        );
    }
}
