//! SeDebugPrivilege elevation

use super::{debug_privilege_luid, open_current_token, SE_DEBUG_NAME};
use crate::core::types::{ProbeError, ProbeResult};
use crate::windows::utils::ErrorCode;
use std::mem;
use tracing::{debug, info};
use winapi::shared::minwindef::{DWORD, FALSE};
use winapi::um::securitybaseapi::AdjustTokenPrivileges;
use winapi::um::winnt::{
    LUID_AND_ATTRIBUTES, SE_PRIVILEGE_ENABLED, TOKEN_ADJUST_PRIVILEGES, TOKEN_PRIVILEGES,
    TOKEN_QUERY,
};

/// Enable SeDebugPrivilege on this process's token.
///
/// `AdjustTokenPrivileges` reports success even when the token does not
/// hold the privilege at all; that case surfaces here as
/// [`ProbeError::InsufficientPrivileges`].
pub fn enable_debug_privilege() -> ProbeResult<()> {
    let token = open_current_token(TOKEN_ADJUST_PRIVILEGES | TOKEN_QUERY)?;
    let luid = debug_privilege_luid()?;

    let mut privileges = TOKEN_PRIVILEGES {
        PrivilegeCount: 1,
        Privileges: [LUID_AND_ATTRIBUTES {
            Luid: luid,
            Attributes: SE_PRIVILEGE_ENABLED,
        }],
    };

    let adjusted = unsafe {
        AdjustTokenPrivileges(
            token.raw(),
            FALSE,
            &mut privileges,
            mem::size_of::<TOKEN_PRIVILEGES>() as DWORD,
            std::ptr::null_mut(),
            std::ptr::null_mut(),
        )
    };

    if adjusted == FALSE {
        return Err(ProbeError::InsufficientPrivileges(format!(
            "AdjustTokenPrivileges failed: {}",
            ErrorCode::last_error()
        )));
    }

    match ErrorCode::last_error() {
        ErrorCode::NotAllAssigned => Err(ProbeError::InsufficientPrivileges(format!(
            "{} is not held by this token; run elevated",
            SE_DEBUG_NAME
        ))),
        code => {
            debug!(last_error = %code, "AdjustTokenPrivileges returned");
            info!("{} enabled", SE_DEBUG_NAME);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::privileges::{debug_privilege_state, PrivilegeState};

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_enable_matches_token_state() {
        // Succeeds only when elevated; either way the outcome must agree
        // with what the token reports afterwards
        match enable_debug_privilege() {
            Ok(()) => assert_eq!(debug_privilege_state().unwrap(), PrivilegeState::Enabled),
            Err(err) => {
                assert!(matches!(err, ProbeError::InsufficientPrivileges(_)));
                assert_ne!(debug_privilege_state().unwrap(), PrivilegeState::Enabled);
            }
        }
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_enable_is_repeatable() {
        let first = enable_debug_privilege().is_ok();
        let second = enable_debug_privilege().is_ok();
        assert_eq!(first, second);
    }
}
