//! Owned kernel handle

use crate::windows::bindings::kernel32;
use winapi::um::handleapi::INVALID_HANDLE_VALUE;
use winapi::um::winnt::HANDLE;

/// Kernel handle closed on drop.
///
/// Both null and `INVALID_HANDLE_VALUE` count as "no handle"; APIs disagree
/// about which one they return on failure.
pub struct Handle {
    handle: HANDLE,
}

impl Handle {
    /// Take ownership of `raw`, or `None` if it is not a usable handle
    pub fn from_raw(raw: HANDLE) -> Option<Self> {
        if raw.is_null() || raw == INVALID_HANDLE_VALUE {
            None
        } else {
            Some(Handle { handle: raw })
        }
    }

    pub fn raw(&self) -> HANDLE {
        self.handle
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        unsafe {
            let _ = kernel32::close_handle(self.handle);
        }
    }
}

// HANDLEs are process-wide values, not thread-affine
unsafe impl Send for Handle {}
unsafe impl Sync for Handle {}
