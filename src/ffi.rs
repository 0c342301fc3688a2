//! Native exports for hosts loading the library as a DLL
//!
//! Records cross the boundary as null-terminated UTF-16 buffers owned by
//! this library. They are valid only for the duration of the callback.

use std::ptr;

use lazy_static::lazy_static;

use crate::core::types::{ProbeResult, ProcessRecord};
use crate::core::wide::to_wide_null;
use crate::engine::{
    enumerate, CancellationToken, EnumerationSummary, PrivilegePolicy, ProcessPlatform,
};

/// Host callback: pid, process name, command line (null when unreadable)
pub type ProcessCallback = unsafe extern "system" fn(u32, *const u16, *const u16);

lazy_static! {
    static ref GLOBAL_TOKEN: CancellationToken = CancellationToken::new();
}

/// Token shared by the native exports
pub fn global_token() -> &'static CancellationToken {
    &GLOBAL_TOKEN
}

/// Enumerate through `platform`, handing each record to `callback`.
///
/// The buffers passed to the callback are dropped as soon as it returns.
pub fn deliver_to_callback<P: ProcessPlatform>(
    platform: &P,
    token: &CancellationToken,
    policy: PrivilegePolicy,
    callback: ProcessCallback,
) -> ProbeResult<EnumerationSummary> {
    enumerate(platform, token, policy, &mut |record: ProcessRecord| {
        let name = to_wide_null(&record.name);
        let command_line = record.command_line.as_deref().map(to_wide_null);
        let command_line_ptr = command_line.as_ref().map_or(ptr::null(), |wide| wide.as_ptr());

        // SAFETY: both buffers outlive the call and are null-terminated
        unsafe { callback(record.pid, name.as_ptr(), command_line_ptr) };
    })
}

/// Ask a running `EnumerateProcesses` to stop after the current record.
///
/// The request stays in effect until `ResetCancellation` is called, so a
/// later enumeration processes at most its first entry.
#[no_mangle]
#[allow(non_snake_case)]
pub extern "system" fn RequestCancellation() {
    global_token().cancel();
}

/// Clear a previous cancellation request
#[no_mangle]
#[allow(non_snake_case)]
pub extern "system" fn ResetCancellation() {
    global_token().reset();
}

/// Enumerate all processes, invoking `callback` once per process in
/// snapshot order. Blocks until done or cancelled. A null callback does
/// nothing.
#[cfg(windows)]
#[no_mangle]
#[allow(non_snake_case)]
pub extern "system" fn EnumerateProcesses(callback: Option<ProcessCallback>) {
    use std::panic::{self, AssertUnwindSafe};
    use tracing::error;

    let Some(callback) = callback else {
        return;
    };

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let platform = crate::process::WindowsPlatform::default();
        deliver_to_callback(&platform, global_token(), PrivilegePolicy::Required, callback)
    }));

    match outcome {
        Ok(Ok(_)) => {}
        Ok(Err(err)) => {
            error!(error = %err, "Process enumeration aborted");
            eprintln!("Error: {}", err);
        }
        Err(_) => {
            error!("Process enumeration panicked");
            eprintln!("Error: process enumeration panicked");
        }
    }
}
