//! Native callback delivery over a scripted platform

mod common;

use std::cell::RefCell;

use cmdline_probe::core::wide::wide_ptr_to_string;
use cmdline_probe::ffi::{deliver_to_callback, global_token, RequestCancellation, ResetCancellation};
use cmdline_probe::{CancellationToken, PrivilegePolicy, ProbeError, SnapshotEntry};
use common::{Outcome, ScriptedPlatform};
use pretty_assertions::assert_eq;

thread_local! {
    static SEEN: RefCell<Vec<(u32, Option<String>, Option<String>)>> = RefCell::new(Vec::new());
}

unsafe extern "system" fn collect(pid: u32, name: *const u16, command_line: *const u16) {
    let name = wide_ptr_to_string(name);
    let command_line = wide_ptr_to_string(command_line);
    SEEN.with(|seen| seen.borrow_mut().push((pid, name, command_line)));
}

fn take_seen() -> Vec<(u32, Option<String>, Option<String>)> {
    SEEN.with(|seen| seen.borrow_mut().drain(..).collect())
}

#[test]
fn test_callback_receives_wide_strings() {
    let platform = ScriptedPlatform::new(vec![
        (SnapshotEntry::new(4, "System"), Outcome::Denied),
        (
            SnapshotEntry::new(900, "notepad.exe"),
            Outcome::readable(r"C:\Windows\notepad.exe C:\Users\zoë\notes.txt"),
        ),
        (SnapshotEntry::new(901, "blank.exe"), Outcome::readable("")),
    ]);
    let token = CancellationToken::new();

    take_seen();
    deliver_to_callback(&platform, &token, PrivilegePolicy::Required, collect).unwrap();

    assert_eq!(
        take_seen(),
        vec![
            (4, Some("System".to_string()), None),
            (
                900,
                Some("notepad.exe".to_string()),
                Some(r"C:\Windows\notepad.exe C:\Users\zoë\notes.txt".to_string()),
            ),
            (901, Some("blank.exe".to_string()), Some(String::new())),
        ]
    );
}

#[test]
fn test_fatal_setup_invokes_no_callback() {
    let mut platform = ScriptedPlatform::readable(4);
    platform.privilege_error = true;
    let token = CancellationToken::new();

    take_seen();
    let result = deliver_to_callback(&platform, &token, PrivilegePolicy::Required, collect);
    assert!(matches!(result, Err(ProbeError::InsufficientPrivileges(_))));
    assert!(take_seen().is_empty());
}

#[test]
fn test_global_token_exports() {
    ResetCancellation();
    assert!(!global_token().is_cancelled());

    RequestCancellation();
    RequestCancellation();
    assert!(global_token().is_cancelled());

    let platform = ScriptedPlatform::readable(5);
    take_seen();
    deliver_to_callback(&platform, global_token(), PrivilegePolicy::Required, collect).unwrap();
    assert!(take_seen().len() <= 1);

    ResetCancellation();
    deliver_to_callback(&platform, global_token(), PrivilegePolicy::Required, collect).unwrap();
    assert_eq!(take_seen().len(), 5);
}
