//! Leading fields of the process environment block and its parameter
//! block, for the reader's own pointer width.
//!
//! Only the fields up to the command line are described; the rest are
//! padding that is never interpreted.

/// UNICODE_STRING as laid out in the target. `length` is in bytes and
/// excludes any terminator.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct UnicodeString {
    pub length: u16,
    pub maximum_length: u16,
    pub buffer: usize,
}

/// Environment block prefix up to the parameter-block pointer
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct Peb {
    pub reserved1: [u8; 2],
    pub being_debugged: u8,
    pub reserved2: u8,
    pub reserved3: [usize; 2],
    pub ldr: usize,
    pub process_parameters: usize,
}

/// RTL_USER_PROCESS_PARAMETERS prefix up to the command line
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ProcessParameters {
    pub reserved1: [u8; 16],
    pub reserved2: [usize; 10],
    pub image_path_name: UnicodeString,
    pub command_line: UnicodeString,
}
