//! Reader limited to documented APIs

use super::InternalsReader;
use crate::core::types::{Inspection, ProbeError, ProcessId, ReadFailure, ReadStep};
use crate::core::wide::{extract_filename, wide_to_string};
use crate::process::handle::{ProcessAccess, ProcessHandle};
use ::windows::core::PWSTR;
use ::windows::Win32::Foundation::HANDLE;
use ::windows::Win32::System::Threading::{QueryFullProcessImageNameW, PROCESS_NAME_WIN32};

// Long-path aware image names can exceed MAX_PATH
const IMAGE_PATH_CAPACITY: usize = 32 * 1024;

/// Recovers image names with limited-query access; never command lines
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentedReader;

impl DocumentedReader {
    /// Full Win32 path of the process image
    pub fn image_path(&self, pid: ProcessId) -> Result<String, ProbeError> {
        read_image_path(pid, IMAGE_PATH_CAPACITY)
    }
}

fn read_image_path(pid: ProcessId, capacity: usize) -> Result<String, ProbeError> {
    let process = ProcessHandle::open(pid, ProcessAccess::QUERY_LIMITED_INFORMATION)?;

    let mut buffer = vec![0u16; capacity];
    let mut size = buffer.len() as u32;
    unsafe {
        QueryFullProcessImageNameW(
            HANDLE(process.raw() as isize),
            PROCESS_NAME_WIN32,
            PWSTR(buffer.as_mut_ptr()),
            &mut size,
        )
    }?;

    Ok(wide_to_string(&buffer[..size as usize]))
}

impl InternalsReader for DocumentedReader {
    fn name(&self) -> &'static str {
        "documented"
    }

    fn inspect(&self, pid: ProcessId) -> Inspection {
        match self.image_path(pid) {
            Ok(path) => Inspection::NameOnly {
                image_name: Some(extract_filename(&path).to_string()),
                failure: ReadFailure::new(
                    ReadStep::Unsupported,
                    ProbeError::UnsupportedOperation(
                        "command lines require the environment-block reader".to_string(),
                    ),
                ),
            },
            Err(err) => Inspection::Skipped {
                failure: ReadFailure::new(ReadStep::OpenProcess, err),
            },
        }
    }
}
