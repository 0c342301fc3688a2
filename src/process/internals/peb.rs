//! Command-line recovery through the target's environment block
//!
//! Three dependent reads: the environment block for the parameter-block
//! address, the parameter block for the command-line descriptor, then
//! the UTF-16 buffer the descriptor points at.

use super::layout::{Peb, ProcessParameters, UnicodeString};
use super::InternalsReader;
use crate::core::types::{Inspection, ProbeError, ProcessId, ReadFailure, ReadStep};
use crate::core::wide::utf16le_bytes_to_string;
use crate::process::handle::ProcessHandle;
use crate::windows::bindings::{ntdll, psapi};
use tracing::{debug, warn};

fn at(step: ReadStep) -> impl FnOnce(ProbeError) -> ReadFailure {
    move |err| ReadFailure::new(step, err)
}

/// Reads the command line out of the target's process parameters.
///
/// Structures are always read in the reader's own layout. A native reader
/// handles WoW64 targets through their native environment block, which the
/// basic-information query returns. A WoW64 reader cannot reach a 64-bit
/// target and reports [`crate::core::FailureKind::ArchitectureMismatch`].
#[derive(Debug, Clone)]
pub struct PebReader {
    reader_is_wow64: bool,
}

impl PebReader {
    pub fn new() -> Self {
        let reader_is_wow64 = ntdll::current_process_is_wow64().unwrap_or_else(|err| {
            warn!(error = %err, "Could not determine own WoW64 status, assuming native");
            false
        });
        PebReader { reader_is_wow64 }
    }

    /// Recover the command line from an already opened process
    pub fn read_command_line(&self, process: &ProcessHandle) -> Result<String, ReadFailure> {
        ntdll::query_routine().map_err(at(ReadStep::QueryRoutine))?;

        let raw = unsafe { process.raw() };

        let target_is_wow64 =
            unsafe { ntdll::query_wow64(raw) }.map_err(at(ReadStep::Architecture))?;
        if !can_read_natively(self.reader_is_wow64, target_is_wow64) {
            return Err(ReadFailure::new(
                ReadStep::Architecture,
                ProbeError::ArchitectureMismatch { pid: process.pid() },
            ));
        }

        let basic = unsafe { ntdll::query_basic_information(raw) }
            .map_err(at(ReadStep::BasicInformation))?;

        let peb: Peb = process
            .read_struct(basic.peb_base_address)
            .map_err(at(ReadStep::EnvironmentBlock))?;

        let params: ProcessParameters = process
            .read_struct(peb.process_parameters)
            .map_err(at(ReadStep::ProcessParameters))?;

        read_unicode_string(process, &params.command_line)
            .map_err(at(ReadStep::CommandLineBuffer))
    }
}

impl Default for PebReader {
    fn default() -> Self {
        Self::new()
    }
}

fn can_read_natively(reader_is_wow64: bool, target_is_wow64: bool) -> bool {
    !reader_is_wow64 || target_is_wow64
}

fn read_unicode_string(
    process: &ProcessHandle,
    string: &UnicodeString,
) -> Result<String, ProbeError> {
    if string.length == 0 {
        return Ok(String::new());
    }
    if string.buffer == 0 {
        return Err(ProbeError::read_failed(
            "0x0",
            format!("null buffer for {} byte string", string.length),
        ));
    }

    let mut bytes = vec![0u8; string.length as usize];
    process.read_exact(string.buffer, &mut bytes)?;
    Ok(utf16le_bytes_to_string(&bytes))
}

impl InternalsReader for PebReader {
    fn name(&self) -> &'static str {
        "peb"
    }

    fn inspect(&self, pid: ProcessId) -> Inspection {
        let process = match ProcessHandle::open_for_read(pid) {
            Ok(process) => process,
            Err(err) => {
                return Inspection::Skipped {
                    failure: ReadFailure::new(ReadStep::OpenProcess, err),
                }
            }
        };

        let image_name = match unsafe { psapi::get_module_base_name(process.raw()) } {
            Ok(name) => Some(name),
            Err(err) => {
                debug!(pid, error = %err, "Module base name unavailable");
                None
            }
        };

        match self.read_command_line(&process) {
            Ok(command_line) => Inspection::CommandLine {
                image_name,
                command_line,
            },
            Err(failure) => Inspection::NameOnly {
                image_name,
                failure,
            },
        }
    }
}
