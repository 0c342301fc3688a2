//! Per-process records and the outcome of inspecting one process

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ProbeError, ProcessId};

/// Name reported when neither the module lookup nor the snapshot yields one
pub const UNKNOWN_PROCESS_NAME: &str = "<unknown>";

/// One entry of a point-in-time process listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotEntry {
    pub pid: ProcessId,
    /// Image file name as recorded in the snapshot, possibly empty
    pub image_name: String,
}

impl SnapshotEntry {
    pub fn new(pid: ProcessId, image_name: impl Into<String>) -> Self {
        SnapshotEntry {
            pid,
            image_name: image_name.into(),
        }
    }
}

/// The record delivered for every processed snapshot entry.
///
/// `command_line == None` means the command line could not be read; a
/// process whose command line is genuinely empty reports `Some("")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub pid: ProcessId,
    pub name: String,
    pub command_line: Option<String>,
}

impl ProcessRecord {
    /// Builds a record, falling back to the sentinel for an empty name
    pub fn new(pid: ProcessId, name: impl Into<String>, command_line: Option<String>) -> Self {
        let name = name.into();
        ProcessRecord {
            pid,
            name: if name.is_empty() {
                UNKNOWN_PROCESS_NAME.to_string()
            } else {
                name
            },
            command_line,
        }
    }

    /// Flattens an inspection of `entry` into the delivered shape.
    ///
    /// Name order: loaded module name, snapshot image name, sentinel.
    pub fn from_inspection(entry: &SnapshotEntry, inspection: &Inspection) -> Self {
        let name = inspection
            .image_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(&entry.image_name);
        ProcessRecord::new(
            entry.pid,
            name.to_string(),
            inspection.command_line().map(str::to_string),
        )
    }

    /// Whether the command line was recovered
    pub fn has_command_line(&self) -> bool {
        self.command_line.is_some()
    }
}

impl fmt::Display for ProcessRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.command_line {
            Some(command_line) => write!(f, "[{}] {}: {}", self.pid, self.name, command_line),
            None => write!(f, "[{}] {}: <unavailable>", self.pid, self.name),
        }
    }
}

/// Step of the remote read that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadStep {
    OpenProcess,
    QueryRoutine,
    Architecture,
    BasicInformation,
    EnvironmentBlock,
    ProcessParameters,
    CommandLineBuffer,
    Unsupported,
}

impl fmt::Display for ReadStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = match self {
            ReadStep::OpenProcess => "open process",
            ReadStep::QueryRoutine => "resolve query routine",
            ReadStep::Architecture => "architecture check",
            ReadStep::BasicInformation => "query basic information",
            ReadStep::EnvironmentBlock => "read environment block",
            ReadStep::ProcessParameters => "read process parameters",
            ReadStep::CommandLineBuffer => "read command line buffer",
            ReadStep::Unsupported => "command line lookup",
        };
        f.write_str(step)
    }
}

/// Coarse reason a command line is unavailable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    AccessDenied,
    ProcessExited,
    ArchitectureMismatch,
    RoutineUnavailable,
    Unreadable,
    Unsupported,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            FailureKind::AccessDenied => "access denied",
            FailureKind::ProcessExited => "process exited",
            FailureKind::ArchitectureMismatch => "architecture mismatch",
            FailureKind::RoutineUnavailable => "routine unavailable",
            FailureKind::Unreadable => "unreadable",
            FailureKind::Unsupported => "unsupported",
        };
        f.write_str(kind)
    }
}

/// A failed attempt to read one process, tagged with the step that failed
#[derive(Debug, thiserror::Error)]
#[error("{step} failed ({kind}): {source}")]
pub struct ReadFailure {
    pub step: ReadStep,
    pub kind: FailureKind,
    #[source]
    pub source: ProbeError,
}

impl ReadFailure {
    pub fn new(step: ReadStep, source: ProbeError) -> Self {
        ReadFailure {
            step,
            kind: source.failure_kind(),
            source,
        }
    }
}

/// Outcome of inspecting a single process
#[derive(Debug)]
pub enum Inspection {
    /// The command line was recovered
    CommandLine {
        image_name: Option<String>,
        command_line: String,
    },
    /// The process was opened but its command line could not be read
    NameOnly {
        image_name: Option<String>,
        failure: ReadFailure,
    },
    /// The process could not be opened at all
    Skipped { failure: ReadFailure },
}

impl Inspection {
    pub fn image_name(&self) -> Option<&str> {
        match self {
            Inspection::CommandLine { image_name, .. } | Inspection::NameOnly { image_name, .. } => {
                image_name.as_deref()
            }
            Inspection::Skipped { .. } => None,
        }
    }

    pub fn command_line(&self) -> Option<&str> {
        match self {
            Inspection::CommandLine { command_line, .. } => Some(command_line),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&ReadFailure> {
        match self {
            Inspection::CommandLine { .. } => None,
            Inspection::NameOnly { failure, .. } | Inspection::Skipped { failure } => Some(failure),
        }
    }
}
