//! Windows implementation of the enumeration platform
//!
//! Snapshots come from ToolHelp32, elevation adjusts the current token,
//! and per-process inspection is delegated to an [`InternalsReader`].

pub mod handle;
pub mod internals;
pub mod privileges;
pub mod snapshot;

pub use handle::{ProcessAccess, ProcessHandle};
pub use internals::{DocumentedReader, InternalsReader, PebReader};
pub use privileges::{debug_privilege_state, enable_debug_privilege, PrivilegeState};
pub use snapshot::ProcessSnapshot;

use crate::config::EngineConfig;
use crate::core::types::{Inspection, ProbeResult, ProcessId};
use crate::engine::ProcessPlatform;
use std::fmt;

/// The live system, inspected through a configurable reader
pub struct WindowsPlatform {
    reader: Box<dyn InternalsReader>,
}

impl WindowsPlatform {
    pub fn new(reader: Box<dyn InternalsReader>) -> Self {
        WindowsPlatform { reader }
    }

    /// Platform using the reader named in `config`
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(internals::reader_for(config.reader))
    }

    pub fn reader_name(&self) -> &'static str {
        self.reader.name()
    }
}

impl Default for WindowsPlatform {
    fn default() -> Self {
        Self::new(Box::new(PebReader::new()))
    }
}

impl fmt::Debug for WindowsPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowsPlatform")
            .field("reader", &self.reader.name())
            .finish()
    }
}

impl ProcessPlatform for WindowsPlatform {
    type Snapshot = ProcessSnapshot;

    fn enable_debug_privilege(&self) -> ProbeResult<()> {
        enable_debug_privilege()
    }

    fn snapshot(&self) -> ProbeResult<Self::Snapshot> {
        ProcessSnapshot::take()
    }

    fn inspect(&self, pid: ProcessId) -> Inspection {
        self.reader.inspect(pid)
    }
}
