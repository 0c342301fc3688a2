//! Process enumeration engine
//!
//! The engine drives a [`ProcessPlatform`] through one enumeration:
//! elevate once, take a snapshot, then inspect each entry in snapshot
//! order and hand the resulting [`ProcessRecord`](crate::core::ProcessRecord)
//! to the consumer before moving on. Setup failures are fatal to the call;
//! per-process failures only degrade that process's record.

pub mod cancel;
pub mod channel;
pub mod collect;
pub mod sink;
pub mod stream;

pub use cancel::CancellationToken;
pub use channel::{spawn_enumeration, RecordChannel};
pub use collect::{collect_processes, index_by_pid, sort_records, SortKey};
pub use sink::ResultSink;
pub use stream::{enumerate, start, EnumerationSummary, ProcessStream};

use crate::core::types::{Inspection, ProbeResult, ProcessId, SnapshotEntry};

/// What to do when the debug privilege cannot be enabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrivilegePolicy {
    /// Abort the enumeration before taking a snapshot
    #[default]
    Required,
    /// Log a warning and enumerate with whatever access the caller has
    BestEffort,
}

/// The operating-system operations an enumeration is built from
pub trait ProcessPlatform {
    /// Point-in-time listing, walked first to last
    type Snapshot: Iterator<Item = SnapshotEntry>;

    /// Enable the capability needed to read other users' processes
    fn enable_debug_privilege(&self) -> ProbeResult<()>;

    /// Take a snapshot of all live processes
    fn snapshot(&self) -> ProbeResult<Self::Snapshot>;

    /// Recover what can be recovered about one process. Never fails the run.
    fn inspect(&self, pid: ProcessId) -> Inspection;
}
