//! Async delivery of records over a bounded channel

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{start, CancellationToken, EnumerationSummary, PrivilegePolicy, ProcessPlatform};
use crate::core::types::{ProbeResult, ProcessRecord};

/// Receiving end of a background enumeration
pub struct RecordChannel {
    /// Records in snapshot order
    pub records: mpsc::Receiver<ProcessRecord>,
    /// Resolves once the walk ends; fatal setup errors surface here
    pub task: JoinHandle<ProbeResult<EnumerationSummary>>,
}

/// Run an enumeration on the blocking pool and stream its records.
///
/// Dropping the receiver stops the walk after the record in flight, the
/// same as cancelling `token`.
pub fn spawn_enumeration<P>(
    platform: P,
    token: CancellationToken,
    policy: PrivilegePolicy,
    capacity: usize,
) -> RecordChannel
where
    P: ProcessPlatform + Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity.max(1));

    let task = tokio::task::spawn_blocking(move || {
        let mut stream = start(&platform, &token, policy)?;
        for record in stream.by_ref() {
            if tx.blocking_send(record).is_err() {
                debug!("Record receiver dropped, stopping enumeration");
                break;
            }
        }

        let summary = stream.into_summary();
        info!(
            delivered = summary.delivered,
            cancelled = summary.cancelled,
            "Background enumeration finished"
        );
        Ok(summary)
    });

    RecordChannel { records: rx, task }
}
