//! Lazy, cancellable enumeration over a process snapshot

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::{CancellationToken, PrivilegePolicy, ProcessPlatform, ResultSink};
use crate::core::types::{
    FailureKind, Inspection, ProbeResult, ProcessId, ProcessRecord, SnapshotEntry,
};

/// Tally of one enumeration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnumerationSummary {
    /// Records produced, one per processed snapshot entry
    pub delivered: usize,
    pub with_command_line: usize,
    pub name_only: usize,
    pub skipped: usize,
    /// Whether the run stopped early because cancellation was requested
    pub cancelled: bool,
    pub failures: BTreeMap<FailureKind, usize>,
}

impl EnumerationSummary {
    fn record(&mut self, entry: &SnapshotEntry, inspection: &Inspection) {
        self.delivered += 1;
        match inspection {
            Inspection::CommandLine { .. } => self.with_command_line += 1,
            Inspection::NameOnly { .. } => self.name_only += 1,
            Inspection::Skipped { .. } => self.skipped += 1,
        }

        if let Some(failure) = inspection.failure() {
            *self.failures.entry(failure.kind).or_insert(0) += 1;
            debug!(
                pid = entry.pid,
                step = %failure.step,
                kind = %failure.kind,
                error = %failure.source,
                "Command line unavailable"
            );
        }
    }
}

/// Records of one snapshot, produced one at a time.
///
/// The cancellation token is sampled before every fetch except the first,
/// so the entry in flight always completes and no placeholder record is
/// produced for the entries left behind.
///
/// Every record carries a non-zero pid that no earlier record of the same
/// stream carried; other snapshot entries are dropped before inspection.
pub struct ProcessStream<'a, P: ProcessPlatform> {
    platform: &'a P,
    snapshot: P::Snapshot,
    token: &'a CancellationToken,
    summary: EnumerationSummary,
    seen: HashSet<ProcessId>,
    finished: bool,
}

impl<'a, P: ProcessPlatform> ProcessStream<'a, P> {
    fn new(platform: &'a P, snapshot: P::Snapshot, token: &'a CancellationToken) -> Self {
        ProcessStream {
            platform,
            snapshot,
            token,
            summary: EnumerationSummary::default(),
            seen: HashSet::new(),
            finished: false,
        }
    }

    fn next_entry(&mut self) -> Option<SnapshotEntry> {
        loop {
            let entry = self.snapshot.next()?;
            if entry.pid != 0 && self.seen.insert(entry.pid) {
                return Some(entry);
            }
            debug!(pid = entry.pid, name = %entry.image_name, "Dropping snapshot entry");
        }
    }

    /// Tally so far
    pub fn summary(&self) -> &EnumerationSummary {
        &self.summary
    }

    pub fn into_summary(self) -> EnumerationSummary {
        self.summary
    }
}

impl<'a, P: ProcessPlatform> Iterator for ProcessStream<'a, P> {
    type Item = ProcessRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if self.summary.delivered > 0 && self.token.is_cancelled() {
            debug!(
                delivered = self.summary.delivered,
                "Cancellation requested, stopping enumeration"
            );
            self.summary.cancelled = true;
            self.finished = true;
            return None;
        }

        let Some(entry) = self.next_entry() else {
            self.finished = true;
            return None;
        };

        let inspection = self.platform.inspect(entry.pid);
        let record = ProcessRecord::from_inspection(&entry, &inspection);
        self.summary.record(&entry, &inspection);
        Some(record)
    }
}

/// Run the fatal-tier setup and return the lazy record stream.
///
/// Fails when the snapshot cannot be taken, or when the debug privilege
/// cannot be enabled under [`PrivilegePolicy::Required`]; no record is
/// produced in either case.
pub fn start<'a, P: ProcessPlatform>(
    platform: &'a P,
    token: &'a CancellationToken,
    policy: PrivilegePolicy,
) -> ProbeResult<ProcessStream<'a, P>> {
    if let Err(err) = platform.enable_debug_privilege() {
        match policy {
            PrivilegePolicy::Required => {
                error!(error = %err, "Failed to enable debug privilege");
                return Err(err);
            }
            PrivilegePolicy::BestEffort => {
                warn!(error = %err, "Debug privilege unavailable, continuing with reduced access");
            }
        }
    }

    let snapshot = platform.snapshot().map_err(|err| {
        error!(error = %err, "Failed to create process snapshot");
        err
    })?;

    Ok(ProcessStream::new(platform, snapshot, token))
}

/// Enumerate every process into `sink`, blocking until the snapshot is
/// exhausted or cancellation is observed.
pub fn enumerate<P, S>(
    platform: &P,
    token: &CancellationToken,
    policy: PrivilegePolicy,
    sink: &mut S,
) -> ProbeResult<EnumerationSummary>
where
    P: ProcessPlatform,
    S: ResultSink + ?Sized,
{
    let mut stream = start(platform, token, policy)?;
    for record in stream.by_ref() {
        sink.deliver(record);
    }

    let summary = stream.into_summary();
    info!(
        delivered = summary.delivered,
        with_command_line = summary.with_command_line,
        name_only = summary.name_only,
        skipped = summary.skipped,
        cancelled = summary.cancelled,
        "Enumeration finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{ProbeError, ProcessId, ReadFailure, ReadStep};
    use std::cell::Cell;

    struct FakePlatform {
        entries: Vec<SnapshotEntry>,
        privilege_ok: bool,
        snapshot_ok: bool,
        inspected: Cell<usize>,
    }

    impl FakePlatform {
        fn new(count: u32) -> Self {
            FakePlatform {
                entries: (1..=count)
                    .map(|pid| SnapshotEntry::new(pid * 4, format!("proc{}.exe", pid)))
                    .collect(),
                privilege_ok: true,
                snapshot_ok: true,
                inspected: Cell::new(0),
            }
        }
    }

    impl ProcessPlatform for FakePlatform {
        type Snapshot = std::vec::IntoIter<SnapshotEntry>;

        fn enable_debug_privilege(&self) -> ProbeResult<()> {
            if self.privilege_ok {
                Ok(())
            } else {
                Err(ProbeError::InsufficientPrivileges("not elevated".to_string()))
            }
        }

        fn snapshot(&self) -> ProbeResult<Self::Snapshot> {
            if self.snapshot_ok {
                Ok(self.entries.clone().into_iter())
            } else {
                Err(ProbeError::SnapshotFailed("no snapshot".to_string()))
            }
        }

        fn inspect(&self, pid: ProcessId) -> Inspection {
            self.inspected.set(self.inspected.get() + 1);
            if pid % 8 == 0 {
                Inspection::Skipped {
                    failure: ReadFailure::new(
                        ReadStep::OpenProcess,
                        ProbeError::access_denied(pid, "denied"),
                    ),
                }
            } else {
                Inspection::CommandLine {
                    image_name: None,
                    command_line: format!("proc --pid {}", pid),
                }
            }
        }
    }

    #[test]
    fn test_stream_yields_snapshot_order() {
        let platform = FakePlatform::new(5);
        let token = CancellationToken::new();
        let stream = start(&platform, &token, PrivilegePolicy::Required).unwrap();
        let pids: Vec<_> = stream.map(|record| record.pid).collect();
        assert_eq!(pids, vec![4, 8, 12, 16, 20]);
    }

    #[test]
    fn test_summary_counts() {
        let platform = FakePlatform::new(4);
        let token = CancellationToken::new();
        let mut records = Vec::new();
        let summary = enumerate(
            &platform,
            &token,
            PrivilegePolicy::Required,
            &mut |r: ProcessRecord| records.push(r),
        )
        .unwrap();

        assert_eq!(summary.delivered, 4);
        assert_eq!(summary.with_command_line, 2);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.failures.get(&FailureKind::AccessDenied), Some(&2));
        assert!(!summary.cancelled);
        assert_eq!(records[1], ProcessRecord::new(8, "proc2.exe", None));
    }

    #[test]
    fn test_required_privilege_failure_is_fatal() {
        let mut platform = FakePlatform::new(3);
        platform.privilege_ok = false;
        let token = CancellationToken::new();
        let mut delivered = 0;
        let result = enumerate(&platform, &token, PrivilegePolicy::Required, &mut |_| {
            delivered += 1
        });
        assert!(matches!(result, Err(ProbeError::InsufficientPrivileges(_))));
        assert_eq!(delivered, 0);
        assert_eq!(platform.inspected.get(), 0);
    }

    #[test]
    fn test_best_effort_privilege_failure_continues() {
        let mut platform = FakePlatform::new(3);
        platform.privilege_ok = false;
        let token = CancellationToken::new();
        let stream = start(&platform, &token, PrivilegePolicy::BestEffort).unwrap();
        assert_eq!(stream.count(), 3);
    }

    #[test]
    fn test_snapshot_failure_is_fatal() {
        let mut platform = FakePlatform::new(3);
        platform.snapshot_ok = false;
        let token = CancellationToken::new();
        let result = start(&platform, &token, PrivilegePolicy::Required);
        assert!(matches!(result, Err(ProbeError::SnapshotFailed(_))));
    }

    #[test]
    fn test_pre_cancelled_token_processes_at_most_one() {
        let platform = FakePlatform::new(10);
        let token = CancellationToken::new();
        token.cancel();

        let mut stream = start(&platform, &token, PrivilegePolicy::Required).unwrap();
        let produced: Vec<_> = stream.by_ref().collect();
        assert!(produced.len() <= 1);
        assert!(stream.summary().cancelled);
        assert_eq!(platform.inspected.get(), produced.len());
    }

    #[test]
    fn test_cancel_mid_stream_stops_after_current_record() {
        let platform = FakePlatform::new(10);
        let token = CancellationToken::new();
        let mut delivered = Vec::new();
        let summary = enumerate(
            &platform,
            &token,
            PrivilegePolicy::Required,
            &mut |record: ProcessRecord| {
                delivered.push(record.pid);
                if delivered.len() == 3 {
                    token.cancel();
                }
            },
        )
        .unwrap();

        assert_eq!(delivered, vec![4, 8, 12]);
        assert!(summary.cancelled);
        assert_eq!(platform.inspected.get(), 3);
    }

    #[test]
    fn test_reset_token_allows_full_run() {
        let platform = FakePlatform::new(6);
        let token = CancellationToken::new();
        token.cancel();
        token.reset();

        let stream = start(&platform, &token, PrivilegePolicy::Required).unwrap();
        assert_eq!(stream.count(), 6);
    }

    #[test]
    fn test_exhausted_stream_stays_exhausted() {
        let platform = FakePlatform::new(1);
        let token = CancellationToken::new();
        let mut stream = start(&platform, &token, PrivilegePolicy::Required).unwrap();
        assert!(stream.next().is_some());
        assert!(stream.next().is_none());
        token.cancel();
        assert!(stream.next().is_none());
        assert!(!stream.summary().cancelled);
    }

    #[test]
    fn test_zero_and_repeated_pids_are_dropped() {
        let mut platform = FakePlatform::new(0);
        platform.entries = vec![
            SnapshotEntry::new(0, "[System Process]"),
            SnapshotEntry::new(4, "System"),
            SnapshotEntry::new(12, "proc3.exe"),
            SnapshotEntry::new(4, "System"),
            SnapshotEntry::new(20, "proc5.exe"),
        ];
        let token = CancellationToken::new();

        let stream = start(&platform, &token, PrivilegePolicy::Required).unwrap();
        let pids: Vec<_> = stream.map(|record| record.pid).collect();
        assert_eq!(pids, vec![4, 12, 20]);
        assert_eq!(platform.inspected.get(), 3);
    }
}
