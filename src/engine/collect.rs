//! Collecting, ordering and indexing whole enumerations

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{enumerate, CancellationToken, PrivilegePolicy, ProcessPlatform};
use crate::core::types::{ProbeResult, ProcessId, ProcessRecord};

/// Field a collected listing is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[serde(rename = "pid")]
    Pid,
    #[serde(rename = "name")]
    Name,
    /// Unreadable command lines sort first
    #[serde(rename = "cmdline")]
    CommandLine,
}

/// Stable sort; records comparing equal keep snapshot order
pub fn sort_records(records: &mut [ProcessRecord], key: SortKey) {
    match key {
        SortKey::Pid => records.sort_by_key(|record| record.pid),
        SortKey::Name => records.sort_by(|a, b| a.name.cmp(&b.name)),
        SortKey::CommandLine => records.sort_by(|a, b| a.command_line.cmp(&b.command_line)),
    }
}

/// Enumerate into a vector, optionally sorted
pub fn collect_processes<P: ProcessPlatform>(
    platform: &P,
    token: &CancellationToken,
    policy: PrivilegePolicy,
    sort: Option<SortKey>,
) -> ProbeResult<Vec<ProcessRecord>> {
    let mut records = Vec::new();
    enumerate(platform, token, policy, &mut |record: ProcessRecord| {
        records.push(record)
    })?;

    if let Some(key) = sort {
        sort_records(&mut records, key);
    }
    Ok(records)
}

/// Index records by pid. A pid seen twice keeps the later record.
pub fn index_by_pid(
    records: impl IntoIterator<Item = ProcessRecord>,
) -> BTreeMap<ProcessId, ProcessRecord> {
    records
        .into_iter()
        .map(|record| (record.pid, record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ProcessRecord> {
        vec![
            ProcessRecord::new(300, "b.exe", Some("b.exe --x".into())),
            ProcessRecord::new(4, "System", None),
            ProcessRecord::new(120, "a.exe", Some("a.exe".into())),
            ProcessRecord::new(88, "a.exe", None),
        ]
    }

    #[test]
    fn test_sort_by_pid() {
        let mut records = sample();
        sort_records(&mut records, SortKey::Pid);
        let pids: Vec<_> = records.iter().map(|r| r.pid).collect();
        assert_eq!(pids, vec![4, 88, 120, 300]);
    }

    #[test]
    fn test_sort_by_name_is_stable() {
        let mut records = sample();
        sort_records(&mut records, SortKey::Name);
        let pids: Vec<_> = records.iter().map(|r| r.pid).collect();
        assert_eq!(pids, vec![4, 120, 88, 300]);
    }

    #[test]
    fn test_sort_by_command_line_puts_unreadable_first() {
        let mut records = sample();
        sort_records(&mut records, SortKey::CommandLine);
        let pids: Vec<_> = records.iter().map(|r| r.pid).collect();
        assert_eq!(pids, vec![4, 88, 120, 300]);
    }

    #[test]
    fn test_index_by_pid() {
        let index = index_by_pid(sample());
        assert_eq!(index.len(), 4);
        assert_eq!(index[&120].name, "a.exe");
        assert!(index[&4].command_line.is_none());
    }

    #[test]
    fn test_sort_key_serde_names() {
        assert_eq!(serde_json::to_string(&SortKey::CommandLine).unwrap(), "\"cmdline\"");
        let key: SortKey = serde_json::from_str("\"pid\"").unwrap();
        assert_eq!(key, SortKey::Pid);
    }
}
