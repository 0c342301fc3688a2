//! Record delivery

use crate::core::types::ProcessRecord;

/// Synchronous delivery point, invoked once per processed snapshot entry
/// in snapshot order.
pub trait ResultSink {
    fn deliver(&mut self, record: ProcessRecord);
}

impl<F> ResultSink for F
where
    F: FnMut(ProcessRecord),
{
    fn deliver(&mut self, record: ProcessRecord) {
        self(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = |record: ProcessRecord| seen.push(record.pid);
            sink.deliver(ProcessRecord::new(4, "System", None));
            sink.deliver(ProcessRecord::new(8, "smss.exe", Some("smss.exe".into())));
        }
        assert_eq!(seen, vec![4, 8]);
    }
}
