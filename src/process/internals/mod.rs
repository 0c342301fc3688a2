//! Readers that recover per-process details from another process
//!
//! [`PebReader`] walks the target's environment block to recover the
//! full command line. [`DocumentedReader`] sticks to documented APIs and
//! only recovers the image name.

pub mod documented;
pub mod layout;
pub mod peb;

pub use documented::DocumentedReader;
pub use peb::PebReader;

use crate::config::ReaderKind;
use crate::core::types::{Inspection, ProcessId};

/// Recovers what it can about one process
pub trait InternalsReader: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Inspect `pid`. Failures are carried in the returned value.
    fn inspect(&self, pid: ProcessId) -> Inspection;
}

/// Build the reader selected in configuration
pub fn reader_for(kind: ReaderKind) -> Box<dyn InternalsReader> {
    match kind {
        ReaderKind::Peb => Box::new(PebReader::new()),
        ReaderKind::Documented => Box::new(DocumentedReader),
    }
}
