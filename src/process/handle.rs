//! Process handle opened for remote reads

use crate::core::types::{ProbeError, ProbeResult, ProcessId};
use crate::windows::bindings::kernel32;
use crate::windows::types::Handle;
use std::fmt;
use std::mem::{self, MaybeUninit};
use tracing::trace;
use winapi::um::winnt::HANDLE;

/// Access rights for process handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessAccess {
    value: u32,
}

impl ProcessAccess {
    /// Query information access
    pub const QUERY_INFORMATION: Self = Self { value: 0x0400 };
    /// Read memory access
    pub const VM_READ: Self = Self { value: 0x0010 };
    /// Name and image path only; granted for most protected processes
    pub const QUERY_LIMITED_INFORMATION: Self = Self { value: 0x1000 };

    /// Combine access rights
    pub fn combine(rights: &[Self]) -> Self {
        Self {
            value: rights.iter().fold(0, |acc, right| acc | right.value),
        }
    }

    /// Get raw value
    pub fn value(&self) -> u32 {
        self.value
    }
}

/// Owned handle to another process
pub struct ProcessHandle {
    handle: Handle,
    pid: ProcessId,
    access: ProcessAccess,
}

impl ProcessHandle {
    /// Open a process with specified access rights
    pub fn open(pid: ProcessId, access: ProcessAccess) -> ProbeResult<Self> {
        let raw = kernel32::open_process(pid, access.value())?;
        let handle = Handle::from_raw(raw)
            .ok_or_else(|| ProbeError::InvalidHandle(format!("OpenProcess({})", pid)))?;
        Ok(ProcessHandle {
            handle,
            pid,
            access,
        })
    }

    /// Open with the rights needed to read the environment block
    pub fn open_for_read(pid: ProcessId) -> ProbeResult<Self> {
        Self::open(
            pid,
            ProcessAccess::combine(&[ProcessAccess::QUERY_INFORMATION, ProcessAccess::VM_READ]),
        )
    }

    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    /// Get the raw handle
    ///
    /// # Safety
    /// The returned handle is only valid as long as this ProcessHandle exists
    pub unsafe fn raw(&self) -> HANDLE {
        self.handle.raw()
    }

    /// Read into `buffer`, failing unless every byte arrives
    pub fn read_exact(&self, address: usize, buffer: &mut [u8]) -> ProbeResult<()> {
        if address == 0 {
            return Err(ProbeError::read_failed("0x0", "null address"));
        }

        let read = unsafe { kernel32::read_process_memory(self.handle.raw(), address, buffer)? };
        trace!(pid = self.pid, address = format_args!("0x{:X}", address), len = read, "Remote read");

        if read != buffer.len() {
            return Err(ProbeError::read_failed(
                format!("0x{:X}", address),
                format!("short read: {} of {} bytes", read, buffer.len()),
            ));
        }
        Ok(())
    }

    /// Read a plain-old-data structure from the target
    pub fn read_struct<T: Copy>(&self, address: usize) -> ProbeResult<T> {
        let mut value = MaybeUninit::<T>::zeroed();
        // SAFETY: the slice covers exactly the storage of `value`
        let bytes = unsafe {
            std::slice::from_raw_parts_mut(value.as_mut_ptr() as *mut u8, mem::size_of::<T>())
        };
        self.read_exact(address, bytes)?;
        // SAFETY: T is Copy plain data and every byte was written
        Ok(unsafe { value.assume_init() })
    }
}

impl fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.pid)
            .field("access", &format_args!("0x{:X}", self.access.value()))
            .finish()
    }
}

impl fmt::Display for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProcessHandle(PID: {})", self.pid)
    }
}
