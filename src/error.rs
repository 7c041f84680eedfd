//! Error types for the page table simulator.
//!
//! Allocation and lookup failures are local: the caller gets the error and
//! the simulation keeps running. Only `InvariantViolation` is fatal, and it
//! can only come out of `Layout` validation before any operation runs.

use std::fmt;

/// Which allocation inside `create_process` ran out of pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocStep {
    /// The page holding the process's page table.
    PageTable,
    /// Data page for virtual page `i`. Virtual pages `0..i` were mapped
    /// before the allocator ran dry and stay mapped.
    DataPage(usize),
}

/// Errors produced by the simulator core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    /// No free page was left for `step` while creating `proc_id`.
    OutOfMemory { proc_id: usize, step: AllocStep },
    /// The directory slot for this process id is empty.
    NoSuchProcess(usize),
    /// The directory slot for this process id is already taken.
    ProcessExists(usize),
    /// Process id falls outside the directory region of page 0.
    InvalidProcessId(usize),
    /// More data pages requested than a page table has slots.
    InvalidPageCount(usize),
    /// Page number is reserved (page 0) or past the end of memory.
    InvalidPage(usize),
    /// Virtual page number past the end of the page table.
    InvalidAddress { proc_id: usize, vaddr: usize },
    /// Virtual page has no physical page behind it.
    Unmapped { proc_id: usize, vaddr: usize, page: usize },
    /// Memory layout constants contradict each other.
    InvariantViolation(String),
}

impl VmError {
    /// Returns `true` for errors that must stop the simulation.
    pub fn is_fatal(&self) -> bool {
        matches!(self, VmError::InvariantViolation(_))
    }
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VmError::OutOfMemory { proc_id, step: AllocStep::PageTable } => {
                write!(f, "failed allocation {}: page table", proc_id)
            }
            VmError::OutOfMemory { proc_id, step: AllocStep::DataPage(i) } => {
                write!(f, "failed allocation {}: data page {}", proc_id, i)
            }
            VmError::NoSuchProcess(proc_id) => write!(f, "no such process {}", proc_id),
            VmError::ProcessExists(proc_id) => {
                write!(f, "process {} already has a page table", proc_id)
            }
            VmError::InvalidProcessId(proc_id) => write!(f, "invalid process id {}", proc_id),
            VmError::InvalidPageCount(count) => write!(f, "invalid page count {}", count),
            VmError::InvalidPage(page) => write!(f, "invalid page number {}", page),
            VmError::InvalidAddress { proc_id, vaddr } => {
                write!(f, "proc {}: virtual address {} out of range", proc_id, vaddr)
            }
            VmError::Unmapped { proc_id, vaddr, page } => {
                write!(
                    f,
                    "proc {}: virtual address {} is in unmapped page {}",
                    proc_id, vaddr, page
                )
            }
            VmError::InvariantViolation(msg) => write!(f, "layout invariant violated: {}", msg),
        }
    }
}

impl std::error::Error for VmError {}

pub type Result<T> = std::result::Result<T, VmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_messages() {
        let e = VmError::OutOfMemory { proc_id: 2, step: AllocStep::PageTable };
        assert_eq!(e.to_string(), "failed allocation 2: page table");

        let e = VmError::OutOfMemory { proc_id: 1, step: AllocStep::DataPage(62) };
        assert_eq!(e.to_string(), "failed allocation 1: data page 62");
    }

    #[test]
    fn test_lookup_message() {
        assert_eq!(VmError::NoSuchProcess(7).to_string(), "no such process 7");
    }

    #[test]
    fn test_only_invariant_violation_is_fatal() {
        assert!(VmError::InvariantViolation("x".into()).is_fatal());
        assert!(!VmError::NoSuchProcess(0).is_fatal());
        assert!(!VmError::OutOfMemory { proc_id: 0, step: AllocStep::PageTable }.is_fatal());
    }
}
