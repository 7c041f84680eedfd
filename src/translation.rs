use std::fmt;

use log::info;

use crate::config::Layout;
use crate::directory::require_page_table;
use crate::error::{Result, VmError};
use crate::memory::PhysicalMemory;

/// Represents the decomposed components of a Virtual Address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualAddress {
    pub va: usize,
    /// virtual page number
    pub page: usize,
    /// offset within the page
    pub offset: usize,
}

impl VirtualAddress {
    /// Decompose a raw VA into its components
    pub fn from_raw(va: usize, layout: &Layout) -> Self {
        VirtualAddress {
            va,
            page: va >> layout.page_shift(),
            offset: va & layout.offset_mask(),
        }
    }
}

impl fmt::Display for VirtualAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VA({}) = (page={}, offset={})", self.va, self.page, self.offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Store,
    Load,
}

/// One translated load or store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub kind: AccessKind,
    pub proc_id: usize,
    pub vaddr: usize,
    pub paddr: usize,
    pub value: u8,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            AccessKind::Store => "Store",
            AccessKind::Load => "Load",
        };
        write!(
            f,
            "{} proc {}: {} => {}, value={}",
            kind, self.proc_id, self.vaddr, self.paddr, self.value
        )
    }
}

/// Translate a virtual address of `proc_id` to a physical address.
///
/// Walks the single-level page table: the virtual page indexes the table,
/// the entry found there is the physical page, and the offset is carried
/// over unchanged. Entry 0 means unmapped.
pub fn translate(pm: &PhysicalMemory, proc_id: usize, vaddr: usize) -> Result<usize> {
    let page_table = require_page_table(pm, proc_id)?;
    let va = VirtualAddress::from_raw(vaddr, pm.layout());

    if va.page >= pm.layout().page_count() {
        return Err(VmError::InvalidAddress { proc_id, vaddr });
    }

    let phys_page = pm.page_table_entry(page_table, va.page);
    if phys_page == 0 {
        return Err(VmError::Unmapped { proc_id, vaddr, page: va.page });
    }

    Ok(pm.address(phys_page, va.offset))
}

/// Store the low byte of `value` at `vaddr` of `proc_id`
pub fn store(pm: &mut PhysicalMemory, proc_id: usize, vaddr: usize, value: i64) -> Result<Access> {
    let paddr = translate(pm, proc_id, vaddr)?;
    let value = value as u8;
    pm.write(paddr, value);

    let access = Access { kind: AccessKind::Store, proc_id, vaddr, paddr, value };
    info!("store proc={} vaddr={} paddr={} value={}", proc_id, vaddr, paddr, value);
    Ok(access)
}

/// Load the byte at `vaddr` of `proc_id`
pub fn load(pm: &PhysicalMemory, proc_id: usize, vaddr: usize) -> Result<Access> {
    let paddr = translate(pm, proc_id, vaddr)?;
    let value = pm.read(paddr);

    let access = Access { kind: AccessKind::Load, proc_id, vaddr, paddr, value };
    info!("load proc={} vaddr={} paddr={} value={}", proc_id, vaddr, paddr, value);
    Ok(access)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::create_process;

    #[test]
    fn test_va_decomposition() {
        let layout = Layout::default();
        let va = VirtualAddress::from_raw(0x0312, &layout);
        assert_eq!(va.page, 3);
        assert_eq!(va.offset, 0x12);

        let va = VirtualAddress::from_raw(255, &layout);
        assert_eq!(va.page, 0);
        assert_eq!(va.offset, 255);

        let va = VirtualAddress::from_raw(256, &layout);
        assert_eq!(va.page, 1);
        assert_eq!(va.offset, 0);
    }

    #[test]
    fn test_va_decomposition_small_pages() {
        let layout = Layout::with_pages(64, 32, None).unwrap();
        let va = VirtualAddress::from_raw(200, &layout);
        assert_eq!(va.page, 3);
        assert_eq!(va.offset, 8);
    }

    #[test]
    fn test_display() {
        let va = VirtualAddress::from_raw(513, &Layout::default());
        assert_eq!(va.to_string(), "VA(513) = (page=2, offset=1)");
    }

    #[test]
    fn test_translate_walks_page_table() {
        let mut pm = PhysicalMemory::default();
        let pages = create_process(&mut pm, 0, 3).unwrap();

        // page table in page 1, data in pages 2, 3, 4
        assert_eq!(translate(&pm, 0, 0).unwrap(), 2 << 8);
        assert_eq!(translate(&pm, 0, 10).unwrap(), (2 << 8) | 10);
        assert_eq!(translate(&pm, 0, 256 + 7).unwrap(), (3 << 8) | 7);
        assert_eq!(
            translate(&pm, 0, 2 * 256 + 255).unwrap(),
            (pages.data_pages[2] << 8) | 255
        );
    }

    #[test]
    fn test_translate_errors() {
        let mut pm = PhysicalMemory::default();
        create_process(&mut pm, 0, 1).unwrap();

        assert_eq!(translate(&pm, 1, 0), Err(VmError::NoSuchProcess(1)));
        assert_eq!(
            translate(&pm, 0, 256),
            Err(VmError::Unmapped { proc_id: 0, vaddr: 256, page: 1 })
        );
        assert_eq!(
            translate(&pm, 0, 64 * 256),
            Err(VmError::InvalidAddress { proc_id: 0, vaddr: 64 * 256 })
        );
    }

    #[test]
    fn test_store_then_load() {
        let mut pm = PhysicalMemory::default();
        create_process(&mut pm, 0, 2).unwrap();

        let stored = store(&mut pm, 0, 0, 42).unwrap();
        assert_eq!(stored.paddr, 2 << 8);
        assert_eq!(pm.read(2 << 8), 42);

        let loaded = load(&pm, 0, 0).unwrap();
        assert_eq!(loaded.value, 42);
        assert_eq!(loaded.paddr, stored.paddr);
    }

    #[test]
    fn test_store_truncates_to_byte() {
        let mut pm = PhysicalMemory::default();
        create_process(&mut pm, 0, 1).unwrap();

        assert_eq!(store(&mut pm, 0, 5, 300).unwrap().value, 44);
        assert_eq!(store(&mut pm, 0, 6, -1).unwrap().value, 255);
        assert_eq!(load(&pm, 0, 5).unwrap().value, 44);
    }

    #[test]
    fn test_failed_store_writes_nothing() {
        let mut pm = PhysicalMemory::default();
        create_process(&mut pm, 0, 1).unwrap();
        let before = pm.data().to_vec();
        assert!(store(&mut pm, 0, 300, 9).is_err());
        assert_eq!(pm.data(), &before[..]);
    }

    #[test]
    fn test_access_display() {
        let mut pm = PhysicalMemory::default();
        create_process(&mut pm, 1, 2).unwrap();

        let access = store(&mut pm, 1, 300, 7).unwrap();
        assert_eq!(access.to_string(), "Store proc 1: 300 => 812, value=7");
        let access = load(&pm, 1, 300).unwrap();
        assert_eq!(access.to_string(), "Load proc 1: 300 => 812, value=7");
    }
}
