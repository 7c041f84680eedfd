//! Process lifecycle: building and tearing down page tables.
//!
//! A process owns one page-table page plus its data pages. Virtual page
//! `i` maps to the `i`-th data page in allocation order.

use log::{info, warn};

use crate::allocator::{allocate_page, free_page};
use crate::directory::{get_page_table_page, require_page_table, set_page_table_page};
use crate::error::{AllocStep, Result, VmError};
use crate::memory::PhysicalMemory;

/// Pages handed to a newly created process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessPages {
    pub proc_id: usize,
    pub page_table: usize,
    /// Physical page for each virtual page, indexed by virtual page number
    pub data_pages: Vec<usize>,
}

/// Create `proc_id` with a page table and `page_count` data pages.
///
/// Allocation is best effort. If the allocator runs dry at data page `i`,
/// the error is `OutOfMemory { step: DataPage(i) }` and the process is left
/// running with virtual pages `0..i` mapped; nothing is rolled back.
/// Failing on the page table itself leaves memory untouched.
pub fn create_process(pm: &mut PhysicalMemory, proc_id: usize, page_count: usize) -> Result<ProcessPages> {
    if get_page_table_page(pm, proc_id)? != 0 {
        return Err(VmError::ProcessExists(proc_id));
    }
    if page_count > pm.layout().page_count() {
        return Err(VmError::InvalidPageCount(page_count));
    }

    let page_table = allocate_page(pm).ok_or(VmError::OutOfMemory {
        proc_id,
        step: AllocStep::PageTable,
    })?;
    set_page_table_page(pm, proc_id, page_table)?;

    let mut data_pages = Vec::with_capacity(page_count);
    for vpage in 0..page_count {
        let Some(page) = allocate_page(pm) else {
            warn!(
                "proc {}: out of memory after {} of {} data pages",
                proc_id, vpage, page_count
            );
            return Err(VmError::OutOfMemory {
                proc_id,
                step: AllocStep::DataPage(vpage),
            });
        };
        pm.set_page_table_entry(page_table, vpage, page);
        data_pages.push(page);
    }

    info!(
        "created proc {}: page table in page {}, {} data pages",
        proc_id, page_table, page_count
    );
    Ok(ProcessPages { proc_id, page_table, data_pages })
}

/// Kill `proc_id`, returning its data pages and page table to the free
/// pool. Returns how many pages were freed.
pub fn destroy_process(pm: &mut PhysicalMemory, proc_id: usize) -> Result<usize> {
    let page_table = require_page_table(pm, proc_id)?;
    set_page_table_page(pm, proc_id, 0)?;

    let mut freed = 0;
    for vpage in 0..pm.layout().page_count() {
        let page = pm.page_table_entry(page_table, vpage);
        if page != 0 {
            pm.set_page_table_entry(page_table, vpage, 0);
            free_page(pm, page)?;
            freed += 1;
        }
    }
    free_page(pm, page_table)?;
    freed += 1;

    info!("killed proc {}: freed {} pages", proc_id, freed);
    Ok(freed)
}

/// Mapped virtual pages of `proc_id` as `(virtual page, physical page)`,
/// ascending by virtual page
pub fn mapped_pages(pm: &PhysicalMemory, proc_id: usize) -> Result<Vec<(usize, usize)>> {
    let page_table = require_page_table(pm, proc_id)?;
    Ok((0..pm.layout().page_count())
        .map(|vpage| (vpage, pm.page_table_entry(page_table, vpage)))
        .filter(|&(_, page)| page != 0)
        .collect())
}
