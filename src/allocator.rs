//! Page allocator.
//!
//! The allocator has no state of its own: the free-page bitmap lives in
//! page 0, one byte per page number (0 = free, nonzero = used).

use log::{debug, warn};

use crate::constants::*;
use crate::error::{Result, VmError};
use crate::memory::PhysicalMemory;

/// Whether the bitmap marks `page` as used
#[inline]
pub fn is_page_used(pm: &PhysicalMemory, page: usize) -> bool {
    pm.read(pm.address(ZERO_PAGE, page)) != PAGE_FREE
}

/// Allocate the lowest-numbered free page.
///
/// Page 0 is never handed out. Returns `None` once every page is used.
pub fn allocate_page(pm: &mut PhysicalMemory) -> Option<usize> {
    for page in 1..pm.layout().page_count() {
        let addr = pm.address(ZERO_PAGE, page);
        if pm.read(addr) == PAGE_FREE {
            pm.write(addr, PAGE_USED);
            debug!("allocated page {}", page);
            return Some(page);
        }
    }
    warn!("no free pages");
    None
}

/// Return a page to the free pool.
///
/// Freeing a page that is already free is a no-op. The zero page and page
/// numbers past the end of memory are rejected.
pub fn free_page(pm: &mut PhysicalMemory, page: usize) -> Result<()> {
    if page == ZERO_PAGE || page >= pm.layout().page_count() {
        return Err(VmError::InvalidPage(page));
    }
    if !is_page_used(pm, page) {
        warn!("page {} freed twice", page);
        return Ok(());
    }
    let addr = pm.address(ZERO_PAGE, page);
    pm.write(addr, PAGE_FREE);
    debug!("freed page {}", page);
    Ok(())
}

/// Count the pages available for allocation
pub fn free_count(pm: &PhysicalMemory) -> usize {
    (0..pm.layout().page_count())
        .filter(|&page| !is_page_used(pm, page))
        .count()
}
