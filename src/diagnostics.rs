//! Read-only renderings of the free-page map and page tables.

use std::fmt::Write;

use crate::allocator::is_page_used;
use crate::constants::FREE_MAP_COLUMNS;
use crate::error::Result;
use crate::memory::PhysicalMemory;
use crate::process::mapped_pages;

/// Grid of `#` (used) and `.` (free), 16 pages per row
pub fn render_free_map(pm: &PhysicalMemory) -> String {
    let mut out = String::from("--- PAGE FREE MAP ---\n");
    let page_count = pm.layout().page_count();
    for page in 0..page_count {
        out.push(if is_page_used(pm, page) { '#' } else { '.' });
        if (page + 1) % FREE_MAP_COLUMNS == 0 || page + 1 == page_count {
            out.push('\n');
        }
    }
    out
}

/// Every mapped virtual page of `proc_id` as `vv -> pp` in hex
pub fn render_page_table(pm: &PhysicalMemory, proc_id: usize) -> Result<String> {
    let mut out = format!("--- PROCESS {} PAGE TABLE ---\n", proc_id);
    for (vpage, page) in mapped_pages(pm, proc_id)? {
        let _ = writeln!(out, "{:02x} -> {:02x}", vpage, page);
    }
    Ok(out)
}
