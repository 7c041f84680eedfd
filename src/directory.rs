//! Page table directory: one byte per process id in page 0, starting at
//! the layout's `ptp_offset`, holding the page number of that process's
//! page table. Zero means the process has no page table.

use log::debug;

use crate::constants::*;
use crate::error::{Result, VmError};
use crate::memory::PhysicalMemory;

fn slot_address(pm: &PhysicalMemory, proc_id: usize) -> Result<usize> {
    let layout = pm.layout();
    if proc_id >= layout.max_processes() {
        return Err(VmError::InvalidProcessId(proc_id));
    }
    Ok(pm.address(ZERO_PAGE, layout.ptp_offset() + proc_id))
}

/// Page table page of `proc_id`, or 0 when the process is not running
pub fn get_page_table_page(pm: &PhysicalMemory, proc_id: usize) -> Result<usize> {
    let addr = slot_address(pm, proc_id)?;
    Ok(pm.read(addr) as usize)
}

pub fn set_page_table_page(pm: &mut PhysicalMemory, proc_id: usize, page: usize) -> Result<()> {
    let addr = slot_address(pm, proc_id)?;
    pm.write(addr, page as u8);
    debug!("directory: proc {} -> page {}", proc_id, page);
    Ok(())
}

/// A process exists exactly when its directory slot is nonzero.
pub fn process_exists(pm: &PhysicalMemory, proc_id: usize) -> Result<bool> {
    Ok(get_page_table_page(pm, proc_id)? != 0)
}

/// Page table page of a running process
pub fn require_page_table(pm: &PhysicalMemory, proc_id: usize) -> Result<usize> {
    match get_page_table_page(pm, proc_id)? {
        0 => Err(VmError::NoSuchProcess(proc_id)),
        page => Ok(page),
    }
}

/// Ids of every process with a page table, ascending
pub fn running_processes(pm: &PhysicalMemory) -> Vec<usize> {
    let layout = pm.layout();
    let start = layout.ptp_offset();
    pm.page(ZERO_PAGE)[start..start + layout.max_processes()]
        .iter()
        .enumerate()
        .filter(|&(_, &page)| page != 0)
        .map(|(proc_id, _)| proc_id)
        .collect()
}
