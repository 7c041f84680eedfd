use crate::allocator;
use crate::config::Layout;
use crate::diagnostics;
use crate::directory;
use crate::error::Result;
use crate::io::Command;
use crate::memory::PhysicalMemory;
use crate::process::{self, ProcessPages};
use crate::translation::{self, Access};

/// One independent simulation: owns its physical memory and exposes the
/// allocator, process and translation operations over it.
pub struct VmManager {
    pm: PhysicalMemory,
}

impl VmManager {
    pub fn new(layout: Layout) -> Self {
        VmManager { pm: PhysicalMemory::new(layout) }
    }

    /// Zero memory and mark the zero page used
    pub fn initialize(&mut self) {
        self.pm.initialize();
    }

    pub fn memory(&self) -> &PhysicalMemory {
        &self.pm
    }

    pub fn layout(&self) -> &Layout {
        self.pm.layout()
    }

    pub fn allocate_page(&mut self) -> Option<usize> {
        allocator::allocate_page(&mut self.pm)
    }

    pub fn free_page(&mut self, page: usize) -> Result<()> {
        allocator::free_page(&mut self.pm, page)
    }

    pub fn free_count(&self) -> usize {
        allocator::free_count(&self.pm)
    }

    pub fn create_process(&mut self, proc_id: usize, page_count: usize) -> Result<ProcessPages> {
        process::create_process(&mut self.pm, proc_id, page_count)
    }

    pub fn destroy_process(&mut self, proc_id: usize) -> Result<usize> {
        process::destroy_process(&mut self.pm, proc_id)
    }

    pub fn process_exists(&self, proc_id: usize) -> Result<bool> {
        directory::process_exists(&self.pm, proc_id)
    }

    pub fn running_processes(&self) -> Vec<usize> {
        directory::running_processes(&self.pm)
    }

    pub fn translate(&self, proc_id: usize, vaddr: usize) -> Result<usize> {
        translation::translate(&self.pm, proc_id, vaddr)
    }

    pub fn store_value(&mut self, proc_id: usize, vaddr: usize, value: i64) -> Result<Access> {
        translation::store(&mut self.pm, proc_id, vaddr, value)
    }

    pub fn load_value(&self, proc_id: usize, vaddr: usize) -> Result<Access> {
        translation::load(&self.pm, proc_id, vaddr)
    }

    pub fn render_free_map(&self) -> String {
        diagnostics::render_free_map(&self.pm)
    }

    pub fn render_page_table(&self, proc_id: usize) -> Result<String> {
        diagnostics::render_page_table(&self.pm, proc_id)
    }

    /// Run one command, returning whatever it prints
    pub fn execute(&mut self, command: &Command) -> Result<String> {
        match *command {
            Command::PrintFreeMap => Ok(self.render_free_map()),
            Command::PrintPageTable { proc_id } => self.render_page_table(proc_id),
            Command::NewProcess { proc_id, page_count } => {
                self.create_process(proc_id, page_count).map(|_| String::new())
            }
            Command::KillProcess { proc_id } => self.destroy_process(proc_id).map(|_| String::new()),
            Command::StoreByte { proc_id, vaddr, value } => self
                .store_value(proc_id, vaddr, value)
                .map(|access| format!("{}\n", access)),
            Command::LoadByte { proc_id, vaddr } => {
                self.load_value(proc_id, vaddr).map(|access| format!("{}\n", access))
            }
        }
    }
}

impl Default for VmManager {
    fn default() -> Self {
        Self::new(Layout::default())
    }
}
