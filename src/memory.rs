use crate::config::Layout;
use crate::constants::*;

/// Simulated RAM: `page_count` pages of `page_size` bytes.
///
/// Page 0 is reserved. Its first `page_count` bytes are the free-page
/// bitmap and the bytes from `ptp_offset` on are the page table directory.
pub struct PhysicalMemory {
    layout: Layout,
    data: Box<[u8]>,
}

impl PhysicalMemory {
    /// Create zeroed memory with the zero page marked used
    pub fn new(layout: Layout) -> Self {
        let mut pm = PhysicalMemory {
            layout,
            data: vec![0u8; layout.mem_size()].into_boxed_slice(),
        };
        pm.initialize();
        pm
    }

    /// Zero every byte and mark the zero page allocated
    pub fn initialize(&mut self) {
        self.data.fill(0);
        let zero_page = self.address(ZERO_PAGE, 0);
        self.data[zero_page] = PAGE_USED;
    }

    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Compose a page number and in-page offset into a linear address.
    ///
    /// `offset` must be below the page size; the page number is not checked.
    #[inline]
    pub fn address(&self, page: usize, offset: usize) -> usize {
        (page << self.layout.page_shift()) | offset
    }

    /// Read a byte from physical memory
    #[inline]
    pub fn read(&self, address: usize) -> u8 {
        self.data[address]
    }

    /// Write a byte to physical memory
    #[inline]
    pub fn write(&mut self, address: usize, value: u8) {
        self.data[address] = value;
    }

    /// Borrow the bytes of one page
    pub fn page(&self, page: usize) -> &[u8] {
        let start = self.address(page, 0);
        &self.data[start..start + self.layout.page_size()]
    }

    /// Get a Page Table entry
    #[inline]
    pub fn page_table_entry(&self, pt_page: usize, vpage: usize) -> usize {
        self.read(self.address(pt_page, vpage)) as usize
    }

    /// Set a Page Table entry
    #[inline]
    pub fn set_page_table_entry(&mut self, pt_page: usize, vpage: usize, page: usize) {
        let addr = self.address(pt_page, vpage);
        self.write(addr, page as u8);
    }

    /// Get direct access to the underlying bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Default for PhysicalMemory {
    fn default() -> Self {
        Self::new(Layout::default())
    }
}
