//! Memory layout configuration.
//!
//! The four layout values are mutually constrained and form the only
//! persisted format in the simulator: page 0 holds the free-page bitmap in
//! bytes `[0, page_count)` and the page-table-pointer directory in bytes
//! `[ptp_offset, page_size)`.

use crate::constants::*;
use crate::error::{Result, VmError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    mem_size: usize,
    page_size: usize,
    page_count: usize,
    ptp_offset: usize,
    page_shift: u32,
}

impl Layout {
    /// Build a layout, checking every invariant the address arithmetic
    /// relies on.
    pub fn new(mem_size: usize, page_size: usize, page_count: usize, ptp_offset: usize) -> Result<Self> {
        if page_size == 0 || !page_size.is_power_of_two() {
            return Err(VmError::InvariantViolation(format!(
                "page size {} is not a power of two",
                page_size
            )));
        }
        if page_size.checked_mul(page_count) != Some(mem_size) {
            return Err(VmError::InvariantViolation(format!(
                "page size {} * page count {} != memory size {}",
                page_size, page_count, mem_size
            )));
        }
        if page_count == 0 || page_count > MAX_PAGE_COUNT {
            return Err(VmError::InvariantViolation(format!(
                "page count {} must be in 1..={}",
                page_count, MAX_PAGE_COUNT
            )));
        }
        if page_count > ptp_offset {
            return Err(VmError::InvariantViolation(format!(
                "free-page bitmap ({} bytes) overlaps directory at offset {}",
                page_count, ptp_offset
            )));
        }
        if ptp_offset >= page_size {
            return Err(VmError::InvariantViolation(format!(
                "directory offset {} leaves no room in a {} byte page",
                ptp_offset, page_size
            )));
        }

        Ok(Layout {
            mem_size,
            page_size,
            page_count,
            ptp_offset,
            page_shift: page_size.trailing_zeros(),
        })
    }

    /// Layout derived from a page size and count, with the directory placed
    /// right after the bitmap unless an offset is given.
    pub fn with_pages(page_size: usize, page_count: usize, ptp_offset: Option<usize>) -> Result<Self> {
        let mem_size = page_size.checked_mul(page_count).ok_or_else(|| {
            VmError::InvariantViolation(format!("{} pages of {} bytes overflow", page_count, page_size))
        })?;
        Self::new(mem_size, page_size, page_count, ptp_offset.unwrap_or(page_count))
    }

    #[inline]
    pub fn mem_size(&self) -> usize {
        self.mem_size
    }

    #[inline]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[inline]
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    #[inline]
    pub fn ptp_offset(&self) -> usize {
        self.ptp_offset
    }

    #[inline]
    pub fn page_shift(&self) -> u32 {
        self.page_shift
    }

    #[inline]
    pub fn offset_mask(&self) -> usize {
        self.page_size - 1
    }

    /// Number of process id slots in the directory.
    #[inline]
    pub fn max_processes(&self) -> usize {
        self.page_size - self.ptp_offset
    }
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            mem_size: MEM_SIZE,
            page_size: PAGE_SIZE,
            page_count: PAGE_COUNT,
            ptp_offset: PTP_OFFSET,
            page_shift: PAGE_SHIFT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_is_valid() {
        let checked = Layout::new(MEM_SIZE, PAGE_SIZE, PAGE_COUNT, PTP_OFFSET).unwrap();
        assert_eq!(checked, Layout::default());
        assert_eq!(checked.page_shift(), 8);
        assert_eq!(checked.offset_mask(), 0xFF);
        assert_eq!(checked.max_processes(), 192);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let err = Layout::new(16000, 256, 64, 64).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_non_power_of_two_rejected() {
        assert!(Layout::new(300 * 64, 300, 64, 64).is_err());
        assert!(Layout::new(0, 0, 64, 64).is_err());
    }

    #[test]
    fn test_directory_must_follow_bitmap() {
        // bitmap of 64 bytes would run into a directory at 32
        assert!(Layout::new(16384, 256, 64, 32).is_err());
        // directory must start inside page 0
        assert!(Layout::new(16384, 256, 64, 256).is_err());
    }

    #[test]
    fn test_page_numbers_fit_in_a_byte() {
        assert!(Layout::with_pages(1024, 512, None).is_err());
        assert!(Layout::with_pages(1024, 256, None).is_ok());
    }

    #[test]
    fn test_with_pages_defaults_offset_to_page_count() {
        let layout = Layout::with_pages(128, 32, None).unwrap();
        assert_eq!(layout.mem_size(), 4096);
        assert_eq!(layout.ptp_offset(), 32);
        assert_eq!(layout.page_shift(), 7);
        assert_eq!(layout.max_processes(), 96);
    }
}
