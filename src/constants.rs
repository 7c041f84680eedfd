// default layout of simulated RAM; `config::Layout` validates any override
pub const PAGE_SHIFT: u32 = 8;
pub const PAGE_SIZE: usize = 1 << PAGE_SHIFT;
pub const PAGE_COUNT: usize = 64;
pub const MEM_SIZE: usize = PAGE_SIZE * PAGE_COUNT;

// byte offset in page 0 where the page-table-pointer directory starts;
// bytes [0, PAGE_COUNT) of page 0 are the free-page bitmap
pub const PTP_OFFSET: usize = 64;

// page numbers are stored in single bytes
pub const MAX_PAGE_COUNT: usize = 256;

pub const ZERO_PAGE: usize = 0;

pub const PAGE_FREE: u8 = 0;
pub const PAGE_USED: u8 = 1;

// columns in the rendered free-page map
pub const FREE_MAP_COLUMNS: usize = 16;
