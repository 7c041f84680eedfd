pub mod allocator;
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod directory;
pub mod error;
pub mod io;
pub mod logger;
pub mod memory;
pub mod process;
pub mod translation;
pub mod vm_manager;

// Re-export commonly used items for convenience
pub use config::Layout;
pub use error::{AllocStep, VmError};
pub use io::Command;
pub use process::ProcessPages;
pub use translation::{Access, AccessKind, VirtualAddress};
pub use vm_manager::VmManager;
