pub mod error;
pub mod handle;
pub mod memory;
pub mod traits;

pub use error::*;
pub use handle::*;
pub use traits::*;

// Re-export backends for convenience
pub use memory::MemoryIndexStore;
