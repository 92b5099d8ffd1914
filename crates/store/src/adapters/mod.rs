//! Concrete [`TextStorage`](crate::ports::TextStorage) implementations

mod fs;
mod memory;

pub use fs::FsStorage;
pub use memory::MemoryStorage;
