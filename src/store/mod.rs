//! Storage layer for rustdis

mod memory;

pub use memory::MemoryStore;
