//! Storage backends and the cached repository layer.

pub mod cached;

#[cfg(any(feature = "inmemory", test))]
mod inmemory;

#[cfg(any(feature = "inmemory", test))]
pub use inmemory::InMemoryRepository;
