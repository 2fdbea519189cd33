//! Infrastructure adapters implementing the domain ports.

pub mod access;
pub mod in_memory;
pub mod notify;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
