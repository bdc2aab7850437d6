//! Adapters implementing the domain ports: record stores and sandbox
//! payment collaborators.

pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod sandbox;
