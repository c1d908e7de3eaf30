#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A hash table resolving collisions by separate chaining.
///
/// This module provides `ChainedHashTable`, which grows whenever an insert
/// leaves a chain longer than the configured threshold.
pub mod chained_table;

/// Sizing and growth policy, and a builder for tables.
pub mod config;

pub mod error;

/// Hashing seam between keys and bucket indices.
pub mod hasher;

/// Chain-length statistics for tuning hashers and growth policies.
#[cfg(feature = "stats")]
pub mod stats;

pub use chained_table::ChainedHashTable;
pub use chained_table::Entry;
pub use config::TableBuilder;
pub use config::TableConfig;
pub use error::ConfigError;
#[cfg(any(feature = "foldhash", feature = "std"))]
pub use hasher::DefaultHasher;
pub use hasher::HashBuilder;
pub use hasher::KeyHasher;
