//! Errors reported when building a table.

/// Rejected construction arguments for a
/// [`ChainedHashTable`](crate::ChainedHashTable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The table was asked to start with zero buckets.
    #[error("a chained hash table needs at least one bucket")]
    ZeroBuckets,
    /// The chain length threshold was zero, which would grow on every insert.
    #[error("the maximum chain length must be at least 1")]
    ZeroMaxChainLen,
    /// The growth factor was zero, which would shrink the table to nothing.
    #[error("the growth factor must be at least 1")]
    ZeroGrowthFactor,
}
