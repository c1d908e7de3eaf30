use crate::chained_table::ChainedHashTable;
use crate::error::ConfigError;
use crate::hasher::KeyHasher;

/// Number of buckets a table starts with unless told otherwise.
pub const DEFAULT_BUCKETS: usize = 100;

/// Longest chain tolerated before the table grows.
pub const DEFAULT_MAX_CHAIN_LEN: usize = 5;

/// Multiplier applied to the entry count to size the grown bucket array.
pub const DEFAULT_GROWTH_FACTOR: usize = 2;

/// Sizing and growth policy of a [`ChainedHashTable`].
///
/// When an insert leaves a chain longer than `max_chain_len`, the table is
/// rebuilt with `len * growth_factor` buckets. The new size follows the number
/// of entries rather than the old bucket count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    /// Bucket count of a freshly created table. Must be non-zero.
    pub initial_buckets: usize,
    /// Chains longer than this trigger a resize. Must be non-zero.
    pub max_chain_len: usize,
    /// Must be non-zero.
    pub growth_factor: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TableConfig {
    /// The default policy: 100 buckets, chains of up to 5, growth factor 2.
    pub const fn new() -> Self {
        Self {
            initial_buckets: DEFAULT_BUCKETS,
            max_chain_len: DEFAULT_MAX_CHAIN_LEN,
            growth_factor: DEFAULT_GROWTH_FACTOR,
        }
    }

    /// Checks that every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_buckets == 0 {
            return Err(ConfigError::ZeroBuckets);
        }
        if self.max_chain_len == 0 {
            return Err(ConfigError::ZeroMaxChainLen);
        }
        if self.growth_factor == 0 {
            return Err(ConfigError::ZeroGrowthFactor);
        }
        Ok(())
    }

    /// Bucket count after growing a table holding `entries` entries.
    ///
    /// Never zero, so an empty table still has a bucket to hash into.
    #[inline]
    pub fn grown_bucket_count(&self, entries: usize) -> usize {
        entries.saturating_mul(self.growth_factor).max(1)
    }
}

/// Fluent construction of a [`ChainedHashTable`].
///
/// # Examples
///
/// ```rust
/// # use chain_hash::TableBuilder;
/// #
/// let mut table = TableBuilder::new(|key: &u32| *key as u64)
///     .initial_buckets(8)
///     .max_chain_len(3)
///     .build::<u32, &str>()
///     .unwrap();
///
/// assert!(table.insert(1, "one"));
/// assert_eq!(table.bucket_count(), 8);
/// ```
#[derive(Debug, Clone)]
pub struct TableBuilder<H> {
    config: TableConfig,
    hasher: H,
}

impl<H> TableBuilder<H> {
    /// Starts from the default [`TableConfig`] with the given hasher.
    pub fn new(hasher: H) -> Self {
        Self {
            config: TableConfig::default(),
            hasher,
        }
    }

    /// Sets the bucket count the table starts with.
    pub fn initial_buckets(mut self, buckets: usize) -> Self {
        self.config.initial_buckets = buckets;
        self
    }

    /// Sets the longest chain tolerated before growing.
    pub fn max_chain_len(mut self, len: usize) -> Self {
        self.config.max_chain_len = len;
        self
    }

    /// Sets the multiplier applied to the entry count on growth.
    pub fn growth_factor(mut self, factor: usize) -> Self {
        self.config.growth_factor = factor;
        self
    }

    /// Replaces the whole policy.
    pub fn config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the table, rejecting an invalid policy.
    pub fn build<K, V>(self) -> Result<ChainedHashTable<K, V, H>, ConfigError>
    where
        K: Eq,
        H: KeyHasher<K>,
    {
        ChainedHashTable::try_with_config(self.config, self.hasher)
    }
}
