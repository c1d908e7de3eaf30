use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter;

use log::debug;
use log::trace;

use crate::config::TableConfig;
use crate::error::ConfigError;
use crate::hasher::KeyHasher;

/// A key together with the data stored for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    /// The key. Unique within a table.
    pub key: K,
    /// The data associated with `key`.
    pub data: V,
}

impl<K, V> Entry<K, V> {
    /// Pairs `key` with `data`.
    pub fn new(key: K, data: V) -> Self {
        Self { key, data }
    }

    /// Splits the entry back into its key and data.
    pub fn into_parts(self) -> (K, V) {
        (self.key, self.data)
    }
}

type Bucket<K, V> = Vec<Entry<K, V>>;

fn empty_buckets<K, V>(count: usize) -> Vec<Bucket<K, V>> {
    iter::repeat_with(Vec::new).take(count).collect()
}

#[inline(always)]
fn bucket_for<K, H: KeyHasher<K>>(hasher: &H, key: &K, bucket_count: usize) -> usize {
    (hasher.hash_key(key) % bucket_count as u64) as usize
}

/// A hash table resolving collisions by separate chaining.
///
/// Every bucket holds the entries whose hash, reduced modulo the bucket count,
/// selects it, in insertion order. Once an insert leaves a chain longer than
/// [`TableConfig::max_chain_len`], the table is rebuilt with
/// `len * growth_factor` buckets and every entry is rehashed into it.
///
/// The table only remembers an upper bound on its longest chain. The bound is
/// raised by inserts, left alone by removals and reset to 1 after a resize, so
/// it can overstate the real longest chain after removals and understate it
/// after a resize with a poor hasher.
///
/// ## Example
///
/// ```rust
/// # use chain_hash::ChainedHashTable;
/// #
/// // All keys collide until the table grows.
/// let mut table: ChainedHashTable<u64, u64, _> =
///     ChainedHashTable::with_buckets_and_hasher(4, |key: &u64| key * 4);
///
/// for key in 1..=6 {
///     assert!(table.insert(key, key * 10));
/// }
///
/// // The sixth insert made a chain of 6 and the table grew to 6 * 2 buckets.
/// assert_eq!(table.bucket_count(), 12);
/// assert_eq!(table.find(&3), Some(&30));
/// ```
pub struct ChainedHashTable<K, V, H> {
    buckets: Vec<Bucket<K, V>>,
    hasher: H,
    config: TableConfig,

    len: usize,
    max_chain_len: usize,
    resizes: usize,
}

impl<K, V, H> Debug for ChainedHashTable<K, V, H>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if f.alternate() {
            f.debug_struct("ChainedHashTable")
                .field("len", &self.len)
                .field("bucket_count", &self.buckets.len())
                .field("max_chain_len", &self.max_chain_len)
                .field("config", &self.config)
                .field("buckets", &self.buckets)
                .finish()
        } else {
            let mut map = f.debug_map();
            for entry in self.buckets.iter().flatten() {
                map.entry(&entry.key, &entry.data);
            }
            map.finish()
        }
    }
}

impl<K, V, H> Clone for ChainedHashTable<K, V, H>
where
    K: Eq + Clone,
    V: Clone,
    H: KeyHasher<K> + Clone,
{
    /// Rebuilds the chains by rehashing every entry into a table of the same
    /// bucket count, rather than copying the bucket array as is.
    fn clone(&self) -> Self {
        let bucket_count = self.buckets.len();
        let mut buckets = empty_buckets(bucket_count);
        for entry in self.buckets.iter().flatten() {
            let index = bucket_for(&self.hasher, &entry.key, bucket_count);
            buckets[index].push(entry.clone());
        }

        Self {
            buckets,
            hasher: self.hasher.clone(),
            config: self.config,
            len: self.len,
            max_chain_len: self.max_chain_len,
            resizes: 0,
        }
    }
}

impl<K, V, H> ChainedHashTable<K, V, H>
where
    K: Eq,
    H: KeyHasher<K>,
{
    /// Creates a table with the default [`TableConfig`] and the given hasher.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::ChainedHashTable;
    /// #
    /// let table: ChainedHashTable<u64, &str, _> = ChainedHashTable::with_hasher(|k: &u64| *k);
    /// assert_eq!(table.bucket_count(), 100);
    /// assert!(table.is_empty());
    /// ```
    pub fn with_hasher(hasher: H) -> Self {
        Self::with_config(TableConfig::default(), hasher)
    }

    /// Creates a table starting with `buckets` buckets.
    ///
    /// # Panics
    ///
    /// Panics if `buckets` is zero.
    pub fn with_buckets_and_hasher(buckets: usize, hasher: H) -> Self {
        Self::with_config(
            TableConfig {
                initial_buckets: buckets,
                ..TableConfig::default()
            },
            hasher,
        )
    }

    /// Creates a table following `config`.
    ///
    /// # Panics
    ///
    /// Panics if `config` does not pass [`TableConfig::validate`]. Use
    /// [`try_with_config`](Self::try_with_config) to handle that case.
    pub fn with_config(config: TableConfig, hasher: H) -> Self {
        match Self::try_with_config(config, hasher) {
            Ok(table) => table,
            Err(err) => panic!("invalid table configuration: {err}"),
        }
    }

    /// Creates a table following `config`, or reports why `config` is
    /// unusable.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::ChainedHashTable;
    /// # use chain_hash::ConfigError;
    /// # use chain_hash::TableConfig;
    /// #
    /// let config = TableConfig { initial_buckets: 0, ..TableConfig::default() };
    /// let result = ChainedHashTable::<u64, u64, _>::try_with_config(config, |k: &u64| *k);
    /// assert_eq!(result.err(), Some(ConfigError::ZeroBuckets));
    /// ```
    pub fn try_with_config(config: TableConfig, hasher: H) -> Result<Self, ConfigError> {
        config.validate()?;
        trace!(
            "creating chained hash table: {} buckets, max chain {}, growth x{}",
            config.initial_buckets, config.max_chain_len, config.growth_factor
        );

        Ok(Self {
            buckets: empty_buckets(config.initial_buckets),
            hasher,
            config,
            len: 0,
            max_chain_len: 0,
            resizes: 0,
        })
    }

    #[inline(always)]
    fn bucket_index(&self, key: &K) -> usize {
        bucket_for(&self.hasher, key, self.buckets.len())
    }

    /// Inserts `data` under `key`.
    ///
    /// Returns `false` and leaves the table untouched if `key` is already
    /// present. May grow the table.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::ChainedHashTable;
    /// #
    /// let mut table: ChainedHashTable<u64, &str, _> = ChainedHashTable::with_hasher(|k: &u64| *k);
    /// assert!(table.insert(37, "a"));
    /// assert!(!table.insert(37, "b"));
    /// assert_eq!(table.find(&37), Some(&"a"));
    /// ```
    pub fn insert(&mut self, key: K, data: V) -> bool {
        self.insert_entry(Entry::new(key, data))
    }

    /// Inserts a ready-made [`Entry`]. Same semantics as
    /// [`insert`](Self::insert); a rejected entry is dropped.
    pub fn insert_entry(&mut self, entry: Entry<K, V>) -> bool {
        let index = self.bucket_index(&entry.key);
        let bucket = &mut self.buckets[index];
        if bucket.iter().any(|existing| existing.key == entry.key) {
            return false;
        }

        bucket.push(entry);
        self.max_chain_len = self.max_chain_len.max(bucket.len());
        self.len += 1;

        self.maybe_resize_rehash();
        true
    }

    /// Removes `key` from the table, returning whether it was present.
    ///
    /// The table never shrinks, and the tracked maximum chain length is left
    /// as it was.
    pub fn remove(&mut self, key: &K) -> bool {
        self.remove_entry(key).is_some()
    }

    /// Removes `key` from the table and hands back its entry.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::ChainedHashTable;
    /// # use chain_hash::Entry;
    /// #
    /// let mut table: ChainedHashTable<u64, &str, _> = ChainedHashTable::with_hasher(|k: &u64| *k);
    /// table.insert(1, "a");
    /// assert_eq!(table.remove_entry(&1), Some(Entry::new(1, "a")));
    /// assert_eq!(table.remove_entry(&1), None);
    /// ```
    pub fn remove_entry(&mut self, key: &K) -> Option<Entry<K, V>> {
        let index = self.bucket_index(key);
        let bucket = &mut self.buckets[index];
        let position = bucket.iter().position(|entry| entry.key == *key)?;

        self.len -= 1;
        Some(bucket.remove(position))
    }

    /// Returns a reference to the data stored under `key`.
    pub fn find(&self, key: &K) -> Option<&V> {
        self.buckets[self.bucket_index(key)]
            .iter()
            .find(|entry| entry.key == *key)
            .map(|entry| &entry.data)
    }

    /// Returns a mutable reference to the data stored under `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::ChainedHashTable;
    /// #
    /// let mut table: ChainedHashTable<u64, i32, _> = ChainedHashTable::with_hasher(|k: &u64| *k);
    /// table.insert(1, 10);
    /// if let Some(data) = table.find_mut(&1) {
    ///     *data += 5;
    /// }
    /// assert_eq!(table.find(&1), Some(&15));
    /// ```
    pub fn find_mut(&mut self, key: &K) -> Option<&mut V> {
        let index = self.bucket_index(key);
        self.buckets[index]
            .iter_mut()
            .find(|entry| entry.key == *key)
            .map(|entry| &mut entry.data)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Removes every entry. The bucket count is kept.
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(Vec::clear);
        self.len = 0;
        self.max_chain_len = 0;
    }

    #[inline]
    fn maybe_resize_rehash(&mut self) {
        if self.max_chain_len > self.config.max_chain_len {
            self.resize_rehash();
        }
    }

    #[cold]
    fn resize_rehash(&mut self) {
        let new_count = self.config.grown_bucket_count(self.len);
        let old_buckets = core::mem::replace(&mut self.buckets, empty_buckets(new_count));
        let old_count = old_buckets.len();

        for entry in old_buckets.into_iter().flatten() {
            let index = self.bucket_index(&entry.key);
            self.buckets[index].push(entry);
        }

        debug!(
            "chain of {} exceeded limit {}: rehashed {} entries from {} to {} buckets",
            self.max_chain_len, self.config.max_chain_len, self.len, old_count, new_count
        );

        // Assumed, not measured.
        self.max_chain_len = 1;
        self.resizes += 1;
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<K, V, H> ChainedHashTable<K, V, H>
where
    K: Eq,
    H: KeyHasher<K> + Default,
{
    /// Creates a table with the default [`TableConfig`] and a default hasher.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::ChainedHashTable;
    /// # use chain_hash::DefaultHasher;
    /// #
    /// let mut table: ChainedHashTable<&str, i32, DefaultHasher> = ChainedHashTable::new();
    /// table.insert("one", 1);
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(H::default())
    }
}

#[cfg(any(feature = "foldhash", feature = "std"))]
impl<K, V, H> Default for ChainedHashTable<K, V, H>
where
    K: Eq,
    H: KeyHasher<K> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H> ChainedHashTable<K, V, H> {
    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the tracked upper bound on the longest chain since the last
    /// resize.
    pub fn max_chain_len(&self) -> usize {
        self.max_chain_len
    }

    /// Returns the sizing and growth policy.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Returns the hasher.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Returns how many times this table has grown since it was created.
    pub fn resize_count(&self) -> usize {
        self.resizes
    }

    #[cfg(feature = "stats")]
    pub(crate) fn chain_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().map(Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use core::hash::BuildHasher;

    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use siphasher::sip::SipHasher;

    use super::*;
    use crate::hasher::HashBuilder;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap_or(0),
                k2: rng.try_next_u64().unwrap_or(0),
            }
        }
    }

    type SipTable<K, V> = ChainedHashTable<K, V, HashBuilder<SipHashBuilder>>;

    fn sip_table<K: core::hash::Hash + Eq, V>() -> SipTable<K, V> {
        ChainedHashTable::with_hasher(HashBuilder::new(SipHashBuilder::default()))
    }

    fn identity(key: &u64) -> u64 {
        *key
    }

    fn times_four(key: &u64) -> u64 {
        key * 4
    }

    fn constant(_: &u64) -> u64 {
        0
    }

    type FnTable<V> = ChainedHashTable<u64, V, fn(&u64) -> u64>;

    fn fn_table<V>(buckets: usize, hasher: fn(&u64) -> u64) -> FnTable<V> {
        ChainedHashTable::with_buckets_and_hasher(buckets, hasher)
    }

    #[test]
    fn insert_and_find() {
        let mut table = sip_table::<u64, i32>();
        for k in 0..32u64 {
            assert!(table.insert(k, (k as i32) * 2), "{:#?}", table);
            assert_eq!(table.find(&k), Some(&((k as i32) * 2)), "{:#?}", table);
        }
        assert_eq!(table.len(), 32);
        for k in 0..32u64 {
            assert_eq!(table.find(&k), Some(&((k as i32) * 2)), "{:#?}", table);
        }

        assert!(table.find(&999).is_none());
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut table = sip_table::<u64, i32>();
        assert!(table.insert(42, 7));
        assert!(!table.insert(42, 11));

        assert_eq!(table.len(), 1);
        assert_eq!(table.find(&42), Some(&7));
    }

    #[test]
    fn duplicate_insert_entry_is_rejected() {
        let mut table = sip_table::<u64, i32>();
        assert!(table.insert_entry(Entry::new(1, 1)));
        assert!(!table.insert_entry(Entry::new(1, 2)));
        assert_eq!(table.find(&1), Some(&1));
    }

    #[test]
    fn find_mut_and_modify() {
        let mut table = sip_table::<u64, i32>();
        for k in 0..5u64 {
            table.insert(k, 1);
        }

        for k in 0..5u64 {
            if let Some(v) = table.find_mut(&k) {
                *v += 9;
            }
        }
        for k in 0..5u64 {
            assert_eq!(table.find(&k), Some(&10));
        }
        assert!(table.find_mut(&5).is_none());
    }

    #[test]
    fn remove_items() {
        let mut table = sip_table::<u64, i32>();
        for k in 0..8u64 {
            table.insert(k, k as i32);
        }
        assert_eq!(table.len(), 8);

        for k in [0u64, 3, 7] {
            assert!(table.remove(&k));
            assert!(table.find(&k).is_none());
            assert!(!table.contains_key(&k));
        }
        assert_eq!(table.len(), 5);

        assert!(!table.remove(&1000));
        assert!(!table.remove(&3));
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn remove_entry_returns_ownership() {
        let mut table = sip_table::<String, String>();
        table.insert("key".to_string(), "value".to_string());

        let entry = table.remove_entry(&"key".to_string()).unwrap();
        assert_eq!(
            entry.into_parts(),
            ("key".to_string(), "value".to_string())
        );
        assert!(table.is_empty());
    }

    #[test]
    fn remove_from_empty_table() {
        let mut table = sip_table::<String, i32>();
        assert!(!table.remove(&"x".to_string()));
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn reinsert_after_remove() {
        let mut table = sip_table::<u64, i32>();
        table.insert(1, 1);
        assert!(table.remove(&1));
        assert!(table.insert(1, 2));
        assert_eq!(table.find(&1), Some(&2));
        assert_eq!(table.len(), 1);
    }

    #[test]
    #[cfg_attr(miri, ignore)]
    fn insert_many() {
        let mut table = sip_table::<u64, i32>();
        for k in 0..100000u64 {
            assert!(table.insert(k, k as i32));
            assert_eq!(table.find(&k), Some(&(k as i32)));
        }

        assert_eq!(table.len(), 100000);
        assert!(table.bucket_count() > TableConfig::default().initial_buckets);
        for k in 0..100000u64 {
            assert_eq!(table.find(&k), Some(&(k as i32)));
        }
    }

    #[test]
    fn colliding_keys_trigger_resize() {
        let mut table = fn_table::<String>(4, times_four);
        for k in 1..=5u64 {
            assert!(table.insert(k, format!("data_{k}")));
        }
        assert_eq!(table.bucket_count(), 4);
        assert_eq!(table.max_chain_len(), 5);

        assert!(table.insert(6, "data_6".to_string()));
        assert_eq!(table.bucket_count(), 12);
        assert_eq!(table.max_chain_len(), 1);
        assert_eq!(table.len(), 6);

        for k in 1..=6u64 {
            assert_eq!(table.find(&k), Some(&format!("data_{k}")));
        }
    }

    #[test]
    fn well_spread_keys_do_not_resize() {
        let mut table = fn_table::<u64>(4, identity);
        for k in 1..=6u64 {
            table.insert(k, k);
        }
        assert_eq!(table.bucket_count(), 4);
        assert_eq!(table.max_chain_len(), 2);
    }

    #[test]
    fn constant_hasher_grows_on_every_long_chain() {
        let mut table = fn_table::<u64>(100, constant);
        for k in 0..6u64 {
            table.insert(k, k);
        }
        assert_eq!(table.bucket_count(), 12);

        for k in 6..10u64 {
            table.insert(k, k);
        }
        assert_eq!(table.bucket_count(), 20);
        assert_eq!(table.resize_count(), 5);

        for k in 0..10u64 {
            assert_eq!(table.find(&k), Some(&k));
        }
    }

    #[test]
    fn resize_preserves_content_and_len() {
        let mut table = fn_table::<u64>(1, identity);
        for k in 0..5u64 {
            table.insert(k, k * 100);
        }
        let before = table.len();

        table.insert(5, 500);
        assert_eq!(table.bucket_count(), 12);
        assert_eq!(table.len(), before + 1);
        for k in 0..6u64 {
            assert_eq!(table.find(&k), Some(&(k * 100)));
        }
    }

    #[test]
    fn remove_does_not_lower_max_chain_len() {
        let mut table = fn_table::<u64>(10, |k: &u64| k * 10);
        for k in 0..5u64 {
            table.insert(k, k);
        }
        assert_eq!(table.max_chain_len(), 5);

        for k in 0..4u64 {
            assert!(table.remove(&k));
        }
        assert_eq!(table.max_chain_len(), 5);

        table.insert(100, 100);
        assert_eq!(table.max_chain_len(), 5);
        assert_eq!(table.bucket_count(), 10);
    }

    #[test]
    fn custom_policy() {
        let config = TableConfig {
            initial_buckets: 1,
            max_chain_len: 1,
            growth_factor: 3,
        };
        let mut table: FnTable<&str> = ChainedHashTable::with_config(config, identity);
        table.insert(0, "a");
        assert_eq!(table.bucket_count(), 1);

        table.insert(1, "b");
        assert_eq!(table.bucket_count(), 6);
        assert_eq!(table.find(&0), Some(&"a"));
        assert_eq!(table.find(&1), Some(&"b"));
    }

    #[test]
    #[should_panic(expected = "at least one bucket")]
    fn zero_buckets_panics() {
        let _ = fn_table::<u64>(0, identity);
    }

    #[test]
    fn try_with_config_rejects_zero_buckets() {
        let config = TableConfig {
            initial_buckets: 0,
            ..TableConfig::default()
        };
        let result = ChainedHashTable::<u64, u64, _>::try_with_config(config, identity);
        assert_eq!(result.err(), Some(ConfigError::ZeroBuckets));
    }

    #[test]
    fn clear_keeps_buckets() {
        let mut table = fn_table::<u64>(4, times_four);
        for k in 0..6u64 {
            table.insert(k, k);
        }
        let bucket_count = table.bucket_count();

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.max_chain_len(), 0);
        assert_eq!(table.bucket_count(), bucket_count);
        assert!(table.find(&1).is_none());

        assert!(table.insert(1, 1));
        assert_eq!(table.find(&1), Some(&1));
    }

    #[test]
    fn test_clone() {
        let mut original = sip_table::<String, i32>();
        let test_data = [("hello", 1), ("world", 2), ("rust", 3)];
        for (key, value) in test_data.iter() {
            original.insert(key.to_string(), *value);
        }

        let mut cloned = original.clone();
        assert_eq!(cloned.len(), 3);
        assert_eq!(cloned.bucket_count(), original.bucket_count());
        assert_eq!(cloned.max_chain_len(), original.max_chain_len());

        assert!(cloned.insert("clone".to_string(), 4));
        if let Some(v) = cloned.find_mut(&"hello".to_string()) {
            *v = 999;
        }

        assert_eq!(original.len(), 3);
        assert!(!original.contains_key(&"clone".to_string()));
        assert_eq!(original.find(&"hello".to_string()), Some(&1));
        assert_eq!(cloned.find(&"hello".to_string()), Some(&999));
        for (key, value) in test_data.iter().skip(1) {
            assert_eq!(cloned.find(&key.to_string()), Some(value));
        }
    }

    #[test]
    fn clone_after_resize() {
        let mut table = fn_table::<u64>(4, times_four);
        for k in 0..20u64 {
            table.insert(k, k + 1);
        }

        let cloned = table.clone();
        assert_eq!(cloned.bucket_count(), table.bucket_count());
        for k in 0..20u64 {
            assert_eq!(cloned.find(&k), Some(&(k + 1)));
        }
    }

    #[test]
    fn test_clone_empty_table() {
        let original = fn_table::<u64>(10, identity);
        let cloned = original.clone();

        assert!(original.is_empty());
        assert!(cloned.is_empty());
        assert_eq!(cloned.bucket_count(), 10);
    }

    #[test]
    fn chains_keep_insertion_order() {
        let mut table = fn_table::<u64>(3, |k: &u64| k % 3);
        for k in [0u64, 3, 6, 9] {
            table.insert(k, k);
        }
        table.remove(&3);

        let bucket: vec::Vec<u64> = table.buckets[0].iter().map(|e| e.key).collect();
        assert_eq!(bucket, vec![0, 6, 9]);
    }

    #[test]
    fn debug_output() {
        let mut table = fn_table::<&str>(4, identity);
        table.insert(1, "one");
        assert_eq!(format!("{:?}", table), "{1: \"one\"}");
        assert!(format!("{:#?}", table).contains("bucket_count: 4"));
    }
}
