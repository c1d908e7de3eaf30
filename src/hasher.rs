use core::hash::BuildHasher;
use core::hash::Hash;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The [`BuildHasher`] used by [`DefaultHasher`].
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The [`BuildHasher`] used by [`DefaultHasher`].
        pub type DefaultHashBuilder = std::hash::RandomState;
    }
}

/// The hasher used by [`ChainedHashTable::new`] when no hasher is given.
///
/// Only available with the `foldhash` or `std` feature.
///
/// [`ChainedHashTable::new`]: crate::ChainedHashTable::new
#[cfg(any(feature = "foldhash", feature = "std"))]
pub type DefaultHasher = HashBuilder<DefaultHashBuilder>;

/// Maps a key to the unsigned integer a [`ChainedHashTable`] reduces to a
/// bucket index.
///
/// Implementations must be deterministic for the lifetime of the table, and
/// keys that compare equal must hash equally.
///
/// Any `Fn(&K) -> u64` is a `KeyHasher<K>`, so a plain function or closure can
/// be handed to the table directly. Types that already implement [`Hash`] can
/// use a [`BuildHasher`] through [`HashBuilder`].
///
/// [`ChainedHashTable`]: crate::ChainedHashTable
pub trait KeyHasher<K> {
    /// Hashes `key`.
    fn hash_key(&self, key: &K) -> u64;
}

impl<K, F> KeyHasher<K> for F
where
    F: Fn(&K) -> u64,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self(key)
    }
}

/// Adapts a [`BuildHasher`] into a [`KeyHasher`] for any `K: Hash`.
///
/// # Examples
///
/// ```rust
/// # use chain_hash::hasher::HashBuilder;
/// # use chain_hash::hasher::KeyHasher;
/// # use std::hash::RandomState;
/// #
/// let hasher = HashBuilder::new(RandomState::new());
/// assert_eq!(hasher.hash_key(&"a"), hasher.hash_key(&"a"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct HashBuilder<S>(pub S);

impl<S> HashBuilder<S> {
    /// Wraps `hash_builder`.
    pub fn new(hash_builder: S) -> Self {
        Self(hash_builder)
    }

    /// Returns the wrapped [`BuildHasher`].
    pub fn into_inner(self) -> S {
        self.0
    }
}

impl<K, S> KeyHasher<K> for HashBuilder<S>
where
    K: Hash,
    S: BuildHasher,
{
    #[inline]
    fn hash_key(&self, key: &K) -> u64 {
        self.0.hash_one(key)
    }
}
