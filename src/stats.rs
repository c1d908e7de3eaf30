use alloc::vec::Vec;

use crate::chained_table::ChainedHashTable;

/// A snapshot of how entries are spread over a table's buckets.
///
/// Requires the `stats` feature.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainStats {
    /// Number of entries in the table
    pub entries: usize,
    /// Number of buckets
    pub buckets: usize,
    /// Buckets holding no entries
    pub empty_buckets: usize,
    /// Length of the longest chain, measured
    pub longest_chain: usize,
    /// The bound the table tracks to decide when to grow
    pub tracked_max_chain: usize,
    /// Number of times the table grew
    pub resizes: usize,
    /// Entries per bucket
    pub load_factor: f64,
}

impl ChainStats {
    /// Pretty-print the statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Chained Hash Table Statistics ===");
        println!(
            "Population: {} entries in {} buckets ({:.2} load factor)",
            self.entries, self.buckets, self.load_factor
        );
        println!(
            "Empty buckets: {} ({:.02}%)",
            self.empty_buckets,
            if self.buckets == 0 {
                0.0
            } else {
                (self.empty_buckets as f64 / self.buckets as f64) * 100.0
            }
        );
        println!(
            "Longest chain: {} (tracked bound {})",
            self.longest_chain, self.tracked_max_chain
        );
        println!("Resizes: {}", self.resizes);
    }
}

impl<K, V, H> ChainedHashTable<K, V, H> {
    /// Collects a [`ChainStats`] snapshot by walking every bucket.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::ChainedHashTable;
    /// #
    /// let mut table: ChainedHashTable<u64, (), _> =
    ///     ChainedHashTable::with_buckets_and_hasher(4, |k: &u64| *k);
    /// table.insert(0, ());
    /// table.insert(4, ());
    ///
    /// let stats = table.stats();
    /// assert_eq!(stats.longest_chain, 2);
    /// assert_eq!(stats.empty_buckets, 3);
    /// ```
    pub fn stats(&self) -> ChainStats {
        let mut empty_buckets = 0;
        let mut longest_chain = 0;
        for len in self.chain_lengths() {
            if len == 0 {
                empty_buckets += 1;
            }
            longest_chain = longest_chain.max(len);
        }

        let buckets = self.bucket_count();
        ChainStats {
            entries: self.len(),
            buckets,
            empty_buckets,
            longest_chain,
            tracked_max_chain: self.max_chain_len(),
            resizes: self.resize_count(),
            load_factor: if buckets == 0 {
                0.0
            } else {
                self.len() as f64 / buckets as f64
            },
        }
    }

    /// Counts buckets by chain length.
    ///
    /// Index `i` of the result is the number of buckets holding exactly `i`
    /// entries. The result is one longer than the longest chain.
    pub fn chain_histogram(&self) -> Vec<usize> {
        let mut hist = Vec::new();
        for len in self.chain_lengths() {
            if hist.len() <= len {
                hist.resize(len + 1, 0);
            }
            hist[len] += 1;
        }
        hist
    }

    /// Pretty-prints the chain-length histogram horizontally using stdout.
    #[cfg(feature = "std")]
    pub fn print_chain_histogram(&self) {
        let hist = self.chain_histogram();
        let max = hist.iter().copied().max().unwrap_or(0);
        if max == 0 {
            println!("chain histogram: empty");
            return;
        }

        let max_bar = 60usize;
        println!("chain histogram ({} buckets):", self.bucket_count());
        for (len, count) in hist.iter().enumerate() {
            let width = (count * max_bar).div_ceil(max);
            println!("{:>3} | {:<60} {}", len, "█".repeat(width), count);
        }
    }
}
