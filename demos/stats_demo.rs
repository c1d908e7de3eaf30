use std::collections::hash_map::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;

use chain_hash::ChainedHashTable;
use chain_hash::TableConfig;
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "entries", default_value_t = 10_000)]
    entries: u64,
    #[arg(short = 'b', long = "initial_buckets", default_value_t = 100)]
    initial_buckets: usize,
    #[arg(short = 'm', long = "max_chain_len", default_value_t = 5)]
    max_chain_len: usize,
    #[arg(short = 'g', long = "growth_factor", default_value_t = 2)]
    growth_factor: usize,
    /// Hash keys with a deliberately weak hasher that keeps only the low byte.
    #[arg(long)]
    weak: bool,
}

fn hash_u64(value: &u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn low_byte(value: &u64) -> u64 {
    value & 0xFF
}

fn main() {
    let args = Args::parse();
    let config = TableConfig {
        initial_buckets: args.initial_buckets,
        max_chain_len: args.max_chain_len,
        growth_factor: args.growth_factor,
    };

    let hasher: fn(&u64) -> u64 = if args.weak { low_byte } else { hash_u64 };
    let mut table = match ChainedHashTable::try_with_config(config, hasher) {
        Ok(table) => table,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            std::process::exit(2);
        }
    };

    println!(
        "Inserting {} entries into a table of {} buckets...",
        args.entries,
        table.bucket_count()
    );

    for value in 0..args.entries {
        if !table.insert(value, value * 2) {
            panic!("Value already exists in table: {}", value);
        }
    }

    println!("Inserted {} values into table", table.len());
    table.print_chain_histogram();
    table.stats().print();
}
