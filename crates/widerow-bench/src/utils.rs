//! Benchmark utilities and helpers.

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use widerow_common::EntryColumn;
use widerow_engine::RawColumn;

/// Generates random string data for benchmarks.
pub fn random_string(rng: &mut StdRng, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Name of the `i`-th column; byte order matches `i` order.
pub fn column_name(i: usize) -> String {
    format!("c{i:08}")
}

/// Generates `count` columns with sequential names and random values.
pub fn generate_columns(count: usize, value_size: usize) -> Vec<EntryColumn<String, String>> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|i| EntryColumn::new(column_name(i), random_string(&mut rng, value_size)))
        .collect()
}

/// Generates raw engine columns, a third of them with a ttl.
pub fn generate_raw_columns(count: usize, value_size: usize) -> Vec<RawColumn> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..count)
        .map(|i| {
            let ttl = if i % 3 == 0 { rng.gen_range(1..86_400) } else { 0 };
            RawColumn::new(column_name(i), random_string(&mut rng, value_size), ttl)
        })
        .collect()
}
