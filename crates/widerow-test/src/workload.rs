use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use widerow_common::EntryColumn;

/// Deterministic generator of column sets.
pub struct ColumnWorkload {
    rng: StdRng,
    value_size: usize,
    ttl_ratio: f64,
}

impl ColumnWorkload {
    /// Creates a generator seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            value_size: 16,
            ttl_ratio: 0.0,
        }
    }

    /// Sets the length of generated values.
    #[must_use]
    pub fn value_size(mut self, size: usize) -> Self {
        self.value_size = size;
        self
    }

    /// Sets the share of columns that get a ttl.
    #[must_use]
    pub fn ttl_ratio(mut self, ratio: f64) -> Self {
        self.ttl_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Generates `count` columns with distinct names in random order.
    ///
    /// Names are zero-padded so byte order matches numeric order.
    pub fn columns(&mut self, count: usize) -> Vec<EntryColumn<String, String>> {
        let mut ids: Vec<usize> = (0..count).collect();
        for i in (1..ids.len()).rev() {
            let j = self.rng.gen_range(0..=i);
            ids.swap(i, j);
        }
        ids.into_iter()
            .map(|id| {
                let column = EntryColumn::new(column_name(id), self.value());
                if self.rng.gen_bool(self.ttl_ratio) {
                    column.with_ttl(self.rng.gen_range(3_600..86_400))
                } else {
                    column
                }
            })
            .collect()
    }

    fn value(&mut self) -> String {
        (&mut self.rng)
            .sample_iter(&Alphanumeric)
            .take(self.value_size)
            .map(char::from)
            .collect()
    }
}

/// Name of the `id`-th generated column.
pub fn column_name(id: usize) -> String {
    format!("col-{id:06}")
}
