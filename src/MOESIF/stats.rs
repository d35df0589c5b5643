use std::fmt;

/// Counters accumulated over one trace replay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub hits: u64,
    pub misses: u64,
    pub writebacks: u64,
    pub broadcasts: u64,
    pub cache_to_cache_transfers: u64,
}

impl Stats {
    /// every processed command is either a hit or a miss
    pub fn accesses(&self) -> u64 {
        self.hits + self.misses
    }
    /// counters in report order
    pub fn as_array(&self) -> [u64; 5] {
        [
            self.hits,
            self.misses,
            self.writebacks,
            self.broadcasts,
            self.cache_to_cache_transfers,
        ]
    }
}

// one counter per line, no terminator after the last
impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [h, m, wb, bc, c2c] = self.as_array();
        write!(f, "{}\n{}\n{}\n{}\n{}", h, m, wb, bc, c2c)
    }
}
