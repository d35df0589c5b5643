mod cache;
mod bus;
mod common;
mod engine;
mod stats;
mod trace;

pub use cache::{CacheLine, Core};
pub use bus::BusSignal;
pub use common::*;
pub use engine::{Access, CoherenceEngine, ReplayOutcome, Simulator};
pub use stats::Stats;
pub use trace::{parse_line, TraceError, TraceReader};
