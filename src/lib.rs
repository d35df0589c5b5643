/*
    A MOESIF cache coherence protocol simulator.

    Replays a trace of `P<core> <read|write> <tag>` commands against a fixed
    number of cores, each with a small fully-associative LRU cache, and counts
    hits, misses, writebacks, broadcasts and cache-to-cache transfers.
 */

#[allow(non_snake_case)]
pub mod MOESIF;

pub use MOESIF::*;
