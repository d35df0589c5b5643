use std::io::BufRead;
use log::{debug, info, trace, warn};
use super::bus::BusSignal;
use super::cache::Core;
use super::common::*;
use super::stats::Stats;
use super::trace::{TraceError, TraceReader};

/// Outcome of a single command at the requesting core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    Hit,
    Miss,
}

/// Result of replaying a whole trace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayOutcome {
    pub stats: Stats,
    pub commands: u64,
    pub skipped: u64,
}

/// Owns every core and the global counters. Commands are applied strictly
/// one at a time, so trace order is the global coherence order.
pub struct CoherenceEngine<const CORES: usize, const LINES: usize> {
    cores: [Core<LINES>; CORES],
    stats: Stats,
    commands: u64,
}

pub type Simulator = CoherenceEngine<NUM_CORES, LINES_PER_CORE>;

impl<const CORES: usize, const LINES: usize> Default for CoherenceEngine<CORES, LINES> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CORES: usize, const LINES: usize> CoherenceEngine<CORES, LINES> {
    pub fn new() -> Self {
        CoherenceEngine {
            cores: std::array::from_fn(Core::new),
            stats: Stats::default(),
            commands: 0,
        }
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }
    pub fn commands(&self) -> u64 {
        self.commands
    }
    pub fn core(&self, id: usize) -> Option<&Core<LINES>> {
        self.cores.get(id)
    }
    pub fn cores(&self) -> &[Core<LINES>] {
        &self.cores
    }

    /// true if a core other than `id` has a slot carrying `tag`, in any state
    pub fn tag_in_other_cores(&self, id: usize, tag: Tag) -> bool {
        self.others(id).any(|c| c.holds(tag))
    }
    /// true if a core other than `id` holds `tag` in a state other than I or S
    pub fn tag_in_other_valid_cores(&self, id: usize, tag: Tag) -> bool {
        self.others(id).any(|c| c.holds_supplier(tag))
    }
    fn others(&self, id: usize) -> impl Iterator<Item = &Core<LINES>> {
        self.cores.iter().filter(move |c| c.id != id)
    }

    /// Apply one command: local lookup and install, then snoop every other
    /// core. Returns `None` (and leaves all state alone) for a core id
    /// outside the system.
    pub fn process_command(&mut self, cmd: Command) -> Option<Access> {
        let Command { core: id, op, tag } = cmd;
        if id >= CORES {
            warn!("ignoring {}: system has {} cores", cmd, CORES);
            return None;
        }
        trace!("{}", cmd);

        // peers are only modified by the snoop below
        let others_hold = self.tag_in_other_cores(id, tag);
        let others_supply = self.tag_in_other_valid_cores(id, tag);

        let stats = &mut self.stats;
        let core = &mut self.cores[id];
        let access = match core.find_line(tag) {
            Some(slot) => {
                let line = core.line_mut(slot)?;
                let prev = line.state;
                let access = if prev.is_valid() {
                    stats.hits += 1;
                    Access::Hit
                } else {
                    stats.misses += 1;
                    if op == Op::Read && others_supply {
                        stats.cache_to_cache_transfers += 1;
                    }
                    Access::Miss
                };
                // an exclusive line answers without telling anyone
                if prev != LineState::Exclusive {
                    stats.broadcasts += 1;
                }
                if op == Op::Write {
                    if prev == LineState::Owned {
                        stats.writebacks += 1;
                    }
                    line.dirty = true;
                }
                line.state = local_transition(op, prev, others_hold);
                core.touch(slot);
                access
            },
            None => {
                stats.misses += 1;
                stats.broadcasts += 1;
                let slot = core.select_victim();
                let line = core.line_mut(slot)?;
                if line.dirty {
                    stats.writebacks += 1;
                }
                line.tag = tag;
                line.dirty = op == Op::Write;
                if op == Op::Read && others_supply {
                    stats.cache_to_cache_transfers += 1;
                }
                line.state = install_state(op, others_hold);
                core.touch(slot);
                Access::Miss
            },
        };

        let sig = BusSignal::of(op, tag);
        for other in self.cores.iter_mut().filter(|c| c.id != id) {
            self.stats.writebacks += other.on_bus_sig(sig);
        }
        self.commands += 1;
        Some(access)
    }

    /// Replay a trace in order. Malformed lines are logged and skipped;
    /// only a failure to read the input aborts the replay.
    pub fn replay<R: BufRead>(&mut self, reader: TraceReader<R>) -> Result<ReplayOutcome, TraceError> {
        let (mut commands, mut skipped) = (0, 0);
        for item in reader {
            match item {
                Ok(cmd) => match self.process_command(cmd) {
                    Some(_) => commands += 1,
                    None => skipped += 1,
                },
                Err(TraceError::Io(e)) => return Err(TraceError::Io(e)),
                Err(e) => {
                    warn!("skipping {}", e);
                    skipped += 1;
                },
            }
        }
        info!("replayed {} commands, skipped {} lines", commands, skipped);
        for core in &self.cores {
            debug!("P{}\n{}", core.id + 1, core);
        }
        Ok(ReplayOutcome { stats: self.stats, commands, skipped })
    }
}

/// New state of a line that was found locally (possibly invalid).
fn local_transition(op: Op, prev: LineState, others_hold: bool) -> LineState {
    match (op, prev) {
        (Op::Read, LineState::Invalid) if !others_hold => LineState::Exclusive,
        (Op::Read, LineState::Modified) => LineState::Modified,
        (Op::Read, _) => LineState::Shared,
        (Op::Write, _) => LineState::Modified,
    }
}

/// State of a freshly installed line.
fn install_state(op: Op, others_hold: bool) -> LineState {
    match op {
        Op::Read if others_hold => LineState::Shared,
        Op::Read => LineState::Exclusive,
        Op::Write => LineState::Modified,
    }
}
