use std::io::{BufReader, Cursor, Write};

use moesif_sim::*;

fn run(cmds: &[Command]) -> Simulator {
    let mut sim = Simulator::new();
    for &cmd in cmds {
        sim.process_command(cmd);
    }
    sim
}

fn state_of(sim: &Simulator, core: usize, tag: i64) -> Option<LineState> {
    let c = sim.core(core)?;
    c.find_line(Tag(tag)).and_then(|s| c.line(s)).map(|l| l.state)
}

fn counters(sim: &Simulator) -> [u64; 5] {
    sim.stats().as_array()
}

#[test]
fn single_read_installs_exclusive() {
    let sim = run(&[Command::read(0, 10)]);
    assert_eq!(state_of(&sim, 0, 10), Some(LineState::Exclusive));
    let installed = sim.core(0).unwrap().lines().filter(|l| l.state.is_valid()).count();
    assert_eq!(installed, 1);
    assert_eq!(counters(&sim), [0, 1, 0, 1, 0]);
}

#[test]
fn second_reader_gets_shared_copy_from_forwarder() {
    let sim = run(&[Command::read(0, 10), Command::read(1, 10)]);
    assert_eq!(state_of(&sim, 0, 10), Some(LineState::Forward));
    assert_eq!(state_of(&sim, 1, 10), Some(LineState::Shared));
    assert_eq!(counters(&sim), [0, 2, 0, 2, 1]);
}

#[test]
fn repeated_write_hits_modified_line() {
    let sim = run(&[Command::write(0, 5), Command::write(0, 5)]);
    assert_eq!(state_of(&sim, 0, 5), Some(LineState::Modified));
    let s = sim.stats();
    assert_eq!((s.hits, s.misses), (1, 1));
    assert_eq!(s.writebacks, 0);
}

#[test]
fn remote_write_invalidates_dirty_owner() {
    let sim = run(&[Command::write(0, 5), Command::write(1, 5)]);
    assert_eq!(state_of(&sim, 0, 5), Some(LineState::Invalid));
    assert_eq!(state_of(&sim, 1, 5), Some(LineState::Modified));
    let line = sim.core(0).unwrap().line(0).unwrap();
    assert!(!line.dirty);
    assert_eq!(counters(&sim), [0, 2, 1, 2, 0]);
}

#[test]
fn replay_is_deterministic() {
    let trace = "P1 read <1>\nP2 write <1>\nP3 read <1>\nP1 write <2>\nP4 read <2>\n";
    let once = || {
        let mut sim = Simulator::new();
        sim.replay(TraceReader::new(Cursor::new(trace), NUM_CORES)).unwrap()
    };
    let a = once();
    let b = once();
    assert_eq!(a, b);
    assert_eq!(a.commands, 5);
    assert_eq!(a.stats.accesses(), 5);
}

#[test]
fn untouched_slots_count_as_holders_of_tag_zero() {
    // every fresh slot carries tag 0 in state I
    let sim = run(&[Command::read(0, 0)]);
    assert_eq!(state_of(&sim, 0, 0), Some(LineState::Shared));
    assert_eq!(counters(&sim), [0, 1, 0, 1, 0]);
}

#[test]
fn eviction_after_capacity_is_lru() {
    let mut cmds: Vec<_> = (1..=4).map(|t| Command::read(0, t)).collect();
    cmds.push(Command::read(0, 1));     // refresh 1, tag 2 becomes LRU
    cmds.push(Command::read(0, 5));
    let sim = run(&cmds);
    let core = sim.core(0).unwrap();
    assert!(core.find_line(Tag(1)).is_some());
    assert!(core.find_line(Tag(2)).is_none());
    assert_eq!(sim.stats().hits, 1);
    assert_eq!(sim.stats().writebacks, 0);
}

#[test]
fn replay_skips_malformed_lines() {
    let trace = "P1 read <10>\nP9 read <10>\ngarbage\nP2 fetch <10>\n\nP2 read <10>";
    let mut sim = Simulator::new();
    let outcome = sim.replay(TraceReader::new(Cursor::new(trace), NUM_CORES)).unwrap();
    assert_eq!(outcome.commands, 2);
    assert_eq!(outcome.skipped, 3);
    assert_eq!(outcome.stats.as_array(), [0, 2, 0, 2, 1]);
}

#[test]
fn replay_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "P1 write <5>\nP2 read <5>\nP1 write <5>\nP3 read <7>").unwrap();
    let reader = TraceReader::new(BufReader::new(file.reopen().unwrap()), NUM_CORES);
    let mut sim = Simulator::new();
    let outcome = sim.replay(reader).unwrap();
    // write miss, read miss (c2c from M), write hit on O (writeback), read miss
    assert_eq!(outcome.stats.as_array(), [1, 3, 1, 4, 1]);
    assert_eq!(outcome.stats.to_string(), "1\n3\n1\n4\n1");
}

#[test]
fn engines_are_independent() {
    let a = run(&[Command::write(0, 1)]);
    let b = Simulator::new();
    assert_eq!(a.stats().misses, 1);
    assert_eq!(b.stats(), Stats::default());
}

#[test]
fn smaller_geometry() {
    let mut sim = CoherenceEngine::<2, 2>::new();
    sim.process_command(Command::read(0, 1));
    sim.process_command(Command::read(0, 2));
    sim.process_command(Command::read(0, 3));
    assert!(sim.core(0).unwrap().find_line(Tag(1)).is_none());
    assert_eq!(sim.process_command(Command::read(2, 1)), None);
    assert_eq!(sim.stats().misses, 3);
}

#[test]
fn replay_skips_badly_encoded_line() {
    let trace: &[u8] = b"P1 read <10>\nP2 read <\xff>\nP2 read <10>\n";
    let mut sim = Simulator::new();
    let outcome = sim.replay(TraceReader::new(trace, NUM_CORES)).unwrap();
    assert_eq!(outcome.commands, 2);
    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.stats.as_array(), [0, 2, 0, 2, 1]);
}
