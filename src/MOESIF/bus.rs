use log::trace;
use super::cache::Core;
use super::common::*;

// the bus signals that cores snoop, as defined by the protocol
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusSignal {
    BusRd(Tag),
    BusRdX(Tag),
}

impl BusSignal {
    pub fn of(op: Op, tag: Tag) -> Self {
        match op {
            Op::Read => BusSignal::BusRd(tag),
            Op::Write => BusSignal::BusRdX(tag),
        }
    }
    pub fn tag(&self) -> Tag {
        match self {
            BusSignal::BusRd(tag) | BusSignal::BusRdX(tag) => *tag,
        }
    }
}

impl<const LINES: usize> Core<LINES> {
    /// Apply a remote request to every slot carrying the signalled tag.
    /// Returns the number of writebacks the snoop caused.
    pub fn on_bus_sig(&mut self, sig: BusSignal) -> u64 {
        let tag = sig.tag();
        let mut writebacks = 0;
        for slot in 0..LINES {
            let Some(line) = self.line_mut(slot) else { continue };
            if line.tag != tag {
                continue;
            }
            match sig {
                BusSignal::BusRd(_) => {
                    line.state = match line.state {
                        LineState::Exclusive => LineState::Forward,    // becomes the forwarding source
                        LineState::Modified => LineState::Owned,       // keeps dirty data
                        s => s,
                    };
                },
                BusSignal::BusRdX(_) => {
                    if line.dirty {
                        writebacks += 1;
                        line.dirty = false;
                    }
                    line.state = LineState::Invalid;
                    self.demote(slot);
                },
            }
            trace!("core {} snooped {:?} on slot {}", self.id, sig, slot);
        }
        writebacks
    }
}
