use std::fmt;
use super::common::*;

// cache line

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheLine {
    pub state: LineState,
    pub recency: usize,     // 0 = least recently used, LINES-1 = most recently used
    pub dirty: bool,
    pub tag: Tag,
}

impl CacheLine {
    fn new(recency: usize) -> Self {
        CacheLine {
            state: LineState::Invalid,
            recency,
            dirty: false,
            tag: Tag(0),
        }
    }
}

// core

/// The private, fully-associative cache of one core.
///
/// The `recency` ranks of its lines always form a permutation of
/// `0..LINES`, so once every line is valid the victim is the one ranked 0.
#[derive(Clone, Debug)]
pub struct Core<const LINES: usize> {
    pub id: usize,
    lines: [CacheLine; LINES],
}

impl<const LINES: usize> Core<LINES> {
    pub fn new(id: usize) -> Self {
        let mut lines = [CacheLine::new(0); LINES];
        for (i, l) in lines.iter_mut().enumerate() {
            l.recency = i;
        }
        Core { id, lines }
    }

    pub fn line(&self, slot: usize) -> Option<&CacheLine> {
        self.lines.get(slot)
    }
    pub(crate) fn line_mut(&mut self, slot: usize) -> Option<&mut CacheLine> {
        self.lines.get_mut(slot)
    }
    pub fn lines(&self) -> impl Iterator<Item = &CacheLine> {
        self.lines.iter()
    }

    /// First slot carrying `tag`. An invalidated slot keeps its tag, so the
    /// returned slot may be in state `Invalid`.
    pub fn find_line(&self, tag: Tag) -> Option<usize> {
        self.lines.iter().position(|l| l.tag == tag)
    }

    /// true if any slot carries `tag`, whatever its state
    pub fn holds(&self, tag: Tag) -> bool {
        self.find_line(tag).is_some()
    }

    /// true if some slot carries `tag` in a state other than I or S
    pub fn holds_supplier(&self, tag: Tag) -> bool {
        self.lines.iter().any(|l| l.tag == tag && l.state.can_supply())
    }

    /// First invalid slot, otherwise the least recently used one.
    pub fn select_victim(&self) -> usize {
        self.lines
            .iter()
            .position(|l| !l.state.is_valid())
            .or_else(|| {
                self.lines
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, l)| l.recency)
                    .map(|(i, _)| i)
            })
            .unwrap_or(0)
    }

    /// Promote `slot` to most recently used.
    pub fn touch(&mut self, slot: usize) {
        let Some(old) = self.lines.get(slot).map(|l| l.recency) else { return };
        for (i, l) in self.lines.iter_mut().enumerate() {
            if i != slot && l.recency > old {
                l.recency -= 1;
            }
        }
        self.lines[slot].recency = LINES - 1;
    }

    /// Push `slot` down to least recently used.
    pub fn demote(&mut self, slot: usize) {
        let Some(old) = self.lines.get(slot).map(|l| l.recency) else { return };
        for (i, l) in self.lines.iter_mut().enumerate() {
            if i != slot && l.recency < old {
                l.recency += 1;
            }
        }
        self.lines[slot].recency = 0;
    }
}

impl<const LINES: usize> fmt::Display for Core<LINES> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, l) in self.lines.iter().enumerate() {
            writeln!(
                f,
                "Cache Line {}: State={}, LRU={}, Dirty={}, Tag={}",
                i, l.state, l.recency, l.dirty, l.tag
            )?;
        }
        Ok(())
    }
}
