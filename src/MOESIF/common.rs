use std::fmt;

// reference system geometry
pub const NUM_CORES: usize = 4;
pub const LINES_PER_CORE: usize = 4;

/// address identifier cached by a line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tag(pub i64);

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// line states

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineState {
    Modified,
    Owned,
    Exclusive,
    Shared,
    #[default]
    Invalid,
    Forward,
}

impl LineState {
    pub fn is_valid(&self) -> bool {
        !matches!(self, LineState::Invalid)
    }
    /// valid and not merely shared, i.e. a copy another core can be served from
    pub fn can_supply(&self) -> bool {
        !matches!(self, LineState::Invalid | LineState::Shared)
    }
    pub fn as_char(&self) -> char {
        match self {
            LineState::Modified => 'M',
            LineState::Owned => 'O',
            LineState::Exclusive => 'E',
            LineState::Shared => 'S',
            LineState::Invalid => 'I',
            LineState::Forward => 'F',
        }
    }
}

impl fmt::Display for LineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

// processor requests

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Read,
    Write,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Read => write!(f, "read"),
            Op::Write => write!(f, "write"),
        }
    }
}

/// one trace command, with a 0-based core id
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Command {
    pub core: usize,
    pub op: Op,
    pub tag: Tag,
}

impl Command {
    pub fn read(core: usize, tag: i64) -> Self {
        Command { core, op: Op::Read, tag: Tag(tag) }
    }
    pub fn write(core: usize, tag: i64) -> Self {
        Command { core, op: Op::Write, tag: Tag(tag) }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}: {} <{}>", self.core + 1, self.op, self.tag)
    }
}
