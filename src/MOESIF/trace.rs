// Reads `P<core> <read|write> <tag>` commands, one per line.

use std::io::BufRead;
use thiserror::Error;
use super::common::*;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("line {line}: missing {field}")]
    MissingField { line: usize, field: &'static str },
    #[error("line {line}: bad core token `{token}`")]
    BadCore { line: usize, token: String },
    #[error("line {line}: core P{number} out of range (1..={cores})")]
    CoreOutOfRange { line: usize, number: usize, cores: usize },
    #[error("line {line}: unknown operation `{token}`")]
    BadOp { line: usize, token: String },
    #[error("line {line}: bad tag `{token}`")]
    BadTag { line: usize, token: String },
    #[error("line {line}: not valid UTF-8")]
    BadEncoding { line: usize },
    #[error("failed to read trace")]
    Io(#[from] std::io::Error),
}

/// Parse one trace line. Blank lines yield `Ok(None)`.
pub fn parse_line(text: &str, line: usize, cores: usize) -> Result<Option<Command>, TraceError> {
    let mut parts = text.split_whitespace();
    let Some(core_tok) = parts.next() else { return Ok(None) };
    let op_tok = parts.next().ok_or(TraceError::MissingField { line, field: "operation" })?;
    let tag_tok = parts.next().ok_or(TraceError::MissingField { line, field: "tag" })?;

    let number = core_tok
        .strip_prefix('P')
        .and_then(|n| n.parse::<usize>().ok())
        .ok_or_else(|| TraceError::BadCore { line, token: core_tok.to_string() })?;
    if number == 0 || number > cores {
        return Err(TraceError::CoreOutOfRange { line, number, cores });
    }

    let op = match op_tok {
        "read" => Op::Read,
        "write" => Op::Write,
        _ => return Err(TraceError::BadOp { line, token: op_tok.to_string() }),
    };

    let tag = parse_tag(tag_tok).ok_or_else(|| TraceError::BadTag { line, token: tag_tok.to_string() })?;

    Ok(Some(Command { core: number - 1, op, tag }))
}

// `<123>`, `[123]` or a bare `123`
fn parse_tag(token: &str) -> Option<Tag> {
    let inner = token.strip_prefix(|c: char| !c.is_ascii_digit() && c != '-').unwrap_or(token);
    let inner = inner.strip_suffix(|c: char| !c.is_ascii_digit()).unwrap_or(inner);
    inner.parse::<i64>().ok().map(Tag)
}

/// Yields the commands of a trace in file order, tagged with their 1-based
/// line number. Blank lines are skipped; malformed lines come out as errors
/// so the caller decides whether to go on.
pub struct TraceReader<R: BufRead> {
    input: R,
    cores: usize,
    line: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> TraceReader<R> {
    pub fn new(input: R, cores: usize) -> Self {
        TraceReader { input, cores, line: 0, buf: Vec::new() }
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<Command, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.input.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {},
                Err(e) => return Some(Err(e.into())),
            }
            self.line += 1;
            // a badly encoded line is malformed content, not a read failure
            let Ok(text) = std::str::from_utf8(&self.buf) else {
                return Some(Err(TraceError::BadEncoding { line: self.line }));
            };
            match parse_line(text, self.line, self.cores) {
                Ok(None) => continue,
                Ok(Some(cmd)) => return Some(Ok(cmd)),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
