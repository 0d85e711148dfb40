//! The wire-protocol lexer.
//!
//! [`run`] takes one datagram line (no trailing newline) and an optional
//! namespace, and produces a [`Record`] or a [`ParseError`]. It is a
//! hand-written recursive-descent scanner over an exclusively-owned
//! `&mut [u8]`: sanitized bytes are rewritten in place, and bytes dropped by
//! sanitization are shifted out of a logical length tracked separately from
//! the slice's allocated length, so no scanning-time heap allocation is
//! needed. The final `Metric`/`Event` is built from owned copies of the
//! sanitized spans, since the record must outlive the input buffer.
//!
//! Grounded in the accept/reject table and edge cases of the original
//! DogStatsD ingestion lexer this core was distilled from; ported to a
//! `Result`-based, `Option<u8>`-EOF scanner rather than the original's
//! state-function-pointer-chain-with-a-sentinel-byte design.

mod event;
mod metric;
mod render;
mod sanitize;

pub use render::render;

use crate::error::ParseError;
use crate::model::{Event, Metric};

/// What [`run`] produced from one line: exactly one of a metric or an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    /// A parsed metric sample.
    Metric(Metric),
    /// A parsed event.
    Event(Event),
}

impl Record {
    /// Returns the inner metric, if this record is one.
    #[must_use]
    pub fn as_metric(&self) -> Option<&Metric> {
        match self {
            Record::Metric(m) => Some(m),
            Record::Event(_) => None,
        }
    }

    /// Returns the inner event, if this record is one.
    #[must_use]
    pub fn as_event(&self) -> Option<&Event> {
        match self {
            Record::Event(e) => Some(e),
            Record::Metric(_) => None,
        }
    }
}

/// A byte scanner over an exclusively-owned, in-place-sanitizable buffer.
///
/// `len` is the logical length: sanitization that drops a byte shifts the
/// remainder left and decrements `len`, without touching `input`'s actual
/// allocation. `pos` never exceeds `len`.
pub(crate) struct Scanner<'a> {
    input: &'a mut [u8],
    len: usize,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a mut [u8]) -> Self {
        let len = input.len();
        Self { input, len, pos: 0 }
    }

    /// Consumes and returns the next logical byte, or `None` at end of input.
    fn next(&mut self) -> Option<u8> {
        if self.pos >= self.len {
            return None;
        }
        let b = self.input[self.pos];
        self.pos += 1;
        Some(b)
    }

    /// Pushes the most recently consumed byte back onto the stream.
    fn rewind_one(&mut self) {
        debug_assert!(self.pos > 0);
        self.pos -= 1;
    }

    /// Overwrites the byte just consumed (sanitization rewrite rule).
    fn rewrite_prev(&mut self, b: u8) {
        self.input[self.pos - 1] = b;
    }

    /// Drops the byte just consumed (sanitization delete rule): shifts the
    /// remainder left by one and shrinks the logical length.
    fn delete_prev(&mut self) {
        self.input.copy_within(self.pos..self.len, self.pos - 1);
        self.len -= 1;
        self.pos -= 1;
    }

    fn slice(&self, start: usize, end: usize) -> &[u8] {
        &self.input[start..end]
    }

    fn byte_at(&self, idx: usize) -> u8 {
        self.input[idx]
    }

    /// Scans an unsigned integer (used for event header lengths and
    /// `d:<uint>`), stopping at the first non-digit (which is pushed back)
    /// or at end of input.
    fn scan_uint(&mut self) -> Result<u64, ParseError> {
        let start = self.pos;
        let mut value: u64 = 0;
        loop {
            match self.next() {
                Some(b @ b'0'..=b'9') => {
                    value = value
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(u64::from(b - b'0')))
                        .ok_or(ParseError::Overflow)?;
                }
                Some(_) => {
                    self.rewind_one();
                    break;
                }
                None => break,
            }
        }
        if self.pos == start {
            return Err(ParseError::InvalidFormat);
        }
        Ok(value)
    }

    /// Requires the next byte to equal `expected`, else `InvalidFormat`.
    fn expect(&mut self, expected: u8) -> Result<(), ParseError> {
        match self.next() {
            Some(b) if b == expected => Ok(()),
            _ => Err(ParseError::InvalidFormat),
        }
    }

    /// Finds the offset of the next byte equal to `stop` without consuming
    /// it, or the logical end of input if none remains.
    fn find_without_consuming(&self, stop: u8) -> usize {
        self.input[self.pos..self.len]
            .iter()
            .position(|&b| b == stop)
            .map_or(self.len, |rel| self.pos + rel)
    }
}

fn parse_finite_f64(bytes: &[u8]) -> Result<f64, ParseError> {
    let text =
        std::str::from_utf8(bytes).map_err(|e| ParseError::InvalidFloat(e.to_string()))?;
    text.parse::<f64>()
        .map_err(|e| ParseError::InvalidFloat(e.to_string()))
}

/// Parses one datagram line into a [`Record`], or fails with a [`ParseError`].
///
/// `input` is consumed: sanitization mutates it in place, and the caller
/// must not reuse it afterward. `namespace`, when non-empty, is prepended to
/// the metric name as `namespace + "." + key`; it has no effect on events.
pub fn run(input: &mut [u8], namespace: Option<&str>) -> Result<Record, ParseError> {
    let mut scanner = Scanner::new(input);
    match scanner.next() {
        Some(b'_') => event::parse(&mut scanner).map(Record::Event),
        Some(_) => {
            scanner.rewind_one();
            metric::parse(&mut scanner, namespace).map(Record::Metric)
        }
        None => Err(ParseError::InvalidType),
    }
}
