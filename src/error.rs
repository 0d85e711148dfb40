use thiserror::Error;

use crate::cancel::CancellationReason;

/// Errors produced while lexing a single datagram line.
///
/// All variants are local to one line: a parse error never aborts the
/// receiver or the dispatcher, it only drops the offending line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The key was not terminated by `:` before end of input.
    #[error("missing key separator")]
    MissingKeySep,
    /// The key sanitized down to zero bytes.
    #[error("key has zero length")]
    EmptyKey,
    /// The value was not terminated by `|` before end of input.
    #[error("missing value separator")]
    MissingValueSep,
    /// The type token was not one of `c`, `g`, `ms`, `s`.
    #[error("invalid metric type")]
    InvalidType,
    /// A structural mismatch in the surrounding grammar (missing literal
    /// byte, sample-rate-terminated-by-eof, event header mismatch, ...).
    #[error("invalid format")]
    InvalidFormat,
    /// A `|` suffix section was introduced by something other than `@` or `#`.
    #[error("invalid sampling rate or tags")]
    InvalidSamplingOrTags,
    /// An event attribute leader was unrecognized, or its value invalid.
    #[error("invalid event attributes")]
    InvalidAttributes,
    /// An event length field overflowed its integer width.
    #[error("overflow")]
    Overflow,
    /// The datagram ended before the event title/text bytes promised by
    /// the header were available.
    #[error("not enough data")]
    NotEnoughData,
    /// The metric value parsed as NaN, which is never a valid measurement.
    #[error("invalid value: NaN")]
    InvalidValueNaN,
    /// The metric value or sampling rate failed to parse as a float.
    #[error("invalid numeric value: {0}")]
    InvalidFloat(String),
}

/// Errors returned by dispatcher operations.
///
/// The dispatcher has exactly one failure mode: the caller's
/// [`CancellationToken`](crate::cancel::CancellationToken) fired before the
/// operation could complete. Channel closure during orderly shutdown is not
/// an error.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// The operation's cancellation token was cancelled before it finished.
    #[error("dispatch cancelled: {0:?}")]
    ContextCancelled(CancellationReason),
}
