//! Receiver glue: turns one datagram into dispatched `Metric`/`Event`
//! records.
//!
//! This is intentionally thin — it owns no socket and no aggregation logic.
//! Grounded in the overall datagram-to-dispatch flow (lines → lexer →
//! dispatcher) rather than any single source file, since socket I/O is
//! explicitly out of scope; the per-line error counting and debug-level
//! logging follow a policy of never logging in a per-metric hot path.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::aggregator::Aggregator;
use crate::cancel::CancellationToken;
use crate::dispatcher::Dispatcher;
use crate::error::ParseError;
use crate::lexer::{self, Record};

/// Configuration recognized by the receiver glue.
#[derive(Debug, Clone, Default)]
pub struct ReceiverConfig {
    /// Prepended to every metric name as `namespace + "." + key`.
    pub namespace: Option<String>,
    /// Prepended to every produced `Metric`/`Event`'s tags, ahead of the
    /// tags parsed from the wire line.
    pub default_tags: Vec<Vec<u8>>,
}

/// Splits datagrams into lines, lexes each one, and forwards the result to
/// a [`Dispatcher`]. Parse errors are counted and dropped, never logged
/// above `debug`, so a flood of malformed input cannot itself become a
/// logging flood.
pub struct Receiver<A: Aggregator> {
    config: ReceiverConfig,
    dispatcher: std::sync::Arc<Dispatcher<A>>,
    parse_errors: AtomicU64,
}

impl<A: Aggregator> Receiver<A> {
    /// Creates a receiver forwarding to `dispatcher` under `config`.
    #[must_use]
    pub fn new(dispatcher: std::sync::Arc<Dispatcher<A>>, config: ReceiverConfig) -> Self {
        Self {
            config,
            dispatcher,
            parse_errors: AtomicU64::new(0),
        }
    }

    /// Total number of lines dropped for failing to parse, since this
    /// receiver was created.
    #[must_use]
    pub fn parse_error_count(&self) -> u64 {
        self.parse_errors.load(Ordering::Relaxed)
    }

    /// Splits `datagram` on `\n`, lexes and dispatches each non-empty line.
    ///
    /// Returns `Err` only if dispatch itself was cancelled partway through;
    /// lines that fail to parse are counted and silently dropped, never
    /// surfaced as an error from this call.
    pub fn handle_datagram(
        &self,
        ctx: &CancellationToken,
        datagram: &[u8],
    ) -> Result<(), crate::error::DispatchError> {
        for line in datagram.split(|&b| b == b'\n') {
            if line.is_empty() {
                continue;
            }
            self.handle_line(ctx, line)?;
        }
        Ok(())
    }

    fn handle_line(
        &self,
        ctx: &CancellationToken,
        line: &[u8],
    ) -> Result<(), crate::error::DispatchError> {
        let mut owned = line.to_vec();
        let namespace = self.config.namespace.as_deref();
        match lexer::run(&mut owned, namespace) {
            Ok(Record::Metric(mut metric)) => {
                let mut tags = self.config.default_tags.clone();
                tags.extend(metric.tags);
                metric.tags = tags;
                self.dispatcher.dispatch_metric(ctx, metric)
            }
            Ok(Record::Event(mut event)) => {
                let mut tags = self.config.default_tags.clone();
                tags.extend(event.tags);
                event.tags = tags;
                self.dispatcher.dispatch_event(ctx, event)
            }
            Err(err) => {
                self.note_parse_error(err);
                Ok(())
            }
        }
    }

    fn note_parse_error(&self, err: ParseError) {
        self.parse_errors.fetch_add(1, Ordering::Relaxed);
        debug!(error = %err, "dropping unparsable line");
    }
}
