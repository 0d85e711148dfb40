//! The `Aggregator` capability: the one piece of this core left abstract.
//!
//! Grounded in the original dispatcher's `Aggregator`/`AggregatorFactory`
//! interfaces; kept abstract exactly as directed so the dispatcher/worker
//! core never depends on concrete counter/gauge/timer/set math. A minimal
//! reference implementation exists only under `#[cfg(test)]` support code
//! for exercising the concurrency core (see `tests/`).

use std::sync::Arc;
use std::time::SystemTime;

use crossbeam::channel::Sender;
use crossbeam::sync::WaitGroup;

use crate::cancel::CancellationToken;
use crate::model::{Event, Metric};

/// Opaque per-shard folding state. One instance is owned exclusively by one
/// worker for the dispatcher's lifetime; the worker is the only thread that
/// ever touches it, so implementations need no internal synchronization.
pub trait Aggregator: Send + 'static {
    /// The value a flush produces; travels the flush result channel to
    /// whatever consumer called [`crate::dispatcher::Dispatcher::flush`].
    type Snapshot: Send + 'static;

    /// Folds one metric into accumulator state.
    fn receive(&mut self, metric: Metric, now: SystemTime);

    /// Folds one event into accumulator state.
    fn receive_event(&mut self, event: Event);

    /// Produces a snapshot of current state. `now` is passed in rather than
    /// read directly so tests can stub the clock.
    fn flush(&mut self, now: &dyn Fn() -> SystemTime) -> Self::Snapshot;

    /// Clears accumulators. What "clear" means per metric type (e.g.
    /// whether gauges retain their last value) is an aggregator concern.
    fn reset(&mut self, now: SystemTime);

    /// Invokes a read-only visitor over current state.
    fn process(&mut self, visitor: &dyn Fn(&Self));
}

/// Produces one fresh aggregator per worker.
///
/// Mirrors the original `AggregatorFactory` interface plus its
/// `AggregatorFactoryFunc` adapter: the blanket impl below lets any
/// `Fn() -> A` closure serve directly as a factory, the same role the Go
/// adapter type played.
pub trait AggregatorFactory<A: Aggregator>: Send + Sync {
    /// Creates one new aggregator instance.
    fn create(&self) -> A;
}

impl<A, F> AggregatorFactory<A> for F
where
    A: Aggregator,
    F: Fn() -> A + Send + Sync,
{
    fn create(&self) -> A {
        (self)()
    }
}

/// A flush request in flight to one worker.
///
/// `result` is a `Sender` clone handed out only to commands actually
/// delivered to a worker. Dropping the last such clone closes the flush
/// consumer's channel, so there is no explicit outstanding-count to
/// maintain: the worker drops its clone exactly once, after it has either
/// sent or discarded the snapshot.
pub(crate) struct FlushCommand<S> {
    pub(crate) ctx: CancellationToken,
    pub(crate) result: Sender<S>,
}

/// A process request in flight to one worker.
///
/// `wg` is a [`WaitGroup`] clone handed out only to commands actually
/// delivered; the caller's own clone resolves once every delivered
/// command's worker has invoked `f` and dropped its clone.
pub(crate) struct ProcessCommand<A: Aggregator> {
    pub(crate) f: Arc<dyn Fn(&A) + Send + Sync>,
    pub(crate) wg: WaitGroup,
}
