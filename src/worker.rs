//! A worker: the sole mutator of one shard's aggregator.
//!
//! Grounded in the original dispatcher's `worker.work` main loop and its
//! `executeFlush`/`executeProcess` helpers, ported from a `select`
//! statement over four channels to [`crossbeam::select`].

use std::time::SystemTime;

use crossbeam::channel::Receiver;
use tracing::debug;

use crate::aggregator::{Aggregator, FlushCommand, ProcessCommand};
use crate::model::{Event, Metric};

/// Owns one aggregator and the receive ends of its four input channels.
///
/// Only `metrics_rx` closing is a shutdown signal (see
/// [`crate::dispatcher::Dispatcher::run`]); the other three channels stay
/// open for as long as the dispatcher itself does, which outlives every
/// worker thread.
pub(crate) struct Worker<A: Aggregator> {
    pub(crate) shard: usize,
    pub(crate) aggregator: A,
    pub(crate) metrics_rx: Receiver<Metric>,
    pub(crate) events_rx: Receiver<Event>,
    pub(crate) flush_rx: Receiver<FlushCommand<A::Snapshot>>,
    pub(crate) process_rx: Receiver<ProcessCommand<A>>,
}

impl<A: Aggregator> Worker<A> {
    /// Runs the main select loop until `metrics_rx` closes.
    pub(crate) fn run(mut self) {
        loop {
            crossbeam::select! {
                recv(self.metrics_rx) -> msg => match msg {
                    Ok(metric) => self.aggregator.receive(metric, SystemTime::now()),
                    Err(_) => {
                        debug!(shard = self.shard, "metrics queue closed, worker exiting");
                        return;
                    }
                },
                recv(self.events_rx) -> msg => {
                    if let Ok(event) = msg {
                        self.aggregator.receive_event(event);
                    }
                },
                recv(self.flush_rx) -> msg => {
                    if let Ok(cmd) = msg {
                        self.execute_flush(cmd);
                    }
                },
                recv(self.process_rx) -> msg => {
                    if let Ok(cmd) = msg {
                        self.execute_process(&cmd);
                    }
                },
            }
        }
    }

    fn execute_flush(&mut self, cmd: FlushCommand<A::Snapshot>) {
        let snapshot = self.aggregator.flush(&SystemTime::now);
        self.aggregator.reset(SystemTime::now());
        if !cmd.ctx.is_cancelled() {
            // An error here just means the consumer stopped listening; the
            // snapshot is dropped, same as an explicitly cancelled context.
            let _ = cmd.result.send(snapshot);
        }
    }

    fn execute_process(&mut self, cmd: &ProcessCommand<A>) {
        self.aggregator.process(cmd.f.as_ref());
    }
}
