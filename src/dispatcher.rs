//! The sharded dispatcher: owns N workers and routes metrics, events, and
//! flush/process broadcasts to them.
//!
//! Grounded in the original `dispatcher`/`NewDispatcher`/`DispatchMetric`/
//! `DispatchEvent`/`Flush`/`Process`/`Run`. Two simplifications follow from
//! Rust's ownership model rather than manual accounting:
//!
//! - `flush`'s result channel needs no explicit "all workers done" waiter:
//!   each delivered [`crate::aggregator::FlushCommand`] carries its own
//!   `Sender` clone, and the channel closes itself once every clone (one
//!   per worker actually dispatched to) is dropped.
//! - `process`'s waiter is a [`crossbeam::sync::WaitGroup`] clone handed out
//!   per delivered command, rather than an `Add`/`Done` counter — a command
//!   never sent never holds a clone, so a cancelled broadcast needs no
//!   correction.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam::channel::{bounded, Sender};
use crossbeam::sync::WaitGroup;
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::aggregator::{Aggregator, AggregatorFactory, FlushCommand, ProcessCommand};
use crate::cancel::{CancellationReason, CancellationToken};
use crate::error::DispatchError;
use crate::model::{Event, Metric};
use crate::worker::Worker;

/// The sender-side channel handles the dispatcher holds for one shard.
struct WorkerHandle<A: Aggregator> {
    /// Held behind a lock so [`Dispatcher::run`] can close it (by taking and
    /// dropping it) as the shutdown sentinel, while `dispatch_metric` keeps
    /// using it concurrently up to that point.
    metrics_tx: Mutex<Option<Sender<Metric>>>,
    events_tx: Sender<Event>,
    flush_tx: Sender<FlushCommand<A::Snapshot>>,
    process_tx: Sender<ProcessCommand<A>>,
}

/// Configuration recognized by the dispatcher: shard count and per-shard
/// queue capacity. The aggregator factory is taken as a separate argument
/// to [`Dispatcher::new`] rather than held here, since it is generic over
/// the aggregator type while this struct is not (mirroring how
/// [`crate::receiver::ReceiverConfig`] holds only its plain options).
#[derive(Debug, Clone, Copy)]
pub struct DispatcherConfig {
    /// Shard count; one worker thread and one aggregator per shard.
    pub num_workers: NonZeroUsize,
    /// Bounded capacity of each shard's metrics queue (and, for symmetry,
    /// its events queue — see `DESIGN.md`).
    pub per_worker_buffer_size: usize,
}

/// Owns N shards, each a worker thread with its own aggregator, and routes
/// metrics/events/flush/process traffic to them.
pub struct Dispatcher<A: Aggregator> {
    handles: Vec<WorkerHandle<A>>,
    event_counter: AtomicU32,
    // Taken once by `run`; `None` after that, including before the first
    // call if this dispatcher was built some other way (it never is).
    pending_workers: Mutex<Option<Vec<Worker<A>>>>,
}

impl<A: Aggregator> Dispatcher<A> {
    /// Builds a dispatcher with `config.num_workers` shards, each with a
    /// metrics queue bounded at `config.per_worker_buffer_size`, and one
    /// aggregator per shard produced by `factory`.
    pub fn new<F>(config: DispatcherConfig, factory: F) -> Arc<Self>
    where
        F: AggregatorFactory<A> + 'static,
    {
        let num_workers = config.num_workers.get();
        let mut handles = Vec::with_capacity(num_workers);
        let mut workers = Vec::with_capacity(num_workers);

        for shard in 0..num_workers {
            let (metrics_tx, metrics_rx) = bounded(config.per_worker_buffer_size);
            let (events_tx, events_rx) = bounded(config.per_worker_buffer_size);
            // Unbuffered, like the original's flush/process channels: a
            // send only completes once a worker is ready to receive it.
            let (flush_tx, flush_rx) = bounded(0);
            let (process_tx, process_rx) = bounded(0);

            handles.push(WorkerHandle {
                metrics_tx: Mutex::new(Some(metrics_tx)),
                events_tx,
                flush_tx,
                process_tx,
            });
            workers.push(Worker {
                shard,
                aggregator: factory.create(),
                metrics_rx,
                events_rx,
                flush_rx,
                process_rx,
            });
        }

        Arc::new(Self {
            handles,
            event_counter: AtomicU32::new(0),
            pending_workers: Mutex::new(Some(workers)),
        })
    }

    fn shard_for_name(&self, name: &str) -> usize {
        let mut hasher = adler32::RollingAdler32::new();
        hasher.update_buffer(name.as_bytes());
        (hasher.hash() as usize) % self.handles.len()
    }

    /// Routes `m` to the worker owning `adler32(m.name) mod N`. Blocks if
    /// that shard's metrics queue is full, unless `ctx` is cancelled first.
    pub fn dispatch_metric(&self, ctx: &CancellationToken, m: Metric) -> Result<(), DispatchError> {
        let shard = self.shard_for_name(&m.name);
        let tx = {
            let guard = self.handles[shard].metrics_tx.lock();
            match guard.as_ref() {
                Some(tx) => tx.clone(),
                None => {
                    return Err(DispatchError::ContextCancelled(
                        ctx.reason().unwrap_or(CancellationReason::Cancelled),
                    ))
                }
            }
        };
        crossbeam::select! {
            recv(ctx.done()) -> _ => Err(DispatchError::ContextCancelled(
                ctx.reason().unwrap_or(CancellationReason::Cancelled),
            )),
            send(tx, m) -> res => {
                let _ = res;
                Ok(())
            }
        }
    }

    /// Routes `e` to a worker chosen by a dispatcher-wide round-robin
    /// counter, advanced with an atomic fetch-add so concurrent callers see
    /// distinct shard assignments.
    pub fn dispatch_event(&self, ctx: &CancellationToken, e: Event) -> Result<(), DispatchError> {
        let shard = (self.event_counter.fetch_add(1, Ordering::Relaxed) as usize) % self.handles.len();
        crossbeam::select! {
            recv(ctx.done()) -> _ => Err(DispatchError::ContextCancelled(
                ctx.reason().unwrap_or(CancellationReason::Cancelled),
            )),
            send(self.handles[shard].events_tx, e) -> res => {
                let _ = res;
                Ok(())
            }
        }
    }

    /// Broadcasts a flush command to every worker in index order and
    /// returns the channel their snapshots arrive on. The channel is
    /// capacity-N so no worker blocks while emitting, and closes once every
    /// worker a command was actually delivered to has responded (or been
    /// cancelled).
    pub fn flush(&self, ctx: &CancellationToken) -> crossbeam::channel::Receiver<A::Snapshot> {
        let (results_tx, results_rx) = bounded(self.handles.len());
        for handle in &self.handles {
            if ctx.is_cancelled() {
                break;
            }
            crossbeam::select! {
                recv(ctx.done()) -> _ => break,
                send(handle.flush_tx, FlushCommand {
                    ctx: ctx.clone(),
                    result: results_tx.clone(),
                }) -> res => {
                    let _ = res;
                }
            }
        }
        // `results_tx`'s own clone is dropped here; the channel closes once
        // every clone handed to a delivered command is dropped in turn.
        results_rx
    }

    /// Broadcasts a process command to every worker in index order and
    /// returns a [`WaitGroup`] the caller can join to observe completion.
    /// `f` may be invoked between 0 and N times, once per worker a command
    /// was actually delivered to.
    pub fn process(
        &self,
        ctx: &CancellationToken,
        f: impl Fn(&A) + Send + Sync + 'static,
    ) -> WaitGroup {
        let wg = WaitGroup::new();
        let f: Arc<dyn Fn(&A) + Send + Sync> = Arc::new(f);
        for handle in &self.handles {
            if ctx.is_cancelled() {
                break;
            }
            crossbeam::select! {
                recv(ctx.done()) -> _ => break,
                send(handle.process_tx, ProcessCommand {
                    f: f.clone(),
                    wg: wg.clone(),
                }) -> res => {
                    let _ = res;
                }
            }
        }
        wg
    }

    /// Spawns the worker threads and blocks until `ctx` is cancelled, then
    /// closes every worker's metrics queue and joins the threads before
    /// returning the cancellation reason.
    ///
    /// Calling `run` more than once on the same dispatcher is a no-op after
    /// the first call: there are no workers left to spawn.
    pub fn run(&self, ctx: &CancellationToken) -> CancellationReason {
        let workers = self.pending_workers.lock().take();
        let Some(workers) = workers else {
            warn!("run called more than once; nothing to spawn");
            ctx.done().recv().ok();
            return ctx.reason().unwrap_or(CancellationReason::Cancelled);
        };

        let join_handles: Vec<JoinHandle<()>> = workers
            .into_iter()
            .map(|w| thread::spawn(move || w.run()))
            .collect();

        info!(workers = join_handles.len(), "dispatcher running");
        ctx.done().recv().ok();

        for handle in &self.handles {
            handle.metrics_tx.lock().take();
        }
        for jh in join_handles {
            let _ = jh.join();
        }
        info!("all workers exited");

        ctx.reason().unwrap_or(CancellationReason::Cancelled)
    }
}
