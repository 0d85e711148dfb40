//! # statsd-ingest-core
//!
//! A StatsD/DogStatsD ingestion core: a permissive, mutation-tolerant wire
//! lexer plus a sharded dispatcher/worker concurrency core that folds
//! parsed records into per-shard aggregator state and emits flush
//! snapshots on demand.
//!
//! This crate deliberately stops at the `Aggregator` boundary: the UDP/
//! packet source, flush sinks, configuration loading, and the concrete
//! counter/gauge/timer/set arithmetic are all external concerns. See
//! [`aggregator::Aggregator`] for the capability this core depends on.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::num::NonZeroUsize;
//! use std::sync::Arc;
//! use std::thread;
//!
//! use statsd_ingest_core::aggregator::Aggregator;
//! use statsd_ingest_core::cancel::CancellationToken;
//! use statsd_ingest_core::dispatcher::{Dispatcher, DispatcherConfig};
//! use statsd_ingest_core::receiver::{Receiver, ReceiverConfig};
//!
//! # struct MyAggregator;
//! # impl Aggregator for MyAggregator {
//! #     type Snapshot = ();
//! #     fn receive(&mut self, _m: statsd_ingest_core::model::Metric, _now: std::time::SystemTime) {}
//! #     fn receive_event(&mut self, _e: statsd_ingest_core::model::Event) {}
//! #     fn flush(&mut self, _now: &dyn Fn() -> std::time::SystemTime) {}
//! #     fn reset(&mut self, _now: std::time::SystemTime) {}
//! #     fn process(&mut self, visitor: &dyn Fn(&Self)) { visitor(self); }
//! # }
//! let config = DispatcherConfig {
//!     num_workers: NonZeroUsize::new(4).unwrap(),
//!     per_worker_buffer_size: 1000,
//! };
//! let dispatcher = Dispatcher::new(config, || MyAggregator);
//! let ctx = CancellationToken::new();
//! let run_ctx = ctx.clone();
//! let run_dispatcher = dispatcher.clone();
//! thread::spawn(move || run_dispatcher.run(&run_ctx));
//!
//! let receiver = Receiver::new(dispatcher, ReceiverConfig::default());
//! receiver.handle_datagram(&ctx, b"request.count:1|c\n").unwrap();
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![warn(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod aggregator;
pub mod cancel;
pub mod dispatcher;
mod error;
pub mod lexer;
pub mod model;
pub mod receiver;
mod worker;

pub use error::{DispatchError, ParseError};
pub use lexer::{run, Record};
