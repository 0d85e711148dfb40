//! Covers the spec's default-tags-ordering example: default tags come
//! first, tags parsed off the wire line come second.

use std::num::NonZeroUsize;
use std::thread;
use std::time::{Duration, SystemTime};

use statsd_ingest_core::aggregator::Aggregator;
use statsd_ingest_core::cancel::{CancellationReason, CancellationToken};
use statsd_ingest_core::dispatcher::{Dispatcher, DispatcherConfig};
use statsd_ingest_core::model::{Event, Metric};
use statsd_ingest_core::receiver::{Receiver, ReceiverConfig};

#[derive(Default)]
struct RecordingAggregator {
    metrics: Vec<Metric>,
}

impl Aggregator for RecordingAggregator {
    type Snapshot = Vec<Metric>;

    fn receive(&mut self, metric: Metric, _now: SystemTime) {
        self.metrics.push(metric);
    }

    fn receive_event(&mut self, _event: Event) {}

    fn flush(&mut self, _now: &dyn Fn() -> SystemTime) -> Self::Snapshot {
        self.metrics.clone()
    }

    fn reset(&mut self, _now: SystemTime) {
        self.metrics.clear();
    }

    fn process(&mut self, visitor: &dyn Fn(&Self)) {
        visitor(self);
    }
}

#[test]
fn default_tags_come_before_wire_tags() {
    let dispatcher = Dispatcher::new(
        DispatcherConfig {
            num_workers: NonZeroUsize::new(1).unwrap(),
            per_worker_buffer_size: 16,
        },
        RecordingAggregator::default,
    );
    let ctx = CancellationToken::new();
    let run_ctx = ctx.clone();
    let d = dispatcher.clone();
    let run_handle = thread::spawn(move || d.run(&run_ctx));

    let receiver = Receiver::new(
        dispatcher.clone(),
        ReceiverConfig {
            namespace: None,
            default_tags: vec![b"env:foo".to_vec()],
        },
    );
    receiver
        .handle_datagram(&ctx, b"uniq.usr:joe|s|#foo:bar\n")
        .unwrap();
    thread::sleep(Duration::from_millis(20));

    let flush_ctx = CancellationToken::new();
    let snapshots: Vec<_> = dispatcher.flush(&flush_ctx).iter().collect();
    let metric = snapshots
        .iter()
        .find(|s| !s.is_empty())
        .expect("one worker should have received the metric")
        .first()
        .unwrap();
    assert_eq!(metric.tags, vec![b"env:foo".to_vec(), b"foo:bar".to_vec()]);

    ctx.cancel(CancellationReason::Cancelled);
    run_handle.join().unwrap();
}
