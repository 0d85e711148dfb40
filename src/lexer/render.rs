//! Renders a [`Record`](super::Record) back to wire bytes.
//!
//! Used by the property tests to drive a parse/render/parse round trip:
//! render is not guaranteed to reproduce the original datagram byte-for-byte
//! (sanitization is lossy, and a counter's sampling rate has already been
//! applied into its value by the time it reaches a `Metric`), but
//! `run(&mut render(record), ns)` must always reparse to an equivalent
//! record.

use super::Record;
use crate::model::{AlertType, Event, MetricType, Priority};

/// Renders a [`Record`] to its canonical wire form.
#[must_use]
pub fn render(record: &Record) -> Vec<u8> {
    match record {
        Record::Metric(m) => render_metric(m),
        Record::Event(e) => render_event(e),
    }
}

fn render_metric(m: &crate::model::Metric) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(m.name.as_bytes());
    out.push(b':');
    match m.metric_type {
        MetricType::Set => out.extend_from_slice(&m.string_value),
        _ => out.extend_from_slice(m.value.to_string().as_bytes()),
    }
    out.push(b'|');
    out.extend_from_slice(m.metric_type.wire_token().as_bytes());
    if !m.tags.is_empty() {
        out.extend_from_slice(b"|#");
        render_tags(&mut out, &m.tags);
    }
    out
}

fn render_event(e: &Event) -> Vec<u8> {
    let escaped_text = e.text.replace('\n', "\\n");
    let mut out = Vec::new();
    out.extend_from_slice(
        format!("_e{{{},{}}}:", e.title.len(), escaped_text.len()).as_bytes(),
    );
    out.extend_from_slice(e.title.as_bytes());
    out.push(b'|');
    out.extend_from_slice(escaped_text.as_bytes());

    if e.date_happened != 0 {
        out.extend_from_slice(format!("|d:{}", e.date_happened).as_bytes());
    }
    if let Some(host) = &e.hostname {
        out.extend_from_slice(format!("|h:{host}").as_bytes());
    }
    match e.priority {
        Priority::Normal => {}
        Priority::Low => out.extend_from_slice(b"|p:low"),
    }
    match e.alert_type {
        AlertType::Info => {}
        AlertType::Warning => out.extend_from_slice(b"|t:warning"),
        AlertType::Error => out.extend_from_slice(b"|t:error"),
        AlertType::Success => out.extend_from_slice(b"|t:success"),
    }
    if !e.tags.is_empty() {
        out.extend_from_slice(b"|#");
        render_tags(&mut out, &e.tags);
    }
    out
}

fn render_tags(out: &mut Vec<u8>, tags: &[Vec<u8>]) {
    for (i, tag) in tags.iter().enumerate() {
        if i > 0 {
            out.push(b',');
        }
        out.extend_from_slice(tag);
    }
}
