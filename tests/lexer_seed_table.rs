//! Covers the literal seed table, the failing-input table, and the two
//! event parsing scenarios.

use statsd_ingest_core::model::{AlertType, MetricType, Priority};
use statsd_ingest_core::{run, ParseError, Record};

fn parse(line: &[u8]) -> Result<Record, ParseError> {
    let mut owned = line.to_vec();
    run(&mut owned, None)
}

fn parse_ns(line: &[u8], namespace: &str) -> Result<Record, ParseError> {
    let mut owned = line.to_vec();
    run(&mut owned, Some(namespace))
}

#[test]
fn counter() {
    let record = parse(b"foo.bar.baz:2|c").unwrap();
    let metric = record.as_metric().unwrap();
    assert_eq!(metric.name, "foo.bar.baz");
    assert_eq!(metric.value, 2.0);
    assert_eq!(metric.metric_type, MetricType::Counter);
}

#[test]
fn gauge() {
    let record = parse(b"abc.def.g:3|g").unwrap();
    let metric = record.as_metric().unwrap();
    assert_eq!(metric.name, "abc.def.g");
    assert_eq!(metric.value, 3.0);
    assert_eq!(metric.metric_type, MetricType::Gauge);
}

#[test]
fn timer() {
    let record = parse(b"def.g:10|ms").unwrap();
    let metric = record.as_metric().unwrap();
    assert_eq!(metric.name, "def.g");
    assert_eq!(metric.value, 10.0);
    assert_eq!(metric.metric_type, MetricType::Timer);
}

#[test]
fn sampled_counter_is_scaled() {
    let record = parse(b"smp.rte:5|c|@0.1").unwrap();
    let metric = record.as_metric().unwrap();
    assert_eq!(metric.name, "smp.rte");
    assert_eq!(metric.value, 50.0);
    assert_eq!(metric.metric_type, MetricType::Counter);
}

#[test]
fn sampled_counter_with_tags() {
    let record = parse(b"smp.rte:5|c|@0.1|#foo:bar,baz").unwrap();
    let metric = record.as_metric().unwrap();
    assert_eq!(metric.value, 50.0);
    assert_eq!(
        metric.tags,
        vec![b"foo:bar".to_vec(), b"baz".to_vec()]
    );
}

#[test]
fn set_carries_string_value() {
    let record = parse(b"uniq.usr:joe|s").unwrap();
    let metric = record.as_metric().unwrap();
    assert_eq!(metric.name, "uniq.usr");
    assert_eq!(metric.string_value, b"joe");
    assert_eq!(metric.metric_type, MetricType::Set);
}

#[test]
fn space_in_key_becomes_underscore() {
    let record = parse(b"smp gge:1|g").unwrap();
    let metric = record.as_metric().unwrap();
    assert_eq!(metric.name, "smp_gge");
    assert_eq!(metric.value, 1.0);
}

#[test]
fn slash_in_key_becomes_hyphen() {
    let record = parse(b"smp/gge:1|g").unwrap();
    let metric = record.as_metric().unwrap();
    assert_eq!(metric.name, "smp-gge");
}

#[test]
fn disallowed_bytes_are_dropped_from_key() {
    let record = parse(b"smp,gge$:1|g").unwrap();
    let metric = record.as_metric().unwrap();
    assert_eq!(metric.name, "smpgge");
}

#[test]
fn tags_are_lowercased() {
    let record = parse(b"smp.rte:5|c|#Foo:Bar,baz").unwrap();
    let metric = record.as_metric().unwrap();
    assert_eq!(
        metric.tags,
        vec![b"foo:bar".to_vec(), b"baz".to_vec()]
    );
}

#[test]
fn namespace_is_prepended() {
    let record = parse_ns(b"foo.bar.baz:2|c", "stats").unwrap();
    let metric = record.as_metric().unwrap();
    assert_eq!(metric.name, "stats.foo.bar.baz");
}

#[test]
fn missing_colon_before_type_is_rejected() {
    assert!(parse(b"fOO|bar:bazkk").is_err());
}

#[test]
fn unknown_type_token_is_rejected() {
    assert_eq!(parse(b"foo.bar.baz:1|q"), Err(ParseError::InvalidType));
}

#[test]
fn nan_value_is_rejected() {
    assert_eq!(
        parse(b"NaN.should.be:NaN|g"),
        Err(ParseError::InvalidValueNaN)
    );
}

#[test]
fn empty_buffer_is_rejected() {
    assert!(parse(b"").is_err());
}

#[test]
fn bare_underscore_is_rejected() {
    assert!(parse(b"_").is_err());
}

#[test]
fn underscore_prefixed_garbage_is_rejected() {
    assert!(parse(b"_x...").is_err());
}

#[test]
fn event_with_full_attributes() {
    // Wire text is the 5 raw bytes `wor\n` (backslash, n, not a real
    // newline); the lexer unescapes that literal sequence to an actual LF.
    let record = parse(b"_e{5,5}:hello|wor\\n|p:low|t:error|#a,b").unwrap();
    let event = record.as_event().unwrap();
    assert_eq!(event.title, "hello");
    assert_eq!(event.text, "wor\n");
    assert_eq!(event.priority, Priority::Low);
    assert_eq!(event.alert_type, AlertType::Error);
    assert_eq!(event.tags, vec![b"a".to_vec(), b"b".to_vec()]);
}

#[test]
fn event_with_bogus_priority_is_rejected() {
    assert_eq!(
        parse(b"_e{5,3}:hello|wor|p:bogus"),
        Err(ParseError::InvalidAttributes)
    );
}
