//! Wire-level data model: what the lexer produces and what travels a
//! dispatch channel.
//!
//! Everything here is plain owned data (`String`/`Vec<u8>`), never borrowed
//! from the original datagram buffer — a `Metric`/`Event` must outlive the
//! line it was parsed from and cross a thread boundary to reach its worker.

/// The four DogStatsD metric kinds, tagged by their wire token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricType {
    /// `c` — monotonically accumulated, scaled by the inverse sampling rate.
    Counter,
    /// `g` — last-value-wins point-in-time measurement.
    Gauge,
    /// `ms` — a timing/duration sample, aggregated into a distribution.
    Timer,
    /// `s` — set membership; the payload is `string_value`, not `value`.
    Set,
}

impl MetricType {
    /// The wire token this type is written/read as.
    #[must_use]
    pub const fn wire_token(self) -> &'static str {
        match self {
            MetricType::Counter => "c",
            MetricType::Gauge => "g",
            MetricType::Timer => "ms",
            MetricType::Set => "s",
        }
    }
}

/// A parsed metric sample, ready for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    /// Non-empty, namespace-prefixed, sanitized metric name.
    pub name: String,
    /// The numeric value. Unused (left at `0.0`) for [`MetricType::Set`].
    /// Already scaled by the inverse sampling rate for counters.
    pub value: f64,
    /// The set member. Only populated for [`MetricType::Set`].
    pub string_value: Vec<u8>,
    /// The metric kind.
    pub metric_type: MetricType,
    /// Ordered, sanitized, lowercased tags (`key` or `key:value`).
    pub tags: Vec<Vec<u8>>,
}

/// Priority of an [`Event`]. `Normal` is the wire default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    /// Default priority.
    #[default]
    Normal,
    /// Low priority (`p:low` on the wire).
    Low,
}

/// Alert level of an [`Event`]. `Info` is the wire default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertType {
    /// Default alert level.
    #[default]
    Info,
    /// `t:warning`.
    Warning,
    /// `t:error`.
    Error,
    /// `t:success`.
    Success,
}

/// A parsed DogStatsD event (`_e{...}:...`), ready for dispatch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Event {
    /// Event title, exactly `title_len` bytes from the wire header.
    pub title: String,
    /// Event body, exactly `text_len` bytes from the wire header, with
    /// the literal two-byte sequence `\n` unescaped to a real newline.
    pub text: String,
    /// Unix epoch seconds; `0` means "unspecified".
    pub date_happened: i64,
    /// Optional reporting host.
    pub hostname: Option<String>,
    /// Reserved for forward compatibility; never populated by this wire
    /// grammar (no attribute leader maps to it — see [`crate::lexer`]).
    pub aggregation_key: Option<String>,
    /// Reserved for forward compatibility; never populated by this wire
    /// grammar.
    pub source_type_name: Option<String>,
    /// Ordered, sanitized, lowercased tags.
    pub tags: Vec<Vec<u8>>,
    /// Event priority, default `Normal`.
    pub priority: Priority,
    /// Event alert level, default `Info`.
    pub alert_type: AlertType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_tokens_match_grammar() {
        assert_eq!(MetricType::Counter.wire_token(), "c");
        assert_eq!(MetricType::Gauge.wire_token(), "g");
        assert_eq!(MetricType::Timer.wire_token(), "ms");
        assert_eq!(MetricType::Set.wire_token(), "s");
    }

    #[test]
    fn priority_and_alert_defaults() {
        assert_eq!(Priority::default(), Priority::Normal);
        assert_eq!(AlertType::default(), AlertType::Info);
    }
}
