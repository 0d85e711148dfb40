//! The metric grammar: `key:value|type[|@sampling][|#tags]`.

use super::sanitize::{sanitize_key_byte, sanitize_tag_byte, Sanitized};
use super::{parse_finite_f64, Scanner};
use crate::error::ParseError;
use crate::model::{Metric, MetricType};

pub(super) fn parse(s: &mut Scanner<'_>, namespace: Option<&str>) -> Result<Metric, ParseError> {
    let key = scan_key(s)?;
    if key.is_empty() {
        return Err(ParseError::EmptyKey);
    }
    let name = match namespace {
        Some(ns) if !ns.is_empty() => format!("{ns}.{key}"),
        _ => key.to_string(),
    };

    let value_bytes = scan_value(s)?.to_vec();
    let metric_type = scan_type(s)?;

    let mut sampling = 1.0_f64;
    let mut tags = Vec::new();
    scan_suffixes(s, &mut sampling, &mut tags)?;

    let (value, string_value) = if metric_type == MetricType::Set {
        (0.0, value_bytes)
    } else {
        let mut v = parse_finite_f64(&value_bytes)?;
        if v.is_nan() {
            return Err(ParseError::InvalidValueNaN);
        }
        if metric_type == MetricType::Counter {
            v /= sampling;
        }
        (v, Vec::new())
    };

    Ok(Metric {
        name,
        value,
        string_value,
        metric_type,
        tags,
    })
}

/// Scans bytes up to (not including) the `:` key separator, sanitizing each
/// byte in place per the key table. The key table's keep-set is pure ASCII,
/// so the sanitized span is always valid UTF-8.
fn scan_key<'s>(s: &'s mut Scanner<'_>) -> Result<&'s str, ParseError> {
    let start = s.pos;
    loop {
        match s.next() {
            Some(b':') => break,
            Some(b) => match sanitize_key_byte(b) {
                Sanitized::Keep => {}
                Sanitized::Rewrite(nb) => s.rewrite_prev(nb),
                Sanitized::Drop => s.delete_prev(),
            },
            None => return Err(ParseError::MissingKeySep),
        }
    }
    let end = s.pos - 1;
    std::str::from_utf8(s.slice(start, end)).map_err(|_| ParseError::InvalidFormat)
}

/// Scans bytes up to (not including) the `|` value/type separator. Value
/// bytes are copied raw: no sanitization, since a set's member string is
/// reported verbatim.
fn scan_value<'s>(s: &'s mut Scanner<'_>) -> Result<&'s [u8], ParseError> {
    let start = s.pos;
    loop {
        match s.next() {
            Some(b'|') => break,
            Some(_) => {}
            None => return Err(ParseError::MissingValueSep),
        }
    }
    Ok(s.slice(start, s.pos - 1))
}

fn scan_type(s: &mut Scanner<'_>) -> Result<MetricType, ParseError> {
    match s.next() {
        Some(b'c') => Ok(MetricType::Counter),
        Some(b'g') => Ok(MetricType::Gauge),
        Some(b's') => Ok(MetricType::Set),
        Some(b'm') => {
            s.expect(b's').map_err(|_| ParseError::InvalidType)?;
            Ok(MetricType::Timer)
        }
        _ => Err(ParseError::InvalidType),
    }
}

/// Scans the optional `|@sampling` and/or `|#tags` suffix sections that
/// follow the type token. A tag section always runs to end of input: no
/// further suffix can follow it.
fn scan_suffixes(
    s: &mut Scanner<'_>,
    sampling: &mut f64,
    tags: &mut Vec<Vec<u8>>,
) -> Result<(), ParseError> {
    match s.next() {
        None => Ok(()),
        Some(b'|') => match s.next() {
            Some(b'@') => {
                let (rate, hit_pipe) = scan_sample_rate(s)?;
                *sampling = rate;
                if hit_pipe {
                    s.expect(b'#')?;
                    *tags = scan_tags(s);
                }
                Ok(())
            }
            Some(b'#') => {
                *tags = scan_tags(s);
                Ok(())
            }
            _ => Err(ParseError::InvalidSamplingOrTags),
        },
        Some(_) => Err(ParseError::InvalidType),
    }
}

/// Scans sample-rate digits up to `|` or end of input, consuming that `|`.
/// Returns the rate and whether a `|` (rather than eof) terminated it, so the
/// caller knows whether a `#tags` section must follow. An empty span (a bare
/// trailing `@`) is rejected rather than defaulting to `1.0`.
fn scan_sample_rate(s: &mut Scanner<'_>) -> Result<(f64, bool), ParseError> {
    let start = s.pos;
    let mut hit_pipe = false;
    loop {
        match s.next() {
            Some(b'|') => {
                hit_pipe = true;
                break;
            }
            Some(_) => {}
            None => break,
        }
    }
    let end = if hit_pipe { s.pos - 1 } else { s.pos };
    let bytes = s.slice(start, end);
    if bytes.is_empty() {
        return Err(ParseError::InvalidFormat);
    }
    let rate = parse_finite_f64(bytes)?;
    if !rate.is_finite() {
        return Err(ParseError::InvalidFormat);
    }
    Ok((rate, hit_pipe))
}

/// Scans a comma-separated tag list running to end of input, sanitizing each
/// byte per the tag table. Empty tags (`#,`, a trailing comma) are kept.
///
/// Shared with event attribute parsing: a `#` tag section is always the
/// last thing in either grammar.
pub(super) fn scan_tags(s: &mut Scanner<'_>) -> Vec<Vec<u8>> {
    let mut tags = Vec::new();
    let mut start = s.pos;
    loop {
        match s.next() {
            Some(b',') => {
                tags.push(s.slice(start, s.pos - 1).to_vec());
                start = s.pos;
            }
            Some(b) => match sanitize_tag_byte(b) {
                Sanitized::Keep => {}
                Sanitized::Rewrite(nb) => s.rewrite_prev(nb),
                Sanitized::Drop => s.delete_prev(),
            },
            None => {
                tags.push(s.slice(start, s.pos).to_vec());
                break;
            }
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(line: &str) -> Result<Metric, ParseError> {
        let mut buf = line.as_bytes().to_vec();
        let mut s = Scanner::new(&mut buf);
        parse(&mut s, None)
    }

    #[test]
    fn bare_at_sign_is_rejected() {
        assert_eq!(run("x:1|c|@"), Err(ParseError::InvalidFormat));
    }

    #[test]
    fn trailing_garbage_after_type_is_invalid_type() {
        assert_eq!(run("x:1|c!"), Err(ParseError::InvalidType));
    }

    #[test]
    fn sampling_then_non_hash_is_invalid_format() {
        assert_eq!(run("x:1|c|@0.5|x"), Err(ParseError::InvalidFormat));
    }

    #[test]
    fn pipe_not_followed_by_at_or_hash_is_rejected() {
        assert_eq!(run("x:1|c|z"), Err(ParseError::InvalidSamplingOrTags));
    }

    #[test]
    fn trailing_comma_yields_empty_tag() {
        let m = run("x:1|c|#a,").unwrap();
        assert_eq!(m.tags, vec![b"a".to_vec(), Vec::<u8>::new()]);
    }
}
