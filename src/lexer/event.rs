//! The event grammar: `_e{title_len,text_len}:title|text[|attr]*`.
//!
//! Attribute leaders: `d:<unix-seconds>`, `h:<hostname>`, `p:low|normal`,
//! `t:info|warning|error|success`, `#tag,tag,...`. A `#` section always runs
//! to end of input, so it must be the last attribute present.

use super::metric::scan_tags;
use super::Scanner;
use crate::error::ParseError;
use crate::model::{AlertType, Event, Priority};

pub(super) fn parse(s: &mut Scanner<'_>) -> Result<Event, ParseError> {
    match s.next() {
        Some(b'e') => {}
        _ => return Err(ParseError::InvalidType),
    }

    s.expect(b'{')?;
    let title_len = usize_from_uint(s.scan_uint()?)?;
    s.expect(b',')?;
    let text_len = usize_from_uint(s.scan_uint()?)?;
    s.expect(b'}')?;
    s.expect(b':')?;

    let (title, text) = scan_body(s, title_len, text_len)?;

    let mut event = Event {
        title,
        text,
        ..Event::default()
    };

    loop {
        match s.next() {
            None => break,
            Some(b'|') => scan_attribute(s, &mut event)?,
            Some(_) => return Err(ParseError::InvalidAttributes),
        }
    }

    Ok(event)
}

fn usize_from_uint(v: u64) -> Result<usize, ParseError> {
    usize::try_from(v).map_err(|_| ParseError::Overflow)
}

/// Extracts the `title_len` bytes, a mandatory `|`, then the `text_len`
/// bytes, unescaping the literal two-byte sequence `\n` to a real newline in
/// the text. Neither span is sanitized.
fn scan_body(
    s: &mut Scanner<'_>,
    title_len: usize,
    text_len: usize,
) -> Result<(String, String), ParseError> {
    let title_start = s.pos;
    let title_end = title_start
        .checked_add(title_len)
        .ok_or(ParseError::Overflow)?;
    if title_end >= s.len {
        return Err(ParseError::NotEnoughData);
    }
    if s.byte_at(title_end) != b'|' {
        return Err(ParseError::InvalidFormat);
    }
    let title = String::from_utf8_lossy(s.slice(title_start, title_end)).into_owned();

    let text_start = title_end + 1;
    let text_end = text_start
        .checked_add(text_len)
        .ok_or(ParseError::Overflow)?;
    if text_end > s.len {
        return Err(ParseError::NotEnoughData);
    }
    let raw_text = String::from_utf8_lossy(s.slice(text_start, text_end)).into_owned();
    let text = raw_text.replace("\\n", "\n");

    s.pos = text_end;
    Ok((title, text))
}

/// Finds the next `|` without consuming it, or end of input, and returns the
/// span up to it while advancing past it.
fn scan_until_pipe<'s>(s: &'s mut Scanner<'_>) -> &'s [u8] {
    let end = s.find_without_consuming(b'|');
    let start = s.pos;
    s.pos = end;
    s.slice(start, end)
}

fn scan_attribute(s: &mut Scanner<'_>, event: &mut Event) -> Result<(), ParseError> {
    match s.next() {
        Some(b'd') => {
            s.expect(b':')?;
            let secs = s.scan_uint()?;
            event.date_happened = i64::try_from(secs).map_err(|_| ParseError::Overflow)?;
            Ok(())
        }
        Some(b'h') => {
            s.expect(b':')?;
            let raw = scan_until_pipe(s);
            event.hostname = Some(String::from_utf8_lossy(raw).into_owned());
            Ok(())
        }
        Some(b'p') => {
            s.expect(b':')?;
            let raw = scan_until_pipe(s);
            event.priority = match raw {
                b"low" => Priority::Low,
                b"normal" => Priority::Normal,
                _ => return Err(ParseError::InvalidAttributes),
            };
            Ok(())
        }
        Some(b't') => {
            s.expect(b':')?;
            let raw = scan_until_pipe(s);
            event.alert_type = match raw {
                b"info" => AlertType::Info,
                b"warning" => AlertType::Warning,
                b"error" => AlertType::Error,
                b"success" => AlertType::Success,
                _ => return Err(ParseError::InvalidAttributes),
            };
            Ok(())
        }
        Some(b'#') => {
            event.tags = scan_tags(s);
            Ok(())
        }
        _ => Err(ParseError::InvalidAttributes),
    }
}
