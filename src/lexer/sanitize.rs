//! Byte-level sanitization tables shared by key and tag scanning.
//!
//! Both tables agree on letters/digits/`.`/`-`/`_` (kept), `/` (rewritten to
//! `-`), and space/tab (rewritten to `_`). They differ only in what happens
//! to ASCII uppercase letters: a key drops anything outside its keep-set,
//! while a tag lowercases uppercase letters instead of dropping them.

/// Result of sanitizing one input byte.
pub enum Sanitized {
    /// Keep the byte unchanged.
    Keep,
    /// Replace the byte with this one.
    Rewrite(u8),
    /// Drop the byte entirely (the caller must shift the remainder left).
    Drop,
}

/// Sanitization rule for key bytes (ASCII letters/digits only; uppercase is
/// not special-cased and passes through as a kept byte).
pub fn sanitize_key_byte(b: u8) -> Sanitized {
    match b {
        b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'.' | b'-' | b'_' => Sanitized::Keep,
        b'/' => Sanitized::Rewrite(b'-'),
        b' ' | b'\t' => Sanitized::Rewrite(b'_'),
        _ => Sanitized::Drop,
    }
}

/// Sanitization rule for tag bytes: like a key, except uppercase ASCII
/// letters are lowercased in place rather than dropped.
pub fn sanitize_tag_byte(b: u8) -> Sanitized {
    match b {
        b'a'..=b'z' | b'0'..=b'9' | b'.' | b':' | b'-' | b'_' => Sanitized::Keep,
        b'A'..=b'Z' => Sanitized::Rewrite(b.to_ascii_lowercase()),
        b'/' => Sanitized::Rewrite(b'-'),
        b' ' | b'\t' => Sanitized::Rewrite(b'_'),
        _ => Sanitized::Drop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_table_drops_uppercase_outside_keep_set() {
        // Uppercase letters are in the key keep-set (they just aren't
        // lowercased); only genuinely foreign bytes are dropped.
        assert!(matches!(sanitize_key_byte(b'$'), Sanitized::Drop));
        assert!(matches!(sanitize_key_byte(b'A'), Sanitized::Keep));
    }

    #[test]
    fn tag_table_lowercases_uppercase() {
        assert!(matches!(sanitize_tag_byte(b'A'), Sanitized::Rewrite(b'a')));
    }

    #[test]
    fn both_tables_rewrite_slash_and_whitespace() {
        assert!(matches!(sanitize_key_byte(b'/'), Sanitized::Rewrite(b'-')));
        assert!(matches!(sanitize_tag_byte(b'/'), Sanitized::Rewrite(b'-')));
        assert!(matches!(sanitize_key_byte(b' '), Sanitized::Rewrite(b'_')));
        assert!(matches!(sanitize_tag_byte(b'\t'), Sanitized::Rewrite(b'_')));
    }
}
