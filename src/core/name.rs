//! Header name canonicalization and validation.

/// Compute the canonical form of a raw header name.
///
/// Trims surrounding whitespace, lower-cases, then upper-cases the first
/// character of every `-`-separated segment (`content-TYPE` -> `Content-Type`).
/// Returns `None` when nothing is left after trimming.
///
/// Case folding is ASCII-only, matching how HTTP treats field names.
pub fn canonicalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut out = String::with_capacity(trimmed.len());
    let mut segment_start = true;
    for c in trimmed.chars() {
        if c == '-' {
            out.push('-');
            segment_start = true;
        } else if segment_start {
            out.push(c.to_ascii_uppercase());
            segment_start = false;
        } else {
            out.push(c.to_ascii_lowercase());
        }
    }
    Some(out)
}

/// Two names are logically equal when they match after trimming and ASCII case folding.
#[inline]
pub fn logically_equal(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Check if a header name is a valid RFC 9110 token.
#[inline]
pub fn is_valid_header_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            matches!(b, b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' |
                    b'0'..=b'9' | b'A'..=b'Z' | b'^' | b'_' | b'`' | b'a'..=b'z' | b'|' | b'~')
        })
}
