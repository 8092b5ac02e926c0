//! Log sanitization utilities
//!
//! Keeps request signatures, user data and oversized response bodies
//! out of debug/error logs.

/// Maximum number of characters to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// Replacement for redacted values.
const REDACTED: &str = "<redacted>";

/// Cuts `s` to at most `TRUNCATE_LIMIT` bytes on a char boundary and notes the full length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }
    let cut = (0..=TRUNCATE_LIMIT)
        .rev()
        .find(|&i| s.is_char_boundary(i))
        .unwrap_or(0);
    format!("{}... [truncated, total {} bytes]", &s[..cut], s.len())
}

/// Replace the value of every `name=` query parameter in `url` with a placeholder.
///
/// Only the query part is touched; a URL without the parameter comes back unchanged.
pub fn redact_query_param(url: &str, name: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };

    let redacted: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if key == name => format!("{key}={REDACTED}"),
            _ => pair.to_string(),
        })
        .collect();

    format!("{base}?{}", redacted.join("&"))
}
