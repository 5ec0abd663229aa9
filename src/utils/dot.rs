//! DOT format helpers for Graphviz output.

/// Escapes a string for use inside a quoted DOT label.
///
/// Quotes, backslashes, newlines and record-label angle brackets are escaped; carriage
/// returns are dropped.
///
/// # Examples
///
/// ```rust
/// use ssagraph::utils::escape_dot;
///
/// assert_eq!(escape_dot("x = \"a\" < b"), "x = \\\"a\\\" \\< b");
/// ```
#[must_use]
pub fn escape_dot(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            '<' => escaped.push_str("\\<"),
            '>' => escaped.push_str("\\>"),
            _ => escaped.push(c),
        }
    }
    escaped
}
