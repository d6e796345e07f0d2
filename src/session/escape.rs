//! Source-text escaping for the console-push statement.
//!
//! Submitted source text is embedded in a single-quoted string inside the
//! statement the bridge feeds to the runtime. This function makes that
//! embedding safe: no input can close the quote or smuggle extra statements.

/// Escape raw source text for use inside a single-quoted string literal.
///
/// Pure function: backslashes and quotes are backslash-escaped, and line
/// breaks become `\n`/`\r` escapes so the push statement stays one line.
pub fn escape_source(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for c in source.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\x00"),
            _ => out.push(c),
        }
    }
    out
}
