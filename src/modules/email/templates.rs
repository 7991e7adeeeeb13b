/// Build the test message as raw DATA text.
///
/// The headers are a literal concatenation: nothing is encoded, escaped or
/// folded. Only line endings are touched, since DATA must use CRLF. No
/// trailing CRLF is added; the client writes `\r\n.\r\n` after the data.
pub fn compose_message(from: &str, to: &str, subject: &str, body: &str) -> String {
    format!(
        "From: {}\r\nTo: {}\r\nSubject: {}\r\n\r\n{}",
        from,
        to,
        subject,
        normalize_line_endings(body)
    )
}

/// Convert bare `\n` and bare `\r` into `\r\n`
fn normalize_line_endings(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\r\n");
            }
            '\n' => out.push_str("\r\n"),
            _ => out.push(c),
        }
    }
    out
}
