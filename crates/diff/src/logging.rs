//! Failure logging for hosts that cap the length of a log line.

use std::error::Error;

/// Longest piece a single log call receives
pub const MAX_LOG_LINE: usize = 1000;

/// Split `message` into pieces of at most `max_chars` characters
#[must_use]
pub fn chunk_message(message: &str, max_chars: usize) -> Vec<&str> {
    if max_chars == 0 || message.is_empty() {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    for (count, (idx, _)) in message.char_indices().enumerate() {
        if count > 0 && count % max_chars == 0 {
            chunks.push(&message[start..idx]);
            start = idx;
        }
    }
    chunks.push(&message[start..]);
    chunks
}

/// Emit `message` at error level, one event per `MAX_LOG_LINE` piece
pub fn log_chunked(message: &str) {
    for part in chunk_message(message, MAX_LOG_LINE) {
        tracing::error!("{part}");
    }
}

/// Render an error and every error in its source chain, one per line
#[must_use]
pub fn error_chain(err: &dyn Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str("\n  caused by: ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

/// Log a failure with its context line and its cause chain
pub fn report_error(context: &str, err: &dyn Error) {
    log_chunked(&format!("{context}: {err}"));
    log_chunked(&format!("Error chain: {}", error_chain(err)));
}
