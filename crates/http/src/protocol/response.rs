use crate::protocol::{Headers, StatusCode};

/// Stage of an ordered response write.
///
/// `AwaitingTrailers` is only entered after a chunked body has been finished.
/// A plain body never leaves `AwaitingBody`; the response is implicitly
/// complete once the caller stops writing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WriterState {
    AwaitingStatusLine,
    AwaitingHeaders,
    AwaitingBody,
    AwaitingTrailers,
    Complete,
}

/// The headers written when a response supplies none of its own.
pub fn default_headers(content_length: usize) -> Headers {
    let mut headers = Headers::new();
    headers.push_static("Content-Length", content_length.to_string());
    headers.push_static("Connection", "close".to_owned());
    headers.push_static("Content-Type", "text/plain".to_owned());
    headers
}

/// Builds the status line for `status`, e.g. `HTTP/1.1 200 OK\r\n`.
///
/// Codes missing from the reason table get an empty reason phrase.
pub fn status_line(status: StatusCode) -> String {
    format!("HTTP/1.1 {} {}\r\n", status.as_u16(), status.canonical_reason().unwrap_or(""))
}
