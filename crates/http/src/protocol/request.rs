//! Parsed HTTP request types.
//!
//! A [`Request`] is built up by [`RequestDecoder`](crate::codec::RequestDecoder) and
//! handed out only once it is complete, after which it is read-only.

use crate::protocol::Headers;

/// The first line of a request: `METHOD SP REQUEST-TARGET SP HTTP/1.1`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestLine {
    method: String,
    request_target: String,
    http_version: String,
}

impl RequestLine {
    pub(crate) fn new(method: String, request_target: String, http_version: String) -> Self {
        Self { method, request_target, http_version }
    }

    /// The request method, uppercase ASCII letters only.
    #[inline]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The request target, kept opaque (path plus optional query).
    #[inline]
    pub fn request_target(&self) -> &str {
        &self.request_target
    }

    /// The version number without the `HTTP/` prefix, always `"1.1"`.
    #[inline]
    pub fn http_version(&self) -> &str {
        &self.http_version
    }
}

/// An assembled HTTP request with its full body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub(crate) request_line: RequestLine,
    pub(crate) headers: Headers,
    pub(crate) body: Vec<u8>,
}

impl Request {
    #[inline]
    pub fn request_line(&self) -> &RequestLine {
        &self.request_line
    }

    #[inline]
    pub fn method(&self) -> &str {
        self.request_line.method()
    }

    #[inline]
    pub fn request_target(&self) -> &str {
        self.request_line.request_target()
    }

    #[inline]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    #[inline]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Splits the request into its parts.
    pub fn into_parts(self) -> (RequestLine, Headers, Vec<u8>) {
        (self.request_line, self.headers, self.body)
    }
}

/// Progress of request assembly.
///
/// States only ever move forward:
/// `AwaitingRequestLine -> ParsingHeaders -> {ParsingBody | Done}`, and
/// `ParsingBody -> Done`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ParserState {
    #[default]
    AwaitingRequestLine,
    ParsingHeaders,
    ParsingBody,
    Done,
}

impl ParserState {
    #[inline]
    pub fn is_done(&self) -> bool {
        matches!(self, ParserState::Done)
    }
}
