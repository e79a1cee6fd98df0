//! HTTP status codes and their reason phrases.
//!
//! The reason phrase table is a sorted static slice, shared read-only by every
//! connection for the lifetime of the process.

use std::fmt;

/// An HTTP response status code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatusCode(u16);

/// Reason phrases, sorted by code so lookups can binary search.
static REASON_PHRASES: &[(u16, &str)] = &[
    (200, "OK"),
    (201, "Created"),
    (204, "No Content"),
    (400, "Bad Request"),
    (404, "Not Found"),
    (405, "Method Not Allowed"),
    (413, "Content Too Large"),
    (500, "Internal Server Error"),
    (502, "Bad Gateway"),
    (503, "Service Unavailable"),
];

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const CREATED: StatusCode = StatusCode(201);
    pub const NO_CONTENT: StatusCode = StatusCode(204);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);
    pub const NOT_FOUND: StatusCode = StatusCode(404);
    pub const METHOD_NOT_ALLOWED: StatusCode = StatusCode(405);
    pub const CONTENT_TOO_LARGE: StatusCode = StatusCode(413);
    pub const INTERNAL_SERVER_ERROR: StatusCode = StatusCode(500);
    pub const BAD_GATEWAY: StatusCode = StatusCode(502);
    pub const SERVICE_UNAVAILABLE: StatusCode = StatusCode(503);

    /// Creates a status code from any three digit number.
    ///
    /// Returns `None` outside of `100..=999`.
    pub const fn from_u16(code: u16) -> Option<Self> {
        if code >= 100 && code <= 999 { Some(StatusCode(code)) } else { None }
    }

    #[inline]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns the reason phrase for this code, or `None` if the table does not know it.
    pub fn canonical_reason(&self) -> Option<&'static str> {
        REASON_PHRASES
            .binary_search_by_key(&self.0, |(code, _)| *code)
            .ok()
            .map(|index| REASON_PHRASES[index].1)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.canonical_reason() {
            Some(reason) => write!(f, "{} {}", self.0, reason),
            None => write!(f, "{}", self.0),
        }
    }
}
