//! Request-line parsing.
//!
//! Parses `METHOD SP REQUEST-TARGET SP HTTP/1.1 CRLF` from the front of the
//! unconsumed input. The line is split on single spaces, so doubled spaces
//! produce empty parts and are rejected as malformed.

use tracing::trace;

use crate::ensure;
use crate::protocol::{ParseError, RequestLine};
use crate::utils::find_crlf;

const HTTP_NAME: &str = "HTTP";
const SUPPORTED_VERSION: &str = "1.1";

/// Parses a request-line from `data`.
///
/// # Returns
///
/// - `Ok(Some((consumed, line)))` once a full line is present, `consumed` includes the CRLF
/// - `Ok(None)` if no CRLF has arrived yet
/// - `Err(ParseError)` if the line is malformed
pub fn parse_request_line(data: &[u8]) -> Result<Option<(usize, RequestLine)>, ParseError> {
    let Some(index) = find_crlf(data) else {
        return Ok(None);
    };

    let line = std::str::from_utf8(&data[..index])
        .map_err(|_e| ParseError::malformed_request_line(String::from_utf8_lossy(&data[..index])))?;
    trace!(line, "parsing request line");

    let request_line = request_line_from_str(line)?;
    Ok(Some((index + 2, request_line)))
}

fn request_line_from_str(line: &str) -> Result<RequestLine, ParseError> {
    let parts: Vec<&str> = line.split(' ').collect();
    let [method, target, version] = parts[..] else {
        return Err(ParseError::malformed_request_line(line));
    };

    ensure!(!target.is_empty(), ParseError::malformed_request_line(line));
    ensure!(!method.is_empty() && method.bytes().all(|b| b.is_ascii_uppercase()), ParseError::invalid_method(method));

    let version_parts: Vec<&str> = version.split('/').collect();
    let [name, number] = version_parts[..] else {
        return Err(ParseError::unsupported_version(version));
    };
    ensure!(name == HTTP_NAME && number == SUPPORTED_VERSION, ParseError::unsupported_version(version));

    Ok(RequestLine::new(method.to_owned(), target.to_owned(), number.to_owned()))
}
