//! Header field-line parsing, one line per call.
//!
//! Each call looks for the next CRLF in the unconsumed input:
//!
//! 1. no CRLF yet: nothing is consumed
//! 2. CRLF at offset 0: the blank line ending the header section
//! 3. otherwise `name: value`, folded into [`Headers`] with `", "` if the name repeats
//!
//! Surrounding spaces on the line are trimmed and at most one space after the
//! colon is dropped. A space between the name and the colon is rejected.
//! An empty value is accepted and stored as `""`.

use tracing::trace;

use crate::ensure;
use crate::protocol::{Headers, ParseError};
use crate::utils::find_crlf;

/// Outcome of parsing a single header line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HeaderStatus {
    /// No complete line is available yet.
    Partial,
    /// A field line was parsed, consuming this many bytes.
    Field(usize),
    /// The blank line was found, consuming this many bytes.
    End(usize),
}

impl HeaderStatus {
    /// Bytes consumed from the input.
    #[inline]
    pub fn consumed(&self) -> usize {
        match self {
            HeaderStatus::Partial => 0,
            HeaderStatus::Field(n) | HeaderStatus::End(n) => *n,
        }
    }
}

/// Parses the next header line from `data` into `headers`.
///
/// # Errors
///
/// - [`ParseError::MalformedHeaderLine`] when there is no colon, a space precedes
///   the colon, or the line is not UTF-8
/// - [`ParseError::InvalidHeaderToken`] when the name has characters outside the token set
pub fn parse_header_line(data: &[u8], headers: &mut Headers) -> Result<HeaderStatus, ParseError> {
    let Some(index) = find_crlf(data) else {
        return Ok(HeaderStatus::Partial);
    };

    if index == 0 {
        return Ok(HeaderStatus::End(2));
    }

    let raw = &data[..index];
    let line = std::str::from_utf8(raw).map_err(|_e| ParseError::malformed_header_line(String::from_utf8_lossy(raw)))?;

    let trimmed = line.trim_matches(' ');
    let Some((name, value)) = trimmed.split_once(':') else {
        return Err(ParseError::malformed_header_line(line));
    };
    ensure!(!name.ends_with(' '), ParseError::malformed_header_line(line));

    let value = value.strip_prefix(' ').unwrap_or(value);
    trace!(name, value, "parsed header line");

    headers.append(name, value)?;
    Ok(HeaderStatus::Field(index + 2))
}
