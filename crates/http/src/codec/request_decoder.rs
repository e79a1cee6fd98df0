//! Incremental HTTP request assembly.
//!
//! [`RequestDecoder`] is a sans-IO state machine: it is fed the unconsumed
//! prefix of the stream and reports how many bytes it used. Input may be cut
//! at any byte boundary; unconsumed bytes must be offered again, together with
//! whatever arrives next.
//!
//! # State Machine
//!
//! ```text
//! AwaitingRequestLine --line--> ParsingHeaders --blank line--> ParsingBody --declared length--> Done
//!                                              \--no body (Content-Length absent or 0)--------> Done
//! ```
//!
//! # Example
//!
//! ```
//! use raw_http::codec::RequestDecoder;
//!
//! let mut decoder = RequestDecoder::new();
//! let data = b"GET /x HTTP/1.1\r\nHost: localhost\r\n\r\n";
//!
//! let consumed = decoder.feed(&data[..10]).unwrap();
//! assert_eq!(consumed, 0);
//!
//! let consumed = decoder.feed(data).unwrap();
//! assert_eq!(consumed, data.len());
//!
//! let request = decoder.finish().unwrap();
//! assert_eq!(request.request_target(), "/x");
//! ```

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::{debug, trace};

use crate::codec::body::LengthDecoder;
use crate::codec::header::{HeaderStatus, parse_header_line};
use crate::codec::request_line_decoder::parse_request_line;
use crate::ensure;
use crate::protocol::{ParseError, ParserState, Request};

/// Maximum size in bytes of the request line plus the header section, CRLFs included
pub const MAX_HEADER_BYTES: usize = 8 * 1024;

/// Assembles one [`Request`] from arbitrarily fragmented input.
#[derive(Debug, Default)]
pub struct RequestDecoder {
    state: ParserState,
    request: Request,
    body_decoder: LengthDecoder,
    /// Bytes consumed by the request line and header lines so far
    header_bytes: usize,
}

impl RequestDecoder {
    pub fn new() -> Self {
        Default::default()
    }

    #[inline]
    pub fn state(&self) -> ParserState {
        self.state
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.state.is_done()
    }

    /// Runs the state machine over `data` until it needs more input or is done.
    ///
    /// Returns the total number of bytes consumed from the front of `data`.
    ///
    /// # Errors
    ///
    /// Any parse error of the current stage, or [`ParseError::AlreadyDone`] if
    /// the request was already complete before this call.
    pub fn feed(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        if self.is_done() {
            return Err(ParseError::AlreadyDone);
        }

        let mut consumed = 0;
        while !self.is_done() {
            let n = self.parse(&data[consumed..])?;
            if n == 0 {
                break;
            }
            consumed += n;
        }
        Ok(consumed)
    }

    /// Performs a single step for the current state.
    ///
    /// A step parses at most one request-line, one header line or one body
    /// fragment. Returns the number of bytes consumed, `0` meaning more input
    /// is needed before progress can be made. A step that only changes state
    /// (for example the header section ending with no body) still consumes
    /// the bytes that triggered it.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::AlreadyDone`] when called in [`ParserState::Done`].
    pub fn parse(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            ParserState::AwaitingRequestLine | ParserState::ParsingHeaders => {
                let consumed = self.parse_head(data)?;
                self.count_header_bytes(data.len(), consumed)?;
                Ok(consumed)
            }

            ParserState::ParsingBody => {
                let (consumed, complete) = self.body_decoder.decode(data, &mut self.request.body)?;
                trace!(consumed, received = self.request.body.len(), declared = self.body_decoder.declared(), "read body bytes");
                if complete {
                    self.transition(ParserState::Done);
                }
                Ok(consumed)
            }

            ParserState::Done => Err(ParseError::AlreadyDone),
        }
    }

    /// Returns the assembled request.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::IncompleteRequest`] with the current state if the
    /// request is not done.
    pub fn finish(self) -> Result<Request, ParseError> {
        if !self.is_done() {
            return Err(ParseError::incomplete(self.state));
        }
        Ok(self.request)
    }

    /// One step of the request line or header section.
    fn parse_head(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            ParserState::AwaitingRequestLine => match parse_request_line(data)? {
                Some((consumed, request_line)) => {
                    debug!(method = request_line.method(), target = request_line.request_target(), "parsed request line");
                    self.request.request_line = request_line;
                    self.transition(ParserState::ParsingHeaders);
                    Ok(consumed)
                }
                None => Ok(0),
            },

            ParserState::ParsingHeaders => match parse_header_line(data, &mut self.request.headers)? {
                HeaderStatus::Partial => Ok(0),
                HeaderStatus::Field(consumed) => Ok(consumed),
                HeaderStatus::End(consumed) => {
                    match self.request.headers.content_length().transpose()? {
                        None | Some(0) => self.transition(ParserState::Done),
                        Some(length) => {
                            self.body_decoder = LengthDecoder::new(length);
                            self.transition(ParserState::ParsingBody);
                        }
                    }
                    Ok(consumed)
                }
            },

            // the head is over, nothing left to parse here
            ParserState::ParsingBody | ParserState::Done => Ok(0),
        }
    }

    /// Fails once the head, including a line still waiting for its CRLF, exceeds [`MAX_HEADER_BYTES`].
    fn count_header_bytes(&mut self, pending: usize, consumed: usize) -> Result<(), ParseError> {
        let size = self.header_bytes + if consumed == 0 { pending } else { consumed };
        ensure!(size <= MAX_HEADER_BYTES, ParseError::too_large_header(size, MAX_HEADER_BYTES));
        self.header_bytes += consumed;
        Ok(())
    }

    fn transition(&mut self, next: ParserState) {
        debug!(from = ?self.state, to = ?next, "request parser transition");
        self.state = next;
    }
}

/// Lets the assembler drive a [`FramedRead`](tokio_util::codec::FramedRead).
///
/// One request is yielded per decoder; it must be replaced to assemble another.
impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.is_done() {
            // the request was already yielded, leave the rest of `src` alone
            return Ok(None);
        }

        let consumed = self.feed(src)?;
        src.advance(consumed);

        if self.is_done() {
            let request = std::mem::take(&mut self.request);
            return Ok(Some(request));
        }
        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.is_done() {
            return Ok(None);
        }

        if self.state == ParserState::AwaitingRequestLine && src.is_empty() {
            // the peer closed without sending anything
            return Ok(None);
        }

        match self.decode(src)? {
            Some(request) => Ok(Some(request)),
            None => Err(ParseError::incomplete(self.state)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn feed_in_pieces(data: &[u8], piece: usize) -> Result<Request, ParseError> {
        let mut decoder = RequestDecoder::new();
        let mut pending = Vec::new();
        for fragment in data.chunks(piece) {
            pending.extend_from_slice(fragment);
            let consumed = decoder.feed(&pending)?;
            pending.drain(..consumed);
            if decoder.is_done() {
                break;
            }
        }
        decoder.finish()
    }

    #[test]
    fn from_curl() {
        let str = indoc! {r##"
        GET /index.html HTTP/1.1
        Host: 127.0.0.1:8080
        User-Agent: curl/7.79.1
        Accept: */*

        "##}
        .replace('\n', "\r\n");

        let request = feed_in_pieces(str.as_bytes(), str.len()).unwrap();

        assert_eq!(request.method(), "GET");
        assert_eq!(request.request_target(), "/index.html");
        assert_eq!(request.request_line().http_version(), "1.1");
        assert_eq!(request.headers().len(), 3);
        assert_eq!(request.headers().get("host"), Some("127.0.0.1:8080"));
        assert_eq!(request.headers().get("User-Agent"), Some("curl/7.79.1"));
        assert_eq!(request.headers().get("accept"), Some("*/*"));
        assert!(request.body().is_empty());
    }

    #[test]
    fn fragmentation_invariance() {
        let data = b"POST /submit HTTP/1.1\r\nHost: localhost:42069\r\nX-A: 1\r\nx-a: 2\r\nContent-Length: 13\r\n\r\nhello world!\n";

        let whole = feed_in_pieces(data, data.len()).unwrap();
        for piece in 1..data.len() {
            assert_eq!(feed_in_pieces(data, piece).unwrap(), whole, "piece size {piece}");
        }

        assert_eq!(whole.headers().get("x-a"), Some("1, 2"));
        assert_eq!(whole.body(), b"hello world!\n");
    }

    #[test]
    fn state_progression() {
        let mut decoder = RequestDecoder::new();
        assert_eq!(decoder.state(), ParserState::AwaitingRequestLine);

        assert_eq!(decoder.parse(b"GET / HTTP/1.1\r\n").unwrap(), 16);
        assert_eq!(decoder.state(), ParserState::ParsingHeaders);

        assert_eq!(decoder.parse(b"Content-Length: 3\r\n").unwrap(), 19);
        assert_eq!(decoder.state(), ParserState::ParsingHeaders);

        assert_eq!(decoder.parse(b"\r\n").unwrap(), 2);
        assert_eq!(decoder.state(), ParserState::ParsingBody);

        assert_eq!(decoder.parse(b"ab").unwrap(), 2);
        assert_eq!(decoder.state(), ParserState::ParsingBody);

        assert_eq!(decoder.parse(b"c").unwrap(), 1);
        assert_eq!(decoder.state(), ParserState::Done);
    }

    #[test]
    fn no_content_length_finishes_after_headers() {
        let mut decoder = RequestDecoder::new();
        let consumed = decoder.feed(b"GET / HTTP/1.1\r\nHost: x\r\n\r\n").unwrap();

        assert_eq!(consumed, 27);
        assert!(decoder.is_done());
        assert!(decoder.finish().unwrap().body().is_empty());
    }

    #[test]
    fn zero_content_length_finishes_after_headers() {
        let mut decoder = RequestDecoder::new();
        decoder.feed(b"POST / HTTP/1.1\r\nContent-Length: 0\r\n\r\n").unwrap();

        assert!(decoder.is_done());
        assert!(decoder.finish().unwrap().body().is_empty());
    }

    #[test]
    fn body_with_declared_length() {
        let request = feed_in_pieces(b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nabcde", 3).unwrap();
        assert_eq!(request.body(), b"abcde");
    }

    #[test]
    fn body_longer_than_declared() {
        let result = feed_in_pieces(b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nabcdef", 64);
        assert!(matches!(result, Err(ParseError::BodyLengthMismatch { declared: 5, received: 6 })));
    }

    #[test]
    fn body_shorter_than_declared() {
        let result = feed_in_pieces(b"POST / HTTP/1.1\r\nContent-Length: 20\r\n\r\npartial content", 64);
        assert!(matches!(result, Err(ParseError::IncompleteRequest { state: ParserState::ParsingBody })));
    }

    #[test]
    fn non_numeric_content_length() {
        let result = feed_in_pieces(b"POST / HTTP/1.1\r\nContent-Length: five\r\n\r\nabcde", 64);
        assert!(matches!(result, Err(ParseError::InvalidContentLength { .. })));
    }

    #[test]
    fn missing_end_of_headers() {
        let result = feed_in_pieces(b"GET / HTTP/1.1\r\nHost: localhost:42069\r\n", 64);
        assert!(matches!(result, Err(ParseError::IncompleteRequest { state: ParserState::ParsingHeaders })));
    }

    #[test]
    fn malformed_header() {
        let result = feed_in_pieces(b"GET / HTTP/1.1\r\nHost : localhost:42069\r\n\r\n", 4);
        assert!(matches!(result, Err(ParseError::MalformedHeaderLine { .. })));
    }

    #[test]
    fn header_section_at_the_limit() {
        let head = b"GET / HTTP/1.1\r\nX-Big: ";
        let filler = MAX_HEADER_BYTES - head.len() - 4;
        let mut data = head.to_vec();
        data.extend(std::iter::repeat_n(b'a', filler));
        data.extend_from_slice(b"\r\n\r\n");
        assert_eq!(data.len(), MAX_HEADER_BYTES);

        let request = feed_in_pieces(&data, 512).unwrap();
        assert_eq!(request.headers().get("x-big").map(str::len), Some(filler));
    }

    #[test]
    fn header_section_over_the_limit() {
        let mut data = b"GET / HTTP/1.1\r\n".to_vec();
        for i in 0..1024 {
            data.extend_from_slice(format!("X-H{i}: value\r\n").as_bytes());
        }
        data.extend_from_slice(b"\r\n");

        let result = feed_in_pieces(&data, data.len());
        assert!(matches!(result, Err(ParseError::HeaderTooLarge { max: MAX_HEADER_BYTES, .. })));
    }

    #[test]
    fn unterminated_line_over_the_limit() {
        let mut decoder = RequestDecoder::new();
        decoder.feed(b"GET / HTTP/1.1\r\n").unwrap();

        let line = vec![b'a'; MAX_HEADER_BYTES];
        let result = decoder.feed(&line);

        assert!(matches!(result, Err(ParseError::HeaderTooLarge { size, .. }) if size == MAX_HEADER_BYTES + 16));
    }

    #[test]
    fn body_does_not_count_toward_the_limit() {
        let body = vec![b'z'; 2 * MAX_HEADER_BYTES];
        let mut data = format!("POST / HTTP/1.1\r\nContent-Length: {}\r\n\r\n", body.len()).into_bytes();
        data.extend_from_slice(&body);

        let request = feed_in_pieces(&data, 4096).unwrap();
        assert_eq!(request.body(), &body[..]);
    }

    #[test]
    fn feed_after_done() {
        let mut decoder = RequestDecoder::new();
        decoder.feed(b"GET / HTTP/1.1\r\n\r\n").unwrap();

        assert!(matches!(decoder.feed(b"GET"), Err(ParseError::AlreadyDone)));
        assert!(matches!(decoder.parse(b""), Err(ParseError::AlreadyDone)));
    }

    #[test]
    fn trailing_bytes_are_left_unconsumed() {
        let mut decoder = RequestDecoder::new();
        let data = b"GET / HTTP/1.1\r\n\r\nGET /next HTTP/1.1\r\n";
        let consumed = decoder.feed(data).unwrap();

        assert_eq!(consumed, 18);
        assert!(decoder.is_done());
    }

    #[test]
    fn decoder_trait() {
        let mut decoder = RequestDecoder::new();
        let mut buffer = BytesMut::from(&b"PUT /item HTTP/1.1\r\nContent-Len"[..]);

        assert!(decoder.decode(&mut buffer).unwrap().is_none());
        assert_eq!(&buffer[..], b"Content-Len");

        buffer.extend_from_slice(b"gth: 2\r\n\r\nok");
        let request = decoder.decode(&mut buffer).unwrap().unwrap();

        assert_eq!(request.method(), "PUT");
        assert_eq!(request.body(), b"ok");
        assert!(buffer.is_empty());

        buffer.extend_from_slice(b"GET / HTTP/1.1\r\n\r\n");
        assert!(decoder.decode(&mut buffer).unwrap().is_none());
        assert_eq!(buffer.len(), 18);
    }

    #[test]
    fn decoder_trait_eof() {
        let mut decoder = RequestDecoder::new();
        assert!(decoder.decode_eof(&mut BytesMut::new()).unwrap().is_none());

        let mut decoder = RequestDecoder::new();
        let mut buffer = BytesMut::from(&b"GET / HTTP/1.1\r\nHost"[..]);
        let result = decoder.decode_eof(&mut buffer);
        assert!(matches!(result, Err(ParseError::IncompleteRequest { state: ParserState::ParsingHeaders })));
    }
}
