//! Ordered response encoding.
//!
//! [`ResponseEncoder`] owns the response stage and refuses any part that
//! arrives out of order. A rejected part leaves both the stage and the
//! destination buffer untouched.
//!
//! ```text
//! AwaitingStatusLine -> AwaitingHeaders -> AwaitingBody --last chunk--> AwaitingTrailers --trailers--> Complete
//! ```
//!
//! Inside `AwaitingBody` the first body part picks the body mode. Plain and
//! chunked parts cannot be mixed within one response.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;
use tracing::{trace, warn};

use crate::codec::body::ChunkedEncoder;
use crate::codec::header::encode_headers;
use crate::protocol::{Headers, SendError, StatusCode, WriterState, default_headers, status_line};

/// One part of a response, in wire order.
#[derive(Debug, Clone, Copy)]
pub enum ResponsePart<'a> {
    StatusLine(StatusCode),
    /// An empty set is replaced by [`default_headers`] with a zero length.
    Headers(&'a Headers),
    /// Raw body bytes, written verbatim.
    Body(&'a [u8]),
    /// One chunk of a chunked body. Empty payloads are skipped.
    Chunk(&'a [u8]),
    /// The terminal `0\r\n` chunk.
    LastChunk,
    Trailers(&'a Headers),
}

impl ResponsePart<'_> {
    fn name(&self) -> &'static str {
        match self {
            ResponsePart::StatusLine(_) => "status line",
            ResponsePart::Headers(_) => "headers",
            ResponsePart::Body(_) => "body",
            ResponsePart::Chunk(_) => "chunked body",
            ResponsePart::LastChunk => "last chunk",
            ResponsePart::Trailers(_) => "trailers",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyMode {
    Unset,
    Plain,
    Chunked,
}

#[derive(Debug)]
pub struct ResponseEncoder {
    state: WriterState,
    body_mode: BodyMode,
    chunked_encoder: ChunkedEncoder,
    /// Field names announced by the `Trailer` response header, lowercase
    declared_trailers: Vec<String>,
}

impl ResponseEncoder {
    pub fn new() -> Self {
        Default::default()
    }

    #[inline]
    pub fn state(&self) -> WriterState {
        self.state
    }

    /// Returns true if nothing has been encoded yet.
    #[inline]
    pub fn is_untouched(&self) -> bool {
        self.state == WriterState::AwaitingStatusLine
    }

    /// Checks whether `part` may be written now and returns the stage that follows it.
    fn transition(&self, part: &ResponsePart<'_>) -> Result<(WriterState, BodyMode), SendError> {
        use BodyMode::*;
        use WriterState::*;

        let next = match (self.state, self.body_mode, part) {
            (AwaitingStatusLine, _, ResponsePart::StatusLine(_)) => (AwaitingHeaders, Unset),
            (AwaitingHeaders, _, ResponsePart::Headers(_)) => (AwaitingBody, Unset),
            (AwaitingBody, Unset | Plain, ResponsePart::Body(_)) => (AwaitingBody, Plain),
            (AwaitingBody, Unset | Chunked, ResponsePart::Chunk(_)) => (AwaitingBody, Chunked),
            (AwaitingBody, Unset | Chunked, ResponsePart::LastChunk) => (AwaitingTrailers, Chunked),
            (AwaitingTrailers, _, ResponsePart::Trailers(_)) => (Complete, Chunked),
            (state, _, part) => return Err(SendError::out_of_order(part.name(), state)),
        };
        Ok(next)
    }
}

impl Default for ResponseEncoder {
    fn default() -> Self {
        Self {
            state: WriterState::AwaitingStatusLine,
            body_mode: BodyMode::Unset,
            chunked_encoder: ChunkedEncoder::new(),
            declared_trailers: Vec::new(),
        }
    }
}

impl Encoder<ResponsePart<'_>> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, part: ResponsePart<'_>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (next_state, next_mode) = self.transition(&part)?;

        match part {
            ResponsePart::StatusLine(status) => {
                dst.put_slice(status_line(status).as_bytes());
            }
            ResponsePart::Headers(headers) if headers.is_empty() => {
                encode_headers(&default_headers(0), dst);
            }
            ResponsePart::Headers(headers) => {
                if let Some(trailer) = headers.get("trailer") {
                    self.declared_trailers =
                        trailer.split(',').map(|name| name.trim().to_ascii_lowercase()).filter(|name| !name.is_empty()).collect();
                }
                encode_headers(headers, dst);
            }
            ResponsePart::Body(data) => {
                dst.put_slice(data);
            }
            ResponsePart::Chunk(data) if data.is_empty() => {
                trace!("skip empty chunk, the zero chunk only ends the body");
            }
            ResponsePart::Chunk(data) => {
                self.chunked_encoder.encode(data, dst)?;
            }
            ResponsePart::LastChunk => {
                self.chunked_encoder.encode(&b""[..], dst)?;
            }
            ResponsePart::Trailers(trailers) => {
                for (name, _) in trailers.iter() {
                    if !self.declared_trailers.iter().any(|declared| declared == name) {
                        warn!(trailer = name, "trailer field was not announced in the Trailer header");
                    }
                }
                encode_headers(trailers, dst);
            }
        }

        if self.state != next_state {
            trace!(from = ?self.state, to = ?next_state, "response writer transition");
        }
        self.state = next_state;
        self.body_mode = next_mode;
        Ok(())
    }
}
