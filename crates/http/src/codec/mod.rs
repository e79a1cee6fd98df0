//! Sans-IO encoding and decoding of HTTP/1.1 messages.
//!
//! Nothing in this module touches a transport. Decoders are handed the
//! unconsumed input and report how much of it they used; encoders append to a
//! `BytesMut`. The [`connection`](crate::connection) module drives both over
//! real streams.
//!
//! - Request handling:
//!   - [`RequestDecoder`]: assembles a request from fragmented input
//!   - [`parse_request_line`]: parses the first line of a request
//!   - [`parse_header_line`]: parses one header line
//!   - [`LengthDecoder`]: collects a Content-Length body
//!
//! - Response handling:
//!   - [`ResponseEncoder`]: ordered state machine over [`ResponsePart`]s
//!   - [`ChunkedEncoder`]: frames one payload as one chunk
//!   - [`encode_headers`]: writes a header or trailer block
//!
//! Both [`RequestDecoder`] and the encoders implement the `tokio_util` codec
//! traits, so they also work with `FramedRead` and `FramedWrite`.

mod body;
mod header;
mod request_decoder;
mod request_line_decoder;
mod response_encoder;

pub use body::{ChunkedEncoder, LengthDecoder};
pub use header::{HeaderStatus, encode_headers, parse_header_line};
pub use request_decoder::{MAX_HEADER_BYTES, RequestDecoder};
pub use request_line_decoder::parse_request_line;
pub use response_encoder::{ResponseEncoder, ResponsePart};
