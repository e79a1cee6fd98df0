//! HTTP body handling.
//!
//! - [`LengthDecoder`]: collects a fixed-length request body (Content-Length)
//! - [`ChunkedEncoder`]: frames response payloads with chunked transfer encoding
//!   ([RFC 9112 Section 7.1](https://www.rfc-editor.org/rfc/rfc9112#section-7.1))

mod chunked_encoder;
mod length_decoder;

pub use chunked_encoder::ChunkedEncoder;
pub use length_decoder::LengthDecoder;
