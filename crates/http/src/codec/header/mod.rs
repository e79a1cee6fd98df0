//! HTTP header processing for requests and responses.
//!
//! - [`parse_header_line`]: parses one request header line into [`Headers`](crate::protocol::Headers)
//! - [`encode_headers`]: writes a header block, also used for trailers

mod header_decoder;
mod header_encoder;

pub use header_decoder::HeaderStatus;
pub use header_decoder::parse_header_line;
pub use header_encoder::encode_headers;
