//! Serializes a header block: one `name: value\r\n` line per entry followed by
//! the blank line. Used for both the header section and chunked trailers.

use bytes::{BufMut, BytesMut};

use crate::protocol::Headers;

/// Rough per-line overhead (`": "` plus CRLF) used to size the reservation.
const LINE_OVERHEAD: usize = 4;

pub fn encode_headers(headers: &Headers, dst: &mut BytesMut) {
    let size: usize = headers.iter().map(|(name, value)| name.len() + value.len() + LINE_OVERHEAD).sum();
    dst.reserve(size + 2);

    for (name, value) in headers.iter() {
        dst.put_slice(name.as_bytes());
        dst.put_slice(b": ");
        dst.put_slice(value.as_bytes());
        dst.put_slice(b"\r\n");
    }
    dst.put_slice(b"\r\n");
}
