use std::fmt::Write;
use std::io;

use bytes::{BufMut, BytesMut};
use tokio_util::codec::Encoder;

use crate::protocol::SendError;

/// Encodes one payload as a single wire chunk.
///
/// Produces `<lowercase hex length>\r\n<payload>\r\n`. An empty payload
/// produces only `0\r\n`, which is the last-chunk marker.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ChunkedEncoder;

impl ChunkedEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Encoder<&[u8]> for ChunkedEncoder {
    type Error = SendError;

    fn encode(&mut self, payload: &[u8], dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(payload.len() + 20);
        write!(dst, "{:x}\r\n", payload.len()).map_err(|e| SendError::io(io::Error::other(e)))?;

        if !payload.is_empty() {
            dst.put_slice(payload);
            dst.put_slice(b"\r\n");
        }
        Ok(())
    }
}
