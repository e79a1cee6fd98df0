//! Test transports.

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// Yields at most `chunk_size` bytes per read, then EOF or an error.
#[derive(Debug)]
pub(crate) struct ChunkReader {
    data: Vec<u8>,
    pos: usize,
    chunk_size: usize,
    fail_at_end: bool,
}

impl ChunkReader {
    pub(crate) fn new(data: Vec<u8>, chunk_size: usize) -> Self {
        Self { data, pos: 0, chunk_size: chunk_size.max(1), fail_at_end: false }
    }

    /// Like [`ChunkReader::new`] but reports a reset connection instead of EOF.
    pub(crate) fn failing(data: Vec<u8>, chunk_size: usize) -> Self {
        Self { fail_at_end: true, ..Self::new(data, chunk_size) }
    }
}

impl AsyncRead for ChunkReader {
    fn poll_read(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
        let remaining = self.data.len() - self.pos;
        if remaining == 0 && self.fail_at_end {
            return Poll::Ready(Err(io::Error::from(io::ErrorKind::ConnectionReset)));
        }

        let amt = remaining.min(self.chunk_size).min(buf.remaining());
        let start = self.pos;
        buf.put_slice(&self.data[start..start + amt]);
        self.pos += amt;
        Poll::Ready(Ok(()))
    }
}

/// Rejects every write with a broken pipe and records whether it was shut down.
#[derive(Debug, Default)]
pub(crate) struct BrokenWriter {
    shutdown: Arc<AtomicBool>,
}

impl BrokenWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }
}

impl AsyncWrite for BrokenWriter {
    fn poll_write(self: Pin<&mut Self>, _cx: &mut Context<'_>, _buf: &[u8]) -> Poll<io::Result<usize>> {
        Poll::Ready(Err(io::Error::from(io::ErrorKind::BrokenPipe)))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        self.shutdown.store(true, Ordering::SeqCst);
        Poll::Ready(Ok(()))
    }
}

/// Decodes a chunked body the way a conforming client would, for round-trip checks.
///
/// Returns the payload and the raw trailer section.
pub(crate) fn decode_chunked(mut data: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let mut payload = Vec::new();
    loop {
        let line_end = data.windows(2).position(|w| w == b"\r\n").expect("chunk size line");
        let size = usize::from_str_radix(std::str::from_utf8(&data[..line_end]).unwrap(), 16).unwrap();
        data = &data[line_end + 2..];
        if size == 0 {
            return (payload, data.to_vec());
        }
        payload.extend_from_slice(&data[..size]);
        assert_eq!(&data[size..size + 2], b"\r\n");
        data = &data[size + 2..];
    }
}
