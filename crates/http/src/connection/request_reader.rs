use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, trace};

use crate::codec::RequestDecoder;
use crate::connection::read_buffer::ReadBuffer;
use crate::protocol::{ParseError, Request};

/// Initial read buffer size, the buffer doubles whenever a read would not fit
pub const DEFAULT_READ_BUFFER_SIZE: usize = 1024;

/// Reads exactly one [`Request`] from a transport.
///
/// Each read is appended to the buffer, the [`RequestDecoder`] runs over the
/// unconsumed bytes, and the consumed prefix is discarded. Reading stops as
/// soon as the request is complete; anything the peer sent after it is left
/// unread in the buffer.
#[derive(Debug)]
pub struct RequestReader<R> {
    reader: R,
    buffer: ReadBuffer,
}

impl<R> RequestReader<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_READ_BUFFER_SIZE)
    }

    /// Creates a reader whose buffer starts at `capacity` bytes.
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self { reader, buffer: ReadBuffer::with_capacity(capacity) }
    }

    /// Reads until one request is fully assembled.
    ///
    /// # Errors
    ///
    /// - any [`ParseError`] raised by the decoder
    /// - [`ParseError::IncompleteRequest`] if the stream ends before the request is done
    /// - [`ParseError::Io`] if the transport fails
    pub async fn read_request(&mut self) -> Result<Request, ParseError> {
        let mut decoder = RequestDecoder::new();

        loop {
            let n = self.reader.read(self.buffer.unfilled_mut()).await?;
            if n == 0 {
                debug!(state = ?decoder.state(), unparsed = self.buffer.filled().len(), "stream ended before request was complete");
                return Err(ParseError::incomplete(decoder.state()));
            }
            self.buffer.commit(n);
            trace!(read = n, buffered = self.buffer.filled().len(), capacity = self.buffer.capacity(), "read request bytes");

            let consumed = decoder.feed(self.buffer.filled())?;
            self.buffer.consume(consumed);

            if decoder.is_done() {
                return decoder.finish();
            }
        }
    }

    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Reads a single request from `reader` with the default buffer size.
pub async fn request_from_reader<R>(reader: R) -> Result<Request, ParseError>
where
    R: AsyncRead + Unpin,
{
    RequestReader::new(reader).read_request().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::MAX_HEADER_BYTES;
    use crate::connection::mock::ChunkReader;
    use crate::protocol::ParserState;
    use indoc::indoc;

    fn crlf(str: &str) -> Vec<u8> {
        str.replace('\n', "\r\n").into_bytes()
    }

    #[tokio::test]
    async fn good_get_request_line() {
        let data = crlf(indoc! {"
            GET / HTTP/1.1
            Host: localhost:42069
            User-Agent: curl/7.81.0
            Accept: */*

        "});

        let request = request_from_reader(ChunkReader::new(data, 3)).await.unwrap();

        assert_eq!(request.method(), "GET");
        assert_eq!(request.request_target(), "/");
        assert_eq!(request.request_line().http_version(), "1.1");
        assert_eq!(request.headers().get("host"), Some("localhost:42069"));
        assert_eq!(request.headers().get("user-agent"), Some("curl/7.81.0"));
        assert_eq!(request.headers().get("accept"), Some("*/*"));
    }

    #[tokio::test]
    async fn one_byte_at_a_time_matches_all_at_once() {
        let data = crlf(indoc! {"
            POST /submit HTTP/1.1
            Host: localhost:42069
            Content-Length: 14

            hello world!
        "});

        let whole = request_from_reader(ChunkReader::new(data.clone(), data.len())).await.unwrap();
        let mut reader = RequestReader::with_capacity(ChunkReader::new(data, 1), 1);
        let bytewise = reader.read_request().await.unwrap();

        assert_eq!(whole, bytewise);
        assert_eq!(whole.body(), b"hello world!\r\n");
    }

    #[tokio::test]
    async fn small_buffer_grows() {
        let data = b"GET /a/rather/long/request/target HTTP/1.1\r\nHost: localhost:42069\r\n\r\n".to_vec();
        let mut reader = RequestReader::with_capacity(ChunkReader::new(data, 8), 8);

        let request = reader.read_request().await.unwrap();

        assert_eq!(request.request_target(), "/a/rather/long/request/target");
        assert!(reader.buffer.capacity() >= 64);
    }

    #[tokio::test]
    async fn body_split_over_reads() {
        let data = b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nabcde".to_vec();
        let request = request_from_reader(ChunkReader::new(data, 2)).await.unwrap();

        assert_eq!(request.body(), b"abcde");
    }

    #[tokio::test]
    async fn body_too_long() {
        let data = b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nabcdef".to_vec();
        let result = request_from_reader(ChunkReader::new(data, 64)).await;

        assert!(matches!(result, Err(ParseError::BodyLengthMismatch { .. })));
    }

    #[tokio::test]
    async fn stream_ends_in_body() {
        let data = b"POST / HTTP/1.1\r\nContent-Length: 20\r\n\r\npartial content".to_vec();
        let result = request_from_reader(ChunkReader::new(data, 4)).await;

        assert!(matches!(result, Err(ParseError::IncompleteRequest { state: ParserState::ParsingBody })));
    }

    #[tokio::test]
    async fn empty_stream() {
        let result = request_from_reader(ChunkReader::new(Vec::new(), 4)).await;

        assert!(matches!(result, Err(ParseError::IncompleteRequest { state: ParserState::AwaitingRequestLine })));
    }

    #[tokio::test]
    async fn invalid_method() {
        let data = b"get / HTTP/1.1\r\n\r\n".to_vec();
        let result = request_from_reader(ChunkReader::new(data, 5)).await;

        assert!(matches!(result, Err(ParseError::InvalidMethod { .. })));
    }

    #[tokio::test]
    async fn oversized_header_stops_reading() {
        let mut data = b"GET / HTTP/1.1\r\nX-Big: ".to_vec();
        data.extend(std::iter::repeat_n(b'a', 4 * 1024 * 1024));
        let mut reader = RequestReader::with_capacity(ChunkReader::new(data, 64 * 1024), 1024);

        let result = reader.read_request().await;

        assert!(matches!(result, Err(ParseError::HeaderTooLarge { .. })));
        assert!(reader.buffer.capacity() <= 2 * MAX_HEADER_BYTES);
    }

    #[tokio::test]
    async fn transport_error() {
        let result = request_from_reader(ChunkReader::failing(b"GET / HT".to_vec(), 4)).await;

        assert!(matches!(result, Err(ParseError::Io { .. })));
    }
}
