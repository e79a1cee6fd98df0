use bytes::BytesMut;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::codec::Encoder;

use crate::codec::{ResponseEncoder, ResponsePart};
use crate::protocol::{Headers, SendError, StatusCode, WriterState};

/// Initial size of the buffer a response part is encoded into before it is written
const INIT_WRITE_BUFFER_SIZE: usize = 4 * 1024;

/// Writes one response to a sink, enforcing the order of its sections.
///
/// Every method checks the current [`WriterState`] first; a call in the wrong
/// stage fails with [`SendError::OutOfOrderWrite`] without writing anything.
/// Each successful call writes its bytes and flushes the sink before returning.
///
/// # Example
///
/// ```no_run
/// # async fn example(stream: tokio::net::TcpStream) -> Result<(), raw_http::protocol::SendError> {
/// use raw_http::connection::ResponseWriter;
/// use raw_http::protocol::{Headers, StatusCode};
///
/// let mut headers = Headers::new();
/// headers.set("Transfer-Encoding", "chunked").unwrap();
/// headers.set("Trailer", "X-Content-Length").unwrap();
///
/// let mut writer = ResponseWriter::new(stream);
/// writer.write_status_line(StatusCode::OK).await?;
/// writer.write_headers(&headers).await?;
/// writer.write_chunked_body(b"hello ").await?;
/// writer.write_chunked_body(b"world").await?;
/// writer.finish_chunked_body().await?;
///
/// let mut trailers = Headers::new();
/// trailers.set("X-Content-Length", "11").unwrap();
/// writer.write_trailers(&trailers).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ResponseWriter<W> {
    writer: W,
    buffer: BytesMut,
    encoder: ResponseEncoder,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self { writer, buffer: BytesMut::with_capacity(INIT_WRITE_BUFFER_SIZE), encoder: ResponseEncoder::new() }
    }

    #[inline]
    pub fn state(&self) -> WriterState {
        self.encoder.state()
    }

    /// Returns true if no part of the response has been written yet.
    #[inline]
    pub fn is_untouched(&self) -> bool {
        self.encoder.is_untouched()
    }

    /// Writes `HTTP/1.1 <code> <reason>\r\n`. Valid only in [`WriterState::AwaitingStatusLine`].
    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), SendError> {
        self.write(ResponsePart::StatusLine(status)).await
    }

    /// Writes the header section. Valid only in [`WriterState::AwaitingHeaders`].
    ///
    /// An empty set writes [`default_headers`](crate::protocol::default_headers) with a zero length.
    pub async fn write_headers(&mut self, headers: &Headers) -> Result<(), SendError> {
        self.write(ResponsePart::Headers(headers)).await
    }

    /// Writes `data` verbatim. Valid in [`WriterState::AwaitingBody`] unless a
    /// chunked body was started.
    pub async fn write_body(&mut self, data: &[u8]) -> Result<(), SendError> {
        self.write(ResponsePart::Body(data)).await
    }

    /// Writes `data` as one chunk. Valid in [`WriterState::AwaitingBody`]
    /// unless a plain body was started. An empty `data` writes nothing.
    pub async fn write_chunked_body(&mut self, data: &[u8]) -> Result<(), SendError> {
        self.write(ResponsePart::Chunk(data)).await
    }

    /// Writes the terminal `0\r\n` chunk and moves to [`WriterState::AwaitingTrailers`].
    pub async fn finish_chunked_body(&mut self) -> Result<(), SendError> {
        self.write(ResponsePart::LastChunk).await
    }

    /// Writes the trailer fields and the final blank line, completing the response.
    ///
    /// Valid only in [`WriterState::AwaitingTrailers`]. Pass an empty set to end
    /// a chunked body without trailers.
    pub async fn write_trailers(&mut self, trailers: &Headers) -> Result<(), SendError> {
        self.write(ResponsePart::Trailers(trailers)).await
    }

    async fn write(&mut self, part: ResponsePart<'_>) -> Result<(), SendError> {
        self.buffer.clear();
        self.encoder.encode(part, &mut self.buffer)?;
        if self.buffer.is_empty() {
            return Ok(());
        }

        self.writer.write_all(&self.buffer).await?;
        Ok(self.writer.flush().await?)
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
