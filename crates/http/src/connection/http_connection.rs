use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{error, info, warn};

use crate::connection::request_reader::DEFAULT_READ_BUFFER_SIZE;
use crate::connection::{RequestReader, ResponseWriter};
use crate::handler::Handler;
use crate::protocol::{HttpError, SendError, StatusCode, default_headers};

/// Serves exactly one request/response exchange over a transport.
///
/// `HttpConnection` handles:
/// - Assembling the request from the reader
/// - Answering `400 Bad Request` when the request cannot be assembled
/// - Running the handler against the [`ResponseWriter`]
/// - Answering with the handler's error status if it failed before writing
/// - Shutting the writer down afterwards
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    reader: RequestReader<R>,
    writer: ResponseWriter<W>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_capacity(reader, writer, DEFAULT_READ_BUFFER_SIZE)
    }

    /// Creates a connection whose read buffer starts at `capacity` bytes.
    pub fn with_capacity(reader: R, writer: W, capacity: usize) -> Self {
        Self { reader: RequestReader::with_capacity(reader, capacity), writer: ResponseWriter::new(writer) }
    }

    /// Processes the single request of this connection with `handler`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::RequestError`] when the request could not be
    /// assembled, after a best-effort `400` response has been attempted, and
    /// [`HttpError::ResponseError`] when writing a handler's error response fails.
    /// The writer is shut down in every case.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler<W>,
    {
        let request = match self.reader.read_request().await {
            Ok(request) => request,
            Err(e) => {
                warn!(cause = %e, "can't assemble request");
                if let Err(send_error) = self.send_error(StatusCode::BAD_REQUEST, &e.to_string()).await {
                    warn!(cause = %send_error, "failed to send bad request response");
                }
                self.shutdown().await;
                return Err(e.into());
            }
        };

        info!(method = request.method(), target = request.request_target(), "received request");

        let mut outcome = Ok(());
        if let Err(e) = handler.call(&mut self.writer, &request).await {
            if self.writer.is_untouched() {
                info!(status = %e.status, "handler returned an error response");
                if let Err(send_error) = self.send_error(e.status, &e.message).await {
                    warn!(cause = %send_error, "failed to send handler error response");
                    outcome = Err(send_error.into());
                }
            } else {
                error!(cause = %e, state = ?self.writer.state(), "handler failed after the response was started");
            }
        }

        self.shutdown().await;
        outcome
    }

    async fn send_error(&mut self, status: StatusCode, message: &str) -> Result<(), SendError> {
        self.writer.write_status_line(status).await?;
        self.writer.write_headers(&default_headers(message.len())).await?;
        self.writer.write_body(message.as_bytes()).await
    }

    async fn shutdown(&mut self) {
        if let Err(e) = self.writer.get_mut().shutdown().await {
            warn!(cause = %e, "failed to shutdown connection");
        }
    }
}
