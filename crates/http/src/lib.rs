//! A minimal HTTP/1.1 protocol engine over raw byte streams
//!
//! This crate parses one request per connection from any `AsyncRead` and writes
//! one response to any `AsyncWrite`, without depending on a general purpose HTTP
//! stack. The parsing core is sans-IO: it works on byte slices and can be fed
//! arbitrarily fragmented input.
//!
//! # Features
//!
//! - Incremental request parsing with an explicit state machine
//! - Case-insensitive header storage with multi-value coalescing
//! - `Content-Length` delimited request bodies
//! - Ordered response writing with out-of-order detection
//! - Chunked response bodies with trailers
//!
//! # Example
//!
//! ```no_run
//! use futures::future::BoxFuture;
//! use std::sync::Arc;
//! use tokio::io::AsyncWrite;
//! use tokio::net::TcpListener;
//! use tokio::net::tcp::OwnedWriteHalf;
//! use tracing::{error, info, warn, Level};
//! use tracing_subscriber::FmtSubscriber;
//! use raw_http::connection::{HttpConnection, ResponseWriter};
//! use raw_http::handler::make_handler;
//! use raw_http::protocol::{HandlerError, Request, StatusCode, default_headers};
//!
//! #[tokio::main]
//! async fn main() {
//!     let subscriber = FmtSubscriber::builder()
//!         .with_max_level(Level::INFO)
//!         .finish();
//!     tracing::subscriber::set_global_default(subscriber)
//!         .expect("setting default subscriber failed");
//!
//!     info!(port = 42069, "start listening");
//!     let tcp_listener = match TcpListener::bind("127.0.0.1:42069").await {
//!         Ok(tcp_listener) => tcp_listener,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     let handler = Arc::new(make_handler(hello_world::<OwnedWriteHalf>));
//!
//!     loop {
//!         let (tcp_stream, _remote_addr) = match tcp_listener.accept().await {
//!             Ok(stream_and_addr) => stream_and_addr,
//!             Err(e) => {
//!                 warn!(cause = %e, "failed to accept");
//!                 continue;
//!             }
//!         };
//!
//!         let handler = handler.clone();
//!
//!         tokio::spawn(async move {
//!             let (reader, writer) = tcp_stream.into_split();
//!             let connection = HttpConnection::new(reader, writer);
//!             match connection.process(handler).await {
//!                 Ok(_) => info!("finished process, connection shutdown"),
//!                 Err(e) => error!("service has error, cause {}, connection shutdown", e),
//!             }
//!         });
//!     }
//! }
//!
//! fn hello_world<'a, W>(writer: &'a mut ResponseWriter<W>, request: &'a Request) -> BoxFuture<'a, Result<(), HandlerError>>
//! where
//!     W: AsyncWrite + Unpin + Send,
//! {
//!     Box::pin(async move {
//!         info!(target = request.request_target(), "request path");
//!
//!         let body = b"Hello World!\r\n";
//!         writer.write_status_line(StatusCode::OK).await?;
//!         writer.write_headers(&default_headers(body.len())).await?;
//!         writer.write_body(body).await?;
//!         Ok(())
//!     })
//! }
//! ```
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - [`protocol`]: request, header, status and error types
//! - [`codec`]: sans-IO request decoding and response encoding
//! - [`connection`]: driving the codecs over async transports
//! - [`handler`]: request handler trait and utilities
//!
//! ## Request Parsing
//!
//! [`codec::RequestDecoder`] moves through
//! [`ParserState`](protocol::ParserState)s as input arrives. Each call reports
//! how many bytes it consumed; unconsumed bytes must be offered again together
//! with more data. [`connection::RequestReader`] does exactly that over a
//! doubling read buffer.
//!
//! ## Response Writing
//!
//! [`connection::ResponseWriter`] accepts the status line, headers, body (plain
//! or chunked) and trailers strictly in that order. Any call in the wrong
//! [`WriterState`](protocol::WriterState) fails without writing a byte.
//!
//! ## Error Handling
//!
//! - [`protocol::HttpError`]: Top-level error type
//! - [`protocol::ParseError`]: Request parsing errors
//! - [`protocol::SendError`]: Response sending errors
//! - [`protocol::HandlerError`]: Errors a handler turns into a response
//!
//! # Limitations
//!
//! - One request per connection, no keep-alive and no pipelining
//! - Chunked request bodies are not decoded
//! - Maximum size of the request line plus headers: 8KB
//! - No TLS support (use a reverse proxy for HTTPS)

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
