//! Transport-driven request reading and response writing.
//!
//! # Components
//!
//! - [`RequestReader`]: reads one request from an `AsyncRead`, growing its
//!   buffer by doubling
//! - [`ResponseWriter`]: ordered status-line, headers, body and trailer writes
//!   to an `AsyncWrite`
//! - [`HttpConnection`]: the per-connection worker tying both to a
//!   [`Handler`](crate::handler::Handler)
//!
//! A connection carries exactly one request and one response; there is no
//! keep-alive and no pipelining.

mod http_connection;
mod read_buffer;
mod request_reader;
mod response_writer;

#[cfg(test)]
pub(crate) mod mock;

pub use http_connection::HttpConnection;
pub use read_buffer::ReadBuffer;
pub use request_reader::{DEFAULT_READ_BUFFER_SIZE, RequestReader, request_from_reader};
pub use response_writer::ResponseWriter;
