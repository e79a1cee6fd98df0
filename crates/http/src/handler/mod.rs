//! Application request handlers.
//!
//! A handler receives the assembled [`Request`] together with the connection's
//! [`ResponseWriter`] and produces the response through the writer's ordered
//! API. Returning a [`HandlerError`] before writing anything lets the
//! connection answer with that status instead.
//!
//! # Example
//!
//! ```
//! use futures::future::BoxFuture;
//! use raw_http::connection::ResponseWriter;
//! use raw_http::handler::make_handler;
//! use raw_http::protocol::{HandlerError, Request, StatusCode, default_headers};
//! use tokio::io::AsyncWrite;
//!
//! fn hello<'a, W>(writer: &'a mut ResponseWriter<W>, _request: &'a Request) -> BoxFuture<'a, Result<(), HandlerError>>
//! where
//!     W: AsyncWrite + Unpin + Send,
//! {
//!     Box::pin(async move {
//!         let body = b"hello world";
//!         writer.write_status_line(StatusCode::OK).await?;
//!         writer.write_headers(&default_headers(body.len())).await?;
//!         writer.write_body(body).await?;
//!         Ok(())
//!     })
//! }
//!
//! let handler = make_handler(hello::<Vec<u8>>);
//! # let _ = handler;
//! ```

use futures::future::BoxFuture;

use crate::connection::ResponseWriter;
use crate::protocol::{HandlerError, Request};

pub trait Handler<W>: Send + Sync {
    fn call<'a>(&'a self, writer: &'a mut ResponseWriter<W>, request: &'a Request) -> BoxFuture<'a, Result<(), HandlerError>>;
}

#[derive(Debug)]
pub struct HandlerFn<F> {
    f: F,
}

impl<W, F> Handler<W> for HandlerFn<F>
where
    F: for<'a> Fn(&'a mut ResponseWriter<W>, &'a Request) -> BoxFuture<'a, Result<(), HandlerError>> + Send + Sync,
{
    fn call<'a>(&'a self, writer: &'a mut ResponseWriter<W>, request: &'a Request) -> BoxFuture<'a, Result<(), HandlerError>> {
        (self.f)(writer, request)
    }
}

pub fn make_handler<W, F>(f: F) -> HandlerFn<F>
where
    F: for<'a> Fn(&'a mut ResponseWriter<W>, &'a Request) -> BoxFuture<'a, Result<(), HandlerError>>,
{
    HandlerFn { f }
}
