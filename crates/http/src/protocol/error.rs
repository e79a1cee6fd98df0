use std::io;
use thiserror::Error;

use crate::protocol::{ParserState, StatusCode, WriterState};

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed request-line: {line:?}")]
    MalformedRequestLine { line: String },

    #[error("invalid http method: {method:?}")]
    InvalidMethod { method: String },

    #[error("unsupported http version: {version:?}")]
    UnsupportedVersion { version: String },

    #[error("invalid header name: {name:?}")]
    InvalidHeaderToken { name: String },

    #[error("malformed header line: {line:?}")]
    MalformedHeaderLine { line: String },

    #[error("invalid content-length header: {value:?}")]
    InvalidContentLength { value: String },

    #[error("body length mismatch, content-length is {declared} but received {received} bytes")]
    BodyLengthMismatch { declared: usize, received: usize },

    #[error("request header section too large, {size} bytes exceeds the limit of {max}")]
    HeaderTooLarge { size: usize, max: usize },

    #[error("incomplete request, stream ended in state {state:?}")]
    IncompleteRequest { state: ParserState },

    #[error("request is already done, no more data can be parsed")]
    AlreadyDone,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn malformed_request_line<S: ToString>(line: S) -> Self {
        Self::MalformedRequestLine { line: line.to_string() }
    }

    pub fn invalid_method<S: ToString>(method: S) -> Self {
        Self::InvalidMethod { method: method.to_string() }
    }

    pub fn unsupported_version<S: ToString>(version: S) -> Self {
        Self::UnsupportedVersion { version: version.to_string() }
    }

    pub fn invalid_header_token<S: ToString>(name: S) -> Self {
        Self::InvalidHeaderToken { name: name.to_string() }
    }

    pub fn malformed_header_line<S: ToString>(line: S) -> Self {
        Self::MalformedHeaderLine { line: line.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(value: S) -> Self {
        Self::InvalidContentLength { value: value.to_string() }
    }

    pub fn body_length_mismatch(declared: usize, received: usize) -> Self {
        Self::BodyLengthMismatch { declared, received }
    }

    pub fn too_large_header(size: usize, max: usize) -> Self {
        Self::HeaderTooLarge { size, max }
    }

    pub fn incomplete(state: ParserState) -> Self {
        Self::IncompleteRequest { state }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("out of order write: {operation} is not allowed in state {state:?}")]
    OutOfOrderWrite { operation: &'static str, state: WriterState },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn out_of_order(operation: &'static str, state: WriterState) -> Self {
        Self::OutOfOrderWrite { operation, state }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

/// Error returned by an application handler.
///
/// The connection turns it into a response with `status` and `message` as the
/// body, as long as the handler has not written anything yet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("handler failed with {status}: {message}")]
pub struct HandlerError {
    pub status: StatusCode,
    pub message: String,
}

impl HandlerError {
    pub fn new<S: Into<String>>(status: StatusCode, message: S) -> Self {
        Self { status, message: message.into() }
    }
}

/// A failed write inside a handler is reported as an internal server error.
impl From<SendError> for HandlerError {
    fn from(e: SendError) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    }
}

/// An invalid header built by a handler is reported as an internal server error.
impl From<ParseError> for HandlerError {
    fn from(e: ParseError) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    }
}
