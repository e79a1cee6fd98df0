//! Core HTTP protocol types.
//!
//! - **Requests**: [`RequestLine`], [`Request`] and the assembly
//!   progress [`ParserState`]
//! - **Headers**: the case-insensitive [`Headers`] container
//! - **Responses**: [`WriterState`] and default header helpers
//! - **Status codes**: [`StatusCode`] with its reason phrase table
//! - **Errors**: [`ParseError`], [`SendError`], [`HttpError`] and
//!   the application facing [`HandlerError`]

mod request;
pub use request::ParserState;
pub use request::Request;
pub use request::RequestLine;

mod headers;
pub use headers::Headers;

mod response;
pub use response::WriterState;
pub use response::default_headers;
pub use response::status_line;

mod status;
pub use status::StatusCode;

mod error;
pub use error::HandlerError;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
