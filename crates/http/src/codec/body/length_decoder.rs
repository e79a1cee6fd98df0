//! Accumulates a request body whose size is given by the Content-Length header,
//! as defined in [RFC 9112 Section 6.2](https://www.rfc-editor.org/rfc/rfc9112#section-6.2).

use crate::protocol::ParseError;

/// Collects body bytes until the declared length is reached.
///
/// Every byte fed to the decoder belongs to the body, so receiving more than
/// the declared length is an error rather than the start of another message.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LengthDecoder {
    /// The value of the Content-Length header
    declared: usize,
}

impl LengthDecoder {
    pub fn new(declared: usize) -> Self {
        Self { declared }
    }

    #[inline]
    pub fn declared(&self) -> usize {
        self.declared
    }

    /// Appends all of `data` to `body`.
    ///
    /// # Returns
    /// * `Ok((consumed, true))` when the body has reached the declared length
    /// * `Ok((consumed, false))` when more bytes are expected
    /// * `Err(ParseError::BodyLengthMismatch)` when the body grew past the declared length
    pub fn decode(&self, data: &[u8], body: &mut Vec<u8>) -> Result<(usize, bool), ParseError> {
        let received = body.len() + data.len();
        if received > self.declared {
            return Err(ParseError::body_length_mismatch(self.declared, received));
        }

        body.extend_from_slice(data);
        Ok((data.len(), body.len() == self.declared))
    }
}
