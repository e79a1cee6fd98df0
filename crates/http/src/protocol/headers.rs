//! Case-insensitive header storage.
//!
//! Names are validated against the RFC 9110 token charset and lowercased on
//! every insert and lookup, so callers never need to agree on a spelling.
//! Entries keep their insertion order, which makes serialization stable.

use crate::ensure;
use crate::protocol::ParseError;

/// Separator used when a repeated field is folded into a single value.
const VALUE_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value stored under `name`, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|index| self.entries[index].1.as_str())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Stores `value` under `name`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidHeaderToken`] if `name` is not a valid token
    /// and [`ParseError::MalformedHeaderLine`] if `value` contains CR or LF.
    pub fn set<V: Into<String>>(&mut self, name: &str, value: V) -> Result<(), ParseError> {
        let name = normalize(name)?;
        let value = value.into();
        check_value(&name, &value)?;
        match self.position(&name) {
            Some(index) => self.entries[index].1 = value,
            None => self.entries.push((name, value)),
        }
        Ok(())
    }

    /// Stores `value` under `name`, joining it to an existing value with `", "`.
    ///
    /// This is how repeated header fields are combined into one list value.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidHeaderToken`] if `name` is not a valid token
    /// and [`ParseError::MalformedHeaderLine`] if `value` contains CR or LF.
    pub fn append(&mut self, name: &str, value: &str) -> Result<(), ParseError> {
        let name = normalize(name)?;
        check_value(&name, value)?;
        match self.position(&name) {
            Some(index) => {
                let existing = &mut self.entries[index].1;
                existing.reserve(VALUE_SEPARATOR.len() + value.len());
                existing.push_str(VALUE_SEPARATOR);
                existing.push_str(value);
            }
            None => self.entries.push((name, value.to_owned())),
        }
        Ok(())
    }

    /// Removes `name` and returns its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|index| self.entries.remove(index).1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, value)` pairs in insertion order. Names are lowercase.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Parses the `Content-Length` header.
    ///
    /// Returns `None` when the header is absent. Only plain decimal digits are accepted.
    pub fn content_length(&self) -> Option<Result<usize, ParseError>> {
        self.get("content-length").map(|value| {
            let digits = value.trim();
            ensure!(!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()), ParseError::invalid_content_length(value));
            digits.parse::<usize>().map_err(|_e| ParseError::invalid_content_length(value))
        })
    }

    /// Appends an entry without validation, for names known to be valid tokens.
    pub(crate) fn push_static(&mut self, name: &'static str, value: String) {
        debug_assert!(normalize(name).is_ok() && check_value(name, &value).is_ok());
        self.entries.push((name.to_ascii_lowercase(), value));
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key.eq_ignore_ascii_case(name))
    }
}

/// Checks the token charset and lowercases the name.
fn normalize(name: &str) -> Result<String, ParseError> {
    ensure!(!name.is_empty() && name.bytes().all(is_token_byte), ParseError::invalid_header_token(name));
    Ok(name.to_ascii_lowercase())
}

/// Rejects values that would break out of their field line on the wire.
fn check_value(name: &str, value: &str) -> Result<(), ParseError> {
    ensure!(!value.bytes().any(|b| b == b'\r' || b == b'\n'), ParseError::malformed_header_line(format!("{name}: {value}")));
    Ok(())
}

/// `tchar` from RFC 9110 section 5.6.2.
#[inline]
fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(b, b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~')
}
