//! Utility macros and functions for the HTTP crate.

/// Returns early with `Err($error)` when `$predicate` does not hold.
///
/// # Example
///
/// ```ignore
/// ensure!(method.bytes().all(|b| b.is_ascii_uppercase()), ParseError::invalid_method(method));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;

/// Finds the first CRLF in `data`, returning the index of the CR.
#[inline]
pub(crate) fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(2).position(|window| window == b"\r\n")
}
