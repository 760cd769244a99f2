use std::io;

/// Errors produced while decoding wire payloads.
///
/// Encoding never fails: every fully populated message has a byte form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// The buffer is shorter than the smallest well-formed payload.
    #[error("truncated payload: need at least {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },

    /// A var-str length prefix claims more bytes than the buffer holds.
    #[error("malformed var_str: prefix declares {declared} bytes, {available} available")]
    MalformedVarLength { declared: u64, available: usize },

    /// A fixed-width field ran past the end of the input.
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(&'static str),

    /// The user agent section holds bytes past the declared payload.
    #[error("{0} unexpected trailing bytes after user_agent")]
    TrailingBytes(usize),
}

pub type Result<T> = std::result::Result<T, WireError>;

impl From<WireError> for io::Error {
    fn from(err: WireError) -> Self {
        let kind = match err {
            WireError::Truncated { .. } | WireError::UnexpectedEof(_) => {
                io::ErrorKind::UnexpectedEof
            }
            WireError::MalformedVarLength { .. } | WireError::TrailingBytes(_) => {
                io::ErrorKind::InvalidData
            }
        };
        io::Error::new(kind, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_maps_to_unexpected_eof() {
        let err: io::Error = WireError::Truncated {
            needed: 85,
            actual: 10,
        }
        .into();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert!(err.to_string().contains("85"));
    }

    #[test]
    fn malformed_var_length_maps_to_invalid_data() {
        let err: io::Error = WireError::MalformedVarLength {
            declared: 300,
            available: 2,
        }
        .into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
