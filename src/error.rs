/// Errors that can occur while operating the terminal core.
///
/// `MalformedEscape` is used internally for diagnostics and tests; the
/// decoder never surfaces it from [`crate::terminal::Terminal::feed`] since
/// malformed input is recovered from rather than propagated.
#[derive(Debug, thiserror::Error)]
pub enum VtError {
    /// A grid or buffer allocation could not be satisfied.
    #[error("out of memory allocating cells")]
    OutOfMemory,

    /// Writing encoded key bytes to the output sink failed.
    #[error("write failure: {0}")]
    WriteFailure(String),

    /// The input byte stream ended unexpectedly.
    #[error("unexpected end of input")]
    Eof,

    /// An escape or control sequence could not be parsed.
    #[error("malformed escape sequence: {0}")]
    MalformedEscape(String),
}

/// Result type alias used throughout the core.
pub type VtResult<T> = Result<T, VtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_out_of_memory() {
        let err = VtError::OutOfMemory;
        assert_eq!(err.to_string(), "out of memory allocating cells");
    }

    #[test]
    fn error_display_write_failure() {
        let err = VtError::WriteFailure("broken pipe".to_string());
        assert_eq!(err.to_string(), "write failure: broken pipe");
    }

    #[test]
    fn error_display_eof() {
        let err = VtError::Eof;
        assert_eq!(err.to_string(), "unexpected end of input");
    }

    #[test]
    fn error_display_malformed_escape() {
        let err = VtError::MalformedEscape("unterminated CSI".to_string());
        assert_eq!(err.to_string(), "malformed escape sequence: unterminated CSI");
    }

    #[test]
    fn error_is_debug() {
        let err = VtError::OutOfMemory;
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("OutOfMemory"));
    }
}
