//! Error classification shared by every layer.

/// Grepable error codes and retry hints.
///
/// Every error enum in the crate implements this so logs and fallback
/// decisions can key on a stable code instead of a display string.
pub trait ErrorCode {
    /// Stable `E_*` identifier for the error variant.
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same operation later might succeed.
    fn retryable(&self) -> bool {
        false
    }
}
