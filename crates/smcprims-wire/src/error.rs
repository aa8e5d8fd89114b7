/// Errors that can occur while building or parsing wire values.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// A four-character code was not exactly four bytes.
    #[error("invalid four-character code ({len} bytes, expected 4)")]
    InvalidKey { len: usize },

    /// A record buffer was shorter than the fixed record size.
    #[error("record too short ({len} bytes, expected {expected})")]
    RecordTooShort { len: usize, expected: usize },
}

pub type Result<T> = std::result::Result<T, WireError>;
