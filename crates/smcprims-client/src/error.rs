use smcprims_wire::Key;

/// Errors that can occur in SMC key operations.
#[derive(Debug, thiserror::Error)]
pub enum SmcError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] smcprims_transport::TransportError),

    /// A write's data size differs from the size the device reports.
    #[error("size mismatch for key {key}: device expects {expected} byte(s), got {actual}")]
    SizeMismatch {
        key: Key,
        expected: usize,
        actual: usize,
    },

    /// Value decode/encode error.
    #[error("codec error: {0}")]
    Codec(#[from] smcprims_codec::CodecError),

    /// Invalid key or malformed record.
    #[error("wire error: {0}")]
    Wire(#[from] smcprims_wire::WireError),
}

pub type Result<T> = std::result::Result<T, SmcError>;
