/// Errors that can occur while decoding or encoding SMC values.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A hex string had an odd number of characters.
    #[error("hex string has odd length ({len})")]
    OddHexLength { len: usize },

    /// A hex string contained a non-hex character.
    #[error("invalid hex digit at position {position}")]
    InvalidHex { position: usize },

    /// The value does not fit in the 32-byte payload.
    #[error("value too long ({len} bytes, max {max})")]
    TooLong { len: usize, max: usize },

    /// A number does not fit in the key's data size.
    #[error("value {value} does not fit in {len} byte(s)")]
    ValueOutOfRange { value: String, len: usize },

    /// Text could not be parsed as a number.
    #[error("invalid number: {0:?}")]
    InvalidNumber(String),

    /// The data size is not decodable with the requested format.
    #[error("cannot decode {len}-byte value as {format}")]
    UnsupportedSize { len: usize, format: &'static str },
}

pub type Result<T> = std::result::Result<T, CodecError>;
