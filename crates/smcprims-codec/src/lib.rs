//! Scalar codecs for SMC key values.
//!
//! A key's payload is a [`ValueBuffer`] (32-byte capacity plus significant
//! length). Its interpretation comes from a [`DataType`] resolved once from
//! the device's type tag and data size:
//! - unsigned integers of 1, 2 or 4 bytes (big-endian)
//! - unsigned fixed point (`fpXY`, `Y` fractional bits)
//! - anything else, decoded with the approximate temperature rule
//!
//! Fixed-point decoding defaults to the legacy rule, which drops the low
//! fractional bits of the last byte. [`FixedPointMode::Exact`] keeps them.

pub mod buffer;
pub mod datatype;
pub mod error;
pub mod hex;
pub mod scalar;

pub use buffer::ValueBuffer;
pub use datatype::DataType;
pub use error::{CodecError, Result};
pub use hex::parse_hex;
pub use scalar::{
    decode, decode_fallback, decode_fixed_point, decode_unsigned, encode_fixed_point, encode_str,
    encode_unsigned, DecodeOptions, FixedPointMode, Value,
};
