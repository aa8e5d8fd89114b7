use std::fmt;

use crate::buffer::ValueBuffer;
use crate::datatype::DataType;
use crate::error::{CodecError, Result};
use crate::hex::parse_hex;

/// Which fixed-point rule to decode with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FixedPointMode {
    /// Drop the low `frac_bits` of the last byte. Always integral, biased low.
    /// Matches the output of existing SMC tooling.
    #[default]
    Legacy,
    /// Full big-endian value divided by `2^frac_bits`.
    Exact,
}

/// Decoder settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    pub fixed_point: FixedPointMode,
}

/// A decoded key value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Unsigned(u32),
    FixedPoint(f64),
    /// Approximate temperature-style decode of an unrecognized tag.
    /// Displayed rounded to the nearest integer.
    Scaled(f64),
    /// Nothing numeric applies; the raw bytes.
    Bytes(ValueBuffer),
}

impl Value {
    /// The value as a float, if numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Unsigned(v) => Some(f64::from(*v)),
            Value::FixedPoint(v) => Some(*v),
            Value::Scaled(v) => Some(v.round()),
            Value::Bytes(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unsigned(v) => write!(f, "{v}"),
            Value::FixedPoint(v) => write!(f, "{v}"),
            Value::Scaled(v) => write!(f, "{:.0}", v.round()),
            Value::Bytes(buf) => write!(f, "(bytes {})", buf.to_hex()),
        }
    }
}

/// Decode `buf` according to `data_type`.
///
/// Never fails: payloads that don't fit their type come back as
/// [`Value::Bytes`].
pub fn decode(data_type: DataType, buf: &ValueBuffer, options: DecodeOptions) -> Value {
    let decoded = match data_type {
        t if t.is_unsigned() => decode_unsigned(buf).map(Value::Unsigned).ok(),
        DataType::FixedPoint { frac_bits } => {
            decode_fixed_point(buf, frac_bits, options.fixed_point)
                .map(Value::FixedPoint)
                .ok()
        }
        _ => decode_fallback(buf).map(Value::Scaled),
    };
    decoded.unwrap_or(Value::Bytes(*buf))
}

/// Big-endian unsigned integer of 1..=4 bytes.
pub fn decode_unsigned(buf: &ValueBuffer) -> Result<u32> {
    let bytes = numeric_bytes(buf, "unsigned integer")?;
    Ok(bytes
        .iter()
        .fold(0u32, |acc, &b| (acc << 8) | u32::from(b)))
}

/// Big-endian unsigned fixed point of 1..=4 bytes with `frac_bits` fractional bits.
pub fn decode_fixed_point(buf: &ValueBuffer, frac_bits: u8, mode: FixedPointMode) -> Result<f64> {
    let bytes = numeric_bytes(buf, "fixed point")?;
    let e = i32::from(frac_bits);
    match mode {
        FixedPointMode::Legacy => {
            let (last, head) = bytes
                .split_last()
                .ok_or(CodecError::UnsupportedSize {
                    len: 0,
                    format: "fixed point",
                })?;
            let n = bytes.len() as i32;
            let head_sum: f64 = head
                .iter()
                .enumerate()
                .map(|(i, &b)| f64::from(b) * 2f64.powi(8 * (n - 1 - i as i32) - e))
                .sum();
            Ok(head_sum + f64::from(u32::from(*last) >> frac_bits))
        }
        FixedPointMode::Exact => Ok(f64::from(decode_unsigned(buf)?) / 2f64.powi(e)),
    }
}

/// Approximate decode for unrecognized tags.
///
/// The first two bytes as a big-endian signed 16-bit value, arithmetic shift
/// right by 2, divided by 64. `None` if fewer than two bytes are significant.
pub fn decode_fallback(buf: &ValueBuffer) -> Option<f64> {
    match buf.as_slice() {
        [hi, lo, ..] => Some(f64::from(i16::from_be_bytes([*hi, *lo]) >> 2) / 64.0),
        _ => None,
    }
}

/// Encode `value` as a big-endian unsigned integer of `len` bytes.
pub fn encode_unsigned(value: u64, len: usize) -> Result<ValueBuffer> {
    if !(1..=4).contains(&len) {
        return Err(CodecError::UnsupportedSize {
            len,
            format: "unsigned integer",
        });
    }
    if value >> (8 * len) != 0 {
        return Err(CodecError::ValueOutOfRange {
            value: value.to_string(),
            len,
        });
    }
    let be = value.to_be_bytes();
    ValueBuffer::from_slice(&be[be.len() - len..])
}

/// Encode `value` as unsigned fixed point with `frac_bits` fractional bits.
///
/// The value is rounded to the nearest representable step.
pub fn encode_fixed_point(value: f64, frac_bits: u8, len: usize) -> Result<ValueBuffer> {
    let raw = (value * 2f64.powi(i32::from(frac_bits))).round();
    if !raw.is_finite() || raw < 0.0 || raw >= 2f64.powi(8 * len.min(4) as i32) {
        return Err(CodecError::ValueOutOfRange {
            value: value.to_string(),
            len,
        });
    }
    encode_unsigned(raw as u64, len)
}

/// Encode text for a key of `data_type` and `len` bytes.
///
/// Numbers for integer and fixed-point types; hex pairs for everything else.
pub fn encode_str(data_type: DataType, len: usize, text: &str) -> Result<ValueBuffer> {
    let text = text.trim();
    match data_type {
        t if t.is_unsigned() => {
            let value: u64 = text
                .parse()
                .map_err(|_| CodecError::InvalidNumber(text.to_string()))?;
            encode_unsigned(value, len)
        }
        DataType::FixedPoint { frac_bits } => {
            let value: f64 = text
                .parse()
                .map_err(|_| CodecError::InvalidNumber(text.to_string()))?;
            encode_fixed_point(value, frac_bits, len)
        }
        _ => parse_hex(text),
    }
}

fn numeric_bytes<'a>(buf: &'a ValueBuffer, format: &'static str) -> Result<&'a [u8]> {
    let bytes = buf.as_slice();
    if !(1..=4).contains(&bytes.len()) {
        return Err(CodecError::UnsupportedSize {
            len: bytes.len(),
            format,
        });
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn buf(bytes: &[u8]) -> ValueBuffer {
        ValueBuffer::from_slice(bytes).unwrap()
    }

    #[test]
    fn single_byte_unsigned_is_identity() {
        for v in 0..=255u8 {
            assert_eq!(decode_unsigned(&buf(&[v])).unwrap(), u32::from(v));
        }
    }

    #[test]
    fn unsigned_is_big_endian() {
        assert_eq!(decode_unsigned(&buf(&[0x01, 0x02])).unwrap(), 0x0102);
        assert_eq!(
            decode_unsigned(&buf(&[0xde, 0xad, 0xbe, 0xef])).unwrap(),
            0xdead_beef
        );
    }

    proptest! {
        #[test]
        fn unsigned_encode_inverts_decode(bytes in prop::collection::vec(any::<u8>(), 1..=4)) {
            let original = buf(&bytes);
            let value = decode_unsigned(&original).unwrap();
            let encoded = encode_unsigned(u64::from(value), bytes.len()).unwrap();
            prop_assert_eq!(encoded, original);
        }

        #[test]
        fn zero_padded_unsigned_decodes_low_byte(n in 1usize..=4, v in any::<u8>()) {
            let mut bytes = vec![0u8; n];
            bytes[n - 1] = v;
            prop_assert_eq!(decode_unsigned(&buf(&bytes)).unwrap(), u32::from(v));
        }

        #[test]
        fn exact_fixed_point_encode_inverts_decode(
            bytes in prop::collection::vec(any::<u8>(), 1..=4),
            frac_bits in 0u8..=15
        ) {
            let original = buf(&bytes);
            let value = decode_fixed_point(&original, frac_bits, FixedPointMode::Exact).unwrap();
            let encoded = encode_fixed_point(value, frac_bits, bytes.len()).unwrap();
            prop_assert_eq!(encoded, original);
        }
    }

    #[test]
    fn unsigned_rejects_unusable_sizes() {
        assert!(decode_unsigned(&ValueBuffer::new()).is_err());
        assert!(decode_unsigned(&buf(&[0; 5])).is_err());
        assert!(encode_unsigned(1, 0).is_err());
    }

    #[test]
    fn unsigned_encode_rejects_overflow() {
        assert!(matches!(
            encode_unsigned(256, 1),
            Err(CodecError::ValueOutOfRange { len: 1, .. })
        ));
        assert!(encode_unsigned(255, 1).is_ok());
    }

    #[test]
    fn legacy_fixed_point_shifts_high_bytes() {
        let value = decode_fixed_point(&buf(&[0x01, 0x00]), 2, FixedPointMode::Legacy).unwrap();
        assert_eq!(value, 64.0);
    }

    #[test]
    fn legacy_fixed_point_drops_low_bits_of_last_byte() {
        let value = decode_fixed_point(&buf(&[0x01, 0x03]), 2, FixedPointMode::Legacy).unwrap();
        assert_eq!(value, 64.0);
        let exact = decode_fixed_point(&buf(&[0x01, 0x03]), 2, FixedPointMode::Exact).unwrap();
        assert_eq!(exact, 64.75);
    }

    #[test]
    fn fan_speed_decodes_in_both_modes() {
        // 1200 rpm as fpe2
        let raw = buf(&[0x12, 0xc0]);
        assert_eq!(
            decode_fixed_point(&raw, 2, FixedPointMode::Legacy).unwrap(),
            1200.0
        );
        assert_eq!(
            decode_fixed_point(&raw, 2, FixedPointMode::Exact).unwrap(),
            1200.0
        );
    }

    #[test]
    fn legacy_fixed_point_three_bytes() {
        // 0x01 << 14 + 0x02 << 6 + 0x07 >> 2
        let value =
            decode_fixed_point(&buf(&[0x01, 0x02, 0x07]), 2, FixedPointMode::Legacy).unwrap();
        assert_eq!(value, 16384.0 + 128.0 + 1.0);
    }

    #[test]
    fn fixed_point_encode_rounds_and_checks_range() {
        assert_eq!(
            encode_fixed_point(1200.0, 2, 2).unwrap().as_slice(),
            &[0x12, 0xc0]
        );
        assert_eq!(
            encode_fixed_point(0.3, 2, 2).unwrap().as_slice(),
            &[0x00, 0x01]
        );
        assert!(encode_fixed_point(-1.0, 2, 2).is_err());
        assert!(encode_fixed_point(16384.0, 2, 2).is_err());
        assert!(encode_fixed_point(f64::NAN, 2, 2).is_err());
    }

    #[test]
    fn fallback_decodes_temperature_style_values() {
        // 45.5 in sp78 is 0x2d80: (0x2d80 >> 2) / 64 = 45.5
        let value = decode_fallback(&buf(&[0x2d, 0x80])).unwrap();
        assert_eq!(value, 45.5);
        assert_eq!(Value::Scaled(value).to_string(), "46");
    }

    #[test]
    fn fallback_shift_is_arithmetic() {
        // 0xff00 is -256; -256 >> 2 = -64; -64 / 64 = -1
        let value = decode_fallback(&buf(&[0xff, 0x00])).unwrap();
        assert_eq!(value, -1.0);
    }

    #[test]
    fn fallback_needs_two_bytes() {
        assert_eq!(decode_fallback(&buf(&[0x01])), None);
    }

    #[test]
    fn decode_dispatches_on_data_type() {
        let options = DecodeOptions::default();
        assert_eq!(
            decode(DataType::UInt16, &buf(&[0x00, 0x2a]), options),
            Value::Unsigned(42)
        );
        assert_eq!(
            decode(
                DataType::FixedPoint { frac_bits: 2 },
                &buf(&[0x01, 0x03]),
                options
            ),
            Value::FixedPoint(64.0)
        );
        assert_eq!(
            decode(DataType::Unknown, &buf(&[0x2d, 0x80]), options),
            Value::Scaled(45.5)
        );
        assert_eq!(
            decode(DataType::Unknown, &buf(&[0x01]), options),
            Value::Bytes(buf(&[0x01]))
        );
    }

    #[test]
    fn decode_honours_exact_mode() {
        let options = DecodeOptions {
            fixed_point: FixedPointMode::Exact,
        };
        assert_eq!(
            decode(
                DataType::FixedPoint { frac_bits: 2 },
                &buf(&[0x01, 0x03]),
                options
            ),
            Value::FixedPoint(64.75)
        );
    }

    #[test]
    fn encode_str_follows_data_type() {
        assert_eq!(
            encode_str(DataType::UInt8, 1, "7").unwrap().as_slice(),
            &[7]
        );
        assert_eq!(
            encode_str(DataType::FixedPoint { frac_bits: 2 }, 2, "1200")
                .unwrap()
                .as_slice(),
            &[0x12, 0xc0]
        );
        assert_eq!(
            encode_str(DataType::Unknown, 2, "1a2b").unwrap().as_slice(),
            &[0x1a, 0x2b]
        );
        assert!(matches!(
            encode_str(DataType::UInt16, 2, "fast"),
            Err(CodecError::InvalidNumber(_))
        ));
    }

    #[test]
    fn value_display() {
        assert_eq!(Value::Unsigned(7).to_string(), "7");
        assert_eq!(Value::FixedPoint(64.0).to_string(), "64");
        assert_eq!(Value::FixedPoint(64.75).to_string(), "64.75");
        assert_eq!(Value::Bytes(buf(&[0x01, 0x0a])).to_string(), "(bytes 01 0a)");
    }
}
