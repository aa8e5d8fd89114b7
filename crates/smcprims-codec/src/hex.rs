use crate::buffer::ValueBuffer;
use crate::error::{CodecError, Result};

/// Parse a hex-pair string (`"1a2b"`) into a value buffer.
///
/// Two characters per byte, left to right. Odd lengths, non-hex characters
/// and more than 32 bytes are rejected.
pub fn parse_hex(input: &str) -> Result<ValueBuffer> {
    let digits = input.as_bytes();
    if digits.len() % 2 != 0 {
        return Err(CodecError::OddHexLength { len: digits.len() });
    }
    if digits.len() / 2 > ValueBuffer::CAPACITY {
        return Err(CodecError::TooLong {
            len: digits.len() / 2,
            max: ValueBuffer::CAPACITY,
        });
    }

    let mut bytes = Vec::with_capacity(digits.len() / 2);
    for (i, pair) in digits.chunks_exact(2).enumerate() {
        let hi = nibble(pair[0]).ok_or(CodecError::InvalidHex { position: i * 2 })?;
        let lo = nibble(pair[1]).ok_or(CodecError::InvalidHex {
            position: i * 2 + 1,
        })?;
        bytes.push(hi << 4 | lo);
    }
    ValueBuffer::from_slice(&bytes)
}

fn nibble(c: u8) -> Option<u8> {
    (c as char).to_digit(16).map(|d| d as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs_left_to_right() {
        let buf = parse_hex("1a2b").unwrap();
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.as_slice(), &[0x1a, 0x2b]);
    }

    #[test]
    fn accepts_uppercase() {
        assert_eq!(parse_hex("FF00").unwrap().as_slice(), &[0xff, 0x00]);
    }

    #[test]
    fn empty_string_is_empty_buffer() {
        assert!(parse_hex("").unwrap().is_empty());
    }

    #[test]
    fn rejects_odd_length() {
        assert!(matches!(
            parse_hex("1a2"),
            Err(CodecError::OddHexLength { len: 3 })
        ));
    }

    #[test]
    fn rejects_non_hex_characters() {
        assert!(matches!(
            parse_hex("1g"),
            Err(CodecError::InvalidHex { position: 1 })
        ));
        assert!(matches!(
            parse_hex("+1"),
            Err(CodecError::InvalidHex { position: 0 })
        ));
    }

    #[test]
    fn rejects_more_than_capacity() {
        let input = "00".repeat(33);
        assert!(matches!(
            parse_hex(&input),
            Err(CodecError::TooLong { len: 33, .. })
        ));
    }
}
