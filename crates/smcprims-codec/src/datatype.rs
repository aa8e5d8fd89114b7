use std::fmt;

use smcprims_wire::TypeTag;

/// How a key's payload is interpreted.
///
/// Resolved once from the type tag and data size of a key-info query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    UInt8,
    UInt16,
    UInt32,
    /// Unsigned fixed point with `frac_bits` fractional bits.
    FixedPoint { frac_bits: u8 },
    /// Any other tag, or a numeric tag with an unusable size.
    Unknown,
}

impl DataType {
    /// Resolve the data type of a key.
    ///
    /// Numeric tags are only honoured for sizes 1..=4. Fixed-point tags have
    /// the form `fpXY` with hex digits `X + Y == 16`.
    pub fn resolve(tag: TypeTag, data_size: usize) -> Self {
        if !(1..=4).contains(&data_size) {
            return DataType::Unknown;
        }
        match tag.as_bytes() {
            b"ui8 " => DataType::UInt8,
            b"ui16" => DataType::UInt16,
            b"ui32" => DataType::UInt32,
            [b'f', b'p', int_digit, frac_digit] => {
                match (hex_digit(*int_digit), hex_digit(*frac_digit)) {
                    (Some(int_bits), Some(frac_bits)) if int_bits + frac_bits == 16 => {
                        DataType::FixedPoint { frac_bits }
                    }
                    _ => DataType::Unknown,
                }
            }
            _ => DataType::Unknown,
        }
    }

    pub fn is_unsigned(self) -> bool {
        matches!(self, DataType::UInt8 | DataType::UInt16 | DataType::UInt32)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::UInt8 => f.write_str("uint8"),
            DataType::UInt16 => f.write_str("uint16"),
            DataType::UInt32 => f.write_str("uint32"),
            DataType::FixedPoint { frac_bits } => write!(f, "fixed-point/{frac_bits}"),
            DataType::Unknown => f.write_str("unknown"),
        }
    }
}

fn hex_digit(c: u8) -> Option<u8> {
    (c as char).to_digit(16).map(|d| d as u8)
}
