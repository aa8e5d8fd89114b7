//! Four-character codes: SMC keys and type tags.
//!
//! Both are four raw bytes that travel as a big-endian packed `u32`
//! (`b0 << 24 | b1 << 16 | b2 << 8 | b3`).

use std::fmt;
use std::str::FromStr;

use crate::error::WireError;

macro_rules! four_char_code {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name([u8; 4]);

        impl $name {
            /// Build from four raw bytes.
            pub const fn from_bytes(bytes: [u8; 4]) -> Self {
                Self(bytes)
            }

            /// Unpack from the big-endian packed wire form.
            pub const fn from_u32(value: u32) -> Self {
                Self(value.to_be_bytes())
            }

            /// Pack into the big-endian wire form.
            pub const fn to_u32(self) -> u32 {
                u32::from_be_bytes(self.0)
            }

            /// The four raw bytes.
            pub const fn as_bytes(&self) -> &[u8; 4] {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = WireError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let bytes: [u8; 4] = s
                    .as_bytes()
                    .try_into()
                    .map_err(|_| WireError::InvalidKey { len: s.len() })?;
                Ok(Self(bytes))
            }
        }

        impl TryFrom<&str> for $name {
            type Error = WireError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for &b in &self.0 {
                    if b.is_ascii_graphic() || b == b' ' {
                        write!(f, "{}", b as char)?;
                    } else {
                        write!(f, "\\x{b:02x}")?;
                    }
                }
                Ok(())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}(\"{}\")", stringify!($name), self)
            }
        }
    };
}

four_char_code!(
    /// A 4-byte SMC key such as `TC0P` or `#KEY`. Case-sensitive.
    Key
);

four_char_code!(
    /// A 4-byte type tag such as `ui16` or `fpe2`.
    ///
    /// Only meaningful together with the data size returned in the same
    /// key-info query.
    TypeTag
);

impl Key {
    /// The key holding the total number of keys on the device.
    pub const KEY_COUNT: Key = Key(*b"#KEY");
    /// The key holding the number of fans.
    pub const FAN_COUNT: Key = Key(*b"FNum");
    /// The forced-mode bitmask, one bit per fan.
    pub const FAN_FORCE: Key = Key(*b"FS! ");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_big_endian() {
        let key: Key = "#KEY".parse().unwrap();
        assert_eq!(key.to_u32(), 0x234B_4559);
        assert_eq!(Key::from_u32(0x234B_4559), key);
        assert_eq!(key, Key::KEY_COUNT);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(
            "TC0".parse::<Key>(),
            Err(WireError::InvalidKey { len: 3 })
        ));
        assert!(matches!(
            "TC0PX".parse::<Key>(),
            Err(WireError::InvalidKey { len: 5 })
        ));
    }

    #[test]
    fn keys_are_case_sensitive() {
        let upper: Key = "TC0P".parse().unwrap();
        let lower: Key = "tc0p".parse().unwrap();
        assert_ne!(upper, lower);
    }

    #[test]
    fn display_keeps_trailing_space_and_escapes_control_bytes() {
        assert_eq!(Key::FAN_FORCE.to_string(), "FS! ");
        assert_eq!(Key::from_bytes([b'A', 0, b'B', 0x7f]).to_string(), "A\\x00B\\x7f");
    }

    #[test]
    fn type_tag_roundtrips_through_u32() {
        let tag: TypeTag = "ui16".parse().unwrap();
        assert_eq!(TypeTag::from_u32(tag.to_u32()).as_bytes(), b"ui16");
        assert_eq!(format!("{tag:?}"), "TypeTag(\"ui16\")");
    }
}
