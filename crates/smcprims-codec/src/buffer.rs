use std::fmt;

use smcprims_wire::PAYLOAD_SIZE;

use crate::error::{CodecError, Result};

/// A key payload: 32 bytes of capacity plus the number of significant bytes.
///
/// Bytes past `len` are whatever the device returned and are never read by
/// the codecs.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ValueBuffer {
    bytes: [u8; PAYLOAD_SIZE],
    len: u8,
}

impl Default for ValueBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueBuffer {
    /// Maximum number of significant bytes.
    pub const CAPACITY: usize = PAYLOAD_SIZE;

    /// An empty buffer.
    pub const fn new() -> Self {
        Self {
            bytes: [0; PAYLOAD_SIZE],
            len: 0,
        }
    }

    /// Copy `data` into a new buffer.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        if data.len() > Self::CAPACITY {
            return Err(CodecError::TooLong {
                len: data.len(),
                max: Self::CAPACITY,
            });
        }
        let mut buf = Self::new();
        buf.bytes[..data.len()].copy_from_slice(data);
        buf.len = data.len() as u8;
        Ok(buf)
    }

    /// Wrap a full device payload with `len` significant bytes.
    ///
    /// `len` is clamped to the capacity.
    pub fn from_payload(payload: [u8; PAYLOAD_SIZE], len: usize) -> Self {
        Self {
            bytes: payload,
            len: len.min(Self::CAPACITY) as u8,
        }
    }

    /// Number of significant bytes.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The significant bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    /// The full 32-byte payload, including insignificant trailing bytes.
    pub fn payload(&self) -> &[u8; PAYLOAD_SIZE] {
        &self.bytes
    }

    /// Significant bytes as space-separated lowercase hex pairs.
    pub fn to_hex(&self) -> String {
        self.as_slice()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl AsRef<[u8]> for ValueBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl fmt::Debug for ValueBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueBuffer[{}]({})", self.len, self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice_tracks_length() {
        let buf = ValueBuffer::from_slice(&[0x1a, 0x2b]).unwrap();
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.as_slice(), &[0x1a, 0x2b]);
        assert_eq!(buf.to_hex(), "1a 2b");
    }

    #[test]
    fn from_slice_rejects_oversized_input() {
        let result = ValueBuffer::from_slice(&[0u8; 33]);
        assert!(matches!(
            result,
            Err(CodecError::TooLong { len: 33, max: 32 })
        ));
    }

    #[test]
    fn from_payload_ignores_trailing_bytes() {
        let mut payload = [0xffu8; PAYLOAD_SIZE];
        payload[0] = 0x01;
        let buf = ValueBuffer::from_payload(payload, 1);
        assert_eq!(buf.as_slice(), &[0x01]);
        assert_eq!(buf.payload()[1], 0xff);
    }

    #[test]
    fn from_payload_clamps_length() {
        let buf = ValueBuffer::from_payload([0; PAYLOAD_SIZE], 200);
        assert_eq!(buf.len(), ValueBuffer::CAPACITY);
    }
}
