use bytes::{Buf, BufMut, BytesMut};

use crate::command::{READ_BYTES, READ_INDEX, READ_KEYINFO, WRITE_BYTES};
use crate::error::{Result, WireError};
use crate::fourcc::{Key, TypeTag};

/// Size of the key-data record exchanged with the driver, in bytes.
pub const RECORD_SIZE: usize = 80;

/// Capacity of the payload array carried by every record.
pub const PAYLOAD_SIZE: usize = 32;

/// Firmware version block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
    pub build: u8,
    pub reserved: u8,
    pub release: u16,
}

/// Power-limit block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PLimitData {
    pub version: u16,
    pub length: u16,
    pub cpu_p_limit: u32,
    pub gpu_p_limit: u32,
    pub mem_p_limit: u32,
}

/// Key-info sub-record: output of [`READ_KEYINFO`], input for byte transfers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyInfo {
    /// Number of significant payload bytes.
    pub data_size: u32,
    pub data_type: TypeTag,
    pub data_attributes: u8,
}

/// One SMC key-data record.
///
/// Input and output records share this layout regardless of command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyData {
    pub key: Key,
    pub vers: Version,
    pub p_limit_data: PLimitData,
    pub key_info: KeyInfo,
    pub result: u8,
    pub status: u8,
    /// Command selector.
    pub data8: u8,
    /// Generic argument (key index for [`READ_INDEX`]).
    pub data32: u32,
    pub bytes: [u8; PAYLOAD_SIZE],
}

impl Default for KeyData {
    fn default() -> Self {
        Self {
            key: Key::default(),
            vers: Version::default(),
            p_limit_data: PLimitData::default(),
            key_info: KeyInfo::default(),
            result: 0,
            status: 0,
            data8: 0,
            data32: 0,
            bytes: [0; PAYLOAD_SIZE],
        }
    }
}

impl KeyData {
    /// Input record asking for a key's size and type.
    pub fn key_info_request(key: Key) -> Self {
        Self {
            key,
            data8: READ_KEYINFO,
            ..Self::default()
        }
    }

    /// Input record fetching `data_size` bytes of `key`.
    pub fn read_request(key: Key, data_size: u32) -> Self {
        let mut record = Self {
            key,
            data8: READ_BYTES,
            ..Self::default()
        };
        record.key_info.data_size = data_size;
        record
    }

    /// Input record writing `payload` to `key`.
    ///
    /// `payload` longer than [`PAYLOAD_SIZE`] is truncated.
    pub fn write_request(key: Key, payload: &[u8]) -> Self {
        let len = payload.len().min(PAYLOAD_SIZE);
        let mut record = Self {
            key,
            data8: WRITE_BYTES,
            ..Self::default()
        };
        record.key_info.data_size = len as u32;
        record.bytes[..len].copy_from_slice(&payload[..len]);
        record
    }

    /// Input record resolving the key stored at `index`.
    pub fn index_request(index: u32) -> Self {
        Self {
            data8: READ_INDEX,
            data32: index,
            ..Self::default()
        }
    }

    /// Encode into the driver's in-memory layout (host byte order).
    ///
    /// Layout:
    /// ```text
    ///  0  key            u32
    ///  4  vers           major minor build reserved | release u16
    /// 10  (pad 2)
    /// 12  p_limit_data   version u16 | length u16 | cpu u32 | gpu u32 | mem u32
    /// 28  key_info       data_size u32 | data_type u32 | attributes u8 | (pad 3)
    /// 40  result u8 | status u8 | data8 u8 | (pad 1)
    /// 44  data32         u32
    /// 48  bytes          [u8; 32]
    /// 80
    /// ```
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.reserve(RECORD_SIZE);
        dst.put_u32_ne(self.key.to_u32());

        dst.put_u8(self.vers.major);
        dst.put_u8(self.vers.minor);
        dst.put_u8(self.vers.build);
        dst.put_u8(self.vers.reserved);
        dst.put_u16_ne(self.vers.release);
        dst.put_bytes(0, 2);

        dst.put_u16_ne(self.p_limit_data.version);
        dst.put_u16_ne(self.p_limit_data.length);
        dst.put_u32_ne(self.p_limit_data.cpu_p_limit);
        dst.put_u32_ne(self.p_limit_data.gpu_p_limit);
        dst.put_u32_ne(self.p_limit_data.mem_p_limit);

        dst.put_u32_ne(self.key_info.data_size);
        dst.put_u32_ne(self.key_info.data_type.to_u32());
        dst.put_u8(self.key_info.data_attributes);
        dst.put_bytes(0, 3);

        dst.put_u8(self.result);
        dst.put_u8(self.status);
        dst.put_u8(self.data8);
        dst.put_u8(0);
        dst.put_u32_ne(self.data32);
        dst.put_slice(&self.bytes);
    }

    /// Encode into a fresh fixed-size array.
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut buf = BytesMut::with_capacity(RECORD_SIZE);
        self.encode(&mut buf);
        let mut out = [0u8; RECORD_SIZE];
        out.copy_from_slice(&buf);
        out
    }

    /// Decode a record from the driver's in-memory layout.
    ///
    /// Bytes past [`RECORD_SIZE`] are ignored.
    pub fn decode(src: &[u8]) -> Result<Self> {
        if src.len() < RECORD_SIZE {
            return Err(WireError::RecordTooShort {
                len: src.len(),
                expected: RECORD_SIZE,
            });
        }

        let mut buf = &src[..RECORD_SIZE];
        let key = Key::from_u32(buf.get_u32_ne());

        let vers = Version {
            major: buf.get_u8(),
            minor: buf.get_u8(),
            build: buf.get_u8(),
            reserved: buf.get_u8(),
            release: buf.get_u16_ne(),
        };
        buf.advance(2);

        let p_limit_data = PLimitData {
            version: buf.get_u16_ne(),
            length: buf.get_u16_ne(),
            cpu_p_limit: buf.get_u32_ne(),
            gpu_p_limit: buf.get_u32_ne(),
            mem_p_limit: buf.get_u32_ne(),
        };

        let key_info = KeyInfo {
            data_size: buf.get_u32_ne(),
            data_type: TypeTag::from_u32(buf.get_u32_ne()),
            data_attributes: buf.get_u8(),
        };
        buf.advance(3);

        let result = buf.get_u8();
        let status = buf.get_u8();
        let data8 = buf.get_u8();
        buf.advance(1);
        let data32 = buf.get_u32_ne();

        let mut bytes = [0u8; PAYLOAD_SIZE];
        buf.copy_to_slice(&mut bytes);

        Ok(Self {
            key,
            vers,
            p_limit_data,
            key_info,
            result,
            status,
            data8,
            data32,
            bytes,
        })
    }
}
