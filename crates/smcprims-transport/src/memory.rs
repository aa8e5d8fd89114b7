use smcprims_wire::{
    Key, KeyData, TypeTag, KERNEL_INDEX_SMC, PAYLOAD_SIZE, READ_BYTES, READ_INDEX, READ_KEYINFO,
    RESULT_ERROR, RESULT_KEY_NOT_FOUND, WRITE_BYTES,
};
use tracing::debug;

use crate::error::{KernReturn, Result, TransportError};
use crate::traits::SmcTransport;

/// `kIOReturnBadArgument`, returned for calls on an unknown selector.
const IO_RETURN_BAD_ARGUMENT: KernReturn = 0xe00002c2_u32 as KernReturn;

/// One call observed by a [`MemoryDevice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    pub selector: u32,
    pub command: u8,
    pub key: Key,
    pub data_size: u32,
    pub data32: u32,
}

#[derive(Debug, Clone)]
struct Entry {
    key: Key,
    data_type: TypeTag,
    attributes: u8,
    bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
struct Failure {
    command: u8,
    key: Option<Key>,
    code: KernReturn,
}

/// An in-memory SMC.
///
/// Keys are kept in insertion order, which defines their index for
/// [`READ_INDEX`]. The `#KEY` count key is maintained automatically and
/// counts itself. Every call is recorded; failures can be injected per
/// command (and optionally per key).
#[derive(Debug, Clone)]
pub struct MemoryDevice {
    entries: Vec<Entry>,
    calls: Vec<CallRecord>,
    failures: Vec<Failure>,
}

impl Default for MemoryDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDevice {
    /// An empty device holding only `#KEY`.
    pub fn new() -> Self {
        let mut device = Self {
            entries: Vec::new(),
            calls: Vec::new(),
            failures: Vec::new(),
        };
        device.entries.push(Entry {
            key: Key::KEY_COUNT,
            data_type: TypeTag::from_bytes(*b"ui32"),
            attributes: 0,
            bytes: vec![0; 4],
        });
        device.sync_key_count();
        device
    }

    /// Builder form of [`MemoryDevice::insert`].
    pub fn with_key(mut self, key: Key, data_type: TypeTag, bytes: &[u8]) -> Self {
        self.insert(key, data_type, bytes);
        self
    }

    /// Add or replace a key. Payloads longer than 32 bytes are truncated.
    pub fn insert(&mut self, key: Key, data_type: TypeTag, bytes: &[u8]) {
        let bytes = bytes[..bytes.len().min(PAYLOAD_SIZE)].to_vec();
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(entry) => {
                entry.data_type = data_type;
                entry.bytes = bytes;
            }
            None => {
                self.entries.push(Entry {
                    key,
                    data_type,
                    attributes: 0,
                    bytes,
                });
                self.sync_key_count();
            }
        }
    }

    /// Fail every call carrying `command` with `code`.
    pub fn fail_command(&mut self, command: u8, code: KernReturn) {
        self.failures.push(Failure {
            command,
            key: None,
            code,
        });
    }

    /// Fail calls carrying `command` for `key` only.
    pub fn fail_key(&mut self, command: u8, key: Key, code: KernReturn) {
        self.failures.push(Failure {
            command,
            key: Some(key),
            code,
        });
    }

    /// Current payload of `key`.
    pub fn value(&self, key: Key) -> Option<&[u8]> {
        self.entry(key).map(|e| e.bytes.as_slice())
    }

    /// Number of keys, `#KEY` included.
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> &[CallRecord] {
        &self.calls
    }

    /// Number of calls received with `command`.
    pub fn count_calls(&self, command: u8) -> usize {
        self.calls.iter().filter(|c| c.command == command).count()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn entry(&self, key: Key) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key == key)
    }

    fn sync_key_count(&mut self) {
        let count = self.entries.len() as u32;
        if let Some(entry) = self.entries.iter_mut().find(|e| e.key == Key::KEY_COUNT) {
            entry.bytes = count.to_be_bytes().to_vec();
        }
    }

    fn injected_failure(&self, input: &KeyData) -> Option<KernReturn> {
        self.failures
            .iter()
            .find(|f| f.command == input.data8 && f.key.is_none_or(|k| k == input.key))
            .map(|f| f.code)
    }

    fn read_key_info(&self, input: &KeyData, output: &mut KeyData) {
        match self.entry(input.key) {
            Some(entry) => {
                output.key_info.data_size = entry.bytes.len() as u32;
                output.key_info.data_type = entry.data_type;
                output.key_info.data_attributes = entry.attributes;
            }
            None => output.result = RESULT_KEY_NOT_FOUND,
        }
    }

    fn read_bytes(&self, input: &KeyData, output: &mut KeyData) {
        match self.entry(input.key) {
            Some(entry) => output.bytes[..entry.bytes.len()].copy_from_slice(&entry.bytes),
            None => output.result = RESULT_KEY_NOT_FOUND,
        }
    }

    fn write_bytes(&mut self, input: &KeyData, output: &mut KeyData) {
        let Some(entry) = self.entries.iter_mut().find(|e| e.key == input.key) else {
            output.result = RESULT_KEY_NOT_FOUND;
            return;
        };
        let size = input.key_info.data_size as usize;
        if size != entry.bytes.len() {
            output.result = RESULT_ERROR;
            return;
        }
        entry.bytes.copy_from_slice(&input.bytes[..size]);
    }

    fn read_index(&self, input: &KeyData, output: &mut KeyData) {
        match self.entries.get(input.data32 as usize) {
            Some(entry) => output.key = entry.key,
            None => output.result = RESULT_KEY_NOT_FOUND,
        }
    }
}

impl SmcTransport for MemoryDevice {
    fn call(&mut self, selector: u32, input: &KeyData) -> Result<KeyData> {
        self.calls.push(CallRecord {
            selector,
            command: input.data8,
            key: input.key,
            data_size: input.key_info.data_size,
            data32: input.data32,
        });
        debug!(
            selector,
            command = smcprims_wire::command_name(input.data8),
            key = %input.key,
            "memory SMC call"
        );

        if selector != KERNEL_INDEX_SMC {
            return Err(TransportError::Call(IO_RETURN_BAD_ARGUMENT));
        }
        if let Some(code) = self.injected_failure(input) {
            return Err(TransportError::Call(code));
        }

        let mut output = KeyData {
            key: input.key,
            ..KeyData::default()
        };
        match input.data8 {
            READ_KEYINFO => self.read_key_info(input, &mut output),
            READ_BYTES => self.read_bytes(input, &mut output),
            WRITE_BYTES => self.write_bytes(input, &mut output),
            READ_INDEX => self.read_index(input, &mut output),
            _ => output.result = RESULT_ERROR,
        }
        Ok(output)
    }

    fn transport_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> Key {
        s.parse().unwrap()
    }

    fn tag(s: &str) -> TypeTag {
        s.parse().unwrap()
    }

    #[test]
    fn key_count_tracks_inserts() {
        let mut device = MemoryDevice::new();
        assert_eq!(device.value(Key::KEY_COUNT), Some(&[0, 0, 0, 1][..]));

        device.insert(key("TC0P"), tag("sp78"), &[0x2d, 0x80]);
        device.insert(key("TC0P"), tag("sp78"), &[0x2e, 0x00]);
        assert_eq!(device.key_count(), 2);
        assert_eq!(device.value(Key::KEY_COUNT), Some(&[0, 0, 0, 2][..]));
    }

    #[test]
    fn answers_key_info_and_bytes() {
        let mut device = MemoryDevice::new().with_key(key("FNum"), tag("ui8 "), &[2]);

        let info = device
            .call(KERNEL_INDEX_SMC, &KeyData::key_info_request(key("FNum")))
            .unwrap();
        assert_eq!(info.key_info.data_size, 1);
        assert_eq!(info.key_info.data_type, tag("ui8 "));

        let data = device
            .call(KERNEL_INDEX_SMC, &KeyData::read_request(key("FNum"), 1))
            .unwrap();
        assert_eq!(data.bytes[0], 2);
        assert_eq!(device.calls().len(), 2);
    }

    #[test]
    fn missing_key_sets_result_byte() {
        let mut device = MemoryDevice::new();
        let out = device
            .call(KERNEL_INDEX_SMC, &KeyData::key_info_request(key("NOPE")))
            .unwrap();
        assert_eq!(out.result, RESULT_KEY_NOT_FOUND);
        assert_eq!(out.key_info.data_size, 0);
    }

    #[test]
    fn write_requires_matching_size() {
        let mut device = MemoryDevice::new().with_key(key("F0Tg"), tag("fpe2"), &[0, 0]);

        let out = device
            .call(KERNEL_INDEX_SMC, &KeyData::write_request(key("F0Tg"), &[1]))
            .unwrap();
        assert_eq!(out.result, RESULT_ERROR);
        assert_eq!(device.value(key("F0Tg")), Some(&[0, 0][..]));

        device
            .call(KERNEL_INDEX_SMC, &KeyData::write_request(key("F0Tg"), &[0x1f, 0x40]))
            .unwrap();
        assert_eq!(device.value(key("F0Tg")), Some(&[0x1f, 0x40][..]));
    }

    #[test]
    fn index_reads_follow_insertion_order() {
        let mut device = MemoryDevice::new().with_key(key("TC0P"), tag("sp78"), &[0, 0]);
        let first = device
            .call(KERNEL_INDEX_SMC, &KeyData::index_request(0))
            .unwrap();
        let second = device
            .call(KERNEL_INDEX_SMC, &KeyData::index_request(1))
            .unwrap();
        assert_eq!(first.key, Key::KEY_COUNT);
        assert_eq!(second.key, key("TC0P"));
    }

    #[test]
    fn injected_failure_surfaces_code() {
        let mut device = MemoryDevice::new();
        device.fail_key(READ_KEYINFO, key("TC0P"), 0x1234);

        let result = device.call(KERNEL_INDEX_SMC, &KeyData::key_info_request(key("TC0P")));
        assert!(matches!(result, Err(TransportError::Call(0x1234))));

        let other = device.call(KERNEL_INDEX_SMC, &KeyData::key_info_request(Key::KEY_COUNT));
        assert!(other.is_ok());
    }

    #[test]
    fn unknown_selector_is_rejected() {
        let mut device = MemoryDevice::new();
        let result = device.call(99, &KeyData::default());
        assert!(matches!(
            result,
            Err(TransportError::Call(IO_RETURN_BAD_ARGUMENT))
        ));
    }
}
