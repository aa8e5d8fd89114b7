use smcprims_codec::decode_unsigned;
use smcprims_transport::SmcTransport;
use smcprims_wire::{Key, KeyData, RESULT_KEY_NOT_FOUND};
use tracing::{debug, warn};

use crate::client::{SmcClient, ValueRecord};
use crate::error::Result;

impl<T: SmcTransport> SmcClient<T> {
    /// Total number of keys, read from `#KEY`.
    pub fn key_count(&mut self) -> Result<u32> {
        let record = self.read_key(Key::KEY_COUNT)?;
        Ok(decode_unsigned(&record.buffer)?)
    }

    /// The key stored at `index`.
    pub fn key_at_index(&mut self, index: u32) -> Result<Key> {
        let output = self.call(&KeyData::index_request(index))?;
        Ok(output.key)
    }

    /// Read every key on the device.
    ///
    /// One index read plus one key read per position. Positions whose index
    /// read or key read fails are logged and skipped. Enumeration ends early
    /// at the first index the device reports as past its key table.
    pub fn list(&mut self) -> Result<Vec<ValueRecord>> {
        let count = self.key_count()?;
        debug!(count, "enumerating keys");

        let mut records = Vec::new();
        for index in 0..count {
            let key = match self.call(&KeyData::index_request(index)) {
                Ok(output) if output.result == RESULT_KEY_NOT_FOUND => {
                    warn!(index, count, "key table ended before reported count");
                    break;
                }
                Ok(output) => output.key,
                Err(err) => {
                    warn!(index, error = %err, "skipping unreadable key index");
                    continue;
                }
            };
            match self.read_key(key) {
                Ok(record) => records.push(record),
                Err(err) => warn!(index, %key, error = %err, "skipping unreadable key"),
            }
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use smcprims_transport::{MemoryDevice, TransportError};
    use smcprims_wire::{TypeTag, READ_BYTES, READ_INDEX, READ_KEYINFO};

    use super::*;
    use crate::error::SmcError;

    fn key(s: &str) -> Key {
        s.parse().expect("valid key")
    }

    fn device() -> MemoryDevice {
        let ui8: TypeTag = "ui8 ".parse().expect("valid tag");
        let sp78: TypeTag = "sp78".parse().expect("valid tag");
        MemoryDevice::new()
            .with_key(key("FNum"), ui8, &[1])
            .with_key(key("TC0P"), sp78, &[0x2d, 0x80])
            .with_key(key("TB0T"), sp78, &[0x20, 0x00])
    }

    #[test]
    fn key_count_reads_key_count_key() {
        let mut client = SmcClient::new(device());
        assert_eq!(client.key_count().unwrap(), 4);
    }

    #[test]
    fn key_at_index_returns_position() {
        let mut client = SmcClient::new(device());
        assert_eq!(client.key_at_index(2).unwrap(), key("TC0P"));
    }

    #[test]
    fn list_issues_one_index_read_and_one_key_read_per_key() {
        let mut client = SmcClient::new(device());
        let records = client.list().unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0].key, Key::KEY_COUNT);
        assert_eq!(records[3].key, key("TB0T"));

        let dev = client.transport();
        assert_eq!(dev.count_calls(READ_INDEX), 4);
        // count read + one read per key
        assert_eq!(dev.count_calls(READ_KEYINFO), 5);
        assert_eq!(dev.count_calls(READ_BYTES), 5);
    }

    #[test]
    fn list_skips_failed_positions() {
        let mut dev = device();
        dev.fail_key(READ_BYTES, key("TC0P"), 0x10);
        let mut client = SmcClient::new(dev);

        let records = client.list().unwrap();
        let keys: Vec<Key> = records.iter().map(|r| r.key).collect();
        assert_eq!(keys, vec![Key::KEY_COUNT, key("FNum"), key("TB0T")]);
    }

    #[test]
    fn list_stops_at_end_of_key_table() {
        let mut dev = device();
        let ui32: TypeTag = "ui32".parse().expect("valid tag");
        dev.insert(Key::KEY_COUNT, ui32, &[0xff, 0xff, 0xff, 0xff]);
        let mut client = SmcClient::new(dev);

        assert_eq!(client.key_count().unwrap(), u32::MAX);
        let records = client.list().unwrap();
        assert_eq!(records.len(), 4);
        // four real positions plus the one reported past the end
        assert_eq!(client.transport().count_calls(READ_INDEX), 5);
    }

    #[test]
    fn list_fails_when_count_unreadable() {
        let mut dev = device();
        dev.fail_key(READ_KEYINFO, Key::KEY_COUNT, 0x20);
        let mut client = SmcClient::new(dev);

        assert!(matches!(
            client.list(),
            Err(SmcError::Transport(TransportError::Call(0x20)))
        ));
        assert_eq!(client.transport().count_calls(READ_INDEX), 0);
    }
}
