use smcprims_codec::{decode, encode_str, DataType, DecodeOptions, Value, ValueBuffer};
use smcprims_transport::{SmcConnection, SmcTransport};
use smcprims_wire::{
    Key, KeyData, KeyInfo, TypeTag, KERNEL_INDEX_SMC, RESULT_SUCCESS, WRITE_BYTES,
};
use tracing::{debug, warn};

use crate::error::{Result, SmcError};

/// Client configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientConfig {
    /// Decoder settings used by [`SmcClient::decode`] and the fan report.
    pub decode: DecodeOptions,
}

/// One key's value as read from the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRecord {
    pub key: Key,
    pub data_type: TypeTag,
    /// Payload with the device-reported data size as its length.
    pub buffer: ValueBuffer,
}

impl ValueRecord {
    /// Number of significant bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The resolved data type.
    pub fn kind(&self) -> DataType {
        DataType::resolve(self.data_type, self.buffer.len())
    }

    /// Decode the payload.
    pub fn decode(&self, options: DecodeOptions) -> Value {
        decode(self.kind(), &self.buffer, options)
    }
}

/// Open the system SMC with default configuration.
pub fn open() -> Result<SmcClient<SmcConnection>> {
    open_with_config(ClientConfig::default())
}

/// Open the system SMC with explicit configuration.
pub fn open_with_config(config: ClientConfig) -> Result<SmcClient<SmcConnection>> {
    let connection = SmcConnection::open()?;
    Ok(SmcClient::with_config(connection, config))
}

/// Key-value client over any [`SmcTransport`].
#[derive(Debug)]
pub struct SmcClient<T> {
    transport: T,
    config: ClientConfig,
}

impl<T: SmcTransport> SmcClient<T> {
    /// Create a client with default configuration.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    /// Create a client with explicit configuration.
    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    /// Current configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Borrow the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the client and return the transport.
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Query a key's data size and type tag.
    pub fn resolve_key_info(&mut self, key: Key) -> Result<KeyInfo> {
        let output = self.call(&KeyData::key_info_request(key))?;
        let info = output.key_info;
        if info.data_size as usize > ValueBuffer::CAPACITY {
            warn!(%key, data_size = info.data_size, "device reported oversized key");
        }
        Ok(info)
    }

    /// Read a key: key info, then its bytes.
    pub fn read_key(&mut self, key: Key) -> Result<ValueRecord> {
        let info = self.resolve_key_info(key)?;
        let output = self.call(&KeyData::read_request(key, info.data_size))?;
        Ok(ValueRecord {
            key,
            data_type: info.data_type,
            buffer: ValueBuffer::from_payload(output.bytes, info.data_size as usize),
        })
    }

    /// Write a key after checking `value`'s length against the device.
    ///
    /// A fresh read supplies the device's current data size. On mismatch
    /// nothing is written.
    pub fn write_key(&mut self, key: Key, value: &ValueBuffer) -> Result<()> {
        let current = self.read_key(key)?;
        if current.len() != value.len() {
            return Err(SmcError::SizeMismatch {
                key,
                expected: current.len(),
                actual: value.len(),
            });
        }

        self.call(&KeyData::write_request(key, value.as_slice()))?;
        debug!(%key, len = value.len(), "wrote key");
        Ok(())
    }

    /// Encode `text` for the key's type and write it.
    ///
    /// Numbers for integer and fixed-point keys, hex pairs for anything
    /// else. Returns the bytes written.
    pub fn write_value(&mut self, key: Key, text: &str) -> Result<ValueBuffer> {
        let info = self.resolve_key_info(key)?;
        let size = info.data_size as usize;
        let value = encode_str(DataType::resolve(info.data_type, size), size, text)?;
        self.write_key(key, &value)?;
        Ok(value)
    }

    /// Decode a record with this client's decoder settings.
    pub fn decode(&self, record: &ValueRecord) -> Value {
        record.decode(self.config.decode)
    }

    pub(crate) fn call(&mut self, input: &KeyData) -> Result<KeyData> {
        debug!(
            transport = self.transport.transport_name(),
            command = smcprims_wire::command_name(input.data8),
            key = %input.key,
            "SMC request"
        );
        let output = self.transport.call(KERNEL_INDEX_SMC, input)?;
        if is_rejected_write(input, &output) {
            warn!(key = %input.key, result = output.result, "SMC rejected write");
        } else if output.result != RESULT_SUCCESS {
            debug!(key = %input.key, result = output.result, "SMC reported non-zero result");
        }
        Ok(output)
    }
}

/// A WRITE_BYTES call answered with a non-success result byte.
fn is_rejected_write(input: &KeyData, output: &KeyData) -> bool {
    input.data8 == WRITE_BYTES && output.result != RESULT_SUCCESS
}
