//! SMC command selectors.
//!
//! The command byte travels in [`KeyData::data8`](crate::KeyData). The values
//! are fixed by the driver and must not change.

/// Kernel method index for every SMC struct call.
pub const KERNEL_INDEX_SMC: u32 = 2;

/// Fetch the payload bytes of a key.
pub const READ_BYTES: u8 = 5;

/// Write the payload bytes of a key.
pub const WRITE_BYTES: u8 = 6;

/// Resolve the key stored at a position (`data32` carries the index).
pub const READ_INDEX: u8 = 8;

/// Query a key's data size and type tag.
pub const READ_KEYINFO: u8 = 9;

/// Read the power-limit block.
pub const READ_PLIMIT: u8 = 11;

/// Read the firmware version block.
pub const READ_VERS: u8 = 12;

/// `result` byte: the command completed.
pub const RESULT_SUCCESS: u8 = 0;

/// `result` byte: generic failure (e.g. a write with the wrong data size).
pub const RESULT_ERROR: u8 = 1;

/// `result` byte: the key does not exist.
pub const RESULT_KEY_NOT_FOUND: u8 = 132;

/// Returns a human-readable name for a command byte.
pub fn command_name(command: u8) -> &'static str {
    match command {
        READ_BYTES => "READ_BYTES",
        WRITE_BYTES => "WRITE_BYTES",
        READ_INDEX => "READ_INDEX",
        READ_KEYINFO => "READ_KEYINFO",
        READ_PLIMIT => "READ_PLIMIT",
        READ_VERS => "READ_VERS",
        _ => "UNKNOWN",
    }
}
