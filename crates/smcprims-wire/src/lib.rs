//! Wire-level types for talking to the System Management Controller.
//!
//! Every exchange with the SMC driver is one fixed-size [`KeyData`] record in
//! and one out. A record carries:
//! - the target key, packed big-endian into a 32-bit field
//! - a command byte selecting the sub-operation
//! - a key-info sub-record (data size + type tag)
//! - a 32-byte payload
//!
//! Nothing here performs I/O. See `smcprims-transport` for the call primitive.

pub mod command;
pub mod error;
pub mod fourcc;
pub mod record;

pub use command::{
    command_name, KERNEL_INDEX_SMC, READ_BYTES, READ_INDEX, READ_KEYINFO, READ_PLIMIT, READ_VERS,
    RESULT_ERROR, RESULT_KEY_NOT_FOUND, RESULT_SUCCESS, WRITE_BYTES,
};
pub use error::{Result, WireError};
pub use fourcc::{Key, TypeTag};
pub use record::{KeyData, KeyInfo, PLimitData, Version, PAYLOAD_SIZE, RECORD_SIZE};
