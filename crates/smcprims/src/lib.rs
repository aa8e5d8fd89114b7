//! Read and write System Management Controller keys.
//!
//! smcprims talks to the SMC through its IOKit user client: resolve a key's
//! type and size, read its bytes, decode them, write verified replacements,
//! and enumerate every key on the device.
//!
//! # Crate Structure
//!
//! - [`wire`]: Four-character codes, command constants, the 80-byte key-data record
//! - [`transport`]: The synchronous call primitive (IOKit, in-memory device)
//! - [`codec`]: Value buffer, data types, unsigned/fixed-point/hex codecs
//! - [`client`]: Key info, read, verified write, enumeration, fan report

/// Re-export wire types.
pub mod wire {
    pub use smcprims_wire::*;
}

/// Re-export transport types.
pub mod transport {
    pub use smcprims_transport::*;
}

/// Re-export codec types.
pub mod codec {
    pub use smcprims_codec::*;
}

/// Re-export client types.
pub mod client {
    pub use smcprims_client::*;
}

pub use smcprims_client::{open, open_with_config, ClientConfig, SmcClient, SmcError, ValueRecord};
pub use smcprims_codec::{DecodeOptions, FixedPointMode, Value, ValueBuffer};
pub use smcprims_wire::{Key, TypeTag};
