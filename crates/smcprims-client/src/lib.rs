//! Key-value access to the System Management Controller.
//!
//! This is the "just works" layer. Open the SMC, read keys as typed values,
//! write keys with a size check against the device, enumerate every key.
//!
//! Every read is two transport calls (key info, then bytes). Every write is
//! three (a full read to learn the device's data size, then the write). All
//! operations take `&mut self`, so a multi-call sequence can never
//! interleave with another call on the same client.

pub mod client;
pub mod enumerate;
pub mod error;
pub mod fans;

pub use client::{open, open_with_config, ClientConfig, SmcClient, ValueRecord};
pub use error::{Result, SmcError};
pub use fans::{FanInfo, FanMode};
