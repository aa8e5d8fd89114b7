//! SMC transport abstraction.
//!
//! Provides a single synchronous call primitive: submit one
//! [`KeyData`](smcprims_wire::KeyData) record to a kernel method index and
//! receive one back.
//! - [`SmcConnection`] talks to the `AppleSMC` IOKit service (macOS)
//! - [`MemoryDevice`] answers from an in-memory key table
//!
//! This is the lowest I/O layer of smcprims. Everything else builds on the
//! [`SmcTransport`] trait provided here.

pub mod connection;
pub mod error;
pub mod memory;
pub mod traits;

#[cfg(target_os = "macos")]
mod iokit;

pub use connection::SmcConnection;
pub use error::{KernReturn, Result, TransportError};
pub use memory::{CallRecord, MemoryDevice};
pub use traits::SmcTransport;
