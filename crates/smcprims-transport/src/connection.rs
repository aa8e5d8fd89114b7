use std::ffi::CStr;

use smcprims_wire::KeyData;
#[cfg(target_os = "macos")]
use smcprims_wire::RECORD_SIZE;
use tracing::debug;
#[cfg(target_os = "macos")]
use tracing::info;

#[cfg(not(target_os = "macos"))]
use crate::error::TransportError;
use crate::error::Result;
use crate::traits::SmcTransport;

#[cfg(target_os = "macos")]
use crate::iokit;

/// An open connection to the `AppleSMC` service.
///
/// The connection is owned by the caller and closed on `Drop`. On platforms
/// without IOKit, [`SmcConnection::open`] always fails with
/// [`TransportError::DeviceNotFound`].
pub struct SmcConnection {
    #[cfg(target_os = "macos")]
    conn: iokit::io_connect_t,
    #[cfg(not(target_os = "macos"))]
    _unconstructible: (),
}

impl SmcConnection {
    /// IOKit service class of the SMC.
    pub const SERVICE_NAME: &'static CStr = c"AppleSMC";

    /// Locate and open the SMC service.
    #[cfg(target_os = "macos")]
    pub fn open() -> Result<Self> {
        let conn = iokit::open_service(Self::SERVICE_NAME)?;
        info!(service = ?Self::SERVICE_NAME, "opened SMC connection");
        Ok(Self { conn })
    }

    /// Locate and open the SMC service.
    #[cfg(not(target_os = "macos"))]
    pub fn open() -> Result<Self> {
        debug!(
            os = std::env::consts::OS,
            service = ?Self::SERVICE_NAME,
            "IOKit unavailable on this platform"
        );
        Err(TransportError::DeviceNotFound)
    }
}

impl SmcTransport for SmcConnection {
    #[cfg(target_os = "macos")]
    fn call(&mut self, selector: u32, input: &KeyData) -> Result<KeyData> {
        let request = input.to_bytes();
        let mut response = [0u8; RECORD_SIZE];
        debug!(
            selector,
            command = smcprims_wire::command::command_name(input.data8),
            key = %input.key,
            "SMC call"
        );
        iokit::call_struct_method(self.conn, selector, &request, &mut response)?;
        Ok(KeyData::decode(&response)?)
    }

    #[cfg(not(target_os = "macos"))]
    fn call(&mut self, _selector: u32, _input: &KeyData) -> Result<KeyData> {
        Err(TransportError::DeviceNotFound)
    }

    fn transport_name(&self) -> &'static str {
        "iokit"
    }
}

impl Drop for SmcConnection {
    fn drop(&mut self) {
        #[cfg(target_os = "macos")]
        {
            let kr = iokit::close(self.conn);
            info!(code = format_args!("{kr:08x}"), "closed SMC connection");
        }
    }
}

impl std::fmt::Debug for SmcConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmcConnection")
            .field("service", &Self::SERVICE_NAME)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_name_is_apple_smc() {
        assert_eq!(SmcConnection::SERVICE_NAME.to_bytes(), b"AppleSMC");
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn open_reports_device_not_found_without_iokit() {
        assert!(matches!(
            SmcConnection::open(),
            Err(TransportError::DeviceNotFound)
        ));
    }
}
