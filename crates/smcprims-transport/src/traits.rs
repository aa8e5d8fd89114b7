use smcprims_wire::KeyData;

use crate::error::Result;

/// A synchronous SMC call primitive.
///
/// One call sends one full input record to the method at `selector` and
/// returns one full output record. Calls are never retried; any non-success
/// status surfaces as [`TransportError::Call`](crate::TransportError::Call).
pub trait SmcTransport {
    /// Exchange one record with the device.
    fn call(&mut self, selector: u32, input: &KeyData) -> Result<KeyData>;

    /// Transport name for diagnostics.
    fn transport_name(&self) -> &'static str;
}

impl<T: SmcTransport + ?Sized> SmcTransport for &mut T {
    fn call(&mut self, selector: u32, input: &KeyData) -> Result<KeyData> {
        (**self).call(selector, input)
    }

    fn transport_name(&self) -> &'static str {
        (**self).transport_name()
    }
}

impl<T: SmcTransport + ?Sized> SmcTransport for Box<T> {
    fn call(&mut self, selector: u32, input: &KeyData) -> Result<KeyData> {
        (**self).call(selector, input)
    }

    fn transport_name(&self) -> &'static str {
        (**self).transport_name()
    }
}
