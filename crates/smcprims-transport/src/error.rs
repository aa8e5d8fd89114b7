use smcprims_wire::WireError;

/// Raw kernel status code (`kern_return_t`).
pub type KernReturn = i32;

/// Errors that can occur in SMC transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No SMC service was found.
    #[error("no SMC found")]
    DeviceNotFound,

    /// The SMC service exists but could not be opened.
    #[error("failed to open SMC service: {0:08x}")]
    OpenFailed(KernReturn),

    /// The driver rejected a struct call.
    #[error("SMC call failed: {0:08x}")]
    Call(KernReturn),

    /// The driver returned a malformed record.
    #[error("malformed SMC record: {0}")]
    Wire(#[from] WireError),
}

impl TransportError {
    /// The raw kernel code carried by this error, if any.
    pub fn code(&self) -> Option<KernReturn> {
        match self {
            TransportError::OpenFailed(code) | TransportError::Call(code) => Some(*code),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_error_prints_code_as_hex() {
        let err = TransportError::Call(0xe00002c2_u32 as KernReturn);
        assert_eq!(err.to_string(), "SMC call failed: e00002c2");
        assert_eq!(err.code(), Some(0xe00002c2_u32 as KernReturn));
    }

    #[test]
    fn device_not_found_has_no_code() {
        assert_eq!(TransportError::DeviceNotFound.code(), None);
    }
}
