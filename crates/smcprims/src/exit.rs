use std::fmt;

use smcprims::client::SmcError;
use smcprims::transport::TransportError;

// Exit code constants; usage errors exit 2 through clap.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const DATA_INVALID: i32 = 60;
pub const UNAVAILABLE: i32 = 69;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::DeviceNotFound | TransportError::OpenFailed(_) => {
            CliError::new(UNAVAILABLE, format!("{context}: {err}"))
        }
        TransportError::Wire(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn smc_error(context: &str, err: SmcError) -> CliError {
    match err {
        SmcError::Transport(err) => transport_error(context, err),
        SmcError::SizeMismatch { .. } | SmcError::Codec(_) | SmcError::Wire(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use smcprims::codec::CodecError;
    use smcprims::Key;

    use super::*;

    #[test]
    fn missing_device_is_unavailable() {
        let err = smc_error("open failed", SmcError::Transport(TransportError::DeviceNotFound));
        assert_eq!(err.code, UNAVAILABLE);
        assert!(err.message.starts_with("open failed: "));
    }

    #[test]
    fn call_failure_is_transport_error() {
        let err = transport_error("read failed", TransportError::Call(0x0bad));
        assert_eq!(err.code, TRANSPORT_ERROR);
        assert!(err.message.contains("00000bad"));
    }

    #[test]
    fn size_mismatch_and_codec_errors_are_invalid_data() {
        let mismatch = SmcError::SizeMismatch {
            key: Key::FAN_COUNT,
            expected: 1,
            actual: 2,
        };
        assert_eq!(smc_error("write failed", mismatch).code, DATA_INVALID);

        let codec = SmcError::Codec(CodecError::OddHexLength { len: 3 });
        assert_eq!(smc_error("write failed", codec).code, DATA_INVALID);
    }
}
