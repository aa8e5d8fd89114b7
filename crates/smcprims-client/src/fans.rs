use std::fmt;

use smcprims_codec::{decode_fixed_point, decode_unsigned, ValueBuffer};
use smcprims_transport::SmcTransport;
use smcprims_wire::Key;
use tracing::debug;

use crate::client::SmcClient;
use crate::error::Result;

/// Fractional bits of the fan speed keys (`fpe2`).
const FAN_SPEED_FRAC_BITS: u8 = 2;

/// Whether a fan follows the SMC's own control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanMode {
    Auto,
    Forced,
}

impl fmt::Display for FanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FanMode::Auto => f.write_str("auto"),
            FanMode::Forced => f.write_str("forced"),
        }
    }
}

/// Speeds (rpm) and mode of one fan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FanInfo {
    pub index: u32,
    pub actual: f64,
    pub minimum: f64,
    pub maximum: f64,
    pub safe: f64,
    pub target: f64,
    /// `None` if the force mask could not be read.
    pub mode: Option<FanMode>,
}

impl<T: SmcTransport> SmcClient<T> {
    /// Number of fans, read from `FNum`.
    pub fn fan_count(&mut self) -> Result<u32> {
        let record = self.read_key(Key::FAN_COUNT)?;
        Ok(decode_unsigned(&record.buffer)?)
    }

    /// Report every fan.
    pub fn fans(&mut self) -> Result<Vec<FanInfo>> {
        let count = self.fan_count()?;
        let mask = self.force_mask();
        (0..count).map(|i| self.fan_with_mask(i, mask)).collect()
    }

    /// Report one fan.
    pub fn fan(&mut self, index: u32) -> Result<FanInfo> {
        let mask = self.force_mask();
        self.fan_with_mask(index, mask)
    }

    fn fan_with_mask(&mut self, index: u32, mask: Option<u32>) -> Result<FanInfo> {
        Ok(FanInfo {
            index,
            actual: self.fan_speed(index, "Ac")?,
            minimum: self.fan_speed(index, "Mn")?,
            maximum: self.fan_speed(index, "Mx")?,
            safe: self.fan_speed(index, "Sf")?,
            target: self.fan_speed(index, "Tg")?,
            mode: mask.map(|m| {
                if index < 32 && m & (1 << index) != 0 {
                    FanMode::Forced
                } else {
                    FanMode::Auto
                }
            }),
        })
    }

    fn fan_speed(&mut self, index: u32, suffix: &str) -> Result<f64> {
        let key: Key = format!("F{index}{suffix}").parse()?;
        let record = self.read_key(key)?;
        if record.is_empty() {
            // Not every model has every speed key; absent ones read as zero.
            debug!(%key, "fan speed key absent");
            return Ok(0.0);
        }
        Ok(decode_fixed_point(
            &record.buffer,
            FAN_SPEED_FRAC_BITS,
            self.config().decode.fixed_point,
        )?)
    }

    /// The first two bytes of `FS! ` as a bitmask, one bit per fan.
    fn force_mask(&mut self) -> Option<u32> {
        let record = match self.read_key(Key::FAN_FORCE) {
            Ok(record) => record,
            Err(err) => {
                debug!(error = %err, "fan force mask unavailable");
                return None;
            }
        };
        if record.is_empty() {
            debug!("fan force mask key absent");
            return None;
        }
        let head = ValueBuffer::from_payload(*record.buffer.payload(), record.len().min(2));
        decode_unsigned(&head).ok()
    }
}
