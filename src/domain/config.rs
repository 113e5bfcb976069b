//! Runtime configuration
//!
//! Read once at startup from environment variables; defaults match the
//! values the bridge has always shipped with.

use serde::{Deserialize, Serialize};

use super::{CatError, CatResult};

/// Bridge configuration: which port to poll and where to serve HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Serial port name (e.g. "COM21", "/dev/ttyUSB0")
    pub serial_port: String,
    /// Serial baud rate
    pub baud_rate: u32,
    /// HTTP listen address
    pub bind_addr: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            serial_port: "COM21".to_string(),
            baud_rate: 38400,
            bind_addr: "0.0.0.0:5000".to_string(),
        }
    }
}

impl BridgeConfig {
    /// Build a config from `CATBRIDGE_PORT`, `CATBRIDGE_BAUD` and
    /// `CATBRIDGE_BIND`, falling back to defaults for unset variables.
    pub fn from_env() -> CatResult<Self> {
        let defaults = Self::default();
        let serial_port =
            std::env::var("CATBRIDGE_PORT").unwrap_or(defaults.serial_port);
        let bind_addr =
            std::env::var("CATBRIDGE_BIND").unwrap_or(defaults.bind_addr);
        let baud_rate = match std::env::var("CATBRIDGE_BAUD") {
            Ok(raw) => raw.parse::<u32>().map_err(|e| {
                CatError::Config(format!("bad CATBRIDGE_BAUD '{raw}': {e}"))
            })?,
            Err(_) => defaults.baud_rate,
        };

        Ok(Self {
            serial_port,
            baud_rate,
            bind_addr,
        })
    }
}
