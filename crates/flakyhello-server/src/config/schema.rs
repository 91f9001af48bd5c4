use std::net::SocketAddr;

use flakyhello_core::error::{HelloError, Result};
use serde::Deserialize;

use super::LISTEN_ADDR;

/// The file only pins the schema version; the listen address is fixed.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub version: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { version: 1 }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(HelloError::UnsupportedVersion);
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> SocketAddr {
        LISTEN_ADDR
    }
}
