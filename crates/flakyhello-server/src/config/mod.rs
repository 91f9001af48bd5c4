//! Server config loader (strict parsing).
//!
//! The config file is optional and carries only the schema version. The
//! server always listens on `0.0.0.0:8080`.

pub mod schema;

use std::fs;
use std::io::ErrorKind;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::Path;

use flakyhello_core::error::{HelloError, Result};

pub use schema::ServerConfig;

/// Fixed listen address.
pub const LISTEN_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8080);

/// Config file looked up in the working directory by the binary.
pub const DEFAULT_CONFIG_PATH: &str = "flakyhello.yaml";

pub fn load_from_file(path: impl AsRef<Path>) -> Result<ServerConfig> {
    let s = fs::read_to_string(path.as_ref())
        .map_err(|e| HelloError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServerConfig> {
    let cfg: ServerConfig = serde_yaml::from_str(s)
        .map_err(|e| HelloError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load `path` if it exists, otherwise fall back to defaults.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<ServerConfig> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(s) => load_from_str(&s),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(ServerConfig::default()),
        Err(e) => Err(HelloError::Internal(format!(
            "read config failed ({}): {e}",
            path.display()
        ))),
    }
}
