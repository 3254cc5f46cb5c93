//! # Configuration Utilities
//!
//! Configuration structures for the stego-vault service and the generic
//! TOML loader used to read them. Every field has a default, so an empty
//! file (or no file at all) gives a working service.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::processing::steganography::{CapacityPolicy, EmbedOptions};

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: ServiceConfig = load_config("config/server.toml")?;
/// ```
pub fn load_config<T>(path: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read config file {path}"))?;
    let config: T =
        toml::from_str(&content).with_context(|| format!("failed to parse config file {path}"))?;
    Ok(config)
}

/// Complete service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP listener settings
    pub server: ServerSection,
    /// Embedding behaviour
    pub stego: StegoSection,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Address to bind (e.g., "0.0.0.0:8080")
    pub address: String,
    /// Largest accepted request body in bytes
    pub max_upload_bytes: usize,
    /// Directory served for any path not matched by the API (e.g., a built frontend)
    pub static_dir: Option<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            address: "0.0.0.0:8080".to_string(),
            max_upload_bytes: 32 * 1024 * 1024,
            static_dir: None,
        }
    }
}

/// Embedding behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StegoSection {
    /// `truncate` drops bits that do not fit, `reject` refuses the request
    pub capacity_policy: CapacityPolicy,
    /// Append the legacy `:::STEGO_END:::` marker after the content
    pub end_marker: bool,
    /// Payload name used for `secret_text` uploads
    pub default_secret_name: String,
}

impl Default for StegoSection {
    fn default() -> Self {
        Self {
            capacity_policy: CapacityPolicy::Truncate,
            end_marker: false,
            default_secret_name: "secret.txt".to_string(),
        }
    }
}

impl StegoSection {
    pub fn embed_options(&self) -> EmbedOptions {
        EmbedOptions {
            capacity_policy: self.capacity_policy,
            end_marker: self.end_marker,
        }
    }
}
