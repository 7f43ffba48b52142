//! Decoder configuration.
//!
//! ```
//! use rolebak::config::{self, ChecksumPolicy};
//!
//! let opts = config::load_from_str(r#"{ "checksum": "enforce" }"#)?;
//! assert_eq!(opts.checksum, ChecksumPolicy::Enforce);
//! assert!(opts.realign_extensions);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// What to do when the stored and computed checksums disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecksumPolicy {
    /// Expose both values and keep going.
    #[default]
    Report,
    /// Report the mismatch as the outcome's failure.
    Enforce,
}

/// Options for [`crate::RoleDecoder`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeOptions {
    pub checksum:           ChecksumPolicy,
    /// Jump to `ext_buff_offset` when the cursor disagrees with it.
    pub realign_extensions: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            checksum:           ChecksumPolicy::Report,
            realign_extensions: true,
        }
    }
}

impl DecodeOptions {
    pub fn strict() -> Self {
        Self { checksum: ChecksumPolicy::Enforce, ..Self::default() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("read config failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

pub fn load_from_str(s: &str) -> Result<DecodeOptions, ConfigError> {
    Ok(serde_json::from_str(s)?)
}

pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<DecodeOptions, ConfigError> {
    load_from_str(&fs::read_to_string(path)?)
}
