//! Local threshold cache adapters.
//!
//! Implement [`ConfigPort`] so the service can start from the last known
//! thresholds before the database delivers its first snapshot.
//!
//! Both backends store the config as a `postcard` blob and range-check it
//! before persisting.  An absent cache loads as [`ControlConfig::default()`];
//! an unreadable one is [`ConfigError::Corrupted`].

use std::cell::RefCell;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::ControlConfig;

fn validate(config: &ControlConfig) -> Result<(), ConfigError> {
    config.validate().map_err(ConfigError::ValidationFailed)
}

fn decode(bytes: &[u8]) -> Result<ControlConfig, ConfigError> {
    postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)
}

fn encode(config: &ControlConfig) -> Result<Vec<u8>, ConfigError> {
    postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)
}

// ── In-memory ─────────────────────────────────────────────────

/// Process-local cache (tests and one-shot runs).
#[derive(Debug, Default)]
pub struct MemoryConfigCache {
    blob: RefCell<Option<Vec<u8>>>,
}

impl MemoryConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the raw blob, bypassing validation.
    pub fn put_raw(&self, bytes: Vec<u8>) {
        *self.blob.borrow_mut() = Some(bytes);
    }
}

impl ConfigPort for MemoryConfigCache {
    fn load(&self) -> Result<ControlConfig, ConfigError> {
        match self.blob.borrow().as_deref() {
            Some(bytes) => decode(bytes),
            None => {
                info!("MemoryConfigCache: nothing cached, using defaults");
                Ok(ControlConfig::default())
            }
        }
    }

    fn save(&self, config: &ControlConfig) -> Result<(), ConfigError> {
        validate(config)?;
        *self.blob.borrow_mut() = Some(encode(config)?);
        Ok(())
    }
}

// ── File-backed ───────────────────────────────────────────────

/// Cache kept in a single file.
#[derive(Debug, Clone)]
pub struct FileConfigCache {
    path: PathBuf,
}

impl FileConfigCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for FileConfigCache {
    fn load(&self) -> Result<ControlConfig, ConfigError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => {
                let cfg = decode(&bytes)?;
                info!(
                    "FileConfigCache: loaded {} ({} bytes)",
                    self.path.display(),
                    bytes.len()
                );
                Ok(cfg)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("FileConfigCache: no cache at {}, using defaults", self.path.display());
                Ok(ControlConfig::default())
            }
            Err(e) => {
                warn!("FileConfigCache: read {} failed: {}", self.path.display(), e);
                Err(ConfigError::IoError)
            }
        }
    }

    fn save(&self, config: &ControlConfig) -> Result<(), ConfigError> {
        validate(config)?;
        let bytes = encode(config)?;
        std::fs::write(&self.path, &bytes).map_err(|e| {
            warn!("FileConfigCache: write {} failed: {}", self.path.display(), e);
            ConfigError::IoError
        })
    }
}
