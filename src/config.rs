//! Configuration
//!
//! Deployment configuration for the tree engine: segment width, logging,
//! and storage location. Loaded from an optional TOML file with
//! `MATPATH_`-prefixed environment variable overrides layered on top.
//!
//! The segment width is part of the data format: every stored path is
//! interpreted at `width`-character boundaries. It must be chosen before
//! any data exists and never changed afterwards.

use crate::error::TreeError;
use crate::logging::LoggingConfig;
use crate::tree::codec::{PathCodec, DEFAULT_SEGMENT_WIDTH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fixed path segment width. Frozen once data exists.
    #[serde(default = "default_segment_width")]
    pub segment_width: usize,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Storage settings for the bundled store.
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Location of the bundled sled database.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

fn default_segment_width() -> usize {
    DEFAULT_SEGMENT_WIDTH
}

fn default_db_path() -> PathBuf {
    PathBuf::from(".matpath/nodes.db")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            segment_width: default_segment_width(),
            logging: LoggingConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from an optional file plus environment overrides
    /// (`MATPATH_SEGMENT_WIDTH`, `MATPATH_LOGGING__LEVEL`, ...).
    pub fn load(file: Option<&Path>) -> Result<Self, TreeError> {
        let mut builder = config::Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(config::File::from(file.to_path_buf()));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("MATPATH")
                .separator("__")
                .try_parsing(true),
        );

        let cfg: EngineConfig = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate the configured values.
    pub fn validate(&self) -> Result<(), TreeError> {
        PathCodec::new(self.segment_width)?;
        Ok(())
    }

    /// Build the deployment codec from the configured width.
    pub fn codec(&self) -> Result<PathCodec, TreeError> {
        PathCodec::new(self.segment_width)
    }
}
