//! Configuration file support
//!
//! Loads segmenter configuration from TOML files.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::SegmenterConfig;
use crate::error::{Result, SegmenterError};

/// Configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Segmenter settings
    #[serde(default)]
    pub segmenter: SegmenterSettings,
    /// Storage settings
    #[serde(default)]
    pub storage: StorageSettings,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmenterSettings {
    /// Codec prefix of the followed video rendition
    pub target_codec: Option<String>,
    /// Name of the generated subtitle playlist
    pub subtitle_playlist_name: Option<String>,
    /// Prefix of the generated WebVTT files
    pub segment_name_prefix: Option<String>,
    /// Suffix of the rewritten master manifest
    pub master_suffix: Option<String>,
    /// Window-relative cue times
    pub relative_timestamps: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Object store root directory
    pub root: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            root: SegmenterConfig::default().storage_root,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: Option<String>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SegmenterError::Config(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| SegmenterError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content =
            toml::to_string_pretty(self).map_err(|e| SegmenterError::Config(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| SegmenterError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        let defaults = SegmenterConfig::default();
        Self {
            segmenter: SegmenterSettings {
                target_codec: Some(defaults.target_codec),
                subtitle_playlist_name: Some(defaults.subtitle_playlist_name),
                segment_name_prefix: Some(defaults.segment_name_prefix),
                master_suffix: Some(defaults.master_suffix),
                relative_timestamps: Some(defaults.relative_timestamps),
            },
            storage: StorageSettings {
                root: defaults.storage_root,
            },
            logging: Some(LoggingSettings {
                level: defaults.log_level,
                format: Some(defaults.log_format),
            }),
        }
    }

    /// Convert to SegmenterConfig
    pub fn into_segmenter_config(self) -> SegmenterConfig {
        let defaults = SegmenterConfig::default();
        let (log_level, log_format) = match self.logging {
            Some(l) => (l.level, l.format.unwrap_or(defaults.log_format)),
            None => (defaults.log_level, defaults.log_format),
        };
        SegmenterConfig {
            target_codec: self.segmenter.target_codec.unwrap_or(defaults.target_codec),
            subtitle_playlist_name: self
                .segmenter
                .subtitle_playlist_name
                .unwrap_or(defaults.subtitle_playlist_name),
            segment_name_prefix: self
                .segmenter
                .segment_name_prefix
                .unwrap_or(defaults.segment_name_prefix),
            master_suffix: self.segmenter.master_suffix.unwrap_or(defaults.master_suffix),
            relative_timestamps: self
                .segmenter
                .relative_timestamps
                .unwrap_or(defaults.relative_timestamps),
            storage_root: self.storage.root,
            log_level,
            log_format,
        }
    }
}

/// Load the configuration at `path`.
///
/// A file that was explicitly requested must load. Otherwise a missing file
/// means defaults and a broken one is reported and ignored.
pub fn load_config<P: AsRef<Path>>(path: P, explicit: bool) -> Result<SegmenterConfig> {
    let path = path.as_ref();
    if !path.exists() {
        if explicit {
            return Err(SegmenterError::Config(format!(
                "config file {} does not exist",
                path.display()
            )));
        }
        return Ok(SegmenterConfig::default());
    }

    match ConfigFile::from_file(path) {
        Ok(cf) => Ok(cf.into_segmenter_config()),
        Err(e) => {
            tracing::warn!(
                "Failed to load config file {}: {}. Using defaults.",
                path.display(),
                e
            );
            Ok(SegmenterConfig::default())
        }
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let config = ConfigFile::default_config();
    config.to_file(path)?;
    Ok(())
}
