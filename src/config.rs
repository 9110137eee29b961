//! Pipeline options.
//!
//! Keys are camelCase so options written for the bundler plugin
//! (`reserveText`) deserialize unchanged.

use serde::{Deserialize, Serialize};

/// Serializable part of the pipeline configuration.
///
/// The text filter is attached separately via [`crate::Fontmin::filter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FontminConfig {
    /// Text that is always kept, whatever the build contains
    pub reserve_text: String,
    /// Subset fonts on the rayon pool instead of one after another
    pub parallel: bool,
}

impl Default for FontminConfig {
    fn default() -> Self {
        Self {
            reserve_text: String::new(),
            parallel: true,
        }
    }
}

impl FontminConfig {
    /// Config that always keeps `text`.
    pub fn with_reserve_text(text: impl Into<String>) -> Self {
        Self {
            reserve_text: text.into(),
            ..Self::default()
        }
    }

    /// Parse from TOML. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid fontmin config: {0}")]
    Parse(#[from] toml::de::Error),
}
