//! Font detection by file extension.

use serde::Serialize;
use std::fmt;

/// Binary font formats recognized by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFormat {
    Ttf,
    Woff,
    Woff2,
    Eot,
    Otf,
    Unknown,
}

impl FontFormat {
    /// Lowercase extension for display/logging.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Ttf => "ttf",
            Self::Woff => "woff",
            Self::Woff2 => "woff2",
            Self::Eot => "eot",
            Self::Otf => "otf",
            Self::Unknown => "unknown",
        }
    }

    fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "ttf" => Self::Ttf,
            "woff" => Self::Woff,
            "woff2" => Self::Woff2,
            "eot" => Self::Eot,
            "otf" => Self::Otf,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for FontFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Result of classifying an asset name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub is_font: bool,
    pub format: FontFormat,
}

/// Classify an asset by the suffix after its last `.`, ignoring case.
///
/// Only `ttf`, `woff`, `woff2`, `otf` and `eot` are fonts. Payload content
/// is never inspected.
pub fn classify(name: &str) -> Classification {
    let format = name
        .rsplit_once('.')
        .map(|(_, ext)| FontFormat::from_extension(ext))
        .unwrap_or(FontFormat::Unknown);

    Classification {
        is_font: format != FontFormat::Unknown,
        format,
    }
}

/// Shorthand for `classify(name).is_font`.
pub fn is_font_file(name: &str) -> bool {
    classify(name).is_font
}
