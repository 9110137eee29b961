//! Build outputs as handed over by the bundler.

use std::collections::BTreeMap;

/// All outputs of one build, keyed by asset name.
///
/// Iteration order is the name order, which is also the order of the
/// aggregated text and of the report lines.
pub type BuildOutputMap = BTreeMap<String, OutputAsset>;

/// Payload stored in an asset's `source` slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    /// Stylesheets, html and other text emitted as assets
    Text(String),
    /// Fonts, images and other binary assets
    Binary(Vec<u8>),
}

/// One named build output.
///
/// Chunks carry `code`, emitted files carry `source`. Both are optional and
/// both are checked; which one is populated is what makes an asset text or
/// binary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputAsset {
    pub code: Option<String>,
    pub source: Option<AssetSource>,
}

impl OutputAsset {
    /// A script chunk.
    pub fn chunk(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            source: None,
        }
    }

    /// An emitted text file.
    pub fn text(source: impl Into<String>) -> Self {
        Self {
            code: None,
            source: Some(AssetSource::Text(source.into())),
        }
    }

    /// An emitted binary file.
    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            code: None,
            source: Some(AssetSource::Binary(bytes.into())),
        }
    }

    /// Textual `source`, if any.
    pub fn source_text(&self) -> Option<&str> {
        match &self.source {
            Some(AssetSource::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Binary `source`, if any.
    pub fn source_bytes(&self) -> Option<&[u8]> {
        match &self.source {
            Some(AssetSource::Binary(bytes)) => Some(bytes),
            _ => None,
        }
    }

    /// Replace the `source` slot with new bytes.
    pub fn replace_bytes(&mut self, bytes: Vec<u8>) {
        self.source = Some(AssetSource::Binary(bytes));
    }
}
