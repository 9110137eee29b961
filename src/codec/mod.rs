//! Glyph subsetting capability.
//!
//! The pipeline never touches font tables itself. It hands the original
//! bytes and the corpus to a [`GlyphSubsetter`] and gets back a new buffer in
//! the same format, or a typed error.

pub mod eot;
#[cfg(feature = "native")]
mod native;
#[cfg(feature = "native")]
mod woff;

#[cfg(feature = "native")]
pub use native::NativeCodec;

use crate::classify::FontFormat;

/// A backend that can rewrite a font to keep only the glyphs for some text.
///
/// Implementations must not mutate `font` and must return a buffer in the
/// same `format` they were given.
pub trait GlyphSubsetter: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Whether this backend can rewrite fonts of `format`.
    fn supports(&self, format: FontFormat) -> bool;

    /// Subset `font` to the characters of `text`.
    ///
    /// Only the set of characters matters; order and repetition in `text`
    /// must not change the result.
    fn subset(&self, font: &[u8], text: &str, format: FontFormat) -> Result<Vec<u8>, CodecError>;
}

/// Errors a subsetting backend can report for one font.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("{0} fonts are not supported by this backend")]
    Unsupported(FontFormat),

    #[error("Malformed {format} container: {message}")]
    Container { format: FontFormat, message: String },

    #[error("Glyph subsetting failed: {0}")]
    Subset(String),

    #[error("Subsetting backend panicked: {0}")]
    Panicked(String),
}

impl CodecError {
    /// Shorthand for a container error.
    pub fn container(format: FontFormat, message: impl Into<String>) -> Self {
        Self::Container {
            format,
            message: message.into(),
        }
    }
}
