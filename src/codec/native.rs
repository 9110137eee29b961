//! HarfBuzz-backed subsetting for ttf, woff, woff2 and eot.

use super::eot::EotContainer;
use super::woff;
use super::{CodecError, GlyphSubsetter};
use crate::classify::FontFormat;
use hb_subset::{Blob, FontFace, SubsetInput};
use std::collections::BTreeSet;

/// Default backend: unwraps the container, subsets the sfnt with HarfBuzz,
/// and wraps the result in the original container again.
///
/// Characters are passed to HarfBuzz as a sorted set, so the output only
/// depends on which characters the text contains. Hinting instructions are
/// dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCodec;

impl NativeCodec {
    /// Create a new native codec.
    pub fn new() -> Self {
        Self
    }
}

impl GlyphSubsetter for NativeCodec {
    fn name(&self) -> &'static str {
        "harfbuzz"
    }

    fn supports(&self, format: FontFormat) -> bool {
        matches!(
            format,
            FontFormat::Ttf | FontFormat::Woff | FontFormat::Woff2 | FontFormat::Eot
        )
    }

    fn subset(&self, font: &[u8], text: &str, format: FontFormat) -> Result<Vec<u8>, CodecError> {
        let chars: BTreeSet<char> = text.chars().collect();

        match format {
            FontFormat::Ttf => subset_sfnt(font, &chars),
            FontFormat::Woff => {
                let (sfnt, version) = woff::unwrap_woff(font)?;
                woff::wrap_woff(&subset_sfnt(&sfnt, &chars)?, version)
            }
            FontFormat::Woff2 => {
                let sfnt = woff::unwrap_woff2(font)?;
                woff::wrap_woff2(&subset_sfnt(&sfnt, &chars)?)
            }
            FontFormat::Eot => {
                let container = EotContainer::parse(font)?;
                container.rewrap(&subset_sfnt(&container.font_data(), &chars)?)
            }
            FontFormat::Otf | FontFormat::Unknown => Err(CodecError::Unsupported(format)),
        }
    }
}

fn subset_sfnt(sfnt: &[u8], chars: &BTreeSet<char>) -> Result<Vec<u8>, CodecError> {
    let mut input = SubsetInput::new().map_err(subset_error)?;
    input.flags().remove_hinting();
    {
        let mut unicodes = input.unicode_set();
        for &c in chars {
            unicodes.insert(c);
        }
    }

    let face = FontFace::new(Blob::from_bytes(sfnt).map_err(subset_error)?).map_err(subset_error)?;
    let subset = input.subset_font(&face).map_err(subset_error)?;
    Ok(subset.underlying_blob().to_vec())
}

fn subset_error(error: impl std::fmt::Display) -> CodecError {
    CodecError::Subset(error.to_string())
}
