//! Shared fixtures: a fake font format and codecs that stand in for HarfBuzz.
//!
//! A fake font is `FAKE` followed by the UTF-8 characters it has glyphs for,
//! with `\0` standing for `.notdef`. Subsetting keeps `.notdef` plus every
//! character of the corpus the font covers, in sorted order.

use fontmin::{
    BuildOutputMap, CodecError, Diagnostics, FontFormat, FontminConfig, Fontmin, GlyphSubsetter,
    OutputAsset,
};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

const MAGIC: &[u8] = b"FAKE";

/// Build a fake font covering `chars` (plus `.notdef`).
pub fn fake_font(chars: &str) -> Vec<u8> {
    let mut bytes = MAGIC.to_vec();
    bytes.push(0);
    bytes.extend_from_slice(chars.as_bytes());
    bytes
}

/// Glyph names contained in a fake font.
pub fn glyph_names(font: &[u8]) -> BTreeSet<String> {
    let body = std::str::from_utf8(&font[MAGIC.len()..]).expect("fake fonts are UTF-8");
    body.chars()
        .map(|c| {
            if c == '\0' {
                ".notdef".to_string()
            } else {
                c.to_string()
            }
        })
        .collect()
}

/// `.notdef` plus every character of `text`.
pub fn expected_glyphs(text: &str) -> BTreeSet<String> {
    std::iter::once(".notdef".to_string())
        .chain(text.chars().map(|c| c.to_string()))
        .collect()
}

/// Subsets fake fonts and records every corpus it receives.
#[derive(Default, Clone)]
pub struct FakeCodec {
    pub corpora: Arc<Mutex<Vec<String>>>,
}

impl FakeCodec {
    pub fn corpora(&self) -> Vec<String> {
        self.corpora.lock().unwrap().clone()
    }
}

impl GlyphSubsetter for FakeCodec {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn supports(&self, format: FontFormat) -> bool {
        format != FontFormat::Otf
    }

    fn subset(&self, font: &[u8], text: &str, format: FontFormat) -> Result<Vec<u8>, CodecError> {
        self.corpora.lock().unwrap().push(text.to_string());

        if !font.starts_with(MAGIC) {
            return Err(CodecError::container(format, "not a fake font"));
        }
        let covered: BTreeSet<char> = std::str::from_utf8(&font[MAGIC.len()..])
            .map_err(|e| CodecError::Subset(e.to_string()))?
            .chars()
            .collect();
        let wanted: BTreeSet<char> = text.chars().collect();

        let mut out = fake_font("");
        for c in covered.intersection(&wanted).filter(|c| **c != '\0') {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        }
        Ok(out)
    }
}

/// Panics on every call.
pub struct PanickingCodec;

impl GlyphSubsetter for PanickingCodec {
    fn name(&self) -> &'static str {
        "panicking"
    }

    fn supports(&self, _format: FontFormat) -> bool {
        true
    }

    fn subset(&self, _font: &[u8], _text: &str, _format: FontFormat) -> Result<Vec<u8>, CodecError> {
        panic!("glyf table overflow")
    }
}

/// Diagnostics channel that keeps every line.
#[derive(Default)]
pub struct Collector {
    lines: Mutex<Vec<String>>,
}

impl Collector {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Diagnostics for Collector {
    fn warn(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }
}

/// Pipeline over a fresh [`FakeCodec`], returning both.
pub fn fake_pipeline(config: FontminConfig) -> (Fontmin, FakeCodec) {
    let codec = FakeCodec::default();
    (Fontmin::with_codec(config, Box::new(codec.clone())), codec)
}

/// Output map from `(name, asset)` pairs.
pub fn outputs(entries: Vec<(&str, OutputAsset)>) -> BuildOutputMap {
    entries
        .into_iter()
        .map(|(name, asset)| (name.to_string(), asset))
        .collect()
}

/// A typical build: one script, one stylesheet and a ttf covering a-z.
pub fn sample_build() -> BuildOutputMap {
    outputs(vec![
        ("assets/index.js", OutputAsset::chunk("const msg = 'hey';")),
        ("assets/style.css", OutputAsset::text("body{font-family:x}")),
        (
            "assets/font.ttf",
            OutputAsset::binary(fake_font("abcdefghijklmnopqrstuvwxyz")),
        ),
    ])
}
