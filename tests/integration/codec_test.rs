//! Codec seam: custom backends and the EOT container.

use super::helpers::{expected_glyphs, fake_font, glyph_names, outputs, Collector, FakeCodec};
use fontmin::codec::eot::EotContainer;
use fontmin::{CodecError, FontFormat, Fontmin, FontminConfig, GlyphSubsetter, OutputAsset};

/// Wraps a fake sfnt in a minimal EOT header.
fn fake_eot(sfnt: &[u8]) -> Vec<u8> {
    let header_len = 96;
    let mut bytes = vec![0u8; header_len];
    bytes[0..4].copy_from_slice(&((header_len + sfnt.len()) as u32).to_le_bytes());
    bytes[4..8].copy_from_slice(&(sfnt.len() as u32).to_le_bytes());
    bytes[8..12].copy_from_slice(&0x0002_0001u32.to_le_bytes());
    bytes[34..36].copy_from_slice(&0x504Cu16.to_le_bytes());
    bytes.extend_from_slice(sfnt);
    bytes
}

/// Unwraps EOT around the fake codec, the way the native backend does.
struct EotAware(FakeCodec);

impl GlyphSubsetter for EotAware {
    fn name(&self) -> &'static str {
        "eot-aware"
    }

    fn supports(&self, format: FontFormat) -> bool {
        format == FontFormat::Eot
    }

    fn subset(&self, font: &[u8], text: &str, format: FontFormat) -> Result<Vec<u8>, CodecError> {
        if format != FontFormat::Eot {
            return Err(CodecError::Unsupported(format));
        }
        let container = EotContainer::parse(font)?;
        let subset = self.0.subset(&container.font_data(), text, FontFormat::Ttf)?;
        container.rewrap(&subset)
    }
}

#[test]
fn eot_fonts_are_rewrapped_after_subsetting() {
    let fontmin = Fontmin::with_codec(
        FontminConfig::with_reserve_text("hi"),
        Box::new(EotAware(FakeCodec::default())),
    );
    let original = fake_eot(&fake_font("abcdefghij"));
    let mut build = outputs(vec![("legacy.eot", OutputAsset::binary(original.clone()))]);

    let report = fontmin.run(&mut build, &Collector::default());
    assert_eq!(report.subsetted(), 1);

    let out = build["legacy.eot"].source_bytes().unwrap();
    assert!(out.len() < original.len());
    assert_eq!(&out[8..96], &original[8..96]);

    let sfnt = EotContainer::parse(out).unwrap().font_data();
    assert_eq!(glyph_names(&sfnt), expected_glyphs("hi"));
}

#[test]
fn declined_formats_are_skipped_and_backend_errors_fail() {
    let fontmin = Fontmin::with_codec(
        FontminConfig::default(),
        Box::new(EotAware(FakeCodec::default())),
    );
    let mut build = outputs(vec![
        ("a.ttf", OutputAsset::binary(fake_font("abc"))),
        ("b.eot", OutputAsset::binary(vec![0u8; 12])),
    ]);
    let before = build.clone();
    let diagnostics = Collector::default();

    let report = fontmin.run(&mut build, &diagnostics);

    assert_eq!(build, before);
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.failed(), 1);
    assert_eq!(
        diagnostics.lines(),
        vec![
            "[skip] a.ttf: ttf fonts are not supported, keeping the original".to_string(),
            "b.eot: Malformed eot container: file shorter than the EOT header".to_string(),
        ]
    );
}

#[cfg(feature = "native")]
mod native {
    use super::fake_eot;
    use crate::helpers::{outputs, Collector};
    use fontmin::codec::eot::EotContainer;
    use fontmin::{CodecError, FontFormat, Fontmin, FontminConfig, GlyphSubsetter, NativeCodec, OutputAsset};
    use hb_subset::{Blob, FontFace};

    const ASCII_TTF: &[u8] = include_bytes!("../fixtures/ascii.ttf");

    fn covers(sfnt: &[u8], text: &str) -> bool {
        let face = FontFace::new(Blob::from_bytes(sfnt).unwrap()).unwrap();
        let codepoints = face.covered_codepoints().unwrap();
        text.chars().all(|c| codepoints.contains(c))
    }

    #[test]
    fn native_codec_skips_nothing_but_otf() {
        let codec = NativeCodec::new();
        assert_eq!(codec.name(), "harfbuzz");
        assert!(codec.supports(FontFormat::Woff2));
        assert!(!codec.supports(FontFormat::Otf));
    }

    #[test]
    fn native_codec_rejects_foreign_woff2() {
        let err = NativeCodec::new()
            .subset(b"wOFFxxxx", "a", FontFormat::Woff2)
            .unwrap_err();
        assert!(matches!(err, CodecError::Container { format: FontFormat::Woff2, .. }));
    }

    #[test]
    fn default_pipeline_shrinks_real_fonts() {
        let fontmin = Fontmin::new(FontminConfig::with_reserve_text("0"));
        let mut build = outputs(vec![
            ("app.js", OutputAsset::chunk("hello")),
            ("font.ttf", OutputAsset::binary(ASCII_TTF.to_vec())),
            ("legacy.eot", OutputAsset::binary(fake_eot(ASCII_TTF))),
        ]);

        let report = fontmin.run(&mut build, &Collector::default());
        assert_eq!(report.subsetted(), 2);

        let ttf = build["font.ttf"].source_bytes().unwrap();
        assert!(ttf.len() < ASCII_TTF.len());
        assert!(covers(ttf, "helo0"));
        assert!(!covers(ttf, "z"));

        let eot = build["legacy.eot"].source_bytes().unwrap();
        let sfnt = EotContainer::parse(eot).unwrap().font_data();
        assert!(covers(&sfnt, "helo0"));
        assert!(!covers(&sfnt, "z"));
    }
}
