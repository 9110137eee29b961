//! Font subsetting for bundled web builds.
//!
//! A bundler hands over its output map once per build. The pipeline collects
//! every character used by the non-font outputs (scripts, styles), optionally
//! filters that text, and rewrites each embedded font so it only carries the
//! glyphs needed to render it.
//!
//! # Module Structure
//!
//! - [`asset`] - Output map and asset payloads
//! - [`classify`] - Font detection by file extension
//! - [`size`] - Size display used in report lines
//! - [`corpus`] - Text aggregation and the user filter hook
//! - [`codec`] - The glyph subsetting capability and its backends
//! - [`dispatch`] - Per-font jobs and outcomes
//! - [`pipeline`] - Build orchestration
//! - [`report`] - Per-asset results and the diagnostics channel
//! - [`config`] - Serializable pipeline options

pub mod asset;
pub mod classify;
pub mod codec;
pub mod config;
pub mod corpus;
pub mod dispatch;
pub mod pipeline;
pub mod report;
pub mod size;

pub use asset::{AssetSource, BuildOutputMap, OutputAsset};
pub use classify::{classify, is_font_file, Classification, FontFormat};
pub use codec::{CodecError, GlyphSubsetter};
pub use config::{ConfigError, FontminConfig};
pub use corpus::{aggregate, TextFilter};
pub use dispatch::{Dispatcher, FontJob, SkipReason, SubsetOutcome};
pub use pipeline::{Fontmin, Stage};
pub use report::{AssetReport, AssetStatus, BuildReport, Diagnostics, TracingDiagnostics};
pub use size::display_size;

#[cfg(feature = "native")]
pub use codec::NativeCodec;
