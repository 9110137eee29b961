//! Per-font subsetting jobs.
//!
//! The dispatcher decides what happens to a single font asset: skip it,
//! or hand it to the codec and capture the result. Whatever the codec does,
//! the input buffer is only borrowed and never written.

use crate::classify::FontFormat;
use crate::codec::{CodecError, GlyphSubsetter};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// One font asset waiting to be subsetted.
#[derive(Debug, Clone, Copy)]
pub struct FontJob<'a> {
    pub name: &'a str,
    pub format: FontFormat,
    /// Original payload; `None` when the asset carries no binary source
    pub source: Option<&'a [u8]>,
    /// Frozen corpus shared by every job of the build
    pub corpus: &'a str,
}

/// Why a font was deliberately left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Format is matched as a font but never rewritten
    UnsupportedFormat(FontFormat),
    /// Asset has no binary payload to work on
    MissingPayload,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat(format) => {
                write!(f, "{} fonts are not supported, keeping the original", format)
            }
            Self::MissingPayload => f.write_str("no binary payload"),
        }
    }
}

/// Terminal state of one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubsetOutcome {
    Subsetted {
        buffer: Vec<u8>,
        original_size: usize,
        new_size: usize,
    },
    Skipped {
        reason: SkipReason,
    },
    Failed {
        name: String,
        error: CodecError,
    },
}

/// Routes font jobs to a codec by format.
pub struct Dispatcher<'c> {
    codec: &'c dyn GlyphSubsetter,
}

impl<'c> Dispatcher<'c> {
    pub fn new(codec: &'c dyn GlyphSubsetter) -> Self {
        Self { codec }
    }

    /// Run one job to completion. Never panics and never fails the caller.
    pub fn subset(&self, job: FontJob<'_>) -> SubsetOutcome {
        let source = match (job.format, job.source) {
            (FontFormat::Otf | FontFormat::Unknown, _) => {
                return SubsetOutcome::Skipped {
                    reason: SkipReason::UnsupportedFormat(job.format),
                };
            }
            (_, None) => {
                return SubsetOutcome::Skipped {
                    reason: SkipReason::MissingPayload,
                };
            }
            (_, Some(source)) => source,
        };

        if !self.codec.supports(job.format) {
            tracing::debug!(asset = job.name, codec = self.codec.name(), "format not supported by codec");
            return SubsetOutcome::Skipped {
                reason: SkipReason::UnsupportedFormat(job.format),
            };
        }

        tracing::trace!(
            asset = job.name,
            format = %job.format,
            codec = self.codec.name(),
            bytes = source.len(),
            "subsetting font"
        );

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.codec.subset(source, job.corpus, job.format)
        }))
        .unwrap_or_else(|payload| Err(CodecError::Panicked(panic_message(payload.as_ref()))));

        match result {
            Ok(buffer) => SubsetOutcome::Subsetted {
                original_size: source.len(),
                new_size: buffer.len(),
                buffer,
            },
            Err(error) => SubsetOutcome::Failed {
                name: job.name.to_string(),
                error,
            },
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
