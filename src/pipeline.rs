//! Build orchestration.
//!
//! One [`Fontmin::run`] call handles one build:
//! 1. Aggregate the text of every non-font output
//! 2. Apply the optional filter, once
//! 3. Subset every font against that frozen corpus (in parallel by default)
//! 4. Write results back and report one line per font
//!
//! Nothing is cached between runs.

use crate::asset::BuildOutputMap;
use crate::classify::{classify, FontFormat};
use crate::codec::GlyphSubsetter;
use crate::config::FontminConfig;
use crate::corpus::{aggregate, TextFilter};
use crate::dispatch::{Dispatcher, FontJob, SubsetOutcome};
use crate::report::{AssetReport, AssetStatus, BuildReport, Diagnostics};
use rayon::prelude::*;

/// Warning emitted when the filter yields no text.
const FILTER_WARNING: &str = "[skip] The filter must return text; keeping the unfiltered corpus.";

/// Pipeline stages, in order. There are no backward transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Aggregating,
    Filtering,
    Dispatching,
    Reporting,
    Done,
}

/// Font minifier for bundled builds.
///
/// Built once from configuration, then invoked once per build with the
/// build's output map.
pub struct Fontmin {
    config: FontminConfig,
    filter: Option<TextFilter>,
    codec: Box<dyn GlyphSubsetter>,
}

impl Fontmin {
    /// Create with the HarfBuzz backend.
    #[cfg(feature = "native")]
    pub fn new(config: FontminConfig) -> Self {
        Self::with_codec(config, Box::new(crate::codec::NativeCodec::new()))
    }

    /// Create with a specific backend (for testing or custom codecs).
    pub fn with_codec(config: FontminConfig, codec: Box<dyn GlyphSubsetter>) -> Self {
        Self {
            config,
            filter: None,
            codec,
        }
    }

    /// Attach a filter applied to the aggregated text before subsetting.
    pub fn filter(mut self, filter: TextFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn config(&self) -> &FontminConfig {
        &self.config
    }

    /// The text every font of this build will be subset to.
    ///
    /// Runs the aggregating and filtering stages only; `outputs` is not
    /// modified.
    pub fn corpus(&self, outputs: &BuildOutputMap, diagnostics: &dyn Diagnostics) -> String {
        enter(Stage::Aggregating);
        let corpus = aggregate(outputs, &self.config.reserve_text);

        enter(Stage::Filtering);
        match &self.filter {
            None => corpus,
            Some(filter) => match filter.apply(&corpus) {
                Some(filtered) => filtered,
                None => {
                    diagnostics.warn(FILTER_WARNING);
                    corpus
                }
            },
        }
    }

    /// Subset every font in `outputs` in place and report the results.
    ///
    /// Never fails: unsupported or broken fonts keep their original bytes
    /// and show up as skipped or failed in the report.
    pub fn run(&self, outputs: &mut BuildOutputMap, diagnostics: &dyn Diagnostics) -> BuildReport {
        let corpus = self.corpus(outputs, diagnostics);
        tracing::debug!(chars = corpus.chars().count(), "corpus frozen");

        enter(Stage::Dispatching);
        let outcomes = self.dispatch(outputs, &corpus);

        enter(Stage::Reporting);
        let mut report = BuildReport::default();
        for (name, format, outcome) in outcomes {
            let status = match outcome {
                SubsetOutcome::Subsetted {
                    buffer,
                    original_size,
                    new_size,
                } => {
                    if let Some(asset) = outputs.get_mut(&name) {
                        asset.replace_bytes(buffer);
                    }
                    AssetStatus::Subsetted {
                        before: original_size as u64,
                        after: new_size as u64,
                    }
                }
                SubsetOutcome::Skipped { reason } => AssetStatus::Skipped {
                    reason: reason.to_string(),
                },
                SubsetOutcome::Failed { error, .. } => AssetStatus::Failed {
                    error: error.to_string(),
                },
            };

            let entry = AssetReport {
                name,
                format,
                status,
            };
            diagnostics.warn(&entry.line());
            report.assets.push(entry);
        }

        enter(Stage::Done);
        if !report.assets.is_empty() {
            tracing::info!(target: "fontmin", "{}", report.summary());
        }
        report
    }

    /// Run one job per font asset and wait for all of them.
    fn dispatch(&self, outputs: &BuildOutputMap, corpus: &str) -> Vec<(String, FontFormat, SubsetOutcome)> {
        let jobs: Vec<FontJob<'_>> = outputs
            .iter()
            .filter_map(|(name, asset)| {
                let class = classify(name);
                class.is_font.then(|| FontJob {
                    name,
                    format: class.format,
                    source: asset.source_bytes(),
                    corpus,
                })
            })
            .collect();

        tracing::debug!(
            fonts = jobs.len(),
            parallel = self.config.parallel,
            codec = self.codec.name(),
            "dispatching font jobs"
        );

        let dispatcher = Dispatcher::new(self.codec.as_ref());
        let run = |job: FontJob<'_>| (job.name.to_string(), job.format, dispatcher.subset(job));

        if self.config.parallel {
            jobs.into_par_iter().map(run).collect()
        } else {
            jobs.into_iter().map(run).collect()
        }
    }
}

fn enter(stage: Stage) {
    tracing::debug!(stage = ?stage, "fontmin stage");
}
