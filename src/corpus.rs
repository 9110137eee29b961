//! Text aggregation and the user filter hook.
//!
//! The corpus is every character the build may render: the configured
//! reserve text followed by the text of every non-font output. It is computed
//! once per build and shared by all font jobs.

use crate::asset::BuildOutputMap;
use crate::classify::is_font_file;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Concatenate `seed` and the text of every non-font asset, in map order.
///
/// For each asset the chunk `code` comes first, then a textual `source`.
/// Binary sources and missing payloads add nothing.
pub fn aggregate(outputs: &BuildOutputMap, seed: &str) -> String {
    let mut corpus = String::from(seed);

    for (name, asset) in outputs {
        if is_font_file(name) {
            continue;
        }
        if let Some(code) = &asset.code {
            corpus.push_str(code);
        }
        if let Some(text) = asset.source_text() {
            corpus.push_str(text);
        }
    }

    corpus
}

type FilterFn = dyn Fn(&str) -> Option<String> + Send + Sync;

/// User transform applied once to the aggregated corpus.
///
/// Returning `None` means the filter produced no usable text; the pipeline
/// then keeps the unfiltered corpus and warns.
pub struct TextFilter {
    func: Box<FilterFn>,
}

impl TextFilter {
    /// Wrap a filter that always produces text.
    pub fn new(func: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self {
            func: Box::new(move |text: &str| Some(func(text))),
        }
    }

    /// Wrap a filter that may decline to produce text.
    pub fn fallible(func: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            func: Box::new(func),
        }
    }

    /// Run the filter. A panic inside the user closure counts as no result.
    pub fn apply(&self, corpus: &str) -> Option<String> {
        panic::catch_unwind(AssertUnwindSafe(|| (self.func)(corpus)))
            .ok()
            .flatten()
    }
}

impl fmt::Debug for TextFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TextFilter(..)")
    }
}
