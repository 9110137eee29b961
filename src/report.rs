//! Per-asset results and the diagnostics channel.

use crate::classify::FontFormat;
use crate::size::display_size;
use serde::Serialize;

/// Fire-and-forget warning channel provided by the host build tool.
pub trait Diagnostics: Send + Sync {
    /// Emit one human-readable line. Must not fail.
    fn warn(&self, message: &str);
}

/// Forwards every line to `tracing::warn!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "fontmin", "{}", message);
    }
}

impl<F> Diagnostics for F
where
    F: Fn(&str) + Send + Sync,
{
    fn warn(&self, message: &str) {
        self(message)
    }
}

/// What happened to one font asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AssetStatus {
    /// Payload replaced with the subsetted font
    Subsetted { before: u64, after: u64 },
    /// Left untouched on purpose
    Skipped { reason: String },
    /// Backend failed; original payload kept
    Failed { error: String },
}

/// Report entry for one font asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetReport {
    pub name: String,
    pub format: FontFormat,
    #[serde(flatten)]
    pub status: AssetStatus,
}

impl AssetReport {
    /// Line emitted on the diagnostics channel.
    pub fn line(&self) -> String {
        match &self.status {
            AssetStatus::Subsetted { before, after } => format!(
                "{}: {} ---> {}",
                self.name,
                display_size(*before),
                display_size(*after)
            ),
            AssetStatus::Skipped { reason } => format!("[skip] {}: {}", self.name, reason),
            AssetStatus::Failed { error } => format!("{}: {}", self.name, error),
        }
    }
}

/// Result of one pipeline run, one entry per font asset in map order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub assets: Vec<AssetReport>,
}

impl BuildReport {
    /// Look up the entry for `name`.
    pub fn get(&self, name: &str) -> Option<&AssetReport> {
        self.assets.iter().find(|a| a.name == name)
    }

    pub fn subsetted(&self) -> usize {
        self.count(|s| matches!(s, AssetStatus::Subsetted { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, AssetStatus::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, AssetStatus::Failed { .. }))
    }

    /// Bytes removed across all subsetted fonts.
    pub fn bytes_saved(&self) -> u64 {
        self.assets
            .iter()
            .map(|a| match a.status {
                AssetStatus::Subsetted { before, after } => before.saturating_sub(after),
                _ => 0,
            })
            .sum()
    }

    /// One-line overview for logs.
    pub fn summary(&self) -> String {
        format!(
            "{} font(s): {} subsetted, {} skipped, {} failed, {} saved",
            self.assets.len(),
            self.subsetted(),
            self.skipped(),
            self.failed(),
            humansize::format_size(self.bytes_saved(), humansize::DECIMAL)
        )
    }

    fn count(&self, pred: impl Fn(&AssetStatus) -> bool) -> usize {
        self.assets.iter().filter(|a| pred(&a.status)).count()
    }
}
