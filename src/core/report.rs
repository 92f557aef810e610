// ─── Run Report ───
// One record per unit of work, so the outcome of a best-effort run can be
// inspected without scraping log output.

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::core::downloader::FetchOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Library,
    Native,
    NativesCleanup,
    Assets,
    PrimaryArchive,
    Runtime,
    LaunchScript,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitKind::Library => write!(f, "library"),
            UnitKind::Native => write!(f, "native"),
            UnitKind::NativesCleanup => write!(f, "natives-cleanup"),
            UnitKind::Assets => write!(f, "assets"),
            UnitKind::PrimaryArchive => write!(f, "primary-archive"),
            UnitKind::Runtime => write!(f, "runtime"),
            UnitKind::LaunchScript => write!(f, "launch-script"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    /// Work was performed and succeeded.
    Installed,
    /// Nothing to do; the target was already in place.
    AlreadyPresent,
    Skipped(String),
    Failed(String),
}

impl UnitOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, UnitOutcome::Failed(_))
    }
}

impl From<&FetchOutcome> for UnitOutcome {
    fn from(outcome: &FetchOutcome) -> Self {
        match outcome {
            FetchOutcome::AlreadyValid => UnitOutcome::AlreadyPresent,
            FetchOutcome::Downloaded { .. } => UnitOutcome::Installed,
            FetchOutcome::DownloadFailed { reason } => UnitOutcome::Failed(reason.clone()),
            FetchOutcome::IntegrityFailed { expected, actual } => UnitOutcome::Failed(format!(
                "SHA-1 mismatch: expected {}, got {}",
                expected, actual
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitReport {
    pub kind: UnitKind,
    pub label: String,
    pub outcome: UnitOutcome,
}

impl UnitReport {
    pub fn new(kind: UnitKind, label: impl Into<String>, outcome: UnitOutcome) -> Self {
        Self {
            kind,
            label: label.into(),
            outcome,
        }
    }
}

/// Aggregated outcome of a bootstrap run.
#[derive(Debug, Clone)]
pub struct Summary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub units: Vec<UnitReport>,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            units: Vec::new(),
        }
    }
}

impl Summary {
    pub fn push(&mut self, report: UnitReport) {
        self.units.push(report);
    }

    pub fn extend(&mut self, reports: impl IntoIterator<Item = UnitReport>) {
        self.units.extend(reports);
    }

    pub fn of_kind(&self, kind: UnitKind) -> impl Iterator<Item = &UnitReport> {
        self.units.iter().filter(move |u| u.kind == kind)
    }

    pub fn failures(&self) -> impl Iterator<Item = &UnitReport> {
        self.units.iter().filter(|u| u.outcome.is_failure())
    }

    pub fn count(&self, predicate: impl Fn(&UnitOutcome) -> bool) -> usize {
        self.units.iter().filter(|u| predicate(&u.outcome)).count()
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn log(&self) {
        let installed = self.count(|o| *o == UnitOutcome::Installed);
        let present = self.count(|o| *o == UnitOutcome::AlreadyPresent);
        let skipped = self.count(|o| matches!(o, UnitOutcome::Skipped(_)));
        let failed = self.count(UnitOutcome::is_failure);
        let elapsed = self
            .finished_at
            .map(|end| (end - self.started_at).num_milliseconds())
            .unwrap_or_default();

        info!(
            "Bootstrap finished in {} ms: {} installed, {} already present, {} skipped, {} failed",
            elapsed, installed, present, skipped, failed
        );
        for unit in self.failures() {
            if let UnitOutcome::Failed(reason) = &unit.outcome {
                warn!("  [{}] {}: {}", unit.kind, unit.label, reason);
            }
        }
    }
}
