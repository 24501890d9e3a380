//! Bounded, newest-first history of analyses and comparisons.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AnalysisReport, ComparisonReport};
use crate::error::{Result, SeoLensError};

/// Number of analyses kept.
pub const ANALYSIS_CAPACITY: usize = 10;
/// Number of comparisons kept.
pub const COMPARISON_CAPACITY: usize = 5;

/// A newest-first list that drops its oldest entries past a fixed capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedHistory<T> {
    capacity: usize,
    entries: Vec<T>,
}

impl<T> BoundedHistory<T> {
    /// Create an empty history.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Restore a history from newest-first entries, keeping at most `capacity`.
    pub fn from_entries(capacity: usize, mut entries: Vec<T>) -> Self {
        entries.truncate(capacity);
        Self { capacity, entries }
    }

    /// Insert the newest entry, evicting the oldest on overflow.
    pub fn push(&mut self, entry: T) {
        self.entries.insert(0, entry);
        self.entries.truncate(self.capacity);
    }

    /// Entries, newest first.
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A domain and its overall score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SiteScore {
    /// Host of the analysed address.
    pub domain: String,
    /// Overall score.
    pub score: u8,
}

/// The part of a comparison kept in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ComparisonSummary {
    /// The primary page.
    pub primary: SiteScore,
    /// The competitor page.
    pub competitor: SiteScore,
    /// RFC 3339 comparison time.
    pub timestamp: String,
}

impl From<&ComparisonReport> for ComparisonSummary {
    fn from(report: &ComparisonReport) -> Self {
        Self {
            primary: SiteScore {
                domain: report.primary.domain.clone(),
                score: report.primary.overall_score,
            },
            competitor: SiteScore {
                domain: report.competitor.domain.clone(),
                score: report.competitor.overall_score,
            },
            timestamp: report.timestamp.clone(),
        }
    }
}

/// Serialized form of the whole history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    /// Stored analyses, newest first.
    #[serde(default)]
    pub analyses: Vec<AnalysisReport>,
    /// Stored comparison summaries, newest first.
    #[serde(default)]
    pub comparisons: Vec<ComparisonSummary>,
}

/// Persistence for history snapshots.
#[cfg_attr(test, mockall::automock)]
pub trait HistoryBackend {
    /// Load the stored snapshot; an absent store is an empty snapshot.
    fn load(&self) -> Result<HistorySnapshot>;
    /// Replace the stored snapshot.
    fn save(&self, snapshot: &HistorySnapshot) -> Result<()>;
}

/// Stores history as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Use the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryBackend for JsonFileBackend {
    fn load(&self) -> Result<HistorySnapshot> {
        if !self.path.exists() {
            return Ok(HistorySnapshot::default());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn save(&self, snapshot: &HistorySnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&self.path, contents)?;
        log::info!("history written to {}", self.path.display());
        Ok(())
    }
}

/// Keeps history in process memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    snapshot: Mutex<HistorySnapshot>,
}

impl MemoryBackend {
    /// An empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryBackend for MemoryBackend {
    fn load(&self) -> Result<HistorySnapshot> {
        self.snapshot
            .lock()
            .map(|snapshot| snapshot.clone())
            .map_err(|_| SeoLensError::Other("history lock poisoned".to_string()))
    }

    fn save(&self, snapshot: &HistorySnapshot) -> Result<()> {
        let mut stored = self
            .snapshot
            .lock()
            .map_err(|_| SeoLensError::Other("history lock poisoned".to_string()))?;
        *stored = snapshot.clone();
        Ok(())
    }
}

/// Analysis and comparison history over a backend.
///
/// Entries are recorded in memory first, so a failed save leaves the
/// in-process history intact and only reports the error.
#[derive(Debug)]
pub struct HistoryStore<B> {
    backend: B,
    analyses: BoundedHistory<AnalysisReport>,
    comparisons: BoundedHistory<ComparisonSummary>,
}

impl<B: HistoryBackend> HistoryStore<B> {
    /// Load the stored history from `backend`.
    pub fn open(backend: B) -> Result<Self> {
        let snapshot = backend.load()?;
        Ok(Self {
            analyses: BoundedHistory::from_entries(ANALYSIS_CAPACITY, snapshot.analyses),
            comparisons: BoundedHistory::from_entries(COMPARISON_CAPACITY, snapshot.comparisons),
            backend,
        })
    }

    /// Record a finished analysis.
    pub fn record_analysis(&mut self, report: &AnalysisReport) -> Result<()> {
        self.analyses.push(report.clone());
        self.persist()
    }

    /// Record the summary of a finished comparison.
    pub fn record_comparison(&mut self, report: &ComparisonReport) -> Result<()> {
        self.comparisons.push(ComparisonSummary::from(report));
        self.persist()
    }

    /// Stored analyses, newest first.
    pub fn analyses(&self) -> &[AnalysisReport] {
        self.analyses.entries()
    }

    /// Stored comparison summaries, newest first.
    pub fn comparisons(&self) -> &[ComparisonSummary] {
        self.comparisons.entries()
    }

    fn persist(&self) -> Result<()> {
        self.backend.save(&HistorySnapshot {
            analyses: self.analyses.entries().to_vec(),
            comparisons: self.comparisons.entries().to_vec(),
        })
    }
}
