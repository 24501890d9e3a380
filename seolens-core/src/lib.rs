#![deny(missing_docs)]
//! SeoLens core library.
//!
//! This crate contains the page-quality scoring engine and the comparison
//! engine that power the SeoLens command line and HTTP service: signal
//! extraction from a document tree, category scorers, aggregation, the
//! address-only fallback estimate and head-to-head comparison.

pub mod address;
pub mod aggregate;
pub mod analyzer;
pub mod compare;
pub mod document;
pub mod domain;
pub mod error;
pub mod fallback;
pub mod fetch;
pub mod history;
pub mod report;
pub mod scorers;
pub mod signals;

pub use address::PageAddress;
pub use aggregate::{overall_score, rank_suggestions};
pub use analyzer::{Analyzer, analyze_document};
pub use compare::compare_reports;
pub use document::{Document, HtmlDocument, Query, StaticDocument};
pub use domain::{
    AnalysisReport, Category, CategoryDetails, CategoryResult, CategoryScores, ComparisonReport,
    HeadingCounts, LinkSummary, Verdict, VerdictKind,
};
pub use error::{Result, SeoLensError};
pub use fallback::{HostEstimate, estimate_report, preview_report};
pub use fetch::{FetchConfig, HttpFetcher, PageFetcher};
pub use history::{
    BoundedHistory, ComparisonSummary, HistoryBackend, HistorySnapshot, HistoryStore,
    JsonFileBackend, MemoryBackend, SiteScore,
};
pub use report::{
    ScoreGrade, comparison_file_name, comparison_share_text, render_analysis_markdown,
    render_analysis_text, render_comparison_markdown, render_comparison_text,
    render_history_markdown, render_history_text, render_json, report_file_name, share_text,
    verdict_message,
};
pub use signals::{SignalBundle, extract_signals};
