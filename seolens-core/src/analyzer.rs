//! The analysis pipeline: fetch, parse, extract, score, aggregate.

use std::thread;

use chrono::Utc;

use crate::address::PageAddress;
use crate::aggregate::{overall_score, rank_suggestions};
use crate::compare::compare_reports;
use crate::document::{Document, HtmlDocument};
use crate::domain::{AnalysisReport, ComparisonReport};
use crate::fallback::{estimate_report, preview_report};
use crate::fetch::PageFetcher;
use crate::scorers::{classify_links, score_all};
use crate::signals::extract_signals;

/// Score an already parsed document.
pub fn analyze_document<D: Document>(
    doc: &D,
    address: &PageAddress,
    timestamp: String,
) -> AnalysisReport {
    let bundle = extract_signals(doc, address);
    let categories = score_all(&bundle);
    AnalysisReport {
        url: address.as_str().to_string(),
        domain: address.host().to_string(),
        timestamp,
        overall_score: overall_score(&categories),
        suggestions: rank_suggestions(&categories),
        links: Some(classify_links(&bundle)),
        categories,
        note: None,
    }
}

/// Runs analyses and comparisons against pages retrieved by a [`PageFetcher`].
#[derive(Debug, Clone)]
pub struct Analyzer<F> {
    fetcher: F,
}

impl<F: PageFetcher> Analyzer<F> {
    /// Create an analyzer around a fetcher.
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Analyse the page at `address`.
    ///
    /// Never fails: when the page cannot be retrieved the report is estimated
    /// from the address and carries a note.
    pub fn analyze(&self, address: &PageAddress) -> AnalysisReport {
        match self.fetcher.fetch(address) {
            Ok(markup) => self.analyze_markup(address, &markup),
            Err(err) => {
                log::warn!("falling back to an estimate for {address}: {err}");
                estimate_report(address, now())
            }
        }
    }

    /// Analyse caller-supplied markup as if it were served from `address`.
    pub fn analyze_markup(&self, address: &PageAddress, markup: &str) -> AnalysisReport {
        analyze_document(&HtmlDocument::parse(markup), address, now())
    }

    /// The address-only estimate, without fetching.
    pub fn estimate(&self, address: &PageAddress) -> AnalysisReport {
        estimate_report(address, now())
    }

    /// Offline preview: estimated scores with score-scaled suggestions.
    pub fn preview(&self, address: &PageAddress) -> AnalysisReport {
        preview_report(address, now())
    }
}

impl<F: PageFetcher + Sync> Analyzer<F> {
    /// Analyse both pages concurrently and compare them.
    ///
    /// Each side falls back to its own estimate independently.
    pub fn compare(&self, primary: &PageAddress, competitor: &PageAddress) -> ComparisonReport {
        let (primary_report, competitor_report) = thread::scope(|scope| {
            let primary_task = scope.spawn(|| self.analyze(primary));
            let competitor_task = scope.spawn(|| self.analyze(competitor));
            (
                joined_or_estimate(primary_task, primary),
                joined_or_estimate(competitor_task, competitor),
            )
        });
        compare_reports(primary_report, competitor_report, now())
    }
}

fn joined_or_estimate(
    task: thread::ScopedJoinHandle<'_, AnalysisReport>,
    address: &PageAddress,
) -> AnalysisReport {
    task.join().unwrap_or_else(|_| {
        log::warn!("analysis task for {address} panicked, using an estimate");
        estimate_report(address, now())
    })
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, VerdictKind};
    use crate::error::{Result, SeoLensError};
    use crate::fetch::MockPageFetcher;
    use std::collections::HashMap;

    const GOOD_PAGE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <title>Handmade ceramics from a small studio</title>
  <meta name="description" content="Browse handmade ceramic mugs, bowls and plates from our small studio. Every piece is thrown by hand, glazed in small batches and shipped with care.">
  <meta name="viewport" content="width=device-width, initial-scale=1">
</head>
<body>
  <h1>Ceramics</h1>
  <h2>Mugs</h2>
  <img src="/mug.png" alt="Blue mug">
  <a href="/shop">Shop</a>
</body>
</html>"#;

    fn address(input: &str) -> PageAddress {
        PageAddress::parse(input).expect("address")
    }

    struct MapFetcher {
        pages: HashMap<String, String>,
    }

    impl PageFetcher for MapFetcher {
        fn fetch(&self, address: &PageAddress) -> Result<String> {
            self.pages
                .get(address.host())
                .cloned()
                .ok_or_else(|| SeoLensError::Http(format!("{address} unreachable")))
        }
    }

    #[test]
    fn analyze_scores_fetched_markup() {
        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch()
            .times(1)
            .returning(|_| Ok(GOOD_PAGE.to_string()));

        let report = Analyzer::new(fetcher).analyze(&address("https://studio.example/"));

        assert_eq!(report.categories.len(), 11);
        assert_eq!(report.score(Category::TitleTag), Some(95));
        assert_eq!(report.score(Category::MetaDescription), Some(95));
        assert_eq!(report.score(Category::Headings), Some(85));
        assert!(report.note.is_none());
        assert_eq!(report.domain, "studio.example");
        let links = report.links.expect("links");
        assert_eq!(links.internal, 1);
    }

    #[test]
    fn analyze_falls_back_when_fetch_fails() {
        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_| Err(SeoLensError::Http("timeout".to_string())));

        let report = Analyzer::new(fetcher).analyze(&address("https://example.com"));

        assert!(report.is_estimate());
        assert_eq!(report.categories.len(), 6);
        assert_eq!(report.suggestions.len(), 6);
    }

    #[test]
    fn overall_is_rounded_mean_of_categories() {
        let fetcher = MockPageFetcher::new();
        let report =
            Analyzer::new(fetcher).analyze_markup(&address("http://example.com"), "<p>hi</p>");

        let sum: u32 = report.categories.values().map(|r| u32::from(r.score)).sum();
        let expected = (f64::from(sum) / 11.0).round() as u8;
        assert_eq!(report.overall_score, expected);
        assert_eq!(report.score(Category::Security), Some(60));
    }

    #[test]
    fn compare_isolates_failures_per_side() {
        let fetcher = MapFetcher {
            pages: HashMap::from([("studio.example".to_string(), GOOD_PAGE.to_string())]),
        };
        let analyzer = Analyzer::new(fetcher);

        let comparison = analyzer.compare(
            &address("https://studio.example"),
            &address("https://down.example"),
        );

        assert!(comparison.primary.note.is_none());
        assert!(comparison.competitor.is_estimate());
        assert_eq!(comparison.per_category_delta.len(), 6);
        assert_eq!(comparison.competitor.domain, "down.example");
    }

    struct PanickingFetcher {
        host: &'static str,
    }

    impl PageFetcher for PanickingFetcher {
        fn fetch(&self, address: &PageAddress) -> Result<String> {
            if address.host() == self.host {
                panic!("fetcher crashed for {address}");
            }
            Ok(GOOD_PAGE.to_string())
        }
    }

    #[test]
    fn compare_survives_a_panicking_primary() {
        let analyzer = Analyzer::new(PanickingFetcher { host: "a.example" });

        let comparison =
            analyzer.compare(&address("https://a.example"), &address("https://b.example"));

        assert!(comparison.primary.is_estimate());
        assert_eq!(comparison.primary.domain, "a.example");
        assert!(comparison.competitor.note.is_none());
        assert_eq!(comparison.competitor.categories.len(), 11);
    }

    #[test]
    fn compare_survives_a_panicking_competitor() {
        let analyzer = Analyzer::new(PanickingFetcher { host: "b.example" });

        let comparison =
            analyzer.compare(&address("https://a.example"), &address("https://b.example"));

        assert!(comparison.primary.note.is_none());
        assert!(comparison.competitor.is_estimate());
        assert_eq!(comparison.competitor.domain, "b.example");
    }

    #[test]
    fn compare_identical_pages_is_a_tie() {
        let fetcher = MapFetcher {
            pages: HashMap::from([
                ("a.example".to_string(), GOOD_PAGE.to_string()),
                ("b.example".to_string(), GOOD_PAGE.to_string()),
            ]),
        };

        let comparison = Analyzer::new(fetcher)
            .compare(&address("https://a.example"), &address("https://b.example"));

        assert_eq!(comparison.verdict.kind, VerdictKind::Tie);
        assert_eq!(comparison.verdict.margin, 0);
        assert_eq!(comparison.per_category_delta.len(), 11);
        assert!(comparison.per_category_delta.values().all(|delta| *delta == 0));
    }

    #[test]
    fn preview_does_not_fetch() {
        let mut fetcher = MockPageFetcher::new();
        fetcher.expect_fetch().times(0);

        let analyzer = Analyzer::new(fetcher);
        let preview = analyzer.preview(&address("https://example.com"));
        let estimate = analyzer.estimate(&address("https://example.com"));

        assert_eq!(preview.categories, estimate.categories);
        assert_ne!(preview.note, estimate.note);
    }
}
