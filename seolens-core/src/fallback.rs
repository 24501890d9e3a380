//! Address-only estimates used when no page content is available.

use crate::address::PageAddress;
use crate::aggregate::{generic_suggestions, overall_score, scaled_suggestions};
use crate::domain::{AnalysisReport, Category, CategoryResult, CategoryScores};

/// Note attached to reports estimated from the address.
pub const ESTIMATE_NOTE: &str =
    "Page content could not be retrieved; scores are estimated from the domain name";

/// Note attached to offline preview reports.
pub const PREVIEW_NOTE: &str = "Offline preview; scores are estimated from the domain name";

const STATIC_HOSTS: [&str; 3] = ["github.io", "netlify", "vercel"];
const BLOG_HOSTS: [&str; 2] = ["wordpress.com", "blogger.com"];

/// Headline estimates derived from a host name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostEstimate {
    /// Estimated content quality.
    pub estimated: u8,
    /// Estimated page speed.
    pub page_speed: u8,
    /// Estimated mobile readiness.
    pub mobile: u8,
}

impl HostEstimate {
    /// Derive the estimate for a host.
    pub fn for_host(host: &str) -> Self {
        let mut estimated: i32 = 75;
        let mut page_speed: i32 = 70;
        let mut mobile: i32 = 80;

        if STATIC_HOSTS.iter().any(|pattern| host.contains(pattern)) {
            estimated += 10;
            page_speed += 15;
        }
        if BLOG_HOSTS.iter().any(|pattern| host.contains(pattern)) {
            estimated += 5;
            mobile += 10;
        }
        if host.chars().count() > 20 {
            estimated -= 5;
        }
        if host.contains("www") {
            estimated += 2;
        }

        Self {
            estimated: estimated.min(90) as u8,
            page_speed: page_speed.min(90) as u8,
            mobile: mobile.min(95) as u8,
        }
    }

    /// Scores for the six base categories.
    pub fn categories(&self) -> CategoryScores {
        let estimated = self.estimated;
        [
            (Category::TitleTag, estimated.saturating_sub(5)),
            (Category::MetaDescription, estimated.saturating_sub(10)),
            (Category::Headings, estimated),
            (Category::Images, estimated.saturating_sub(15)),
            (Category::PageSpeed, self.page_speed),
            (Category::MobileOptimization, self.mobile),
        ]
        .into_iter()
        .map(|(category, score)| (category, CategoryResult::scored(score)))
        .collect()
    }
}

/// Estimate a report from the address alone, with the fixed generic suggestions.
pub fn estimate_report(address: &PageAddress, timestamp: String) -> AnalysisReport {
    let categories = HostEstimate::for_host(address.host()).categories();
    AnalysisReport {
        url: address.as_str().to_string(),
        domain: address.host().to_string(),
        timestamp,
        overall_score: overall_score(&categories),
        categories,
        links: None,
        suggestions: generic_suggestions(),
        note: Some(ESTIMATE_NOTE.to_string()),
    }
}

/// Like [`estimate_report`], but with suggestions scaled by the overall score.
pub fn preview_report(address: &PageAddress, timestamp: String) -> AnalysisReport {
    let mut report = estimate_report(address, timestamp);
    report.suggestions = scaled_suggestions(report.overall_score);
    report.note = Some(PREVIEW_NOTE.to_string());
    report
}
