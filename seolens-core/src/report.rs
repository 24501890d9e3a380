//! Report formatting utilities for SeoLens outputs.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::domain::{AnalysisReport, Category, CategoryResult, ComparisonReport, VerdictKind};
use crate::history::ComparisonSummary;

/// Qualitative band for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreGrade {
    /// 90 and above.
    Excellent,
    /// 80 to 89.
    Good,
    /// 70 to 79.
    Fair,
    /// Below 70.
    Poor,
}

impl ScoreGrade {
    /// Grade a score.
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => Self::Excellent,
            80..=89 => Self::Good,
            70..=79 => Self::Fair,
            _ => Self::Poor,
        }
    }

    /// Lowercase label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }

    /// One-line verdict for an overall score.
    pub fn description(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent! The site's SEO is outstanding",
            Self::Good => "Good! There is still some room for improvement",
            Self::Fair => "Fair. Focused optimisation is needed",
            Self::Poor => "Needs work. Start optimising right away",
        }
    }
}

/// Text to share a single analysis.
pub fn share_text(report: &AnalysisReport) -> String {
    format!(
        "I checked {} with SeoLens and it scored {}/100!",
        report.domain, report.overall_score
    )
}

/// Text to share a comparison.
pub fn comparison_share_text(report: &ComparisonReport) -> String {
    format!(
        "{} ({}/100) vs {} ({}/100)",
        report.primary.domain,
        report.primary.overall_score,
        report.competitor.domain,
        report.competitor.overall_score
    )
}

/// Export file name for an analysis.
pub fn report_file_name(report: &AnalysisReport, unix_millis: i64) -> String {
    format!("seo-report-{}-{unix_millis}.json", report.domain)
}

/// Export file name for a comparison.
pub fn comparison_file_name(report: &ComparisonReport, unix_millis: i64) -> String {
    format!(
        "seo-comparison-{}-vs-{}-{unix_millis}.json",
        report.primary.domain, report.competitor.domain
    )
}

/// Headline describing the comparison outcome.
pub fn verdict_message(report: &ComparisonReport) -> String {
    let margin = report.verdict.margin;
    match report.verdict.kind {
        VerdictKind::Tie => format!("It's a close match, only {margin} points apart"),
        VerdictKind::PrimaryWins => {
            format!("{} leads by {margin} points", report.primary.domain)
        }
        VerdictKind::CompetitorWins => {
            format!("{} leads by {margin} points", report.competitor.domain)
        }
    }
}

/// Render one analysis as plain text.
pub fn render_analysis_text(report: &AnalysisReport) -> String {
    let mut output = String::new();
    let grade = ScoreGrade::from_score(report.overall_score);
    let _ = writeln!(
        output,
        "SEO analysis for {} ({})",
        report.domain,
        report.url
    );
    let _ = writeln!(output, "Analysed at: {}", report.timestamp);
    let _ = writeln!(
        output,
        "Overall score: {}/100 [{}] {}",
        report.overall_score,
        grade.label(),
        grade.description()
    );
    if let Some(note) = report.note.as_deref() {
        let _ = writeln!(output, "Note: {note}");
    }
    let _ = writeln!(output);

    for (category, result) in &report.categories {
        let _ = writeln!(
            output,
            "  {:<22} {:>3}/100 [{}]",
            category.label(),
            result.score,
            ScoreGrade::from_score(result.score).label()
        );
        for issue in &result.issues {
            let _ = writeln!(output, "      - {issue}");
        }
        for feature in &result.features {
            let _ = writeln!(output, "      + {feature}");
        }
    }

    if let Some(links) = report.links {
        let _ = writeln!(
            output,
            "\nLinks: {} total, {} internal, {} external",
            links.total, links.internal, links.external
        );
    }

    if !report.suggestions.is_empty() {
        let _ = writeln!(output, "\nSuggestions:");
        for (index, suggestion) in report.suggestions.iter().enumerate() {
            let _ = writeln!(output, "  {}. {suggestion}", index + 1);
        }
    }
    output
}

/// Render a list of analyses as Markdown.
pub fn render_analysis_markdown(reports: &[AnalysisReport]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# SeoLens Analysis Report\n");
    for report in reports {
        let grade = ScoreGrade::from_score(report.overall_score);
        let _ = writeln!(output, "## {}\n", report.domain);
        let _ = writeln!(output, "- URL: `{}`", report.url);
        let _ = writeln!(output, "- Analysed: {}", report.timestamp);
        let _ = writeln!(
            output,
            "- Overall score: **{}/100** ({})",
            report.overall_score,
            grade.label()
        );
        if let Some(note) = report.note.as_deref() {
            let _ = writeln!(output, "- Note: {note}");
        }
        let _ = writeln!(output);
        append_category_table(&mut output, report);
        if let Some(links) = report.links {
            let _ = writeln!(
                output,
                "### Links\n- Total: {}\n- Internal: {}\n- External: {}\n",
                links.total, links.internal, links.external
            );
        }
        append_findings(&mut output, report);
        append_numbered(
            &mut output,
            "Suggestions",
            &report.suggestions,
            "No suggestions, keep it up.",
        );
    }
    output
}

/// Render a comparison as plain text.
pub fn render_comparison_text(report: &ComparisonReport) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "SEO comparison: {} vs {}",
        report.primary.domain, report.competitor.domain
    );
    let _ = writeln!(output, "Compared at: {}", report.timestamp);
    let _ = writeln!(
        output,
        "  {:<22} {:>3}/100",
        report.primary.domain, report.primary.overall_score
    );
    let _ = writeln!(
        output,
        "  {:<22} {:>3}/100",
        report.competitor.domain, report.competitor.overall_score
    );
    let _ = writeln!(output, "{}\n", verdict_message(report));

    for (category, delta) in &report.per_category_delta {
        let primary = report.primary.score(*category).unwrap_or_default();
        let competitor = report.competitor.score(*category).unwrap_or_default();
        let _ = writeln!(
            output,
            "  {:<22} {primary:>3} vs {competitor:>3} ({delta:+})",
            category.label()
        );
    }

    if !report.insights.is_empty() {
        let _ = writeln!(output, "\nInsights:");
        for insight in &report.insights {
            let _ = writeln!(output, "  - {insight}");
        }
    }
    output
}

/// Render a comparison as Markdown.
pub fn render_comparison_markdown(report: &ComparisonReport) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# SeoLens Comparison Report\n");
    let _ = writeln!(
        output,
        "**{}** ({}/100) vs **{}** ({}/100)\n",
        report.primary.domain,
        report.primary.overall_score,
        report.competitor.domain,
        report.competitor.overall_score
    );
    let _ = writeln!(output, "{}\n", verdict_message(report));
    let _ = writeln!(
        output,
        "| Category | {} | {} | Delta |",
        report.primary.domain, report.competitor.domain
    );
    let _ = writeln!(output, "|---|---:|---:|---:|");
    for (category, delta) in &report.per_category_delta {
        let _ = writeln!(
            output,
            "| {} | {} | {} | {delta:+} |",
            category.label(),
            report.primary.score(*category).unwrap_or_default(),
            report.competitor.score(*category).unwrap_or_default()
        );
    }
    let _ = writeln!(output);
    append_categories(&mut output, "Strengths", &report.strengths);
    append_categories(&mut output, "Opportunities", &report.opportunities);
    append_list(&mut output, "Insights", &report.insights, "No insights.");
    output
}

/// Render stored history as plain text.
pub fn render_history_text(
    analyses: &[AnalysisReport],
    comparisons: &[ComparisonSummary],
) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Recent analyses:");
    if analyses.is_empty() {
        let _ = writeln!(output, "  (none)");
    }
    for report in analyses {
        let _ = writeln!(
            output,
            "  {}  {:<30} {:>3}/100",
            report.timestamp, report.domain, report.overall_score
        );
    }
    let _ = writeln!(output, "\nRecent comparisons:");
    if comparisons.is_empty() {
        let _ = writeln!(output, "  (none)");
    }
    for summary in comparisons {
        let _ = writeln!(
            output,
            "  {}  {} ({}) vs {} ({})",
            summary.timestamp,
            summary.primary.domain,
            summary.primary.score,
            summary.competitor.domain,
            summary.competitor.score
        );
    }
    output
}

/// Render stored history as Markdown.
pub fn render_history_markdown(
    analyses: &[AnalysisReport],
    comparisons: &[ComparisonSummary],
) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# SeoLens History\n");
    let _ = writeln!(output, "## Analyses\n");
    if analyses.is_empty() {
        let _ = writeln!(output, "No analyses recorded.\n");
    } else {
        let _ = writeln!(output, "| When | Domain | Score |\n|---|---|---:|");
        for report in analyses {
            let _ = writeln!(
                output,
                "| {} | {} | {} |",
                report.timestamp, report.domain, report.overall_score
            );
        }
        let _ = writeln!(output);
    }
    let _ = writeln!(output, "## Comparisons\n");
    if comparisons.is_empty() {
        let _ = writeln!(output, "No comparisons recorded.\n");
    } else {
        let _ = writeln!(output, "| When | Primary | Competitor |\n|---|---|---|");
        for summary in comparisons {
            let _ = writeln!(
                output,
                "| {} | {} ({}) | {} ({}) |",
                summary.timestamp,
                summary.primary.domain,
                summary.primary.score,
                summary.competitor.domain,
                summary.competitor.score
            );
        }
        let _ = writeln!(output);
    }
    output
}

/// Render any serializable report payload as JSON.
pub fn render_json<T: Serialize + ?Sized>(payload: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(payload)
}

fn append_category_table(output: &mut String, report: &AnalysisReport) {
    let _ = writeln!(output, "### Categories\n");
    let _ = writeln!(output, "| Category | Score | Grade |\n|---|---:|---|");
    for (category, result) in &report.categories {
        let _ = writeln!(
            output,
            "| {} | {} | {} |",
            category.label(),
            result.score,
            ScoreGrade::from_score(result.score).label()
        );
    }
    let _ = writeln!(output);
}

fn append_findings(output: &mut String, report: &AnalysisReport) {
    let annotated: Vec<(&Category, &CategoryResult)> = report
        .categories
        .iter()
        .filter(|(_, result)| !result.issues.is_empty() || !result.features.is_empty())
        .collect();
    if annotated.is_empty() {
        return;
    }
    let _ = writeln!(output, "### Findings");
    for (category, result) in annotated {
        for issue in &result.issues {
            let _ = writeln!(output, "- {}: {issue}", category.label());
        }
        for feature in &result.features {
            let _ = writeln!(output, "- {}: ✓ {feature}", category.label());
        }
    }
    let _ = writeln!(output);
}

fn append_categories(output: &mut String, title: &str, categories: &[Category]) {
    let labels: Vec<String> = categories
        .iter()
        .map(|category| category.label().to_string())
        .collect();
    append_list(output, title, &labels, "None.");
}

fn append_list(output: &mut String, title: &str, items: &[String], empty_message: &str) {
    if items.is_empty() {
        let _ = writeln!(output, "### {title}\n{empty_message}\n");
        return;
    }
    let _ = writeln!(output, "### {title}");
    for item in items {
        let _ = writeln!(output, "- {item}");
    }
    let _ = writeln!(output);
}

fn append_numbered(output: &mut String, title: &str, items: &[String], empty_message: &str) {
    if items.is_empty() {
        let _ = writeln!(output, "### {title}\n{empty_message}\n");
        return;
    }
    let _ = writeln!(output, "### {title}");
    for (index, item) in items.iter().enumerate() {
        let _ = writeln!(output, "{}. {item}", index + 1);
    }
    let _ = writeln!(output);
}
