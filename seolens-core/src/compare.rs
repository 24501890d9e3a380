//! Head-to-head comparison of two analyses.

use std::collections::BTreeMap;

use crate::domain::{AnalysisReport, Category, ComparisonReport, Verdict, VerdictKind};

/// Overall gaps below this are a tie.
pub const TIE_MARGIN: u8 = 5;
/// Gaps above this are called out in insights and category lists.
pub const NOTABLE_GAP: i16 = 10;

/// Compare two finished reports.
pub fn compare_reports(
    primary: AnalysisReport,
    competitor: AnalysisReport,
    timestamp: String,
) -> ComparisonReport {
    let per_category_delta: BTreeMap<Category, i16> = primary
        .categories
        .iter()
        .filter_map(|(category, result)| {
            competitor
                .score(*category)
                .map(|other| (*category, i16::from(result.score) - i16::from(other)))
        })
        .collect();

    let difference = i16::from(primary.overall_score) - i16::from(competitor.overall_score);
    let verdict = verdict_for(difference);

    // A zero on either side means the category was not assessed there.
    let comparable = |category: &Category| {
        category.is_base()
            && primary.score(*category).is_some_and(|score| score > 0)
            && competitor.score(*category).is_some_and(|score| score > 0)
    };
    let strengths: Vec<Category> = per_category_delta
        .iter()
        .filter(|(category, delta)| comparable(category) && **delta > NOTABLE_GAP)
        .map(|(category, _)| *category)
        .collect();
    let opportunities: Vec<Category> = per_category_delta
        .iter()
        .filter(|(category, delta)| comparable(category) && **delta < -NOTABLE_GAP)
        .map(|(category, _)| *category)
        .collect();

    let insights = insights_for(difference, &strengths, &opportunities);

    ComparisonReport {
        primary,
        competitor,
        per_category_delta,
        verdict,
        strengths,
        opportunities,
        insights,
        timestamp,
    }
}

/// Verdict for a signed overall difference (primary minus competitor).
pub fn verdict_for(difference: i16) -> Verdict {
    let margin = difference.unsigned_abs().min(100) as u8;
    let kind = if margin < TIE_MARGIN {
        VerdictKind::Tie
    } else if difference > 0 {
        VerdictKind::PrimaryWins
    } else {
        VerdictKind::CompetitorWins
    };
    Verdict { kind, margin }
}

fn insights_for(
    difference: i16,
    strengths: &[Category],
    opportunities: &[Category],
) -> Vec<String> {
    let mut insights = Vec::new();

    if difference > NOTABLE_GAP {
        insights.push(format!(
            "Your site clearly outperforms the competitor overall, leading by {difference} points"
        ));
    } else if difference < -NOTABLE_GAP {
        insights.push(
            "The competitor performs better overall; focus on closing the gap".to_string(),
        );
    } else {
        insights.push(
            "Both sites perform similarly; target the weakest categories first".to_string(),
        );
    }

    if !strengths.is_empty() {
        insights.push(format!("Your strengths: {}", join_labels(strengths)));
    }
    if !opportunities.is_empty() {
        insights.push(format!("Opportunities: {}", join_labels(opportunities)));
    }

    insights
}

fn join_labels(categories: &[Category]) -> String {
    categories
        .iter()
        .map(|category| category.label())
        .collect::<Vec<_>>()
        .join(", ")
}
