//! Overall score and suggestion ranking.

use crate::domain::{Category, CategoryScores};

/// Categories scoring below this threshold produce a suggestion.
pub const SUGGESTION_THRESHOLD: u8 = 80;

/// Remediation list used when a report is estimated from the address alone.
pub const GENERIC_SUGGESTIONS: [&str; 6] = [
    "Add complete meta tag information",
    "Optimize the page title and description",
    "Improve image alt attributes",
    "Improve page load speed",
    "Ensure a mobile-friendly design",
    "Build a clear content structure",
];

/// Catalog used by preview reports, truncated by overall score.
pub const PREVIEW_SUGGESTIONS: [&str; 8] = [
    "Optimize the page title and include the main keyword",
    "Write a more detailed meta description",
    "Describe images with meaningful alt text",
    "Improve page load speed",
    "Polish the mobile layout",
    "Strengthen the internal link structure",
    "Improve overall content quality",
    "Add structured data markup",
];

/// `round(mean(scores))`, computed exactly with integers. Zero for no scores.
pub fn overall_score(categories: &CategoryScores) -> u8 {
    mean_score(categories.values().map(|result| result.score))
}

/// Rounded mean of a score sequence, halves rounding up.
pub fn mean_score(scores: impl IntoIterator<Item = u8>) -> u8 {
    let (sum, count) = scores
        .into_iter()
        .fold((0u32, 0u32), |(sum, count), score| (sum + u32::from(score), count + 1));
    if count == 0 {
        return 0;
    }
    ((2 * sum + count) / (2 * count)).min(100) as u8
}

/// Suggestions for weak categories, in category scan order.
///
/// Categories without a suggestion template are skipped even when they score
/// low.
pub fn rank_suggestions(categories: &CategoryScores) -> Vec<String> {
    categories
        .iter()
        .filter(|(_, result)| result.score < SUGGESTION_THRESHOLD)
        .filter_map(|(category, result)| suggestion_for(*category, &result.issues))
        .collect()
}

fn suggestion_for(category: Category, issues: &[String]) -> Option<String> {
    let text = match category {
        Category::TitleTag => format!("Improve the page title: {}", issues.join("; ")),
        Category::MetaDescription => {
            format!("Improve the meta description: {}", issues.join("; "))
        }
        Category::Headings => format!("Improve the heading structure: {}", issues.join("; ")),
        Category::Images => format!("Improve image SEO: {}", issues.join("; ")),
        Category::PageSpeed => {
            "Speed up page loading: reduce image sizes, minify CSS and JavaScript".to_string()
        }
        Category::MobileOptimization => {
            "Improve the mobile experience: add a viewport meta tag, use responsive design"
                .to_string()
        }
        _ => return None,
    };
    Some(text)
}

/// The fixed generic list for estimated reports.
pub fn generic_suggestions() -> Vec<String> {
    GENERIC_SUGGESTIONS.iter().map(|text| text.to_string()).collect()
}

/// The preview catalog truncated to 2, 4 or 6 entries by overall score.
pub fn scaled_suggestions(overall: u8) -> Vec<String> {
    let count = if overall > 85 {
        2
    } else if overall > 75 {
        4
    } else {
        6
    };
    PREVIEW_SUGGESTIONS
        .iter()
        .take(count)
        .map(|text| text.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoryResult;

    fn with_issue(score: u8, issue: &str) -> CategoryResult {
        CategoryResult {
            issues: vec![issue.to_string()],
            ..CategoryResult::scored(score)
        }
    }

    #[test]
    fn mean_rounds_half_up() {
        assert_eq!(mean_score([90, 85]), 88);
        assert_eq!(mean_score([70, 71, 71]), 71);
        assert_eq!(mean_score([0, 1]), 1);
        assert_eq!(mean_score([]), 0);
        assert_eq!(mean_score([100; 11]), 100);
    }

    #[test]
    fn overall_uses_every_category_present() {
        let categories: CategoryScores = [
            (Category::TitleTag, CategoryResult::scored(95)),
            (Category::Headings, CategoryResult::scored(80)),
            (Category::Security, CategoryResult::scored(60)),
        ]
        .into_iter()
        .collect();
        assert_eq!(overall_score(&categories), 78);
    }

    #[test]
    fn suggestions_follow_scan_order() {
        let categories: CategoryScores = [
            (Category::TitleTag, with_issue(70, "Title is too long")),
            (
                Category::MetaDescription,
                with_issue(0, "Missing meta description"),
            ),
            (Category::Headings, with_issue(95, "unused")),
            (
                Category::Images,
                with_issue(72, "2 images are missing an alt attribute"),
            ),
            (Category::PageSpeed, CategoryResult::scored(70)),
            (Category::Security, with_issue(20, "Not served over HTTPS")),
        ]
        .into_iter()
        .collect();

        let suggestions = rank_suggestions(&categories);

        assert_eq!(suggestions.len(), 4);
        assert!(suggestions[0].contains("Title is too long"));
        assert!(suggestions[1].contains("Missing meta description"));
        assert!(suggestions[2].contains("2 images"));
        assert!(suggestions[3].starts_with("Speed up page loading"));
    }

    #[test]
    fn strong_reports_have_no_suggestions() {
        let categories: CategoryScores = Category::ALL
            .iter()
            .map(|category| (*category, CategoryResult::scored(90)))
            .collect();
        assert!(rank_suggestions(&categories).is_empty());
    }

    #[test]
    fn scaled_suggestions_follow_score_bands() {
        assert_eq!(scaled_suggestions(86).len(), 2);
        assert_eq!(scaled_suggestions(85).len(), 4);
        assert_eq!(scaled_suggestions(76).len(), 4);
        assert_eq!(scaled_suggestions(75).len(), 6);
        assert_eq!(generic_suggestions().len(), 6);
    }
}
