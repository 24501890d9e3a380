//! Category scorers.
//!
//! Each scorer is a pure function of the [`SignalBundle`] and returns a
//! [`CategoryResult`] whose score is already clamped into `0..=100`.

use std::collections::BTreeMap;

use serde_json::Value;
use url::Url;

use crate::domain::{
    Category, CategoryDetails, CategoryResult, CategoryScores, HeadingCounts, LinkSummary,
};
use crate::signals::{OPEN_GRAPH_FIELDS, SignalBundle, TWITTER_CARD_FIELDS};

/// Score every category for a bundle.
pub fn score_all(bundle: &SignalBundle) -> CategoryScores {
    Category::ALL
        .iter()
        .map(|category| (*category, score_category(*category, bundle)))
        .collect()
}

/// Score a single category.
pub fn score_category(category: Category, bundle: &SignalBundle) -> CategoryResult {
    match category {
        Category::TitleTag => score_title(&bundle.title),
        Category::MetaDescription => score_description(&bundle.description),
        Category::Headings => score_headings(&bundle.headings),
        Category::Images => score_images(bundle),
        Category::PageSpeed => estimate_page_speed(bundle),
        Category::MobileOptimization => score_mobile(bundle),
        Category::Security => score_security(bundle),
        Category::StructuredData => score_structured_data(bundle),
        Category::SocialMedia => score_social_media(bundle),
        Category::Performance => score_performance(bundle),
        Category::Accessibility => score_accessibility(bundle),
    }
}

/// Score the page title by length.
pub fn score_title(title: &str) -> CategoryResult {
    score_text_length(
        title,
        LengthRule {
            min: 30,
            max: 60,
            missing: "Missing title tag",
            too_short: "Title is too short, aim for 30-60 characters",
            too_long: "Title is too long and may be truncated by search engines",
        },
    )
}

/// Score the meta description by length.
pub fn score_description(description: &str) -> CategoryResult {
    score_text_length(
        description,
        LengthRule {
            min: 120,
            max: 160,
            missing: "Missing meta description",
            too_short: "Description is too short, aim for 120-160 characters",
            too_long: "Description is too long and may be truncated by search engines",
        },
    )
}

struct LengthRule {
    min: usize,
    max: usize,
    missing: &'static str,
    too_short: &'static str,
    too_long: &'static str,
}

fn score_text_length(text: &str, rule: LengthRule) -> CategoryResult {
    let length = text.chars().count();
    let (score, issue) = if text.is_empty() {
        (0, Some(rule.missing))
    } else if length < rule.min {
        (60, Some(rule.too_short))
    } else if length > rule.max {
        (70, Some(rule.too_long))
    } else {
        (95, None)
    };

    CategoryResult {
        score,
        issues: issue.map(str::to_string).into_iter().collect(),
        features: Vec::new(),
        details: CategoryDetails::Text {
            content: text.to_string(),
            length,
        },
    }
}

/// Score the heading hierarchy.
pub fn score_headings(headings: &HeadingCounts) -> CategoryResult {
    let mut score: i32 = 85;
    let mut issues = Vec::new();

    if headings.h1 == 0 {
        issues.push("Missing H1 heading".to_string());
        score -= 20;
    } else if headings.h1 > 1 {
        issues.push("Multiple H1 headings, use a single H1".to_string());
        score -= 10;
    }

    if headings.h2 == 0 {
        issues.push("Use H2 headings to organise content".to_string());
        score -= 5;
    }

    CategoryResult {
        score: bounded(score, 0, 100),
        issues,
        features: Vec::new(),
        details: CategoryDetails::Headings {
            structure: *headings,
        },
    }
}

/// Score image alt text coverage.
pub fn score_images(bundle: &SignalBundle) -> CategoryResult {
    let total = bundle.image_count();
    let with_alt = bundle.images.iter().filter(|image| image.has_alt_text()).count();
    let without_alt = total - with_alt;
    // Fractions are kept exact so 80% maps to exactly 72.
    let score = if total == 0 {
        90
    } else {
        round_ratio(90 * with_alt, total)
    };
    let alt_percentage = if total == 0 {
        100
    } else {
        round_ratio(100 * with_alt, total)
    };

    let mut issues = Vec::new();
    if without_alt > 0 {
        issues.push(format!("{without_alt} images are missing an alt attribute"));
    }

    CategoryResult {
        score: bounded(score as i32, 0, 100),
        issues,
        features: Vec::new(),
        details: CategoryDetails::Images {
            total,
            with_alt,
            without_alt,
            alt_percentage: bounded(alt_percentage as i32, 0, 100),
        },
    }
}

/// Classify anchors as internal or external relative to the page host.
pub fn classify_links(bundle: &SignalBundle) -> LinkSummary {
    let mut summary = LinkSummary {
        total: bundle.link_hrefs.len(),
        ..LinkSummary::default()
    };

    for href in &bundle.link_hrefs {
        if href.starts_with("http") {
            let Ok(url) = Url::parse(href) else {
                continue;
            };
            if url.host_str() == Some(bundle.host.as_str()) {
                summary.internal += 1;
            } else {
                summary.external += 1;
            }
        } else if !href.starts_with('#') {
            summary.internal += 1;
        }
    }

    summary
}

/// Estimate load cost from resource counts.
pub fn estimate_page_speed(bundle: &SignalBundle) -> CategoryResult {
    let mut score: i32 = 85;
    if bundle.image_count() > 20 {
        score -= 15;
    }
    if bundle.script_count > 10 {
        score -= 10;
    }
    if bundle.stylesheet_count() > 5 {
        score -= 5;
    }

    CategoryResult {
        score: bounded(score, 40, 100),
        issues: Vec::new(),
        features: Vec::new(),
        details: resource_details(bundle),
    }
}

/// Score small-screen readiness.
pub fn score_mobile(bundle: &SignalBundle) -> CategoryResult {
    let mut score: i32 = 70;
    let mut issues = Vec::new();
    let mut features = Vec::new();

    match &bundle.viewport {
        Some(content) => {
            score += 20;
            features.push("Viewport meta tag declared".to_string());
            if content.contains("width=device-width") {
                score += 5;
            }
        }
        None => issues.push("Missing viewport meta tag".to_string()),
    }

    let responsive_stylesheet = bundle
        .stylesheet_hrefs
        .iter()
        .any(|href| href.contains("bootstrap") || href.contains("responsive"));
    if responsive_stylesheet {
        score += 10;
        features.push("Responsive stylesheet referenced".to_string());
    }

    let media_queries = bundle.inline_styles.iter().any(|style| style.contains("@media"));
    if media_queries {
        score += 5;
        features.push("Media queries detected".to_string());
    } else {
        issues.push("No media queries detected (responsive design)".to_string());
    }

    CategoryResult {
        score: bounded(score, 0, 95),
        issues,
        features,
        details: CategoryDetails::None,
    }
}

/// Score transport security and security meta tags.
pub fn score_security(bundle: &SignalBundle) -> CategoryResult {
    let mut score: i32 = 80;
    let mut issues = Vec::new();
    let mut features = Vec::new();

    if bundle.is_https {
        score += 15;
        features.push("Served over HTTPS".to_string());
    } else {
        score -= 20;
        issues.push("Not served over an encrypted HTTPS connection".to_string());
    }

    if bundle.has_csp_meta {
        score += 5;
        features.push("Content Security Policy declared".to_string());
    }

    if bundle.has_frame_options_meta {
        score += 3;
        features.push("Framing by other sites is blocked".to_string());
    }

    if bundle.is_https {
        let insecure = bundle
            .resource_urls
            .iter()
            .filter(|resource| resource.starts_with("http://"))
            .count();
        if insecure > 0 {
            score -= 10;
            issues.push(format!("{insecure} insecure HTTP resources referenced"));
        }
    }

    CategoryResult {
        score: bounded(score, 20, 100),
        issues,
        features,
        details: CategoryDetails::None,
    }
}

/// Score embedded structured data.
pub fn score_structured_data(bundle: &SignalBundle) -> CategoryResult {
    let mut score: i32 = 60;
    let mut types: Vec<String> = Vec::new();
    let mut issues = Vec::new();

    if !bundle.json_ld_blocks.is_empty() {
        score += 25;
        for (index, block) in bundle.json_ld_blocks.iter().enumerate() {
            match serde_json::from_str::<Value>(block) {
                Ok(data) => json_ld_types(&data, &mut types),
                Err(_) => issues.push(format!("Malformed JSON-LD block (#{})", index + 1)),
            }
        }
    }

    if !bundle.microdata_types.is_empty() {
        score += 10;
        // A trailing slash yields an empty token, which still counts as declared.
        for itemtype in &bundle.microdata_types {
            let token = itemtype.rsplit('/').next().unwrap_or(itemtype).trim();
            types.push(token.to_string());
        }
    }

    if bundle.rdfa_count > 0 {
        score += 5;
    }

    let mut distinct: Vec<String> = Vec::new();
    for kind in types {
        if !distinct.contains(&kind) {
            distinct.push(kind);
        }
    }

    if distinct.is_empty() {
        issues.push("No structured data markup found".to_string());
    }

    CategoryResult {
        score: bounded(score, 0, 95),
        issues,
        features: Vec::new(),
        details: CategoryDetails::Types { types: distinct },
    }
}

fn json_ld_types(data: &Value, types: &mut Vec<String>) {
    match data.get("@type") {
        Some(Value::String(kind)) => types.push(kind.clone()),
        Some(Value::Array(kinds)) => types.extend(
            kinds
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string),
        ),
        _ => {}
    }
}

/// Score Open Graph and Twitter Card coverage.
pub fn score_social_media(bundle: &SignalBundle) -> CategoryResult {
    let mut score: i32 = 50;
    let mut platforms = BTreeMap::new();
    let mut issues = Vec::new();

    let og_count = bundle.open_graph.len();
    if og_count > 0 {
        score += og_count as i32 * 8;
        platforms.insert(
            "facebook".to_string(),
            format!("{og_count}/{} Open Graph tags", OPEN_GRAPH_FIELDS.len()),
        );
    } else {
        issues.push("Missing Open Graph tags".to_string());
    }

    let twitter_count = bundle.twitter_card.len();
    if twitter_count > 0 {
        score += twitter_count as i32 * 5;
        platforms.insert(
            "twitter".to_string(),
            format!(
                "{twitter_count}/{} Twitter Card tags",
                TWITTER_CARD_FIELDS.len()
            ),
        );
    } else {
        issues.push("Missing Twitter Card tags".to_string());
    }

    CategoryResult {
        score: bounded(score, 0, 95),
        issues,
        features: Vec::new(),
        details: CategoryDetails::Platforms { platforms },
    }
}

/// Score resource weight and loading hints.
pub fn score_performance(bundle: &SignalBundle) -> CategoryResult {
    let mut score: i32 = 75;
    let mut issues = Vec::new();
    let mut features = Vec::new();

    if bundle.total_resources() > 50 {
        score -= 15;
        issues.push("Too many resource files may slow down loading".to_string());
    }
    if bundle.image_count() > 20 {
        score -= 10;
        issues.push("Too many images".to_string());
    }
    if bundle.script_count > 10 {
        score -= 10;
        issues.push("Too many JavaScript files".to_string());
    }

    let lazy = bundle.lazy_images();
    if lazy > 0 {
        score += 10;
        features.push(format!("{lazy} images load lazily"));
    }

    if has_minification(bundle) {
        score += 5;
        features.push("Minified CSS or JavaScript referenced".to_string());
    }

    CategoryResult {
        score: bounded(score, 30, 100),
        issues,
        features,
        details: resource_details(bundle),
    }
}

fn has_minification(bundle: &SignalBundle) -> bool {
    bundle
        .stylesheet_hrefs
        .iter()
        .any(|href| href.contains(".min.css"))
        || bundle.script_sources.iter().any(|src| src.contains(".min.js"))
}

fn resource_details(bundle: &SignalBundle) -> CategoryDetails {
    CategoryDetails::Resources {
        images: bundle.image_count(),
        scripts: bundle.script_count,
        stylesheets: bundle.stylesheet_count(),
        total_resources: bundle.total_resources(),
        lazy_loading_images: bundle.lazy_images(),
        has_minification: has_minification(bundle),
    }
}

/// Score accessibility hints.
pub fn score_accessibility(bundle: &SignalBundle) -> CategoryResult {
    let mut score: i32 = 70;
    let mut issues = Vec::new();
    let mut features = Vec::new();

    let total = bundle.image_count();
    if total > 0 {
        let with_alt = bundle
            .images
            .iter()
            .filter(|image| image.has_alt_attribute())
            .count();
        // Compare ratios without floating point: alt/total >= 0.9 and < 0.5.
        if with_alt * 10 >= total * 9 {
            score += 10;
            features.push("Images carry alt attributes".to_string());
        } else if with_alt * 2 < total {
            score -= 15;
            issues.push("Most images are missing alt attributes".to_string());
        }
    }

    if bundle.form_controls > 0 {
        if bundle.labels >= bundle.form_controls {
            score += 10;
            features.push("Form controls have labels".to_string());
        } else {
            score -= 10;
            issues.push("Some form controls are missing labels".to_string());
        }
    }

    let headings = &bundle.headings;
    if headings.h1 == 1 && headings.h2 > 0 {
        score += 10;
        features.push("Clear heading hierarchy".to_string());
    } else if headings.h1 != 1 {
        score -= 5;
        issues.push("Heading structure should have exactly one H1".to_string());
    }

    if bundle.language.is_some() {
        score += 5;
        features.push("Page language declared".to_string());
    } else {
        issues.push("Missing lang attribute".to_string());
    }

    if bundle.aria_count > 0 {
        score += 5;
        features.push("ARIA labels in use".to_string());
    }

    CategoryResult {
        score: bounded(score, 0, 95),
        issues,
        features,
        details: CategoryDetails::None,
    }
}

/// Clamp into `floor..=cap` and then into `0..=100`.
fn bounded(score: i32, floor: i32, cap: i32) -> u8 {
    score.clamp(floor, cap).clamp(0, 100) as u8
}

/// `numerator / denominator` rounded half up.
fn round_ratio(numerator: usize, denominator: usize) -> usize {
    (2 * numerator + denominator) / (2 * denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::ImageSignal;

    fn bundle() -> SignalBundle {
        SignalBundle {
            host: "example.com".to_string(),
            is_https: true,
            ..SignalBundle::default()
        }
    }

    fn images(with_alt: usize, without_alt: usize) -> Vec<ImageSignal> {
        let mut images = vec![
            ImageSignal {
                alt: Some("photo".to_string()),
                lazy: false,
            };
            with_alt
        ];
        images.extend(vec![ImageSignal::default(); without_alt]);
        images
    }

    #[test]
    fn title_length_boundaries() {
        let short = score_title(&"a".repeat(29));
        assert_eq!(short.score, 60);
        assert_eq!(short.issues.len(), 1);
        assert!(short.issues[0].contains("too short"));

        let lower = score_title(&"a".repeat(30));
        assert_eq!(lower.score, 95);
        assert!(lower.issues.is_empty());

        let upper = score_title(&"a".repeat(60));
        assert_eq!(upper.score, 95);

        let long = score_title(&"a".repeat(61));
        assert_eq!(long.score, 70);
        assert!(long.issues[0].contains("too long"));

        let missing = score_title("");
        assert_eq!(missing.score, 0);
        assert_eq!(missing.issues, vec!["Missing title tag".to_string()]);
    }

    #[test]
    fn title_length_counts_characters() {
        let result = score_title(&"é".repeat(30));
        assert_eq!(result.score, 95);
        match result.details {
            CategoryDetails::Text { length, .. } => assert_eq!(length, 30),
            other => panic!("unexpected details: {other:?}"),
        }
    }

    #[test]
    fn description_length_boundaries() {
        assert_eq!(score_description("").score, 0);
        assert_eq!(score_description(&"d".repeat(119)).score, 60);
        assert_eq!(score_description(&"d".repeat(120)).score, 95);
        assert_eq!(score_description(&"d".repeat(160)).score, 95);
        assert_eq!(score_description(&"d".repeat(161)).score, 70);
    }

    #[test]
    fn headings_missing_h1() {
        let result = score_headings(&HeadingCounts {
            h1: 0,
            h2: 2,
            ..HeadingCounts::default()
        });
        assert_eq!(result.score, 65);
        assert_eq!(result.issues, vec!["Missing H1 heading".to_string()]);
    }

    #[test]
    fn headings_missing_h2() {
        let result = score_headings(&HeadingCounts {
            h1: 1,
            h2: 0,
            ..HeadingCounts::default()
        });
        assert_eq!(result.score, 80);
        assert_eq!(
            result.issues,
            vec!["Use H2 headings to organise content".to_string()]
        );
    }

    #[test]
    fn headings_multiple_h1_and_no_h2() {
        let result = score_headings(&HeadingCounts {
            h1: 3,
            ..HeadingCounts::default()
        });
        assert_eq!(result.score, 70);
        assert_eq!(result.issues.len(), 2);
    }

    #[test]
    fn images_score_follows_alt_coverage() {
        let mut signals = bundle();
        signals.images = images(8, 2);

        let result = score_images(&signals);

        assert_eq!(result.score, 72);
        assert_eq!(result.issues.len(), 1);
        assert!(result.issues[0].contains('2'));
        match result.details {
            CategoryDetails::Images {
                alt_percentage,
                without_alt,
                ..
            } => {
                assert_eq!(alt_percentage, 80);
                assert_eq!(without_alt, 2);
            }
            other => panic!("unexpected details: {other:?}"),
        }
    }

    #[test]
    fn images_without_any_images_score_ninety() {
        let result = score_images(&bundle());
        assert_eq!(result.score, 90);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn links_are_classified_by_host() {
        let mut signals = bundle();
        signals.link_hrefs = vec![
            "https://example.com/a".to_string(),
            "https://other.org/".to_string(),
            "/about".to_string(),
            "contact.html".to_string(),
            "#top".to_string(),
        ];

        let summary = classify_links(&signals);

        assert_eq!(summary.total, 5);
        assert_eq!(summary.internal, 3);
        assert_eq!(summary.external, 1);
    }

    #[test]
    fn page_speed_has_floor() {
        let mut signals = bundle();
        signals.images = images(0, 25);
        signals.script_count = 11;
        signals.stylesheet_hrefs = vec!["a.css".to_string(); 6];

        assert_eq!(estimate_page_speed(&signals).score, 55);
        assert_eq!(estimate_page_speed(&bundle()).score, 85);
    }

    #[test]
    fn mobile_rewards_viewport_and_media_queries() {
        let mut signals = bundle();
        signals.viewport = Some("width=device-width, initial-scale=1".to_string());
        signals.stylesheet_hrefs = vec!["/css/bootstrap.min.css".to_string()];
        signals.inline_styles =
            vec!["@media (max-width: 600px) { body { margin: 0 } }".to_string()];

        let result = score_mobile(&signals);
        assert_eq!(result.score, 95);
        assert!(result.issues.is_empty());

        let bare = score_mobile(&bundle());
        assert_eq!(bare.score, 70);
        assert_eq!(bare.issues.len(), 2);
    }

    #[test]
    fn security_penalises_plain_http() {
        let mut signals = bundle();
        signals.is_https = false;
        signals.resource_urls = vec!["http://cdn.example.com/a.js".to_string()];

        let result = score_security(&signals);

        assert_eq!(result.score, 60);
        assert_eq!(result.issues.len(), 1);
    }

    #[test]
    fn security_flags_mixed_content_on_https() {
        let mut signals = bundle();
        signals.has_csp_meta = true;
        signals.has_frame_options_meta = true;
        signals.resource_urls = vec![
            "http://cdn.example.com/a.js".to_string(),
            "http://cdn.example.com/b.css".to_string(),
            "https://cdn.example.com/c.css".to_string(),
        ];

        let result = score_security(&signals);

        assert_eq!(result.score, 93);
        assert!(result.issues[0].starts_with('2'));
        assert_eq!(result.features.len(), 3);
    }

    #[test]
    fn structured_data_survives_malformed_blocks() {
        let mut signals = bundle();
        signals.json_ld_blocks = vec![
            r#"{"@type": "Organization"}"#.to_string(),
            "{not json".to_string(),
            r#"{"@type": ["Article", "Organization"]}"#.to_string(),
        ];
        signals.microdata_types = vec!["https://schema.org/Product".to_string()];
        signals.rdfa_count = 1;

        let result = score_structured_data(&signals);

        assert_eq!(result.score, 95);
        assert_eq!(
            result.issues,
            vec!["Malformed JSON-LD block (#2)".to_string()]
        );
        assert_eq!(
            result.details,
            CategoryDetails::Types {
                types: vec![
                    "Organization".to_string(),
                    "Article".to_string(),
                    "Product".to_string()
                ]
            }
        );
    }

    #[test]
    fn structured_data_absent() {
        let result = score_structured_data(&bundle());
        assert_eq!(result.score, 60);
        assert_eq!(
            result.issues,
            vec!["No structured data markup found".to_string()]
        );
    }

    #[test]
    fn social_media_counts_tags() {
        let mut signals = bundle();
        signals.open_graph = vec!["og:title".to_string(), "og:image".to_string()];

        let result = score_social_media(&signals);

        assert_eq!(result.score, 66);
        assert_eq!(result.issues, vec!["Missing Twitter Card tags".to_string()]);
        match result.details {
            CategoryDetails::Platforms { platforms } => {
                assert_eq!(platforms["facebook"], "2/5 Open Graph tags");
                assert!(!platforms.contains_key("twitter"));
            }
            other => panic!("unexpected details: {other:?}"),
        }
    }

    #[test]
    fn social_media_is_capped() {
        let mut signals = bundle();
        signals.open_graph = OPEN_GRAPH_FIELDS.iter().map(|f| f.to_string()).collect();
        signals.twitter_card = TWITTER_CARD_FIELDS.iter().map(|f| f.to_string()).collect();
        assert_eq!(score_social_media(&signals).score, 95);
    }

    #[test]
    fn performance_penalties_and_bonuses() {
        let mut signals = bundle();
        signals.images = images(0, 30);
        signals.script_count = 15;
        signals.stylesheet_hrefs = vec!["a.css".to_string(); 10];

        let heavy = score_performance(&signals);
        assert_eq!(heavy.score, 40);
        assert_eq!(heavy.issues.len(), 3);

        let mut light = bundle();
        light.images = vec![ImageSignal {
            alt: None,
            lazy: true,
        }];
        light.script_sources = vec!["/app.min.js".to_string()];
        light.script_count = 1;
        let result = score_performance(&light);
        assert_eq!(result.score, 90);
        assert_eq!(result.features.len(), 2);
    }

    #[test]
    fn accessibility_combines_signals() {
        let mut signals = bundle();
        signals.images = images(9, 1);
        signals.form_controls = 2;
        signals.labels = 2;
        signals.headings = HeadingCounts {
            h1: 1,
            h2: 3,
            ..HeadingCounts::default()
        };
        signals.language = Some("en".to_string());
        signals.aria_count = 4;

        let result = score_accessibility(&signals);
        assert_eq!(result.score, 95);
        assert!(result.issues.is_empty());

        let bare = score_accessibility(&bundle());
        assert_eq!(bare.score, 65);
        assert_eq!(bare.issues.len(), 2);
    }

    #[test]
    fn accessibility_penalises_poor_alt_coverage_and_labels() {
        let mut signals = bundle();
        signals.images = images(1, 3);
        signals.form_controls = 3;
        signals.labels = 1;
        signals.headings.h1 = 2;

        let result = score_accessibility(&signals);

        assert_eq!(result.score, 40);
        assert_eq!(result.issues.len(), 4);
    }

    #[test]
    fn microdata_type_with_trailing_slash_counts_as_structured_data() {
        let mut signals = bundle();
        signals.microdata_types = vec!["https://schema.org/".to_string()];

        let result = score_structured_data(&signals);

        assert_eq!(result.score, 70);
        assert!(result.issues.is_empty());
        assert_eq!(
            result.details,
            CategoryDetails::Types {
                types: vec![String::new()]
            }
        );
    }

    #[test]
    fn every_score_stays_in_range() {
        let mut signals = bundle();
        signals.images = images(0, 500);
        signals.script_count = 500;
        signals.stylesheet_hrefs = vec!["a.css".to_string(); 500];
        signals.form_controls = 500;

        for (category, result) in score_all(&signals) {
            assert!(result.score <= 100, "{category} out of range");
        }
        assert_eq!(score_all(&signals).len(), 11);
    }

    #[test]
    fn scoring_is_deterministic() {
        let mut signals = bundle();
        signals.title = "A reasonably descriptive page title".to_string();
        signals.json_ld_blocks = vec![r#"{"@type":"WebSite"}"#.to_string()];
        assert_eq!(score_all(&signals), score_all(&signals));
    }
}
