//! Domain entities for SeoLens.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A scored content-quality category, in scan order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    /// The `<title>` element.
    TitleTag,
    /// The meta description.
    MetaDescription,
    /// Heading structure.
    Headings,
    /// Image alternative text coverage.
    Images,
    /// Structural load-cost estimate.
    PageSpeed,
    /// Small-screen readiness.
    MobileOptimization,
    /// Transport security and security meta tags.
    Security,
    /// JSON-LD, microdata and RDFa markup.
    StructuredData,
    /// Open Graph and Twitter Card metadata.
    SocialMedia,
    /// Resource counts and loading hints.
    Performance,
    /// Accessibility hints.
    Accessibility,
}

impl Category {
    /// Every category in scan order.
    pub const ALL: [Category; 11] = [
        Category::TitleTag,
        Category::MetaDescription,
        Category::Headings,
        Category::Images,
        Category::PageSpeed,
        Category::MobileOptimization,
        Category::Security,
        Category::StructuredData,
        Category::SocialMedia,
        Category::Performance,
        Category::Accessibility,
    ];

    /// Categories present in every report, including fallback estimates.
    pub const BASE: [Category; 6] = [
        Category::TitleTag,
        Category::MetaDescription,
        Category::Headings,
        Category::Images,
        Category::PageSpeed,
        Category::MobileOptimization,
    ];

    /// Whether the category is one of the six base categories.
    pub fn is_base(self) -> bool {
        Self::BASE.contains(&self)
    }

    /// Stable machine key, matching the serialized form.
    pub fn key(self) -> &'static str {
        match self {
            Category::TitleTag => "titleTag",
            Category::MetaDescription => "metaDescription",
            Category::Headings => "headings",
            Category::Images => "images",
            Category::PageSpeed => "pageSpeed",
            Category::MobileOptimization => "mobileOptimization",
            Category::Security => "security",
            Category::StructuredData => "structuredData",
            Category::SocialMedia => "socialMedia",
            Category::Performance => "performance",
            Category::Accessibility => "accessibility",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Category::TitleTag => "Title tag",
            Category::MetaDescription => "Meta description",
            Category::Headings => "Heading structure",
            Category::Images => "Image optimization",
            Category::PageSpeed => "Page speed",
            Category::MobileOptimization => "Mobile optimization",
            Category::Security => "Security",
            Category::StructuredData => "Structured data",
            Category::SocialMedia => "Social media",
            Category::Performance => "Performance",
            Category::Accessibility => "Accessibility",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Heading counts per level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HeadingCounts {
    /// `<h1>` count.
    pub h1: usize,
    /// `<h2>` count.
    pub h2: usize,
    /// `<h3>` count.
    pub h3: usize,
    /// `<h4>` count.
    pub h4: usize,
    /// `<h5>` count.
    pub h5: usize,
    /// `<h6>` count.
    pub h6: usize,
}

/// Category-specific facts attached to a [`CategoryResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CategoryDetails {
    /// Title or description text and its length in characters.
    Text {
        /// The text content.
        content: String,
        /// Length in characters.
        length: usize,
    },
    /// Heading distribution.
    Headings {
        /// Counts per level.
        structure: HeadingCounts,
    },
    /// Image alt coverage.
    Images {
        /// Total images.
        total: usize,
        /// Images with non-blank alt text.
        #[serde(rename = "withAlt")]
        with_alt: usize,
        /// Images without alt text.
        #[serde(rename = "withoutAlt")]
        without_alt: usize,
        /// Rounded percentage of images with alt text.
        #[serde(rename = "altPercentage")]
        alt_percentage: u8,
    },
    /// Resource counts used by the load estimates.
    Resources {
        /// `<img>` count.
        images: usize,
        /// `<script>` count.
        scripts: usize,
        /// Stylesheet link count.
        stylesheets: usize,
        /// Sum of the three counts.
        #[serde(rename = "totalResources")]
        total_resources: usize,
        /// Images declared with lazy loading.
        #[serde(rename = "lazyLoadingImages")]
        lazy_loading_images: usize,
        /// Whether a minified stylesheet or script is referenced.
        #[serde(rename = "hasMinification")]
        has_minification: bool,
    },
    /// Structured data types found on the page.
    Types {
        /// Distinct declared types, in discovery order.
        types: Vec<String>,
    },
    /// Social metadata coverage per platform.
    Platforms {
        /// Platform name to coverage summary, e.g. `facebook` → `3/5`.
        platforms: BTreeMap<String, String>,
    },
    /// Categories without extra facts.
    None,
}

/// The result of scoring one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryResult {
    /// Score in `0..=100`.
    pub score: u8,
    /// Problems found, in detection order.
    pub issues: Vec<String>,
    /// Positive findings, in detection order.
    pub features: Vec<String>,
    /// Category-specific facts.
    pub details: CategoryDetails,
}

impl CategoryResult {
    /// A result with a score and no annotations.
    pub fn scored(score: u8) -> Self {
        Self {
            score,
            issues: Vec::new(),
            features: Vec::new(),
            details: CategoryDetails::None,
        }
    }
}

/// Internal versus external link counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LinkSummary {
    /// Anchors with an `href`.
    pub total: usize,
    /// Same-host or relative links.
    pub internal: usize,
    /// Links to other hosts.
    pub external: usize,
}

/// Scored categories keyed by category, in scan order.
pub type CategoryScores = BTreeMap<Category, CategoryResult>;

/// A complete analysis of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// The analysed address.
    pub url: String,
    /// Host component of the address.
    pub domain: String,
    /// RFC 3339 analysis time.
    pub timestamp: String,
    /// Rounded mean of the category scores.
    pub overall_score: u8,
    /// Scored categories.
    #[schema(value_type = Object)]
    pub categories: CategoryScores,
    /// Link classification, absent for estimates.
    pub links: Option<LinkSummary>,
    /// Ranked improvement suggestions.
    pub suggestions: Vec<String>,
    /// Set when the report is an estimate rather than a content analysis.
    pub note: Option<String>,
}

impl AnalysisReport {
    /// Score of a category, if the report contains it.
    pub fn score(&self, category: Category) -> Option<u8> {
        self.categories.get(&category).map(|result| result.score)
    }

    /// Whether the report was estimated without page content.
    pub fn is_estimate(&self) -> bool {
        self.note.is_some()
    }
}

/// Outcome of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum VerdictKind {
    /// Overall scores differ by less than five points.
    Tie,
    /// The primary page scores higher.
    PrimaryWins,
    /// The competitor page scores higher.
    CompetitorWins,
}

/// Winner determination with the absolute score gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Verdict {
    /// Who won.
    pub kind: VerdictKind,
    /// Absolute difference of the overall scores.
    pub margin: u8,
}

/// Head-to-head comparison of two analyses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    /// The primary page.
    pub primary: AnalysisReport,
    /// The competitor page.
    pub competitor: AnalysisReport,
    /// Primary minus competitor score, per common category.
    #[schema(value_type = Object)]
    pub per_category_delta: BTreeMap<Category, i16>,
    /// Winner determination.
    pub verdict: Verdict,
    /// Base categories where the primary leads by more than ten points.
    pub strengths: Vec<Category>,
    /// Base categories where the competitor leads by more than ten points.
    pub opportunities: Vec<Category>,
    /// Qualitative remarks.
    pub insights: Vec<String>,
    /// RFC 3339 comparison time.
    pub timestamp: String,
}

impl ComparisonReport {
    /// Primary overall score minus competitor overall score.
    pub fn signed_difference(&self) -> i16 {
        i16::from(self.primary.overall_score) - i16::from(self.competitor.overall_score)
    }
}
