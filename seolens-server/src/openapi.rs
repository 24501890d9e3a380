//! OpenAPI specification for SeoLens server.

use utoipa::OpenApi;

use seolens_core::{
    AnalysisReport, Category, CategoryDetails, CategoryResult, ComparisonReport,
    ComparisonSummary, HeadingCounts, LinkSummary, SiteScore, Verdict, VerdictKind,
};

use crate::routes::{AnalyzeRequest, CompareRequest, ErrorResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::analyze,
        crate::routes::compare,
        crate::routes::history_analyses,
        crate::routes::history_comparisons,
        crate::routes::openapi_json
    ),
    components(
        schemas(
            AnalyzeRequest,
            CompareRequest,
            ErrorResponse,
            AnalysisReport,
            Category,
            CategoryResult,
            CategoryDetails,
            HeadingCounts,
            LinkSummary,
            ComparisonReport,
            Verdict,
            VerdictKind,
            ComparisonSummary,
            SiteScore
        )
    ),
    tags(
        (name = "analysis", description = "Page analysis and comparison"),
        (name = "history", description = "Recent results"),
        (name = "system", description = "System endpoints")
    )
)]
/// OpenAPI specification for the SeoLens server.
pub struct ApiDoc;
