//! Signal extraction from a document tree.
//!
//! [`extract_signals`] reduces a document to the flat set of facts the
//! category scorers read. It performs no scoring and never fails: missing
//! elements resolve to empty strings and zero counts.

use crate::address::PageAddress;
use crate::document::{Document, Query};
use crate::domain::HeadingCounts;

/// Open Graph properties checked for social previews.
pub const OPEN_GRAPH_FIELDS: [&str; 5] = [
    "og:title",
    "og:description",
    "og:image",
    "og:url",
    "og:type",
];

/// Twitter Card names checked for social previews.
pub const TWITTER_CARD_FIELDS: [&str; 4] = [
    "twitter:card",
    "twitter:title",
    "twitter:description",
    "twitter:image",
];

const ARIA_ATTRIBUTES: [&str; 3] = ["aria-label", "aria-labelledby", "aria-describedby"];
const FORM_CONTROLS: [&str; 3] = ["input", "textarea", "select"];
const RESOURCE_ATTRIBUTES: [&str; 2] = ["src", "href"];

/// Facts about one `<img>` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSignal {
    /// The `alt` attribute, if present.
    pub alt: Option<String>,
    /// Whether the image declares `loading="lazy"`.
    pub lazy: bool,
}

impl ImageSignal {
    /// Whether the image has non-blank alt text.
    pub fn has_alt_text(&self) -> bool {
        self.alt.as_deref().map(|alt| !alt.trim().is_empty()).unwrap_or(false)
    }

    /// Whether the image carries an `alt` attribute at all.
    pub fn has_alt_attribute(&self) -> bool {
        self.alt.is_some()
    }
}

/// Flat facts extracted from a page. Immutable once extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalBundle {
    /// Host of the page address.
    pub host: String,
    /// Whether the page address uses `https`.
    pub is_https: bool,
    /// Text of the first `<title>`.
    pub title: String,
    /// Content of the meta description.
    pub description: String,
    /// Heading counts per level.
    pub headings: HeadingCounts,
    /// Every `<img>`.
    pub images: Vec<ImageSignal>,
    /// The `href` of every anchor that has one.
    pub link_hrefs: Vec<String>,
    /// Number of `<script>` elements.
    pub script_count: usize,
    /// The `src` of every external script.
    pub script_sources: Vec<String>,
    /// The `href` of every stylesheet link.
    pub stylesheet_hrefs: Vec<String>,
    /// Content of the viewport meta tag; `Some("")` when present without content.
    pub viewport: Option<String>,
    /// Text of every `<style>` block.
    pub inline_styles: Vec<String>,
    /// Whether a Content-Security-Policy meta tag is present.
    pub has_csp_meta: bool,
    /// Whether an X-Frame-Options meta tag is present.
    pub has_frame_options_meta: bool,
    /// The `src` (or else `href`) of every element referencing a resource.
    pub resource_urls: Vec<String>,
    /// Raw text of every JSON-LD block.
    pub json_ld_blocks: Vec<String>,
    /// Raw `itemtype` values.
    pub microdata_types: Vec<String>,
    /// Number of elements with an RDFa `typeof` attribute.
    pub rdfa_count: usize,
    /// Open Graph properties present with non-empty content.
    pub open_graph: Vec<String>,
    /// Twitter Card names present with non-empty content.
    pub twitter_card: Vec<String>,
    /// Number of form controls.
    pub form_controls: usize,
    /// Number of labels bound to a control with `for`.
    pub labels: usize,
    /// The root `lang` attribute.
    pub language: Option<String>,
    /// Number of elements carrying descriptive ARIA attributes.
    pub aria_count: usize,
}

impl SignalBundle {
    /// Number of images.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Number of stylesheet links.
    pub fn stylesheet_count(&self) -> usize {
        self.stylesheet_hrefs.len()
    }

    /// Images, scripts and stylesheets combined.
    pub fn total_resources(&self) -> usize {
        self.image_count() + self.script_count + self.stylesheet_count()
    }

    /// Number of lazily loaded images.
    pub fn lazy_images(&self) -> usize {
        self.images.iter().filter(|image| image.lazy).count()
    }
}

/// Extract the signal bundle for a document served from `address`.
pub fn extract_signals<D: Document>(doc: &D, address: &PageAddress) -> SignalBundle {
    let title = doc
        .find_first(&Query::tag("title"))
        .map(|element| doc.text(&element))
        .unwrap_or_default();

    let bundle = SignalBundle {
        host: address.host().to_string(),
        is_https: address.is_https(),
        title,
        description: meta_content(doc, "name", "description").unwrap_or_default(),
        headings: extract_headings(doc),
        images: extract_images(doc),
        link_hrefs: attribute_values(doc, &Query::tag("a").with_attr("href"), "href"),
        script_count: doc.count(&Query::tag("script")),
        script_sources: attribute_values(doc, &Query::tag("script").with_attr("src"), "src"),
        stylesheet_hrefs: attribute_values(doc, &stylesheet_query(), "href"),
        viewport: doc
            .find_first(&Query::tag("meta").with_attr_value("name", "viewport"))
            .map(|element| doc.attribute(&element, "content").unwrap_or_default()),
        inline_styles: doc
            .find_all(&Query::tag("style"))
            .iter()
            .map(|element| doc.text(element))
            .collect(),
        has_csp_meta: doc
            .find_first(
                &Query::tag("meta").with_attr_value("http-equiv", "Content-Security-Policy"),
            )
            .is_some(),
        has_frame_options_meta: doc
            .find_first(&Query::tag("meta").with_attr_value("http-equiv", "X-Frame-Options"))
            .is_some(),
        resource_urls: extract_resource_urls(doc),
        json_ld_blocks: doc
            .find_all(&Query::tag("script").with_attr_value("type", "application/ld+json"))
            .iter()
            .map(|element| doc.text(element))
            .collect(),
        microdata_types: attribute_values(doc, &Query::attr("itemtype"), "itemtype"),
        rdfa_count: doc.count(&Query::attr("typeof")),
        open_graph: OPEN_GRAPH_FIELDS
            .iter()
            .filter(|field| meta_content(doc, "property", field).is_some_and(|c| !c.is_empty()))
            .map(|field| field.to_string())
            .collect(),
        twitter_card: TWITTER_CARD_FIELDS
            .iter()
            .filter(|field| meta_content(doc, "name", field).is_some_and(|c| !c.is_empty()))
            .map(|field| field.to_string())
            .collect(),
        form_controls: doc.count(&Query::tags(&FORM_CONTROLS)),
        labels: doc.count(&Query::tag("label").with_attr("for")),
        language: doc.root_attribute("lang").filter(|lang| !lang.is_empty()),
        aria_count: doc.count(&Query::any_attr(&ARIA_ATTRIBUTES)),
    };

    log::debug!(
        "extracted signals for {}: {} images, {} scripts, {} stylesheets, {} links",
        bundle.host,
        bundle.image_count(),
        bundle.script_count,
        bundle.stylesheet_count(),
        bundle.link_hrefs.len()
    );

    bundle
}

fn stylesheet_query() -> Query<'static> {
    Query::tag("link").with_attr_value("rel", "stylesheet")
}

fn meta_content<D: Document>(doc: &D, key: &str, value: &str) -> Option<String> {
    doc.find_first(&Query::tag("meta").with_attr_value(key, value))
        .map(|element| doc.attribute(&element, "content").unwrap_or_default())
}

fn attribute_values<D: Document>(doc: &D, query: &Query<'_>, name: &str) -> Vec<String> {
    doc.find_all(query)
        .iter()
        .filter_map(|element| doc.attribute(element, name))
        .collect()
}

fn extract_headings<D: Document>(doc: &D) -> HeadingCounts {
    HeadingCounts {
        h1: doc.count(&Query::tag("h1")),
        h2: doc.count(&Query::tag("h2")),
        h3: doc.count(&Query::tag("h3")),
        h4: doc.count(&Query::tag("h4")),
        h5: doc.count(&Query::tag("h5")),
        h6: doc.count(&Query::tag("h6")),
    }
}

fn extract_images<D: Document>(doc: &D) -> Vec<ImageSignal> {
    doc.find_all(&Query::tag("img"))
        .iter()
        .map(|element| ImageSignal {
            alt: doc.attribute(element, "alt"),
            lazy: doc
                .attribute(element, "loading")
                .is_some_and(|loading| loading.eq_ignore_ascii_case("lazy")),
        })
        .collect()
}

fn extract_resource_urls<D: Document>(doc: &D) -> Vec<String> {
    doc.find_all(&Query::any_attr(&RESOURCE_ATTRIBUTES))
        .iter()
        .filter_map(|element| {
            doc.attribute(element, "src")
                .filter(|src| !src.is_empty())
                .or_else(|| doc.attribute(element, "href"))
        })
        .filter(|resource| !resource.is_empty())
        .collect()
}
