//! Queryable document trees.
//!
//! The extractor only needs two capabilities from a markup tree: finding every
//! element that matches a [`Query`] and reading attributes or text from those
//! elements. [`HtmlDocument`] provides them over a parsed HTML tree and
//! [`StaticDocument`] over a flat list of literal elements.

use kuchiki::traits::*;
use kuchiki::{ElementData, NodeDataRef, NodeRef};

/// Which element names a query accepts.
#[derive(Debug, Clone, Copy)]
pub enum TagMatch<'a> {
    /// Any element.
    Any,
    /// A single element name.
    One(&'a str),
    /// Any of several element names.
    OneOf(&'a [&'a str]),
}

/// Which attributes a query requires.
#[derive(Debug, Clone, Copy)]
pub enum AttributeMatch<'a> {
    /// The attribute is present, whatever its value.
    Present(&'a str),
    /// The attribute equals the value, ignoring ASCII case.
    Equals(&'a str, &'a str),
    /// At least one of the attributes is present.
    AnyPresent(&'a [&'a str]),
}

/// A tag and attribute predicate over elements.
#[derive(Debug, Clone, Copy)]
pub struct Query<'a> {
    tag: TagMatch<'a>,
    attribute: Option<AttributeMatch<'a>>,
}

impl<'a> Query<'a> {
    /// Match elements with the given name.
    pub const fn tag(name: &'a str) -> Self {
        Self {
            tag: TagMatch::One(name),
            attribute: None,
        }
    }

    /// Match elements with any of the given names.
    pub const fn tags(names: &'a [&'a str]) -> Self {
        Self {
            tag: TagMatch::OneOf(names),
            attribute: None,
        }
    }

    /// Match any element carrying the attribute.
    pub const fn attr(name: &'a str) -> Self {
        Self {
            tag: TagMatch::Any,
            attribute: Some(AttributeMatch::Present(name)),
        }
    }

    /// Match any element carrying at least one of the attributes.
    pub const fn any_attr(names: &'a [&'a str]) -> Self {
        Self {
            tag: TagMatch::Any,
            attribute: Some(AttributeMatch::AnyPresent(names)),
        }
    }

    /// Additionally require the attribute to be present.
    pub const fn with_attr(mut self, name: &'a str) -> Self {
        self.attribute = Some(AttributeMatch::Present(name));
        self
    }

    /// Additionally require the attribute to equal a value.
    pub const fn with_attr_value(mut self, name: &'a str, value: &'a str) -> Self {
        self.attribute = Some(AttributeMatch::Equals(name, value));
        self
    }

    /// Test an element given its lowercase name and an attribute lookup.
    pub fn matches<'v>(&self, tag: &str, attribute: impl Fn(&str) -> Option<&'v str>) -> bool {
        let tag_ok = match self.tag {
            TagMatch::Any => true,
            TagMatch::One(name) => tag.eq_ignore_ascii_case(name),
            TagMatch::OneOf(names) => names.iter().any(|name| tag.eq_ignore_ascii_case(name)),
        };
        if !tag_ok {
            return false;
        }
        match self.attribute {
            None => true,
            Some(AttributeMatch::Present(name)) => attribute(name).is_some(),
            Some(AttributeMatch::Equals(name, expected)) => attribute(name)
                .map(|value| value.eq_ignore_ascii_case(expected))
                .unwrap_or(false),
            Some(AttributeMatch::AnyPresent(names)) => {
                names.iter().any(|name| attribute(name).is_some())
            }
        }
    }
}

/// A markup tree that can be searched by [`Query`].
pub trait Document {
    /// Handle to a matched element.
    type Element;

    /// All elements matching the query, in document order.
    fn find_all(&self, query: &Query<'_>) -> Vec<Self::Element>;

    /// Read an attribute value from an element.
    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    /// The concatenated text content of an element.
    fn text(&self, element: &Self::Element) -> String;

    /// The first element matching the query.
    fn find_first(&self, query: &Query<'_>) -> Option<Self::Element> {
        self.find_all(query).into_iter().next()
    }

    /// Count elements matching the query.
    fn count(&self, query: &Query<'_>) -> usize {
        self.find_all(query).len()
    }

    /// Read an attribute of the root `<html>` element.
    fn root_attribute(&self, name: &str) -> Option<String> {
        self.find_first(&Query::tag("html"))
            .and_then(|root| self.attribute(&root, name))
    }
}

/// An HTML document parsed with `kuchiki`.
pub struct HtmlDocument {
    root: NodeRef,
}

impl HtmlDocument {
    /// Parse markup into a document. Parsing never fails; malformed markup is
    /// repaired the way browsers repair it.
    pub fn parse(markup: &str) -> Self {
        Self {
            root: kuchiki::parse_html().one(markup),
        }
    }
}

impl Document for HtmlDocument {
    type Element = NodeDataRef<ElementData>;

    fn find_all(&self, query: &Query<'_>) -> Vec<Self::Element> {
        self.root
            .inclusive_descendants()
            .elements()
            .filter(|element| {
                let attributes = element.attributes.borrow();
                query.matches(&element.name.local, |name| attributes.get(name))
            })
            .collect()
    }

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String> {
        element.attributes.borrow().get(name).map(str::to_string)
    }

    fn text(&self, element: &Self::Element) -> String {
        element.as_node().text_contents()
    }
}

/// A literal element for [`StaticDocument`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticElement {
    /// Lowercase element name.
    pub tag: String,
    /// Attribute name/value pairs.
    pub attributes: Vec<(String, String)>,
    /// Text content.
    pub text: String,
}

/// A flat document built from literal elements, useful when markup has
/// already been reduced to a list of tags.
#[derive(Debug, Clone, Default)]
pub struct StaticDocument {
    elements: Vec<StaticElement>,
}

impl StaticDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element with attributes and no text.
    pub fn element(self, tag: &str, attributes: &[(&str, &str)]) -> Self {
        self.element_with_text(tag, attributes, "")
    }

    /// Append an element with attributes and text content.
    pub fn element_with_text(mut self, tag: &str, attributes: &[(&str, &str)], text: &str) -> Self {
        self.elements.push(StaticElement {
            tag: tag.to_ascii_lowercase(),
            attributes: attributes
                .iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value.to_string()))
                .collect(),
            text: text.to_string(),
        });
        self
    }

    /// Append `count` copies of an element.
    pub fn repeat(mut self, count: usize, tag: &str, attributes: &[(&str, &str)]) -> Self {
        for _ in 0..count {
            self = self.element(tag, attributes);
        }
        self
    }
}

impl Document for StaticDocument {
    type Element = StaticElement;

    fn find_all(&self, query: &Query<'_>) -> Vec<Self::Element> {
        self.elements
            .iter()
            .filter(|element| query.matches(&element.tag, |name| lookup(element, name)))
            .cloned()
            .collect()
    }

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String> {
        lookup(element, name).map(str::to_string)
    }

    fn text(&self, element: &Self::Element) -> String {
        element.text.clone()
    }
}

fn lookup<'e>(element: &'e StaticElement, name: &str) -> Option<&'e str> {
    element
        .attributes
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
