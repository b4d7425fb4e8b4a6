//! Markup document tree
//!
//! Link discovery and content extraction only need three capabilities from
//! a parsed page: find elements by tag name with an optional class filter,
//! read an attribute, and collect text. [`DocumentTree`] and [`TreeNode`]
//! describe exactly that, and [`HtmlDocument`] implements them on top of
//! `scraper`.

use scraper::{ElementRef, Html, Selector};

/// A parsed document that can be queried by tag and class
pub trait DocumentTree {
    /// Element handle borrowed from the document
    type Node<'a>: TreeNode
    where
        Self: 'a;

    /// Returns the first element with the given tag carrying `class`
    fn find_by_tag(&self, tag: &str, class: Option<&str>) -> Option<Self::Node<'_>>;

    /// Returns every element with the given tag carrying `class`, in
    /// document order
    fn find_all_by_tag(&self, tag: &str, class: Option<&str>) -> Vec<Self::Node<'_>>;

    /// Text of the document's `<title>`, trimmed; `None` when absent or blank
    fn title(&self) -> Option<String>;
}

/// An element inside a [`DocumentTree`]
pub trait TreeNode: Sized {
    /// Concatenation of every descendant text node
    fn text(&self) -> String;

    /// Value of an attribute, if present
    fn attr(&self, name: &str) -> Option<&str>;

    /// Descendant elements with the given tag carrying `class`
    fn find_all_by_tag(&self, tag: &str, class: Option<&str>) -> Vec<Self>;
}

/// HTML document backed by `scraper`
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parses an HTML document; parsing is lenient and never fails
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }
}

/// Element of an [`HtmlDocument`]
#[derive(Clone, Copy)]
pub struct HtmlNode<'a> {
    element: ElementRef<'a>,
}

impl DocumentTree for HtmlDocument {
    type Node<'a> = HtmlNode<'a>;

    fn find_by_tag(&self, tag: &str, class: Option<&str>) -> Option<HtmlNode<'_>> {
        let selector = tag_selector(tag)?;
        self.html
            .select(&selector)
            .find(|element| has_class(element, class))
            .map(|element| HtmlNode { element })
    }

    fn find_all_by_tag(&self, tag: &str, class: Option<&str>) -> Vec<HtmlNode<'_>> {
        let Some(selector) = tag_selector(tag) else {
            return Vec::new();
        };

        self.html
            .select(&selector)
            .filter(|element| has_class(element, class))
            .map(|element| HtmlNode { element })
            .collect()
    }

    fn title(&self) -> Option<String> {
        let selector = tag_selector("title")?;

        self.html
            .select(&selector)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

impl<'a> TreeNode for HtmlNode<'a> {
    fn text(&self) -> String {
        self.element.text().collect()
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.element.value().attr(name)
    }

    fn find_all_by_tag(&self, tag: &str, class: Option<&str>) -> Vec<Self> {
        let Some(selector) = tag_selector(tag) else {
            return Vec::new();
        };

        self.element
            .select(&selector)
            .filter(|element| *element != self.element && has_class(element, class))
            .map(|element| HtmlNode { element })
            .collect()
    }
}

/// Builds a type selector; tags that are not valid selectors match nothing
fn tag_selector(tag: &str) -> Option<Selector> {
    match Selector::parse(tag) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::debug!("Invalid tag selector '{}': {:?}", tag, e);
            None
        }
    }
}

/// Checks an element against an optional class filter
///
/// A single-token filter matches when the element's class list contains it.
/// A filter with several tokens must equal the whole class list.
fn has_class(element: &ElementRef<'_>, class: Option<&str>) -> bool {
    let filter = match class.map(str::trim) {
        Some(filter) if !filter.is_empty() => filter,
        _ => return true,
    };

    if filter.contains(char::is_whitespace) {
        let wanted: Vec<&str> = filter.split_whitespace().collect();
        let actual: Vec<&str> = element
            .value()
            .attr("class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default();
        return wanted == actual;
    }

    element.value().classes().any(|c| c == filter)
}
