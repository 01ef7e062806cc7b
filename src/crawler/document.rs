//! Queryable HTML document
//!
//! A thin layer over `scraper` exposing the query contract the extractor and
//! the pagination resolver rely on. Every lookup returns an `Option` or a
//! (possibly empty) `Vec`: a missing node is never an error here, and callers
//! must branch on absence before reading text or attributes.

use scraper::{ElementRef, Html, Selector};

/// A parsed HTML page
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses an already-decoded HTML string
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// The document's root element
    pub fn root(&self) -> Node<'_> {
        Node {
            element: self.html.root_element(),
        }
    }

    /// All elements matching a CSS selector, in document order
    pub fn select(&self, selector: &Selector) -> Vec<Node<'_>> {
        self.html.select(selector).map(Node::from).collect()
    }

    /// First element matching a CSS selector
    pub fn select_first(&self, selector: &Selector) -> Option<Node<'_>> {
        self.html.select(selector).next().map(Node::from)
    }

    /// First `tag` element accepted by `predicate`
    pub fn find_first<F>(&self, tag: &str, predicate: F) -> Option<Node<'_>>
    where
        F: Fn(&Node<'_>) -> bool,
    {
        let root = self.root();
        std::iter::once(root)
            .chain(root.descendants())
            .find(|node| node.tag_name() == tag && predicate(node))
    }

    /// Every `tag` element accepted by `predicate`, in document order
    pub fn find_all<F>(&self, tag: &str, predicate: F) -> Vec<Node<'_>>
    where
        F: Fn(&Node<'_>) -> bool,
    {
        let root = self.root();
        std::iter::once(root)
            .chain(root.descendants())
            .filter(|node| node.tag_name() == tag && predicate(node))
            .collect()
    }
}

/// An element of a parsed document
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

impl<'a> From<ElementRef<'a>> for Node<'a> {
    fn from(element: ElementRef<'a>) -> Self {
        Self { element }
    }
}

impl<'a> Node<'a> {
    /// Element name, lowercase
    pub fn tag_name(&self) -> &'a str {
        self.element.value().name()
    }

    /// Attribute value, if the attribute is present
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Returns true if the element carries `class`
    pub fn has_class(&self, class: &str) -> bool {
        self.element.value().classes().any(|c| c == class)
    }

    /// Text content of the subtree
    ///
    /// With `strip_whitespace`, every run of whitespace collapses to a single
    /// space and the result is trimmed; otherwise text nodes are concatenated
    /// as they are.
    pub fn text(&self, strip_whitespace: bool) -> String {
        if strip_whitespace {
            self.element
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            self.element.text().collect()
        }
    }

    /// Descendant elements (excluding this one) matching a CSS selector
    pub fn select(&self, selector: &Selector) -> Vec<Node<'a>> {
        self.element.select(selector).map(Node::from).collect()
    }

    /// First descendant element matching a CSS selector
    pub fn select_first(&self, selector: &Selector) -> Option<Node<'a>> {
        self.element.select(selector).next().map(Node::from)
    }

    /// First descendant `tag` element accepted by `predicate`
    pub fn find_first<F>(&self, tag: &str, predicate: F) -> Option<Node<'a>>
    where
        F: Fn(&Node<'a>) -> bool,
    {
        self.descendants()
            .find(|node| node.tag_name() == tag && predicate(node))
    }

    /// Every descendant `tag` element accepted by `predicate`
    pub fn find_all<F>(&self, tag: &str, predicate: F) -> Vec<Node<'a>>
    where
        F: Fn(&Node<'a>) -> bool,
    {
        self.descendants()
            .filter(|node| node.tag_name() == tag && predicate(node))
            .collect()
    }

    fn descendants(&self) -> impl Iterator<Item = Node<'a>> {
        self.element
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .map(Node::from)
    }
}
