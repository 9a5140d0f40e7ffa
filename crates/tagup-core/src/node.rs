//! HTML node model
//!
//! [`Node`] is a closed set of variants: elements, text (escaped at
//! render time), raw markup (emitted verbatim) and fragments (children
//! spliced in place). Trees are built once and never mutated by
//! rendering, so a finished tree can be rendered from several threads
//! at once.

use indexmap::{IndexMap, IndexSet};

use crate::selector::Selector;
use crate::{Error, Result};

/// Tags that cannot hold children and render without a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.iter().any(|t| tag.eq_ignore_ascii_case(t))
}

/// A node in an HTML tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An element with a tag, attributes and children.
    Element(Element),
    /// Text content, escaped when rendered.
    Text(String),
    /// Markup emitted byte for byte, never escaped or validated.
    Raw(String),
    /// A grouping node whose children render in its place. An empty
    /// fragment renders as nothing and serves as the neutral placeholder.
    Fragment(Vec<Node>),
}

/// An HTML element.
///
/// Usually constructed from a selector string and extended with
/// value-style chaining setters:
///
/// ```rust
/// use tagup_core::{Element, Node};
///
/// let link = Element::new("a.button")
///     .unwrap()
///     .id("cta")
///     .href("/signup")
///     .child(Node::Text("Sign up".to_string()))
///     .unwrap();
/// ```
///
/// The `id` and classes live outside the generic attribute map but render
/// as ordinary `id` and `class` attributes, always first in the open tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub(crate) tag: String,
    pub(crate) id: Option<String>,
    pub(crate) classes: IndexSet<String>,
    pub(crate) attributes: IndexMap<String, Option<String>>,
    pub(crate) children: Vec<Node>,
    pub(crate) void: bool,
}

impl Element {
    /// Parse `selector` and construct the element it describes.
    pub fn new(selector: &str) -> Result<Self> {
        Ok(Self::from_selector(Selector::parse(selector)?))
    }

    /// Construct an element from an already parsed selector.
    pub fn from_selector(selector: Selector) -> Self {
        let mut element = Self {
            void: is_void_tag(&selector.tag),
            tag: selector.tag,
            id: selector.id,
            classes: selector.classes,
            attributes: IndexMap::new(),
            children: Vec::new(),
        };
        // Route through the setters so [id=..] and [class=..] tokens
        // land in the dedicated fields rather than the attribute map.
        for (name, value) in selector.attributes {
            element = match value {
                Some(value) => element.attr(name, value),
                None => element.flag(name),
            };
        }
        element
    }

    /// Element tag as written in the selector.
    pub fn tag_name(&self) -> &str {
        &self.tag
    }

    /// The element id, when one has been set.
    pub fn element_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Classes in first-seen order.
    pub fn classes(&self) -> &IndexSet<String> {
        &self.classes
    }

    /// Stored attributes in insertion order. `None` values are bare flags.
    pub fn attributes(&self) -> &IndexMap<String, Option<String>> {
        &self.attributes
    }

    /// Child nodes in document order.
    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    /// Whether this element renders without a closing tag.
    pub fn is_void(&self) -> bool {
        self.void
    }

    /// Whether an attribute with this name is set, `id` and `class`
    /// included.
    pub fn has_attr(&self, name: &str) -> bool {
        match name.to_ascii_lowercase().as_str() {
            "id" => self.id.is_some(),
            "class" => !self.classes.is_empty(),
            name => self.attributes.contains_key(name),
        }
    }

    /// Set attribute `name` to `value`.
    ///
    /// Setting an existing attribute replaces its value and keeps its
    /// original position in the open tag. An explicit empty value renders
    /// as `name=""`; use [`flag`](Self::flag) for bare boolean attributes.
    /// `id` and `class` route to their dedicated fields.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        match name.as_str() {
            "id" => self.id = Some(value),
            "class" => self.add_classes(&value),
            _ => {
                self.attributes.insert(name, Some(value));
            }
        }
        self
    }

    /// Set a bare flag attribute such as `disabled`.
    pub fn flag(mut self, name: impl Into<String>) -> Self {
        self.attributes.insert(name.into().to_ascii_lowercase(), None);
        self
    }

    /// Set the element id, replacing any previous one.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add one or more whitespace-separated classes. Duplicates are
    /// no-ops; first-seen order is kept.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        self.add_classes(&class);
        self
    }

    fn add_classes(&mut self, value: &str) {
        for class in value.split_whitespace() {
            self.classes.insert(class.to_string());
        }
    }

    /// Set the `href` attribute.
    pub fn href(self, value: impl Into<String>) -> Self {
        self.attr("href", value)
    }

    /// Set the `src` attribute.
    pub fn src(self, value: impl Into<String>) -> Self {
        self.attr("src", value)
    }

    /// Set the `alt` attribute.
    pub fn alt(self, value: impl Into<String>) -> Self {
        self.attr("alt", value)
    }

    /// Set the `title` attribute.
    pub fn title(self, value: impl Into<String>) -> Self {
        self.attr("title", value)
    }

    /// Set the `style` attribute.
    pub fn style(self, value: impl Into<String>) -> Self {
        self.attr("style", value)
    }

    /// Set the `value` attribute.
    pub fn value(self, value: impl Into<String>) -> Self {
        self.attr("value", value)
    }

    /// Append a child node. Void elements reject children.
    pub fn child(mut self, child: Node) -> Result<Self> {
        if self.void {
            return Err(Error::VoidChildren(self.tag));
        }
        self.children.push(child);
        Ok(self)
    }

    /// Append children in order. Void elements reject any non-empty
    /// sequence.
    pub fn children<I>(mut self, children: I) -> Result<Self>
    where
        I: IntoIterator<Item = Node>,
    {
        let mut children = children.into_iter();
        if self.void {
            if children.next().is_some() {
                return Err(Error::VoidChildren(self.tag));
            }
            return Ok(self);
        }
        self.children.extend(children);
        Ok(self)
    }

    /// Wrap this element as a [`Node`].
    pub fn into_node(self) -> Node {
        Node::Element(self)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_from_selector() {
        let element = Element::new("a#x.y.z[href=/home][disabled]").unwrap();
        assert_eq!(element.tag_name(), "a");
        assert_eq!(element.element_id(), Some("x"));
        assert_eq!(element.classes().len(), 2);
        assert_eq!(element.attributes()["href"].as_deref(), Some("/home"));
        assert_eq!(element.attributes()["disabled"], None);
        assert!(!element.is_void());
        assert!(element.child_nodes().is_empty());
    }

    #[test]
    fn test_selector_errors_surface() {
        assert!(matches!(Element::new("a["), Err(Error::Selector(_))));
    }

    #[test]
    fn test_void_detection_is_case_insensitive() {
        assert!(Element::new("br").unwrap().is_void());
        assert!(Element::new("IMG").unwrap().is_void());
        assert!(!Element::new("div").unwrap().is_void());
    }

    #[test]
    fn test_void_rejects_child() {
        let err = Element::new("br")
            .unwrap()
            .child(Node::Text("x".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::VoidChildren(tag) if tag == "br"));
    }

    #[test]
    fn test_void_rejects_children_sequence() {
        let err = Element::new("img")
            .unwrap()
            .children([Node::Text("x".to_string())])
            .unwrap_err();
        assert!(matches!(err, Error::VoidChildren(tag) if tag == "img"));
    }

    #[test]
    fn test_void_accepts_empty_children_sequence() {
        assert!(Element::new("hr").unwrap().children([]).is_ok());
    }

    #[test]
    fn test_attribute_overwrite_keeps_position() {
        let element = Element::new("input[type=text]")
            .unwrap()
            .attr("name", "q")
            .attr("type", "search");
        let keys: Vec<&str> = element.attributes().keys().map(String::as_str).collect();
        assert_eq!(keys, ["type", "name"]);
        assert_eq!(element.attributes()["type"].as_deref(), Some("search"));
    }

    #[test]
    fn test_attr_names_lowercased() {
        let element = Element::new("div").unwrap().attr("Data-X", "1");
        assert!(element.has_attr("data-x"));
        assert!(element.has_attr("DATA-X"));
    }

    #[test]
    fn test_attr_routes_id_and_class() {
        let element = Element::new("div")
            .unwrap()
            .attr("id", "main")
            .attr("class", "a b");
        assert_eq!(element.element_id(), Some("main"));
        assert_eq!(element.classes().len(), 2);
        assert!(element.attributes().is_empty());
    }

    #[test]
    fn test_id_setter_replaces() {
        let element = Element::new("div#old").unwrap().id("new");
        assert_eq!(element.element_id(), Some("new"));
    }

    #[test]
    fn test_class_setter_dedups() {
        let element = Element::new("div.a").unwrap().class("a").class("b c").class("b");
        let classes: Vec<&str> = element.classes().iter().map(String::as_str).collect();
        assert_eq!(classes, ["a", "b", "c"]);
    }

    #[test]
    fn test_flag_setter() {
        let element = Element::new("input").unwrap().flag("Required");
        assert_eq!(element.attributes()["required"], None);
    }

    #[test]
    fn test_convenience_setters() {
        let element = Element::new("img")
            .unwrap()
            .src("/logo.png")
            .alt("logo")
            .title("Logo")
            .style("width: 4rem");
        assert_eq!(element.attributes()["src"].as_deref(), Some("/logo.png"));
        assert_eq!(element.attributes()["alt"].as_deref(), Some("logo"));
        assert_eq!(element.attributes()["title"].as_deref(), Some("Logo"));
        assert_eq!(element.attributes()["style"].as_deref(), Some("width: 4rem"));
    }

    #[test]
    fn test_has_attr_covers_id_and_class() {
        let element = Element::new("a#x.y[href=/h]").unwrap();
        assert!(element.has_attr("id"));
        assert!(element.has_attr("class"));
        assert!(element.has_attr("href"));
        assert!(!element.has_attr("src"));
    }

    #[test]
    fn test_children_appended_in_order() {
        let element = Element::new("ul")
            .unwrap()
            .child(Node::Text("a".to_string()))
            .unwrap()
            .children([Node::Text("b".to_string()), Node::Text("c".to_string())])
            .unwrap();
        assert_eq!(element.child_nodes().len(), 3);
        assert_eq!(element.child_nodes()[2], Node::Text("c".to_string()));
    }

    #[test]
    fn test_into_node() {
        let node = Element::new("p").unwrap().into_node();
        assert!(matches!(node, Node::Element(_)));
        let node: Node = Element::new("p").unwrap().into();
        assert!(matches!(node, Node::Element(_)));
    }
}
