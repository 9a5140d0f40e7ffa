//! # tagup
//!
//! Build HTML trees from terse selector strings and render them either as
//! one buffered string or as a lazy, cancellable sequence of chunks.
//!
//! The selector grammar mirrors CSS shorthand: `tag#id.class[attr=value]`.
//! The tag defaults to `div`, components may appear in any order, and an
//! attribute token runs to its matching `]`, so values carry `=`, commas,
//! colons and even newlines verbatim.
//!
//! ## Example
//!
//! ```rust
//! use tagup::{h, text, render_to_string, CancellationToken};
//!
//! let page = h("html[lang=en]", [
//!     h("head", [
//!         h("meta[charset=utf-8]", []).unwrap(),
//!         h("title", [text("Hello")]).unwrap(),
//!     ]).unwrap(),
//!     h("body", [
//!         h("h1#greeting", [text("Hello World!")]).unwrap(),
//!     ]).unwrap(),
//! ]).unwrap();
//!
//! let html = render_to_string(&page, &CancellationToken::new()).unwrap();
//! assert!(html.starts_with(r#"<html lang="en">"#));
//! ```
//!
//! ## Streaming
//!
//! [`render_chunks`] hands markup back one chunk at a time and does no
//! traversal until the consumer asks for the next chunk; concatenating
//! every chunk reproduces the buffered output byte for byte. With the
//! default `stream` feature, [`stream::render_stream`] adapts the owned
//! variant into a `futures::Stream` of `Bytes` for async response bodies.

#[cfg(feature = "stream")]
pub mod stream;

pub use tagup_core::{
    render_chunks, render_to_string, CancellationToken, Chunks, Element, Error, IntoChunks, Node,
    Result, Selector, SelectorError, SelectorErrorKind,
};

/// Build an element node from a selector string plus children.
///
/// # Example
///
/// ```rust
/// use tagup::{h, text, render_to_string, CancellationToken};
///
/// let node = h("a#x.y.z[href=/home][disabled]", [text("Home")]).unwrap();
/// let html = render_to_string(&node, &CancellationToken::new()).unwrap();
/// assert_eq!(html, r#"<a id="x" class="y z" href="/home" disabled>Home</a>"#);
/// ```
pub fn h<I>(selector: &str, children: I) -> Result<Node>
where
    I: IntoIterator<Item = Node>,
{
    Ok(Element::new(selector)?.children(children)?.into_node())
}

/// A text node. Content is escaped at render time.
pub fn text(content: impl Into<String>) -> Node {
    Node::Text(content.into())
}

/// A raw markup node. Content is emitted exactly as given, so the caller
/// vouches for its well-formedness.
pub fn raw(content: impl Into<String>) -> Node {
    Node::Raw(content.into())
}

/// A grouping node whose children render in its place. `fragment([])` is
/// the canonical empty placeholder.
pub fn fragment<I>(children: I) -> Node
where
    I: IntoIterator<Item = Node>,
{
    Node::Fragment(children.into_iter().collect())
}
