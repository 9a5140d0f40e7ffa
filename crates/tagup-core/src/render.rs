//! HTML serialization
//!
//! One explicit work-stack walker drives every strategy, so buffered and
//! chunked output of the same tree are byte-identical by construction.
//! [`render_to_string`] walks to completion into a single buffer;
//! [`render_chunks`] and [`Node::into_chunks`] hand back one piece of
//! markup per pull and stop early once the supplied token is cancelled.

use tokio_util::sync::CancellationToken;

use crate::node::{Element, Node};
use crate::{Error, Result};

/// Escape text for element body position.
fn escape_text(input: &str, out: &mut String) {
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// Escape an attribute value for a double-quoted position.
fn escape_attr(input: &str, out: &mut String) {
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// Write an element's open tag: synthesized `id` first, `class` second,
/// stored attributes after them in insertion order.
fn write_open_tag(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    if let Some(id) = &element.id {
        out.push_str(" id=\"");
        escape_attr(id, out);
        out.push('"');
    }
    if !element.classes.is_empty() {
        out.push_str(" class=\"");
        for (i, class) in element.classes.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            escape_attr(class, out);
        }
        out.push('"');
    }
    for (name, value) in &element.attributes {
        out.push(' ');
        out.push_str(name);
        if let Some(value) = value {
            out.push_str("=\"");
            escape_attr(value, out);
            out.push('"');
        }
    }
    out.push('>');
}

fn write_close_tag(tag: &str, out: &mut String) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// One pending unit of traversal work.
enum Step<'a> {
    Open(&'a Node),
    Close(&'a str),
}

/// Depth-first walker over a borrowed tree.
struct Walker<'a> {
    stack: Vec<Step<'a>>,
}

impl<'a> Walker<'a> {
    fn new(node: &'a Node) -> Self {
        Self {
            stack: vec![Step::Open(node)],
        }
    }

    /// Write the next piece of markup into `out`; `false` once the walk
    /// is complete. A step may write nothing (fragments, empty text).
    fn advance(&mut self, out: &mut String) -> bool {
        let Some(step) = self.stack.pop() else {
            return false;
        };
        match step {
            Step::Open(Node::Element(element)) => {
                write_open_tag(element, out);
                if !element.void {
                    self.stack.push(Step::Close(element.tag.as_str()));
                    for child in element.children.iter().rev() {
                        self.stack.push(Step::Open(child));
                    }
                }
            }
            Step::Open(Node::Text(text)) => escape_text(text, out),
            Step::Open(Node::Raw(raw)) => out.push_str(raw),
            Step::Open(Node::Fragment(children)) => {
                for child in children.iter().rev() {
                    self.stack.push(Step::Open(child));
                }
            }
            Step::Close(tag) => write_close_tag(tag, out),
        }
        true
    }
}

/// Render a tree to one complete string.
///
/// The token is checked before every traversal step. If it is cancelled,
/// including before the first step, the partial buffer is dropped and
/// [`Error::Cancelled`] is returned. Rendering performs no I/O and never
/// blocks, so this is safe to call from async contexts directly.
pub fn render_to_string(node: &Node, cancel: &CancellationToken) -> Result<String> {
    let mut out = String::with_capacity(1024);
    let mut walker = Walker::new(node);
    loop {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if !walker.advance(&mut out) {
            return Ok(out);
        }
    }
}

/// Render a tree as a lazy sequence of markup chunks.
///
/// No traversal happens up front; each [`Iterator::next`] call does one
/// unit of work, so a slow consumer naturally throttles the renderer.
/// Chunk boundaries are an implementation detail. Only the concatenation
/// of all chunks is contractual: it equals [`render_to_string`] output
/// byte for byte.
pub fn render_chunks<'a>(node: &'a Node, cancel: &CancellationToken) -> Chunks<'a> {
    Chunks {
        walker: Walker::new(node),
        cancel: cancel.clone(),
        cancelled: false,
        done: false,
    }
}

/// Pull-based chunk sequence over a borrowed tree.
///
/// Each `next` call first checks the cancellation token: once it has
/// fired the sequence yields `None` forever and no error is raised,
/// since chunks already handed out may have been delivered already.
/// Chunks are never empty. The sequence is not restartable; render the
/// tree again for a fresh traversal.
pub struct Chunks<'a> {
    walker: Walker<'a>,
    cancel: CancellationToken,
    cancelled: bool,
    done: bool,
}

impl Chunks<'_> {
    /// Whether the sequence stopped because the token fired.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

impl Iterator for Chunks<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        if self.cancel.is_cancelled() {
            self.done = true;
            self.cancelled = true;
            return None;
        }
        let mut chunk = String::new();
        loop {
            if !self.walker.advance(&mut chunk) {
                self.done = true;
                return None;
            }
            if !chunk.is_empty() {
                return Some(chunk);
            }
        }
    }
}

impl std::iter::FusedIterator for Chunks<'_> {}

/// One pending unit of traversal work over an owned tree.
enum OwnedStep {
    Open(Node),
    Close(String),
}

/// Pull-based chunk sequence that owns its tree.
///
/// Behaves exactly like [`Chunks`] but consumes the node, so the
/// sequence can outlive the frame that built the tree, for example when
/// a response body is produced after a handler has returned.
pub struct IntoChunks {
    stack: Vec<OwnedStep>,
    cancel: CancellationToken,
    cancelled: bool,
    done: bool,
}

impl Node {
    /// Consume this tree and render it as a lazy sequence of chunks.
    pub fn into_chunks(self, cancel: &CancellationToken) -> IntoChunks {
        IntoChunks {
            stack: vec![OwnedStep::Open(self)],
            cancel: cancel.clone(),
            cancelled: false,
            done: false,
        }
    }
}

impl IntoChunks {
    /// Whether the sequence stopped because the token fired.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    fn advance(&mut self, out: &mut String) -> bool {
        let Some(step) = self.stack.pop() else {
            return false;
        };
        match step {
            OwnedStep::Open(Node::Element(element)) => {
                write_open_tag(&element, out);
                let Element {
                    tag,
                    children,
                    void,
                    ..
                } = element;
                if !void {
                    self.stack.push(OwnedStep::Close(tag));
                    for child in children.into_iter().rev() {
                        self.stack.push(OwnedStep::Open(child));
                    }
                }
            }
            OwnedStep::Open(Node::Text(text)) => escape_text(&text, out),
            OwnedStep::Open(Node::Raw(raw)) => out.push_str(&raw),
            OwnedStep::Open(Node::Fragment(children)) => {
                for child in children.into_iter().rev() {
                    self.stack.push(OwnedStep::Open(child));
                }
            }
            OwnedStep::Close(tag) => write_close_tag(&tag, out),
        }
        true
    }
}

impl Iterator for IntoChunks {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        if self.cancel.is_cancelled() {
            self.done = true;
            self.cancelled = true;
            return None;
        }
        let mut chunk = String::new();
        loop {
            if !self.advance(&mut chunk) {
                self.done = true;
                return None;
            }
            if !chunk.is_empty() {
                return Some(chunk);
            }
        }
    }
}

impl std::iter::FusedIterator for IntoChunks {}
