//! # tagup-core
//!
//! Core node model, selector parsing and rendering for `tagup`.
//!
//! Trees are described by compact selector strings, built once, and
//! rendered either to a single buffered string or as a demand-driven
//! sequence of chunks suitable for progressive delivery.
//!
//! # Architecture
//!
//! ```text
//! "a#x.y[href=/home]" --parse--> Selector --build--> Node tree
//!                                                       |
//!                                 render_to_string  <---+  (one buffer)
//!                                 render_chunks     <---+  (pull sequence)
//!                                 Node::into_chunks <---+  (owned pull sequence)
//! ```
//!
//! # Example
//!
//! ```rust
//! use tagup_core::{render_to_string, CancellationToken, Element, Node};
//!
//! let link = Element::new("a#cta.button[href=/signup]")
//!     .unwrap()
//!     .child(Node::Text("Sign up".to_string()))
//!     .unwrap()
//!     .into_node();
//!
//! let html = render_to_string(&link, &CancellationToken::new()).unwrap();
//! assert_eq!(html, r#"<a id="cta" class="button" href="/signup">Sign up</a>"#);
//! ```

mod node;
mod render;
mod selector;

pub use node::{Element, Node};
pub use render::{render_chunks, render_to_string, Chunks, IntoChunks};
pub use selector::{Selector, SelectorError, SelectorErrorKind};

/// Cancellation signal observed by every renderer, re-exported so callers
/// do not need their own `tokio-util` dependency.
pub use tokio_util::sync::CancellationToken;

/// Error type for tree construction and buffered rendering.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed selector string.
    #[error("invalid selector: {0}")]
    Selector(#[from] SelectorError),

    /// A child was supplied to a void element.
    #[error("void element <{0}> cannot have children")]
    VoidChildren(String),

    /// A buffered render observed its cancellation token.
    #[error("rendering was cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;
