//! Selector string parsing
//!
//! Parses the compact element notation used to describe a single element:
//! an optional tag followed by `#id`, `.class` and `[attr=value]` tokens
//! in any order, e.g. `a#x.y.z[href=/home][disabled]`.

use indexmap::{IndexMap, IndexSet};

/// Maximum characters of input carried in a [`SelectorError`] fragment.
const FRAGMENT_LEN: usize = 40;

/// Structured form of a parsed selector string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Element tag, `div` when the selector does not name one.
    pub tag: String,
    /// Value of the last `#id` token, when present.
    pub id: Option<String>,
    /// `.class` tokens in first-seen order, duplicates collapsed.
    pub classes: IndexSet<String>,
    /// `[name=value]` tokens in first-seen order. `None` marks a bare
    /// flag such as `[disabled]`.
    pub attributes: IndexMap<String, Option<String>>,
}

impl Selector {
    /// Parse a selector string.
    ///
    /// The tag may be omitted (`#main.card` describes a `div`). Attribute
    /// tokens run to their matching `]`, so values carry `=`, commas,
    /// colons and spaces verbatim; only the first unescaped `=` separates
    /// name from value, and `\` escapes the next character. Whitespace
    /// between tokens is ignored, which allows long selectors to span
    /// lines.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tagup_core::Selector;
    ///
    /// let selector = Selector::parse("a#x.y.z[href=/home][disabled]").unwrap();
    /// assert_eq!(selector.tag, "a");
    /// assert_eq!(selector.id.as_deref(), Some("x"));
    /// assert_eq!(selector.classes.len(), 2);
    /// assert_eq!(selector.attributes["href"].as_deref(), Some("/home"));
    /// assert_eq!(selector.attributes["disabled"], None);
    /// ```
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        use SelectorErrorKind::*;

        let mut tag = String::new();
        let mut id = None;
        let mut classes = IndexSet::new();
        let mut attributes = IndexMap::new();

        let mut i = skip_whitespace(input, 0);
        if i == input.len() {
            return Err(SelectorError::new(EmptySelector, 0, input));
        }
        if is_ident_byte(input.as_bytes()[i]) {
            let end = scan_ident(input, i);
            tag = input[i..end].to_string();
            i = end;
        }

        loop {
            i = skip_whitespace(input, i);
            let Some(c) = input[i..].chars().next() else {
                break;
            };
            match c {
                '#' => {
                    let (ident, next) = scan_token_ident(input, i, EmptyId)?;
                    id = Some(ident);
                    i = next;
                }
                '.' => {
                    let (ident, next) = scan_token_ident(input, i, EmptyClass)?;
                    classes.insert(ident);
                    i = next;
                }
                '[' => i = scan_attribute(input, i, &mut attributes)?,
                _ => return Err(SelectorError::new(UnexpectedChar(c), i, input)),
            }
        }

        if tag.is_empty() {
            tag = "div".to_string();
        }
        Ok(Self {
            tag,
            id,
            classes,
            attributes,
        })
    }
}

/// Why a selector string failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SelectorErrorKind {
    /// The input contains no tokens at all.
    #[error("empty selector")]
    EmptySelector,
    /// `#` not followed by an identifier.
    #[error("empty id")]
    EmptyId,
    /// `.` not followed by an identifier.
    #[error("empty class")]
    EmptyClass,
    /// `[...]` with nothing before the `=`.
    #[error("empty attribute name")]
    EmptyAttributeName,
    /// `[` with no matching `]`.
    #[error("unterminated attribute")]
    UnterminatedAttribute,
    /// A character that cannot appear where it was found.
    #[error("unexpected character `{0}`")]
    UnexpectedChar(char),
}

/// A malformed selector string.
///
/// Carries the byte offset of the problem plus the offending region of
/// the input, clipped for display, so call sites can report exactly what
/// went wrong.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at offset {offset}: `{fragment}`")]
pub struct SelectorError {
    /// What went wrong.
    pub kind: SelectorErrorKind,
    /// Byte offset into the selector string.
    pub offset: usize,
    /// The offending region of the input.
    pub fragment: String,
}

impl SelectorError {
    fn new(kind: SelectorErrorKind, offset: usize, input: &str) -> Self {
        Self {
            kind,
            offset,
            fragment: input[offset..].chars().take(FRAGMENT_LEN).collect(),
        }
    }
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

fn skip_whitespace(input: &str, mut i: usize) -> usize {
    let bytes = input.as_bytes();
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

fn scan_ident(input: &str, start: usize) -> usize {
    let bytes = input.as_bytes();
    let mut end = start;
    while end < bytes.len() && is_ident_byte(bytes[end]) {
        end += 1;
    }
    end
}

/// Scan the identifier of a `#id` or `.class` token. `marker` is the
/// offset of the `#` or `.` itself.
fn scan_token_ident(
    input: &str,
    marker: usize,
    empty_kind: SelectorErrorKind,
) -> Result<(String, usize), SelectorError> {
    let start = marker + 1;
    let end = scan_ident(input, start);
    if end > start {
        return Ok((input[start..end].to_string(), end));
    }
    match input[start..].chars().next() {
        None | Some('#' | '.' | '[') => Err(SelectorError::new(empty_kind, marker, input)),
        Some(c) if c.is_whitespace() => Err(SelectorError::new(empty_kind, marker, input)),
        Some(c) => Err(SelectorError::new(
            SelectorErrorKind::UnexpectedChar(c),
            start,
            input,
        )),
    }
}

/// Scan one `[...]` token starting at the `[` at `open`. Returns the
/// offset just past the closing `]`.
fn scan_attribute(
    input: &str,
    open: usize,
    attributes: &mut IndexMap<String, Option<String>>,
) -> Result<usize, SelectorError> {
    let mut name = String::new();
    let mut value: Option<String> = None;
    let mut pending_ws: Option<(usize, char)> = None;
    let mut depth = 1usize;
    let mut escaped = false;
    let mut close = None;

    for (j, c) in input[open + 1..].char_indices() {
        let at = open + 1 + j;
        if escaped {
            escaped = false;
            push_attr_char(input, &mut name, &mut value, &mut pending_ws, at, c)?;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '[' => {
                depth += 1;
                push_attr_char(input, &mut name, &mut value, &mut pending_ws, at, c)?;
            }
            ']' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(at);
                    break;
                }
                push_attr_char(input, &mut name, &mut value, &mut pending_ws, at, c)?;
            }
            '=' if value.is_none() => value = Some(String::new()),
            _ => push_attr_char(input, &mut name, &mut value, &mut pending_ws, at, c)?,
        }
    }

    let Some(close) = close else {
        return Err(SelectorError::new(
            SelectorErrorKind::UnterminatedAttribute,
            open,
            input,
        ));
    };
    if name.is_empty() {
        return Err(SelectorError::new(
            SelectorErrorKind::EmptyAttributeName,
            open,
            input,
        ));
    }

    // An empty or whitespace-only value is a bare flag: [x=] means [x].
    let value = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    attributes.insert(name.to_ascii_lowercase(), value);
    Ok(close + 1)
}

/// Route one attribute character into the name or the value. Names stay
/// free of whitespace; values take anything.
fn push_attr_char(
    input: &str,
    name: &mut String,
    value: &mut Option<String>,
    pending_ws: &mut Option<(usize, char)>,
    at: usize,
    c: char,
) -> Result<(), SelectorError> {
    if let Some(value) = value.as_mut() {
        value.push(c);
        return Ok(());
    }
    if c.is_whitespace() {
        if !name.is_empty() && pending_ws.is_none() {
            *pending_ws = Some((at, c));
        }
        return Ok(());
    }
    if let Some((offset, ws)) = pending_ws.take() {
        return Err(SelectorError::new(
            SelectorErrorKind::UnexpectedChar(ws),
            offset,
            input,
        ));
    }
    name.push(c);
    Ok(())
}
