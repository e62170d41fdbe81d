//! The post-body conversion pipeline.
//!
//! Converts one WordPress pseudo-HTML body into Markdown in four stages:
//!
//! 1. [`code`]: recognized code blocks are lifted out and replaced with
//!    placeholder tokens, so nothing downstream can touch code bytes
//! 2. [`entities`]: common HTML entities are decoded once, stray control
//!    characters dropped
//! 3. [`transform`]: the single-pass tag scanner rewrites inline and
//!    heading markup to Markdown and copies everything else through
//! 4. [`code`] again: placeholders are resolved into fenced or indented
//!    blocks for the target [`Dialect`]
//!
//! Each conversion is a pure function of its input string; posts share
//! no state and may be processed in any order or in parallel.

mod code;
mod entities;
mod transform;

pub use code::CodeSpan;

use crate::error::Result;

/// Marker wrapping code placeholder tokens in the working text.
///
/// U+001A is not a legal XML character, so no export can contain it; the
/// extractor drops stray occurrences from non-code text regardless.
pub(crate) const PLACEHOLDER_MARK: char = '\u{1a}';

/// Code block rendering flavor for the target Markdown interpreter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dialect {
    /// Backtick fences with an info string (CommonMark, GitHub).
    #[default]
    Fenced,
    /// `~~~` fences with a `:::lang` first line (python-markdown's
    /// codehilite extension, as read by Pelican and Nikola).
    Codehilite,
    /// `~~~ { lang }` fences (misaka, as read by mynt).
    Misaka,
    /// Four-space indented blocks for interpreters without fences.
    /// The language hint is dropped.
    Indented,
}

/// Converts WordPress pseudo-HTML post bodies into Markdown.
///
/// The only configuration is the code-block [`Dialect`]; tag handling is
/// identical across targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct Converter {
    dialect: Dialect,
}

impl Converter {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Convert one post body.
    ///
    /// Malformed markup degrades to verbatim pass-through and never
    /// fails; the only error is a placeholder/code-span mismatch, which
    /// would mean the extracted code could not be restored faithfully.
    pub fn convert(&self, raw: &str) -> Result<String> {
        let (working, spans) = code::extract(raw);
        let working = entities::normalize(&working);
        let working = transform::transform(&working);
        let working = collapse_newlines(&working);
        let out = code::reinsert(&working, &spans, self.dialect)?;
        Ok(out.trim_matches('\n').to_string())
    }
}

/// One-shot conversion with the default dialect.
///
/// # Examples
///
/// ```
/// let md = wpmd::markdownify("<p>Hello <strong>world</strong></p>").unwrap();
/// assert_eq!(md, "Hello **world**");
/// ```
pub fn markdownify(raw: &str) -> Result<String> {
    Converter::default().convert(raw)
}

/// Collapse runs of three or more newlines down to two.
///
/// Stripped paragraph tags and blank-line-separated source both leave
/// newline runs behind; this happens before code reinsertion so code
/// content is never collapsed.
fn collapse_newlines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;

    for c in text.chars() {
        if c == '\n' {
            run += 1;
            if run <= 2 {
                out.push(c);
            }
        } else {
            run = 0;
            out.push(c);
        }
    }

    out
}
