//! # wpmd
//!
//! Convert WordPress export data into Markdown files for static site
//! generators.
//!
//! ## Features
//!
//! - Reads WordPress eXtended RSS exports and PHPMyAdmin XML dumps
//! - Converts WordPress pseudo-HTML bodies to Markdown, leaving lists,
//!   blockquotes, and tables as raw HTML
//! - Extracts `<pre>`/shortcode code blocks with their language hints
//!   and re-emits them as fenced or indented Markdown
//! - Writes Pelican, Nikola, or mynt flavored files, one post per file
//!
//! ## Quick Start
//!
//! ```no_run
//! use wpmd::{read_posts, export_posts, OutputFormat, SourceFormat};
//!
//! let posts = read_posts("blog.xml", SourceFormat::WpRss).unwrap();
//! export_posts(&posts, "posts".as_ref(), OutputFormat::Pelican).unwrap();
//! ```
//!
//! ## Converting a single body
//!
//! The conversion pipeline is available on its own; it takes one raw
//! body string and returns Markdown:
//!
//! ```
//! let md = wpmd::markdownify(
//!     "<p>See <a href=\"https://e.com\">this</a></p><pre lang=\"py\">x = 1</pre>",
//! )
//! .unwrap();
//! assert!(md.contains("[this](https://e.com)"));
//! assert!(md.contains("```py\nx = 1\n```"));
//! ```

pub mod error;
pub mod export;
pub mod import;
pub mod markdown;
pub mod post;
pub mod slug;

pub use error::{Error, Result};
pub use export::{OutputFormat, export_posts};
pub use import::{SourceFormat, read_posts};
pub use markdown::{CodeSpan, Converter, Dialect, markdownify};
pub use post::Post;
