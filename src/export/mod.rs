//! Per-format output rendering and batch file writing.
//!
//! Each renderer takes a [`Post`] whose body has already been converted
//! to Markdown and produces the file(s) the target generator expects.
//! Renderers treat the body as opaque; nothing is re-escaped.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use log::{info, warn};

use crate::error::{Error, Result};
use crate::markdown::{Converter, Dialect};
use crate::post::Post;

mod mynt;
mod nikola;
mod pelican;

/// Target static site generator flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pelican,
    Nikola,
    Mynt,
}

impl OutputFormat {
    /// Code-block dialect the generator's Markdown interpreter reads.
    pub fn dialect(self) -> Dialect {
        match self {
            // Pelican and Nikola both run python-markdown with codehilite
            Self::Pelican | Self::Nikola => Dialect::Codehilite,
            Self::Mynt => Dialect::Misaka,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pelican" => Ok(Self::Pelican),
            "nikola" => Ok(Self::Nikola),
            "mynt" => Ok(Self::Mynt),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }
}

/// A file produced by a renderer, named relative to the output directory.
#[derive(Debug, Clone)]
pub(crate) struct OutputFile {
    pub name: String,
    pub contents: String,
}

/// Convert every post and write the results under `outdir`.
///
/// Returns the number of posts written. A post whose body fails to
/// convert is logged and skipped so one bad post cannot sink the batch;
/// posts without content are skipped silently. I/O failures abort.
pub fn export_posts(posts: &[Post], outdir: &Path, format: OutputFormat) -> Result<usize> {
    fs::create_dir_all(outdir)?;
    let converter = Converter::new(format.dialect());
    let mut written = 0;

    for post in posts {
        let Some(raw) = post.content.as_deref() else {
            continue;
        };
        let body = match converter.convert(raw) {
            Ok(body) => body,
            Err(err) => {
                warn!("skipping \"{}\": {err}", post.title);
                continue;
            }
        };

        let files = match format {
            OutputFormat::Pelican => pelican::render(post, &body),
            OutputFormat::Nikola => nikola::render(post, &body),
            OutputFormat::Mynt => mynt::render(post, &body),
        };
        for file in &files {
            fs::write(outdir.join(&file.name), &file.contents)?;
            info!("writing ({}) {}", post.status, file.name);
        }
        written += 1;
    }

    Ok(written)
}

/// WordPress dates carry seconds (`2011-03-05 10:11:12`); the generators
/// want minute precision.
pub(crate) fn trim_seconds(date: &str) -> &str {
    match date.char_indices().nth_back(2) {
        Some((idx, ':')) => &date[..idx],
        _ => date,
    }
}
