//! Nikola rendering: a `.meta` sidecar plus a bare content file.

use crate::post::Post;
use crate::slug::slugify;

use super::{OutputFile, trim_seconds};

pub(crate) fn render(post: &Post, body: &str) -> Vec<OutputFile> {
    let slug = slugify(&post.title);
    // Nikola reads slash-separated dates
    let date = trim_seconds(&post.date).replace('-', "/");

    let meta = format!(
        "{}\n{}\n{}\n{}\n",
        post.title,
        slug,
        date,
        post.classifiers().join(", "),
    );

    vec![
        OutputFile {
            name: format!("{slug}.meta"),
            contents: meta,
        },
        OutputFile {
            name: format!("{slug}.md"),
            contents: format!("{body}\n"),
        },
    ]
}
