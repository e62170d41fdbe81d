//! mynt rendering: YAML frontmatter, date-prefixed filenames.

use crate::post::Post;
use crate::slug::slugify;

use super::OutputFile;

pub(crate) fn render(post: &Post, body: &str) -> Vec<OutputFile> {
    let date = post.date.split_whitespace().next().unwrap_or(post.date.as_str());
    let mut name = format!("{}-{}.md", date, slugify(&post.title));

    // mynt ignores files that start with an underscore
    if post.is_draft() {
        name.insert(0, '_');
    }

    let contents = format!(
        "---\nlayout: post.html\ntitle: {}\ntags: [{}]\n---\n\n{}\n",
        yaml_quote(&post.title),
        post.classifiers().join(", "),
        body,
    );

    vec![OutputFile { name, contents }]
}

/// Single-quoted YAML scalar; internal quotes double.
fn yaml_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}
