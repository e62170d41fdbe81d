//! Pelican metadata-header rendering.

use crate::post::Post;
use crate::slug::slugify;

use super::{OutputFile, trim_seconds};

pub(crate) fn render(post: &Post, body: &str) -> Vec<OutputFile> {
    let slug = slugify(&post.title);

    // Pelican allows one category per post; the rest fold into tags.
    let category = post.categories.first().map(String::as_str).unwrap_or("");
    let mut tags: Vec<&str> = post.tags.iter().map(String::as_str).collect();
    tags.extend(post.categories.iter().skip(1).map(String::as_str));

    let status = if post.status == "publish" {
        "published"
    } else {
        post.status.as_str()
    };

    let contents = format!(
        "Title: {}\nSlug: {}\nAuthor: {}\nStatus: {}\nDate: {}\nTags: {}\nCategory: {}\n\n{}\n",
        post.title,
        slug,
        post.author,
        status,
        trim_seconds(&post.date),
        tags.join(", "),
        category,
        body,
    );

    vec![OutputFile {
        name: format!("{slug}.md"),
        contents,
    }]
}
