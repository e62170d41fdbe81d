//! Post records extracted from a WordPress export.

/// A single blog entry in a format-agnostic shape.
///
/// Importers fill one of these per exported post; the export layer
/// converts `content` to Markdown and serializes the rest as the target
/// generator's metadata header.
#[derive(Debug, Clone, Default)]
pub struct Post {
    pub title: String,
    /// Publication date as stored by WordPress (`YYYY-MM-DD HH:MM:SS`).
    pub date: String,
    pub author: String,
    /// WordPress status: `publish`, `draft`, `auto-draft`, `inherit`, ...
    pub status: String,
    /// Raw pseudo-HTML body. `None` for rows exported without content.
    pub content: Option<String>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
}

impl Post {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Tags and categories combined, tags first.
    ///
    /// Some generators have no tag/category distinction; this is the
    /// flattened classifier list they get instead.
    pub fn classifiers(&self) -> Vec<&str> {
        self.tags
            .iter()
            .chain(self.categories.iter())
            .map(String::as_str)
            .collect()
    }

    /// WordPress marks unfinished posts `draft` or `auto-draft`.
    pub fn is_draft(&self) -> bool {
        self.status.contains("draft")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifiers_order() {
        let mut post = Post::new("t");
        post.tags = vec!["rust".into(), "xml".into()];
        post.categories = vec!["programming".into()];
        assert_eq!(post.classifiers(), vec!["rust", "xml", "programming"]);
    }

    #[test]
    fn test_is_draft() {
        assert!(Post::new("t").with_status("draft").is_draft());
        assert!(Post::new("t").with_status("auto-draft").is_draft());
        assert!(!Post::new("t").with_status("publish").is_draft());
    }
}
