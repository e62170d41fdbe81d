//! Filename slug generation.

/// Generate a filesystem-safe slug from a post title.
///
/// Lowercases alphanumeric characters, turns whitespace/hyphen/underscore
/// runs into single hyphens, and drops everything else.
///
/// # Examples
///
/// ```
/// use wpmd::slug::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("  spaced   out  "), "spaced-out");
/// assert_eq!(slugify("snake_case title"), "snake-case-title");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_hyphen = true;
        }
        // everything else is dropped
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_simple() {
        assert_eq!(slugify("Hello World"), "hello-world");
    }

    #[test]
    fn test_slugify_punctuation() {
        assert_eq!(slugify("Why I Quit My Job."), "why-i-quit-my-job");
        assert_eq!(slugify("C++ vs. Rust/Go"), "c-vs-rustgo");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("a -- b __ c"), "a-b-c");
        assert_eq!(slugify("-leading and trailing-"), "leading-and-trailing");
    }

    #[test]
    fn test_slugify_unicode() {
        assert_eq!(slugify("Café Culture"), "café-culture");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }
}
