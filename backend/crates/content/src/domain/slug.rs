//! Slug generation for blog post URLs

/// Derive a URL slug from a post title
///
/// Lowercases, keeps ASCII alphanumerics, collapses everything else
/// into single hyphens, and trims hyphens from both ends.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_was_hyphen = true; // suppresses a leading hyphen

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_title() {
        assert_eq!(generate_slug("Hello World"), "hello-world");
    }

    #[test]
    fn test_punctuation_collapses() {
        assert_eq!(
            generate_slug("Marketing, in 2025: What's Next?"),
            "marketing-in-2025-what-s-next"
        );
    }

    #[test]
    fn test_edge_trimming() {
        assert_eq!(generate_slug("  --Launch!--  "), "launch");
        assert_eq!(generate_slug("!!!"), "");
    }

    #[test]
    fn test_already_slug_shaped() {
        assert_eq!(generate_slug("simple-title"), "simple-title");
    }
}
