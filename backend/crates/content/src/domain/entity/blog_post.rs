//! Blog Post Entity

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Publication status of a blog post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    Draft,
    Published,
}

impl BlogStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            BlogStatus::Draft => "draft",
            BlogStatus::Published => "published",
        }
    }

    /// Parse a status, case-insensitively
    pub fn parse(s: &str) -> AppResult<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(BlogStatus::Draft),
            "published" => Ok(BlogStatus::Published),
            _ => Err(AppError::bad_request(format!(
                "Unknown blog status: {}",
                s
            ))),
        }
    }
}

/// Blog post entity
#[derive(Debug, Clone)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    /// URL slug derived from the title (unique)
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub author: String,
    pub author_image: Option<String>,
    /// Display hint such as "5 min read"
    pub read_time: Option<String>,
    pub status: BlogStatus,
    pub featured: bool,
    pub categories: Vec<String>,
    pub views: i64,
    /// Stamped the first time the post is published
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlogPost {
    pub fn is_published(&self) -> bool {
        self.status == BlogStatus::Published
    }

    /// Move to published; keeps the original publication timestamp on a
    /// re-publish, stamps it on the first one.
    pub fn publish(&mut self, now: DateTime<Utc>) {
        self.status = BlogStatus::Published;
        if self.published_at.is_none() {
            self.published_at = Some(now);
        }
        self.updated_at = now;
    }

    /// Move back to draft; the publication timestamp is cleared so the
    /// next publish stamps fresh.
    pub fn unpublish(&mut self, now: DateTime<Utc>) {
        self.status = BlogStatus::Draft;
        self.published_at = None;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(status: BlogStatus) -> BlogPost {
        let now = Utc::now();
        BlogPost {
            id: 1,
            title: "Title".to_string(),
            slug: "title".to_string(),
            excerpt: None,
            content: "Body".to_string(),
            cover_image: None,
            author: "Admin".to_string(),
            author_image: None,
            read_time: None,
            status,
            featured: false,
            categories: vec![],
            views: 0,
            published_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(BlogStatus::parse("draft").unwrap(), BlogStatus::Draft);
        assert_eq!(
            BlogStatus::parse("PUBLISHED").unwrap(),
            BlogStatus::Published
        );
        assert!(BlogStatus::parse("archived").is_err());
    }

    #[test]
    fn test_publish_stamps_once() {
        let mut post = post(BlogStatus::Draft);
        let first = Utc::now();
        post.publish(first);
        assert_eq!(post.published_at, Some(first));

        // Re-publishing keeps the original timestamp
        let later = first + chrono::Duration::hours(1);
        post.publish(later);
        assert_eq!(post.published_at, Some(first));
        assert_eq!(post.updated_at, later);
    }

    #[test]
    fn test_unpublish_clears_timestamp() {
        let mut post = post(BlogStatus::Draft);
        let first = Utc::now();
        post.publish(first);
        post.unpublish(first + chrono::Duration::hours(1));
        assert_eq!(post.published_at, None);
        assert_eq!(post.status, BlogStatus::Draft);

        // Next publish stamps fresh
        let again = first + chrono::Duration::hours(2);
        post.publish(again);
        assert_eq!(post.published_at, Some(again));
    }
}
