//! Blog Service
//!
//! Slug derivation, publication transitions and visibility rules.

use std::sync::Arc;

use chrono::Utc;
use kernel::error::app_error::{AppError, AppResult};
use kernel::pagination::Page;

use crate::domain::entity::blog_post::{BlogPost, BlogStatus};
use crate::domain::repository::{BlogRepository, BlogStats};
use crate::domain::slug::generate_slug;

/// Fields for creating a post
#[derive(Debug)]
pub struct CreateBlogInput {
    pub title: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub author: String,
    pub author_image: Option<String>,
    pub read_time: Option<String>,
    pub status: BlogStatus,
    pub featured: bool,
    pub categories: Vec<String>,
}

/// Fields for updating a post; absent fields stay untouched
#[derive(Default)]
pub struct UpdateBlogInput {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<String>,
    pub author: Option<String>,
    pub author_image: Option<String>,
    pub read_time: Option<String>,
    pub status: Option<BlogStatus>,
    pub featured: Option<bool>,
    pub categories: Option<Vec<String>>,
}

/// Blog service
pub struct BlogService<R>
where
    R: BlogRepository,
{
    repo: Arc<R>,
}

impl<R> BlogService<R>
where
    R: BlogRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: CreateBlogInput) -> AppResult<BlogPost> {
        let now = Utc::now();

        let mut post = BlogPost {
            id: 0,
            slug: generate_slug(&input.title),
            title: input.title,
            excerpt: input.excerpt,
            content: input.content,
            cover_image: input.cover_image,
            author: input.author,
            author_image: input.author_image,
            read_time: input.read_time,
            status: BlogStatus::Draft,
            featured: input.featured,
            categories: input.categories,
            views: 0,
            published_at: None,
            created_at: now,
            updated_at: now,
        };

        if input.status == BlogStatus::Published {
            post.publish(now);
        }

        post.id = self.repo.create(&post).await?;

        tracing::info!(post_id = post.id, slug = %post.slug, "Blog post created");

        Ok(post)
    }

    pub async fn list_published(
        &self,
        page: Page,
        featured: Option<bool>,
        category: Option<&str>,
    ) -> AppResult<(Vec<BlogPost>, u64)> {
        self.repo.list_published(page, featured, category).await
    }

    pub async fn list_all(
        &self,
        page: Page,
        status: Option<BlogStatus>,
        featured: Option<bool>,
    ) -> AppResult<(Vec<BlogPost>, u64)> {
        self.repo.list_all(page, status, featured).await
    }

    /// Fetch a post by slug for the public site
    ///
    /// Drafts are only visible when `include_unpublished` is set (the
    /// optional-auth middleware resolved an administrator). Reads of a
    /// published post bump the view counter.
    pub async fn get_by_slug(
        &self,
        slug: &str,
        include_unpublished: bool,
    ) -> AppResult<BlogPost> {
        let mut post = self
            .repo
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("Blog post not found"))?;

        if !post.is_published() && !include_unpublished {
            return Err(AppError::not_found("Blog post not found"));
        }

        if post.is_published() {
            self.repo.increment_views(post.id).await?;
            post.views += 1;
        }

        Ok(post)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<BlogPost> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Blog post not found"))
    }

    pub async fn update(&self, id: i64, input: UpdateBlogInput) -> AppResult<BlogPost> {
        let mut post = self.get_by_id(id).await?;
        let now = Utc::now();

        if let Some(title) = input.title {
            post.slug = generate_slug(&title);
            post.title = title;
        }
        if let Some(excerpt) = input.excerpt {
            post.excerpt = Some(excerpt);
        }
        if let Some(content) = input.content {
            post.content = content;
        }
        if let Some(cover_image) = input.cover_image {
            post.cover_image = Some(cover_image);
        }
        if let Some(author) = input.author {
            post.author = author;
        }
        if let Some(author_image) = input.author_image {
            post.author_image = Some(author_image);
        }
        if let Some(read_time) = input.read_time {
            post.read_time = Some(read_time);
        }
        if let Some(featured) = input.featured {
            post.featured = featured;
        }
        if let Some(categories) = input.categories {
            post.categories = categories;
        }

        match input.status {
            Some(BlogStatus::Published) => post.publish(now),
            Some(BlogStatus::Draft) => post.unpublish(now),
            None => post.updated_at = now,
        }

        if !self.repo.update(&post).await? {
            return Err(AppError::not_found("Blog post not found"));
        }

        Ok(post)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.repo.delete(id).await? {
            return Err(AppError::not_found("Blog post not found"));
        }
        tracing::info!(post_id = id, "Blog post deleted");
        Ok(())
    }

    pub async fn stats(&self) -> AppResult<BlogStats> {
        self.repo.stats().await
    }
}
