//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::pagination::Page;
use platform::rate_limit::{RateLimitConfig, RateLimitResult, RateLimitStore};
use sqlx::PgPool;

use crate::domain::entity::blog_post::{BlogPost, BlogStatus};
use crate::domain::entity::consultation_request::{ConsultationRequest, ConsultationStatus};
use crate::domain::entity::setting::Setting;
use crate::domain::entity::waitlist_entry::WaitlistEntry;
use crate::domain::repository::{
    BlogRepository, BlogStats, ConsultationRepository, ConsultationStats, SettingsRepository,
    WaitlistRepository, WaitlistStats,
};

/// PostgreSQL-backed content repository
///
/// One repository for all four content stores; they share the pool and
/// the form rate-limit counters.
#[derive(Clone)]
pub struct PgContentRepository {
    pool: PgPool,
}

impl PgContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Blog Repository Implementation
// ============================================================================

impl BlogRepository for PgContentRepository {
    async fn create(&self, post: &BlogPost) -> AppResult<i64> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO blog_posts (
                title, slug, excerpt, content, cover_image, author,
                author_image, read_time, status, featured, categories,
                views, published_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING id
            "#,
        )
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.cover_image)
        .bind(&post.author)
        .bind(&post.author_image)
        .bind(&post.read_time)
        .bind(post.status.as_str())
        .bind(post.featured)
        .bind(&post.categories)
        .bind(post.views)
        .bind(post.published_at)
        .bind(post.created_at)
        .bind(post.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_published(
        &self,
        page: Page,
        featured: Option<bool>,
        category: Option<&str>,
    ) -> AppResult<(Vec<BlogPost>, u64)> {
        let rows = sqlx::query_as::<_, BlogPostRow>(
            r#"
            SELECT id, title, slug, excerpt, content, cover_image, author,
                   author_image, read_time, status, featured, categories,
                   views, published_at, created_at, updated_at
            FROM blog_posts
            WHERE status = 'published'
              AND ($1::boolean IS NULL OR featured = $1)
              AND ($2::text IS NULL OR $2 = ANY(categories))
            ORDER BY published_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(featured)
        .bind(category)
        .bind(page.limit_i64())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM blog_posts
            WHERE status = 'published'
              AND ($1::boolean IS NULL OR featured = $1)
              AND ($2::text IS NULL OR $2 = ANY(categories))
            "#,
        )
        .bind(featured)
        .bind(category)
        .fetch_one(&self.pool)
        .await?;

        let posts = rows
            .into_iter()
            .map(BlogPostRow::into_post)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((posts, total as u64))
    }

    async fn list_all(
        &self,
        page: Page,
        status: Option<BlogStatus>,
        featured: Option<bool>,
    ) -> AppResult<(Vec<BlogPost>, u64)> {
        let status_str = status.map(|s| s.as_str());

        let rows = sqlx::query_as::<_, BlogPostRow>(
            r#"
            SELECT id, title, slug, excerpt, content, cover_image, author,
                   author_image, read_time, status, featured, categories,
                   views, published_at, created_at, updated_at
            FROM blog_posts
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::boolean IS NULL OR featured = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(status_str)
        .bind(featured)
        .bind(page.limit_i64())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM blog_posts
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::boolean IS NULL OR featured = $2)
            "#,
        )
        .bind(status_str)
        .bind(featured)
        .fetch_one(&self.pool)
        .await?;

        let posts = rows
            .into_iter()
            .map(BlogPostRow::into_post)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((posts, total as u64))
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<BlogPost>> {
        let row = sqlx::query_as::<_, BlogPostRow>(
            r#"
            SELECT id, title, slug, excerpt, content, cover_image, author,
                   author_image, read_time, status, featured, categories,
                   views, published_at, created_at, updated_at
            FROM blog_posts
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        row.map(BlogPostRow::into_post).transpose()
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<BlogPost>> {
        let row = sqlx::query_as::<_, BlogPostRow>(
            r#"
            SELECT id, title, slug, excerpt, content, cover_image, author,
                   author_image, read_time, status, featured, categories,
                   views, published_at, created_at, updated_at
            FROM blog_posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(BlogPostRow::into_post).transpose()
    }

    async fn increment_views(&self, id: i64) -> AppResult<()> {
        sqlx::query("UPDATE blog_posts SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn update(&self, post: &BlogPost) -> AppResult<bool> {
        let affected = sqlx::query(
            r#"
            UPDATE blog_posts SET
                title = $2, slug = $3, excerpt = $4, content = $5,
                cover_image = $6, author = $7, author_image = $8,
                read_time = $9, status = $10, featured = $11,
                categories = $12, published_at = $13, updated_at = $14
            WHERE id = $1
            "#,
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.cover_image)
        .bind(&post.author)
        .bind(&post.author_image)
        .bind(&post.read_time)
        .bind(post.status.as_str())
        .bind(post.featured)
        .bind(&post.categories)
        .bind(post.published_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let affected = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }

    async fn stats(&self) -> AppResult<BlogStats> {
        let (total, published, total_views): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COUNT(*) FILTER (WHERE status = 'published'),
                COALESCE(SUM(views), 0)::BIGINT
            FROM blog_posts
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(BlogStats {
            total: total as u64,
            published: published as u64,
            drafts: (total - published) as u64,
            total_views: total_views as u64,
        })
    }
}

// ============================================================================
// Waitlist Repository Implementation
// ============================================================================

impl WaitlistRepository for PgContentRepository {
    async fn create(&self, entry: &WaitlistEntry) -> AppResult<i64> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO waitlist_entries (email, name, notified, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&entry.email)
        .bind(&entry.name)
        .bind(entry.notified)
        .bind(entry.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list(
        &self,
        page: Page,
        notified: Option<bool>,
    ) -> AppResult<(Vec<WaitlistEntry>, u64)> {
        let rows = sqlx::query_as::<_, WaitlistRow>(
            r#"
            SELECT id, email, name, notified, created_at
            FROM waitlist_entries
            WHERE ($1::boolean IS NULL OR notified = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(notified)
        .bind(page.limit_i64())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM waitlist_entries WHERE ($1::boolean IS NULL OR notified = $1)",
        )
        .bind(notified)
        .fetch_one(&self.pool)
        .await?;

        Ok((
            rows.into_iter().map(WaitlistRow::into_entry).collect(),
            total as u64,
        ))
    }

    async fn list_all(&self, notified: Option<bool>) -> AppResult<Vec<WaitlistEntry>> {
        let rows = sqlx::query_as::<_, WaitlistRow>(
            r#"
            SELECT id, email, name, notified, created_at
            FROM waitlist_entries
            WHERE ($1::boolean IS NULL OR notified = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(notified)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(WaitlistRow::into_entry).collect())
    }

    async fn mark_notified(&self, id: i64) -> AppResult<Option<WaitlistEntry>> {
        let row = sqlx::query_as::<_, WaitlistRow>(
            r#"
            UPDATE waitlist_entries
            SET notified = true
            WHERE id = $1
            RETURNING id, email, name, notified, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(WaitlistRow::into_entry))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let affected = sqlx::query("DELETE FROM waitlist_entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }

    async fn stats(&self) -> AppResult<WaitlistStats> {
        let (total, notified): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COUNT(*) FILTER (WHERE notified)
            FROM waitlist_entries
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(WaitlistStats {
            total: total as u64,
            notified: notified as u64,
            pending: (total - notified) as u64,
        })
    }
}

// ============================================================================
// Consultation Repository Implementation
// ============================================================================

impl ConsultationRepository for PgContentRepository {
    async fn create(&self, request: &ConsultationRequest) -> AppResult<i64> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO consultation_requests (
                full_name, email, company, phone, project_details,
                status, admin_notes, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(&request.full_name)
        .bind(&request.email)
        .bind(&request.company)
        .bind(&request.phone)
        .bind(&request.project_details)
        .bind(request.status.as_str())
        .bind(&request.admin_notes)
        .bind(request.created_at)
        .bind(request.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list(
        &self,
        page: Page,
        status: Option<ConsultationStatus>,
    ) -> AppResult<(Vec<ConsultationRequest>, u64)> {
        let status_str = status.map(|s| s.as_str());

        let rows = sqlx::query_as::<_, ConsultationRow>(
            r#"
            SELECT id, full_name, email, company, phone, project_details,
                   status, admin_notes, created_at, updated_at
            FROM consultation_requests
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status_str)
        .bind(page.limit_i64())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM consultation_requests WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status_str)
        .fetch_one(&self.pool)
        .await?;

        let requests = rows
            .into_iter()
            .map(ConsultationRow::into_request)
            .collect::<AppResult<Vec<_>>>()?;

        Ok((requests, total as u64))
    }

    async fn list_all(
        &self,
        status: Option<ConsultationStatus>,
    ) -> AppResult<Vec<ConsultationRequest>> {
        let status_str = status.map(|s| s.as_str());

        let rows = sqlx::query_as::<_, ConsultationRow>(
            r#"
            SELECT id, full_name, email, company, phone, project_details,
                   status, admin_notes, created_at, updated_at
            FROM consultation_requests
            WHERE ($1::text IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status_str)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(ConsultationRow::into_request)
            .collect()
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<ConsultationRequest>> {
        let row = sqlx::query_as::<_, ConsultationRow>(
            r#"
            SELECT id, full_name, email, company, phone, project_details,
                   status, admin_notes, created_at, updated_at
            FROM consultation_requests
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ConsultationRow::into_request).transpose()
    }

    async fn update_status(
        &self,
        id: i64,
        status: ConsultationStatus,
        admin_notes: Option<String>,
    ) -> AppResult<Option<ConsultationRequest>> {
        let row = sqlx::query_as::<_, ConsultationRow>(
            r#"
            UPDATE consultation_requests
            SET status = $2,
                admin_notes = COALESCE($3, admin_notes),
                updated_at = $4
            WHERE id = $1
            RETURNING id, full_name, email, company, phone, project_details,
                      status, admin_notes, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(admin_notes)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ConsultationRow::into_request).transpose()
    }

    async fn stats(&self) -> AppResult<ConsultationStats> {
        let (total, pending, contacted, converted, new_this_month): (i64, i64, i64, i64, i64) =
            sqlx::query_as(
                r#"
                SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE status = 'pending'),
                    COUNT(*) FILTER (WHERE status = 'contacted'),
                    COUNT(*) FILTER (WHERE status = 'converted'),
                    COUNT(*) FILTER (WHERE created_at >= date_trunc('month', now()))
                FROM consultation_requests
                "#,
            )
            .fetch_one(&self.pool)
            .await?;

        Ok(ConsultationStats {
            total: total as u64,
            pending: pending as u64,
            contacted: contacted as u64,
            converted: converted as u64,
            new_this_month: new_this_month as u64,
        })
    }
}

// ============================================================================
// Settings Repository Implementation
// ============================================================================

impl SettingsRepository for PgContentRepository {
    async fn list_all(&self) -> AppResult<Vec<Setting>> {
        let rows = sqlx::query_as::<_, SettingRow>(
            r#"
            SELECT key, value, value_type, description, updated_at
            FROM settings
            ORDER BY key
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SettingRow::into_setting).collect())
    }

    async fn find(&self, key: &str) -> AppResult<Option<Setting>> {
        let row = sqlx::query_as::<_, SettingRow>(
            r#"
            SELECT key, value, value_type, description, updated_at
            FROM settings
            WHERE key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SettingRow::into_setting))
    }

    async fn upsert(&self, setting: &Setting) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value, value_type, description, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (key) DO UPDATE SET
                value = EXCLUDED.value,
                value_type = EXCLUDED.value_type,
                description = EXCLUDED.description,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&setting.key)
        .bind(&setting.value)
        .bind(&setting.value_type)
        .bind(&setting.description)
        .bind(setting.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        let affected = sqlx::query("DELETE FROM settings WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }
}

// ============================================================================
// Rate Limit Store Implementation
// ============================================================================

impl RateLimitStore for PgContentRepository {
    async fn check_and_increment(
        &self,
        scope: &str,
        key: &[u8],
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>> {
        let now_ms = Utc::now().timestamp_millis();
        let window_start = config.window_start(now_ms);

        let row = sqlx::query_as::<_, (i32,)>(
            r#"
            INSERT INTO rate_limits (scope, client_key, window_start_ms, request_count)
            VALUES ($1, $2, $3, 1)
            ON CONFLICT (scope, client_key, window_start_ms)
            DO UPDATE SET request_count = rate_limits.request_count + 1
            RETURNING request_count
            "#,
        )
        .bind(scope)
        .bind(key)
        .bind(window_start)
        .fetch_one(&self.pool)
        .await?;

        let count = row.0 as u32;
        let allowed = count <= config.max_requests;

        if !allowed {
            tracing::warn!(scope = scope, count = count, max = config.max_requests, "Rate limit exceeded");
        }

        Ok(RateLimitResult {
            allowed,
            remaining: config.max_requests.saturating_sub(count),
            reset_at_ms: window_start + config.window_ms(),
        })
    }
}

// ============================================================================
// Row mappings
// ============================================================================

#[derive(sqlx::FromRow)]
struct BlogPostRow {
    id: i64,
    title: String,
    slug: String,
    excerpt: Option<String>,
    content: String,
    cover_image: Option<String>,
    author: String,
    author_image: Option<String>,
    read_time: Option<String>,
    status: String,
    featured: bool,
    categories: Vec<String>,
    views: i64,
    published_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl BlogPostRow {
    fn into_post(self) -> AppResult<BlogPost> {
        let status = BlogStatus::parse(&self.status)
            .map_err(|_| AppError::internal(format!("Corrupt blog status: {}", self.status)))?;

        Ok(BlogPost {
            id: self.id,
            title: self.title,
            slug: self.slug,
            excerpt: self.excerpt,
            content: self.content,
            cover_image: self.cover_image,
            author: self.author,
            author_image: self.author_image,
            read_time: self.read_time,
            status,
            featured: self.featured,
            categories: self.categories,
            views: self.views,
            published_at: self.published_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct WaitlistRow {
    id: i64,
    email: String,
    name: Option<String>,
    notified: bool,
    created_at: DateTime<Utc>,
}

impl WaitlistRow {
    fn into_entry(self) -> WaitlistEntry {
        WaitlistEntry {
            id: self.id,
            email: self.email,
            name: self.name,
            notified: self.notified,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ConsultationRow {
    id: i64,
    full_name: String,
    email: String,
    company: String,
    phone: String,
    project_details: String,
    status: String,
    admin_notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ConsultationRow {
    fn into_request(self) -> AppResult<ConsultationRequest> {
        let status = ConsultationStatus::parse(&self.status).map_err(|_| {
            AppError::internal(format!("Corrupt consultation status: {}", self.status))
        })?;

        Ok(ConsultationRequest {
            id: self.id,
            full_name: self.full_name,
            email: self.email,
            company: self.company,
            phone: self.phone,
            project_details: self.project_details,
            status,
            admin_notes: self.admin_notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SettingRow {
    key: String,
    value: String,
    value_type: String,
    description: String,
    updated_at: DateTime<Utc>,
}

impl SettingRow {
    fn into_setting(self) -> Setting {
        Setting {
            key: self.key,
            value: self.value,
            value_type: self.value_type,
            description: self.description,
            updated_at: self.updated_at,
        }
    }
}
