//! Unit and router-level tests for the content crate
//!
//! Runs against an in-memory store implementing the repository traits,
//! so the services and HTTP surface are exercised without a database.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use tower::util::ServiceExt;

use kernel::error::app_error::{AppError, AppResult};
use kernel::error::envelope::FieldError;
use kernel::pagination::{Page, PageQuery};
use platform::rate_limit::{RateLimitConfig, RateLimitResult, RateLimitStore};

use crate::application::blog::{BlogService, CreateBlogInput, UpdateBlogInput};
use crate::application::consultation::{ConsultationService, ConsultationSubmission};
use crate::application::settings::SettingsService;
use crate::application::waitlist::{WaitlistService, WaitlistSignup};
use crate::domain::entity::blog_post::{BlogPost, BlogStatus};
use crate::domain::entity::consultation_request::{ConsultationRequest, ConsultationStatus};
use crate::domain::entity::setting::Setting;
use crate::domain::entity::waitlist_entry::WaitlistEntry;
use crate::domain::repository::{
    BlogRepository, BlogStats, ConsultationRepository, ConsultationStats, SettingsRepository,
    WaitlistRepository, WaitlistStats,
};
use crate::presentation::handlers::ContentAppState;
use crate::presentation::router::public_router;

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Clone, Default)]
struct MemoryStore {
    posts: Arc<Mutex<Vec<BlogPost>>>,
    waitlist: Arc<Mutex<Vec<WaitlistEntry>>>,
    consultations: Arc<Mutex<Vec<ConsultationRequest>>>,
    settings: Arc<Mutex<Vec<Setting>>>,
    rate_counts: Arc<Mutex<HashMap<(String, Vec<u8>), u32>>>,
}

impl BlogRepository for MemoryStore {
    async fn create(&self, post: &BlogPost) -> AppResult<i64> {
        let mut posts = self.posts.lock().unwrap();
        let id = posts.len() as i64 + 1;
        let mut stored = post.clone();
        stored.id = id;
        posts.push(stored);
        Ok(id)
    }

    async fn list_published(
        &self,
        page: Page,
        featured: Option<bool>,
        category: Option<&str>,
    ) -> AppResult<(Vec<BlogPost>, u64)> {
        let posts = self.posts.lock().unwrap();
        let mut matching: Vec<BlogPost> = posts
            .iter()
            .filter(|p| p.is_published())
            .filter(|p| featured.is_none_or(|f| p.featured == f))
            .filter(|p| category.is_none_or(|c| p.categories.iter().any(|pc| pc == c)))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        let total = matching.len() as u64;
        let page_items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((page_items, total))
    }

    async fn list_all(
        &self,
        page: Page,
        status: Option<BlogStatus>,
        featured: Option<bool>,
    ) -> AppResult<(Vec<BlogPost>, u64)> {
        let posts = self.posts.lock().unwrap();
        let mut matching: Vec<BlogPost> = posts
            .iter()
            .filter(|p| status.is_none_or(|s| p.status == s))
            .filter(|p| featured.is_none_or(|f| p.featured == f))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = matching.len() as u64;
        let page_items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((page_items, total))
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<BlogPost>> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.slug == slug)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<BlogPost>> {
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn increment_views(&self, id: i64) -> AppResult<()> {
        if let Some(post) = self.posts.lock().unwrap().iter_mut().find(|p| p.id == id) {
            post.views += 1;
        }
        Ok(())
    }

    async fn update(&self, updated: &BlogPost) -> AppResult<bool> {
        let mut posts = self.posts.lock().unwrap();
        match posts.iter_mut().find(|p| p.id == updated.id) {
            Some(post) => {
                *post = updated.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        Ok(posts.len() < before)
    }

    async fn stats(&self) -> AppResult<BlogStats> {
        let posts = self.posts.lock().unwrap();
        let total = posts.len() as u64;
        let published = posts.iter().filter(|p| p.is_published()).count() as u64;
        Ok(BlogStats {
            total,
            published,
            drafts: total - published,
            total_views: posts.iter().map(|p| p.views as u64).sum(),
        })
    }
}

impl WaitlistRepository for MemoryStore {
    async fn create(&self, entry: &WaitlistEntry) -> AppResult<i64> {
        let mut waitlist = self.waitlist.lock().unwrap();
        // Emulate the unique index on email
        if waitlist.iter().any(|e| e.email == entry.email) {
            return Err(
                AppError::duplicate("A record with this email already exists")
                    .with_details(vec![FieldError::new("email", "Already exists")]),
            );
        }
        let id = waitlist.len() as i64 + 1;
        let mut stored = entry.clone();
        stored.id = id;
        waitlist.push(stored);
        Ok(id)
    }

    async fn list(
        &self,
        page: Page,
        notified: Option<bool>,
    ) -> AppResult<(Vec<WaitlistEntry>, u64)> {
        let entries = WaitlistRepository::list_all(self, notified).await?;
        let total = entries.len() as u64;
        let page_items = entries
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((page_items, total))
    }

    async fn list_all(&self, notified: Option<bool>) -> AppResult<Vec<WaitlistEntry>> {
        let mut entries: Vec<WaitlistEntry> = self
            .waitlist
            .lock()
            .unwrap()
            .iter()
            .filter(|e| notified.is_none_or(|n| e.notified == n))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    async fn mark_notified(&self, id: i64) -> AppResult<Option<WaitlistEntry>> {
        let mut waitlist = self.waitlist.lock().unwrap();
        match waitlist.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.notified = true;
                Ok(Some(entry.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let mut waitlist = self.waitlist.lock().unwrap();
        let before = waitlist.len();
        waitlist.retain(|e| e.id != id);
        Ok(waitlist.len() < before)
    }

    async fn stats(&self) -> AppResult<WaitlistStats> {
        let waitlist = self.waitlist.lock().unwrap();
        let total = waitlist.len() as u64;
        let notified = waitlist.iter().filter(|e| e.notified).count() as u64;
        Ok(WaitlistStats {
            total,
            notified,
            pending: total - notified,
        })
    }
}

impl ConsultationRepository for MemoryStore {
    async fn create(&self, request: &ConsultationRequest) -> AppResult<i64> {
        let mut consultations = self.consultations.lock().unwrap();
        let id = consultations.len() as i64 + 1;
        let mut stored = request.clone();
        stored.id = id;
        consultations.push(stored);
        Ok(id)
    }

    async fn list(
        &self,
        page: Page,
        status: Option<ConsultationStatus>,
    ) -> AppResult<(Vec<ConsultationRequest>, u64)> {
        let requests = ConsultationRepository::list_all(self, status).await?;
        let total = requests.len() as u64;
        let page_items = requests
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((page_items, total))
    }

    async fn list_all(
        &self,
        status: Option<ConsultationStatus>,
    ) -> AppResult<Vec<ConsultationRequest>> {
        let mut requests: Vec<ConsultationRequest> = self
            .consultations
            .lock()
            .unwrap()
            .iter()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<ConsultationRequest>> {
        Ok(self
            .consultations
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn update_status(
        &self,
        id: i64,
        status: ConsultationStatus,
        admin_notes: Option<String>,
    ) -> AppResult<Option<ConsultationRequest>> {
        let mut consultations = self.consultations.lock().unwrap();
        match consultations.iter_mut().find(|r| r.id == id) {
            Some(request) => {
                request.status = status;
                if admin_notes.is_some() {
                    request.admin_notes = admin_notes;
                }
                request.updated_at = Utc::now();
                Ok(Some(request.clone()))
            }
            None => Ok(None),
        }
    }

    async fn stats(&self) -> AppResult<ConsultationStats> {
        let consultations = self.consultations.lock().unwrap();
        let count =
            |s: ConsultationStatus| consultations.iter().filter(|r| r.status == s).count() as u64;
        Ok(ConsultationStats {
            total: consultations.len() as u64,
            pending: count(ConsultationStatus::Pending),
            contacted: count(ConsultationStatus::Contacted),
            converted: count(ConsultationStatus::Converted),
            new_this_month: consultations.len() as u64,
        })
    }
}

impl SettingsRepository for MemoryStore {
    async fn list_all(&self) -> AppResult<Vec<Setting>> {
        let mut settings = self.settings.lock().unwrap().clone();
        settings.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(settings)
    }

    async fn find(&self, key: &str) -> AppResult<Option<Setting>> {
        Ok(self
            .settings
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.key == key)
            .cloned())
    }

    async fn upsert(&self, setting: &Setting) -> AppResult<()> {
        let mut settings = self.settings.lock().unwrap();
        match settings.iter_mut().find(|s| s.key == setting.key) {
            Some(existing) => *existing = setting.clone(),
            None => settings.push(setting.clone()),
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        let mut settings = self.settings.lock().unwrap();
        let before = settings.len();
        settings.retain(|s| s.key != key);
        Ok(settings.len() < before)
    }
}

impl RateLimitStore for MemoryStore {
    async fn check_and_increment(
        &self,
        scope: &str,
        key: &[u8],
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, Box<dyn std::error::Error + Send + Sync>> {
        let mut counts = self.rate_counts.lock().unwrap();
        let entry = counts.entry((scope.to_string(), key.to_vec())).or_insert(0);
        *entry += 1;
        let now_ms = Utc::now().timestamp_millis();
        let window_start = config.window_start(now_ms);
        Ok(RateLimitResult {
            allowed: *entry <= config.max_requests,
            remaining: config.max_requests.saturating_sub(*entry),
            reset_at_ms: window_start + config.window_ms(),
        })
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn create_input(title: &str, status: BlogStatus) -> CreateBlogInput {
    CreateBlogInput {
        title: title.to_string(),
        excerpt: None,
        content: "Body".to_string(),
        cover_image: None,
        author: "Admin".to_string(),
        author_image: None,
        read_time: None,
        status,
        featured: false,
        categories: vec![],
    }
}

fn default_page() -> Page {
    PageQuery::default().resolve(10)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ============================================================================
// Blog service
// ============================================================================

mod blog {
    use super::*;

    #[tokio::test]
    async fn create_published_stamps_slug_and_timestamp() {
        let service = BlogService::new(Arc::new(MemoryStore::default()));
        let post = service
            .create(create_input("Launch Week 2025!", BlogStatus::Published))
            .await
            .unwrap();

        assert_eq!(post.slug, "launch-week-2025");
        assert!(post.published_at.is_some());
        assert_eq!(post.id, 1);
    }

    #[tokio::test]
    async fn create_draft_has_no_publication_timestamp() {
        let service = BlogService::new(Arc::new(MemoryStore::default()));
        let post = service
            .create(create_input("Draft", BlogStatus::Draft))
            .await
            .unwrap();

        assert_eq!(post.status, BlogStatus::Draft);
        assert!(post.published_at.is_none());
    }

    #[tokio::test]
    async fn draft_is_hidden_from_anonymous_but_visible_to_admin() {
        let store = Arc::new(MemoryStore::default());
        let service = BlogService::new(store.clone());
        service
            .create(create_input("Hidden", BlogStatus::Draft))
            .await
            .unwrap();

        let err = service.get_by_slug("hidden", false).await.unwrap_err();
        assert_eq!(err.status_code(), 404);

        let post = service.get_by_slug("hidden", true).await.unwrap();
        assert_eq!(post.title, "Hidden");
        // Draft reads never count as views
        assert_eq!(post.views, 0);
    }

    #[tokio::test]
    async fn published_reads_increment_views() {
        let service = BlogService::new(Arc::new(MemoryStore::default()));
        service
            .create(create_input("Public", BlogStatus::Published))
            .await
            .unwrap();

        let first = service.get_by_slug("public", false).await.unwrap();
        assert_eq!(first.views, 1);
        let second = service.get_by_slug("public", false).await.unwrap();
        assert_eq!(second.views, 2);
    }

    #[tokio::test]
    async fn update_title_regenerates_slug() {
        let service = BlogService::new(Arc::new(MemoryStore::default()));
        let post = service
            .create(create_input("Old Title", BlogStatus::Draft))
            .await
            .unwrap();

        let updated = service
            .update(
                post.id,
                UpdateBlogInput {
                    title: Some("New Title".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.slug, "new-title");
        assert_eq!(updated.title, "New Title");
    }

    #[tokio::test]
    async fn publish_and_unpublish_transitions() {
        let service = BlogService::new(Arc::new(MemoryStore::default()));
        let post = service
            .create(create_input("Post", BlogStatus::Draft))
            .await
            .unwrap();

        let published = service
            .update(
                post.id,
                UpdateBlogInput {
                    status: Some(BlogStatus::Published),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let first_published_at = published.published_at.unwrap();

        let drafted = service
            .update(
                post.id,
                UpdateBlogInput {
                    status: Some(BlogStatus::Draft),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(drafted.published_at.is_none());

        let republished = service
            .update(
                post.id,
                UpdateBlogInput {
                    status: Some(BlogStatus::Published),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(republished.published_at.unwrap() >= first_published_at);
    }

    #[tokio::test]
    async fn listing_filters_featured_and_category() {
        let store = Arc::new(MemoryStore::default());
        let service = BlogService::new(store.clone());

        let mut featured = create_input("Featured News", BlogStatus::Published);
        featured.featured = true;
        featured.categories = vec!["news".to_string()];
        service.create(featured).await.unwrap();

        let mut plain = create_input("Plain", BlogStatus::Published);
        plain.categories = vec!["design".to_string()];
        service.create(plain).await.unwrap();

        service
            .create(create_input("Invisible Draft", BlogStatus::Draft))
            .await
            .unwrap();

        let (all, total) = service
            .list_published(default_page(), None, None)
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert_eq!(all.len(), 2);

        let (featured_only, _) = service
            .list_published(default_page(), Some(true), None)
            .await
            .unwrap();
        assert_eq!(featured_only.len(), 1);
        assert_eq!(featured_only[0].title, "Featured News");

        let (by_category, _) = service
            .list_published(default_page(), None, Some("design"))
            .await
            .unwrap();
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].title, "Plain");
    }

    #[tokio::test]
    async fn delete_missing_post_is_not_found() {
        let service = BlogService::new(Arc::new(MemoryStore::default()));
        let err = service.delete(42).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}

// ============================================================================
// Waitlist
// ============================================================================

mod waitlist {
    use super::*;

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let service = WaitlistService::new(Arc::new(MemoryStore::default()));
        service
            .signup(WaitlistSignup {
                email: "user@example.com".to_string(),
                name: None,
            })
            .await
            .unwrap();

        let err = service
            .signup(WaitlistSignup {
                email: "user@example.com".to_string(),
                name: Some("Again".to_string()),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 409);
        assert_eq!(err.code(), "DUPLICATE_ENTRY");
    }

    #[tokio::test]
    async fn notified_flag_and_stats() {
        let service = WaitlistService::new(Arc::new(MemoryStore::default()));
        let entry = service
            .signup(WaitlistSignup {
                email: "a@example.com".to_string(),
                name: None,
            })
            .await
            .unwrap();
        service
            .signup(WaitlistSignup {
                email: "b@example.com".to_string(),
                name: None,
            })
            .await
            .unwrap();

        let updated = service.mark_notified(entry.id).await.unwrap();
        assert!(updated.notified);

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.notified, 1);
        assert_eq!(stats.pending, 1);

        let err = service.mark_notified(99).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn csv_export_quotes_fields() {
        let service = WaitlistService::new(Arc::new(MemoryStore::default()));
        service
            .signup(WaitlistSignup {
                email: "user@example.com".to_string(),
                name: Some("Comma, \"Quote\"".to_string()),
            })
            .await
            .unwrap();

        let csv = service.export_csv(None).await.unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), "id,name,email,notified,date");
        let row = lines.next().unwrap();
        assert!(row.starts_with("1,\"Comma, \"\"Quote\"\"\",\"user@example.com\",false,"));
    }
}

// ============================================================================
// Consultations
// ============================================================================

mod consultations {
    use super::*;

    fn submission() -> ConsultationSubmission {
        ConsultationSubmission {
            full_name: "Jordan Example".to_string(),
            email: "jordan@example.com".to_string(),
            company: "Example Co".to_string(),
            phone: "+1234567890".to_string(),
            project_details: "A full brand refresh for our launch.".to_string(),
        }
    }

    #[tokio::test]
    async fn submission_starts_pending() {
        let service = ConsultationService::new(Arc::new(MemoryStore::default()));
        let request = service.submit(submission()).await.unwrap();
        assert_eq!(request.status, ConsultationStatus::Pending);
        assert_eq!(request.id, 1);
    }

    #[tokio::test]
    async fn status_update_keeps_existing_notes_when_omitted() {
        let service = ConsultationService::new(Arc::new(MemoryStore::default()));
        let request = service.submit(submission()).await.unwrap();

        let updated = service
            .update_status(
                request.id,
                ConsultationStatus::Contacted,
                Some("Called on Monday".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(updated.status, ConsultationStatus::Contacted);
        assert_eq!(updated.admin_notes.as_deref(), Some("Called on Monday"));

        let updated = service
            .update_status(request.id, ConsultationStatus::Converted, None)
            .await
            .unwrap();
        assert_eq!(updated.admin_notes.as_deref(), Some("Called on Monday"));
    }

    #[tokio::test]
    async fn export_filters_by_status() {
        let service = ConsultationService::new(Arc::new(MemoryStore::default()));
        let first = service.submit(submission()).await.unwrap();
        service
            .submit(ConsultationSubmission {
                email: "other@example.com".to_string(),
                ..submission()
            })
            .await
            .unwrap();
        service
            .update_status(first.id, ConsultationStatus::Converted, None)
            .await
            .unwrap();

        let csv = service
            .export_csv(Some(ConsultationStatus::Converted))
            .await
            .unwrap();
        // Header plus exactly one data row
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.contains("converted"));
    }
}

// ============================================================================
// Settings
// ============================================================================

mod settings {
    use super::*;

    #[tokio::test]
    async fn upsert_preserves_type_and_description_when_omitted() {
        let service = SettingsService::new(Arc::new(MemoryStore::default()));
        service
            .upsert(
                "contact_email",
                "hello@example.com".to_string(),
                Some("email".to_string()),
                Some("Main contact".to_string()),
            )
            .await
            .unwrap();

        let updated = service
            .upsert("contact_email", "new@example.com".to_string(), None, None)
            .await
            .unwrap();
        assert_eq!(updated.value, "new@example.com");
        assert_eq!(updated.value_type, "email");
        assert_eq!(updated.description, "Main contact");
    }

    #[tokio::test]
    async fn defaults_initialize_idempotently() {
        let store = Arc::new(MemoryStore::default());
        let service = SettingsService::new(store.clone());

        let created = service.initialize_defaults().await.unwrap();
        assert!(created > 0);

        // Existing values survive a second initialization
        service
            .upsert("site_name", "Custom Name".to_string(), None, None)
            .await
            .unwrap();
        let created_again = service.initialize_defaults().await.unwrap();
        assert_eq!(created_again, 0);
        assert_eq!(service.get("site_name").await.unwrap().value, "Custom Name");
    }

    #[tokio::test]
    async fn missing_key_is_not_found() {
        let service = SettingsService::new(Arc::new(MemoryStore::default()));
        assert_eq!(service.get("nope").await.unwrap_err().status_code(), 404);
        assert_eq!(service.delete("nope").await.unwrap_err().status_code(), 404);
    }
}

// ============================================================================
// Public router
// ============================================================================

mod public_endpoints {
    use super::*;

    fn app() -> Router {
        public_router(ContentAppState::new(Arc::new(MemoryStore::default())))
    }

    #[tokio::test]
    async fn concurrent_style_duplicate_signup_yields_one_201_one_409() {
        let app = app();

        let first = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/waitlist",
                serde_json::json!({"email": "user@example.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = app
            .oneshot(json_request(
                "POST",
                "/waitlist",
                serde_json::json!({"email": "user@example.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);

        let json = body_json(second).await;
        assert_eq!(json["code"], "DUPLICATE_ENTRY");
        assert_eq!(json["details"][0]["field"], "email");
    }

    #[tokio::test]
    async fn fourth_form_submission_is_rate_limited() {
        let state = ContentAppState::new(Arc::new(MemoryStore::default()))
            .with_form_rate_limit(RateLimitConfig::new(3, 3600));
        let app = public_router(state);

        for i in 0..3 {
            let response = app
                .clone()
                .oneshot(json_request(
                    "POST",
                    "/waitlist",
                    serde_json::json!({"email": format!("user{i}@example.com")}),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app
            .oneshot(json_request(
                "POST",
                "/waitlist",
                serde_json::json!({"email": "user3@example.com"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let json = body_json(response).await;
        assert_eq!(json["code"], "RATE_LIMITED");
        assert!(json["retryAfter"].as_u64().is_some());
    }

    #[tokio::test]
    async fn consultation_validation_reports_each_field() {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/consultations",
                serde_json::json!({
                    "fullName": "A",
                    "email": "broken",
                    "company": "B",
                    "phone": "12",
                    "projectDetails": "hi"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_FAILED");
        assert_eq!(json["details"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn blog_listing_and_slug_visibility() {
        let store = Arc::new(MemoryStore::default());
        let service = BlogService::new(store.clone());
        service
            .create(create_input("Public Post", BlogStatus::Published))
            .await
            .unwrap();
        service
            .create(create_input("Secret Draft", BlogStatus::Draft))
            .await
            .unwrap();

        let app = public_router(ContentAppState::new(store));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/blog")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["posts"].as_array().unwrap().len(), 1);
        assert_eq!(json["data"]["pagination"]["total"], 1);

        // Anonymous read of the draft 404s
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/blog/secret-draft")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["code"], "NOT_FOUND");
    }
}
