//! Content Routers
//!
//! The public router serves the site; the admin router is mounted
//! behind the auth middleware by the composition root.

use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::presentation::handlers::{self, ContentAppState, ContentStore};

/// Public content routes
pub fn public_router<R>(state: ContentAppState<R>) -> Router
where
    R: ContentStore,
{
    Router::new()
        .route("/blog", get(handlers::list_blog::<R>))
        .route("/blog/{slug}", get(handlers::get_blog_by_slug::<R>))
        .route("/waitlist", post(handlers::waitlist_signup::<R>))
        .route("/consultations", post(handlers::consultation_submit::<R>))
        .with_state(state)
}

/// Admin content routes (caller wraps these in `require_auth`)
pub fn admin_router<R>(state: ContentAppState<R>) -> Router
where
    R: ContentStore,
{
    Router::new()
        .route(
            "/blog",
            get(handlers::admin_list_blog::<R>).post(handlers::admin_create_blog::<R>),
        )
        .route(
            "/blog/{id}",
            get(handlers::admin_get_blog::<R>)
                .put(handlers::admin_update_blog::<R>)
                .delete(handlers::admin_delete_blog::<R>),
        )
        .route("/waitlist", get(handlers::admin_list_waitlist::<R>))
        .route("/waitlist/export", get(handlers::admin_export_waitlist::<R>))
        .route(
            "/waitlist/{id}/notified",
            patch(handlers::admin_notify_waitlist::<R>),
        )
        .route("/waitlist/{id}", delete(handlers::admin_delete_waitlist::<R>))
        .route(
            "/consultations",
            get(handlers::admin_list_consultations::<R>),
        )
        .route(
            "/consultations/export",
            get(handlers::admin_export_consultations::<R>),
        )
        .route(
            "/consultations/{id}",
            get(handlers::admin_get_consultation::<R>),
        )
        .route(
            "/consultations/{id}/status",
            patch(handlers::admin_update_consultation::<R>),
        )
        .route(
            "/settings",
            get(handlers::admin_get_settings::<R>).put(handlers::admin_put_settings::<R>),
        )
        .route(
            "/settings/{key}",
            get(handlers::admin_get_setting::<R>)
                .put(handlers::admin_put_setting::<R>)
                .delete(handlers::admin_delete_setting::<R>),
        )
        .with_state(state)
}
