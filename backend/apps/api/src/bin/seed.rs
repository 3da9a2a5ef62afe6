//! Admin seeding tool
//!
//! Creates (or re-keys) the administrator account from the
//! environment. Run once after provisioning:
//!
//! ```text
//! ADMIN_EMAIL=admin@example.com ADMIN_PASSWORD='...' cargo run --bin seed
//! ```

use std::env;

use anyhow::Context;
use auth::domain::AdminRepository;
use auth::{Admin, Email, PgAdminRepository};
use chrono::Utc;
use platform::password::{ClearTextPassword, DEFAULT_COST, PasswordPolicy};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed=info,auth=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let admin_email = env::var("ADMIN_EMAIL").context("ADMIN_EMAIL must be set")?;
    let admin_password = env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD must be set")?;
    let admin_name = env::var("ADMIN_NAME").ok();

    let email = Email::new(admin_email)?;

    // Seeded credentials go through the full strength policy; report
    // every violation at once instead of one per run
    let policy = PasswordPolicy::default();
    let violations = policy.violations(&admin_password);
    if !violations.is_empty() {
        for violation in &violations {
            tracing::error!(violation = %violation, "Password rejected");
        }
        anyhow::bail!("ADMIN_PASSWORD does not meet the strength policy");
    }

    let password = ClearTextPassword::new(admin_password, &policy)
        .map_err(|e| anyhow::anyhow!("ADMIN_PASSWORD rejected: {e}"))?;
    let password_hash = platform::password::hash_async(password, DEFAULT_COST).await?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await?;

    sqlx::migrate!("../../../database/migrations").run(&pool).await?;

    let now = Utc::now();
    let admin = Admin {
        id: 0,
        email: email.clone(),
        password_hash,
        display_name: admin_name,
        last_login_at: None,
        created_at: now,
        updated_at: now,
    };

    let repo = PgAdminRepository::new(pool.clone());
    let id = repo.create(&admin).await?;

    tracing::info!(admin_id = id, email = %email, "Administrator seeded");

    pool.close().await;

    Ok(())
}
