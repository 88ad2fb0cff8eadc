//! Brings the PostgreSQL schema up to date and exits.
//!
//! Idempotent: every statement is `IF NOT EXISTS`.

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use weather_cache_storage::run_pg_migrations;

pub(crate) async fn run() -> Result<()> {
    let url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set to migrate")?;
    let pool = PgPoolOptions::new().max_connections(1).connect(&url).await?;
    run_pg_migrations(&pool).await?;
    println!("Migrations applied.");
    Ok(())
}
