//! PostgreSQL schema migrations for weather-cache storage.
//!
//! Every statement is idempotent, so running this on each startup is safe.

use sqlx::PgPool;

/// Run all PostgreSQL migrations.
///
/// # Errors
/// Returns the first failing statement's error.
pub async fn run_pg_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // `state` is NOT NULL with '' standing in for "absent" so the unique key
    // treats two stateless rows for the same city/country as equal.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS weather_cache (
            id BIGSERIAL PRIMARY KEY,
            city TEXT NOT NULL,
            state TEXT NOT NULL DEFAULT '',
            country TEXT NOT NULL,
            data JSONB NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS unique_weather_cache_location
         ON weather_cache (city, state, country)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_weather_cache_updated ON weather_cache (updated_at DESC)",
    )
    .execute(pool)
    .await?;

    // `dedupe` rows are unique per (user, city); appended rows are not.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS search_history (
            id BIGSERIAL PRIMARY KEY,
            user_id TEXT NOT NULL,
            city_queried TEXT NOT NULL,
            city_name_queried TEXT NOT NULL DEFAULT '',
            data JSONB NOT NULL,
            dedupe BOOLEAN NOT NULL DEFAULT TRUE,
            timestamp TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Tables created before the display column existed.
    sqlx::query(
        "ALTER TABLE search_history
         ADD COLUMN IF NOT EXISTS city_name_queried TEXT NOT NULL DEFAULT ''",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS unique_search_history_user_city
         ON search_history (user_id, city_queried) WHERE dedupe",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS search_history_user_idx
         ON search_history (user_id, timestamp DESC, id DESC)",
    )
    .execute(pool)
    .await?;

    tracing::info!("PostgreSQL schema up to date");
    Ok(())
}
