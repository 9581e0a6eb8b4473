use anyhow::Result;
use sqlx::postgres::PgPool;

pub async fn init_db(pool: &PgPool) -> Result<()> {
    // Base schema
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id VARCHAR PRIMARY KEY,
            email VARCHAR NOT NULL UNIQUE,
            name VARCHAR,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS journal_entries (
            id VARCHAR PRIMARY KEY,
            user_id VARCHAR NOT NULL,
            text TEXT NOT NULL,
            mood_score INTEGER,
            sentiment REAL,
            sentiment_label VARCHAR(10),
            emotion VARCHAR(20),
            emotion_scores JSONB,
            themes JSONB,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS audio_entries (
            id VARCHAR PRIMARY KEY,
            user_id VARCHAR NOT NULL,
            file_path TEXT NOT NULL,
            file_name VARCHAR,
            file_size BIGINT,
            transcript TEXT,
            transcription_status VARCHAR(20) DEFAULT 'pending',
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Schema evolution: columns added after the base schema shipped.
    // One statement per column so partial migrations recover cleanly.
    sqlx::query("ALTER TABLE journal_entries ADD COLUMN IF NOT EXISTS suggestions JSONB;")
        .execute(pool)
        .await
        .ok();

    sqlx::query("ALTER TABLE journal_entries ADD COLUMN IF NOT EXISTS highlighted_phrases JSONB;")
        .execute(pool)
        .await
        .ok();

    sqlx::query("ALTER TABLE journal_entries ADD COLUMN IF NOT EXISTS metadata JSONB;")
        .execute(pool)
        .await
        .ok();

    sqlx::query("ALTER TABLE audio_entries ADD COLUMN IF NOT EXISTS analysis JSONB;")
        .execute(pool)
        .await
        .ok();

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_journal_entries_user_created
         ON journal_entries (user_id, created_at DESC);",
    )
    .execute(pool)
    .await
    .ok();

    Ok(())
}
