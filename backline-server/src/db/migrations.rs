//! Schema migrations for content tables
//!
//! Every statement is idempotent, so running this on each deploy is safe.

use sqlx::PgPool;

/// Run all migrations
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running database migrations...");

    // Albums
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS albums (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            title TEXT NOT NULL,
            artist TEXT NOT NULL,
            description TEXT,
            cover_url TEXT,
            release_date DATE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Songs; deleting an album leaves its songs as singles
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            title TEXT NOT NULL,
            artist TEXT NOT NULL,
            album_id UUID REFERENCES albums(id) ON DELETE SET NULL,
            audio_url TEXT NOT NULL,
            cover_url TEXT,
            duration_secs INTEGER CHECK (duration_secs > 0),
            genre TEXT,
            lyrics TEXT,
            plays BIGINT NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Contact form submissions
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS contact_messages (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            subject TEXT,
            message TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Indexes
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_albums_created ON albums(created_at DESC)",
        "CREATE INDEX IF NOT EXISTS idx_songs_album ON songs(album_id)",
        "CREATE INDEX IF NOT EXISTS idx_songs_created ON songs(created_at DESC)",
        "CREATE INDEX IF NOT EXISTS idx_songs_genre ON songs(genre)",
        "CREATE INDEX IF NOT EXISTS idx_contact_created ON contact_messages(created_at DESC)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("Database migrations complete");
    Ok(())
}
