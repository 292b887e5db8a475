//! Contact submissions repository

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{window_total, DbError};
use crate::models::{NewContactMessage, Paginated, Pagination};

/// Stored contact form submission
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

pub struct ContactRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ContactRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, msg: NewContactMessage) -> Result<ContactMessage, DbError> {
        let stored = sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (name, email, subject, message)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&msg.name)
        .bind(&msg.email)
        .bind(&msg.subject)
        .bind(&msg.message)
        .fetch_one(self.pool)
        .await?;

        Ok(stored)
    }

    /// Submissions newest first
    pub async fn list(&self, page: Pagination) -> Result<Paginated<ContactMessage>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT *, COUNT(*) OVER() AS total
            FROM contact_messages
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(self.pool)
        .await?;

        let total_count = if rows.is_empty() && page.offset() > 0 {
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contact_messages")
                .fetch_one(self.pool)
                .await?
        } else {
            window_total(&rows)?
        };

        let items = rows
            .iter()
            .map(ContactMessage::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated {
            items,
            total_count,
            page,
        })
    }
}
