use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{NewUser, ToggleOutcome, User};
use crate::weekday::Registration;

/// Durable user storage. The store owns `id` and `register_at`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;

    async fn create(&self, user: NewUser) -> anyhow::Result<User>;

    /// Flips `active` <-> `inactive` for every user; other values are left alone.
    async fn toggle_statuses(&self) -> anyhow::Result<ToggleOutcome>;

    /// Users whose `register_at` (UTC) falls on one of the given day numbers
    /// (1 = Sunday .. 7 = Saturday), oldest first.
    async fn registrations_on(&self, day_numbers: &[u8]) -> anyhow::Result<Vec<Registration>>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, address, latitude, longitude, status, register_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, address, latitude, longitude, status, register_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, address, latitude, longitude, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, email, password_hash, address, latitude, longitude, status, register_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.address)
        .bind(user.latitude)
        .bind(user.longitude)
        .bind(user.status.as_str())
        .fetch_one(&self.db)
        .await
        .context("insert user")?;
        Ok(user)
    }

    async fn toggle_statuses(&self) -> anyhow::Result<ToggleOutcome> {
        let (matched, modified) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            WITH flipped AS (
                UPDATE users
                   SET status = CASE status WHEN 'active' THEN 'inactive' ELSE 'active' END
                 WHERE status IN ('active', 'inactive')
                RETURNING 1
            )
            SELECT (SELECT COUNT(*) FROM users), (SELECT COUNT(*) FROM flipped)
            "#,
        )
        .fetch_one(&self.db)
        .await
        .context("toggle user statuses")?;

        Ok(ToggleOutcome {
            matched: matched.max(0) as u64,
            modified: modified.max(0) as u64,
        })
    }

    async fn registrations_on(&self, day_numbers: &[u8]) -> anyhow::Result<Vec<Registration>> {
        let days: Vec<i32> = day_numbers.iter().map(|&d| i32::from(d)).collect();
        let rows = sqlx::query_as::<_, Registration>(
            r#"
            SELECT name, email, register_at
            FROM users
            WHERE EXTRACT(DOW FROM register_at AT TIME ZONE 'UTC')::int + 1 = ANY($1)
            ORDER BY register_at ASC, id ASC
            "#,
        )
        .bind(days)
        .fetch_all(&self.db)
        .await
        .context("list registrations by weekday")?;
        Ok(rows)
    }
}
