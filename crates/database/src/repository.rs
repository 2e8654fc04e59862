use crate::DbError;
use chrono::{DateTime, NaiveDate, Utc};
use configuration::Warehouse;
use core_types::{AccountSnapshot, CoreError, PostIdea, PostRecord};
use sqlx::FromRow;
use sqlx::postgres::PgPool;
use uuid::Uuid;

/// The `DbRepository` provides a high-level, application-specific interface
/// to the warehouse. It encapsulates all SQL queries and data access logic.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
    warehouse: Warehouse,
}

// This struct represents a row fetched from the account snapshot table.
#[derive(FromRow, Debug, Clone)]
pub struct DbAccountSnapshot {
    pub date: NaiveDate,
    pub follower_count: Option<i64>,
    pub total_followers: Option<i64>,
    pub reach: Option<i64>,
    pub impressions: Option<i64>,
}

impl From<DbAccountSnapshot> for AccountSnapshot {
    fn from(row: DbAccountSnapshot) -> Self {
        AccountSnapshot {
            date: row.date,
            follower_count: row.follower_count,
            total_followers: row.total_followers,
            reach: row.reach,
            impressions: row.impressions,
        }
    }
}

/// Database-specific post struct; `post_type` is stored as the platform's label.
#[derive(FromRow, Debug, Clone)]
pub struct DbPost {
    pub created_time: DateTime<Utc>,
    pub post_type: String,
    pub like_count: Option<i64>,
    pub comments_count: Option<i64>,
    pub reach: Option<i64>,
}

impl TryFrom<DbPost> for PostRecord {
    type Error = CoreError;

    fn try_from(row: DbPost) -> Result<Self, Self::Error> {
        Ok(PostRecord {
            created_time: row.created_time,
            post_type: row.post_type.parse()?,
            like_count: row.like_count,
            comments_count: row.comments_count,
            reach: row.reach,
        })
    }
}

/// Represents a row from the post ideas table.
#[derive(FromRow, Debug, Clone)]
pub struct DbPostIdea {
    pub idea_id: Uuid,
    pub date: NaiveDate,
    pub caption: String,
    pub post_type: String,
    pub themes: Vec<String>,
    pub tone: String,
    pub source: String,
}

impl TryFrom<DbPostIdea> for PostIdea {
    type Error = CoreError;

    fn try_from(row: DbPostIdea) -> Result<Self, Self::Error> {
        Ok(PostIdea {
            idea_id: row.idea_id,
            date: row.date,
            caption: row.caption,
            post_type: row.post_type.parse()?,
            themes: row.themes,
            tone: row.tone.parse()?,
            source: row.source.parse()?,
        })
    }
}

impl DbRepository {
    /// Creates a new `DbRepository` over a shared connection pool and the
    /// configured table locations.
    pub fn new(pool: PgPool, warehouse: Warehouse) -> Self {
        Self { pool, warehouse }
    }

    /// Fetches the daily snapshots of an account between two dates, inclusive, oldest first.
    pub async fn fetch_account_snapshots(
        &self,
        account: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<AccountSnapshot>, DbError> {
        let sql = format!(
            r#"
            SELECT date, follower_count, total_followers, reach, impressions
            FROM {}
            WHERE account_name = $1 AND date >= $2 AND date <= $3
            ORDER BY date ASC
            "#,
            self.warehouse.qualified(&self.warehouse.account_table)
        );

        let rows = sqlx::query_as::<_, DbAccountSnapshot>(&sql)
            .bind(account)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(account, rows = rows.len(), "Fetched account snapshots.");
        Ok(rows.into_iter().map(AccountSnapshot::from).collect())
    }

    /// Fetches the posts an account published in `[from, to]`, oldest first.
    pub async fn fetch_posts(
        &self,
        account: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<PostRecord>, DbError> {
        let sql = format!(
            r#"
            SELECT created_time, post_type, like_count, comments_count, reach
            FROM {}
            WHERE account_name = $1 AND created_time >= $2 AND created_time <= $3
            ORDER BY created_time ASC
            "#,
            self.warehouse.qualified(&self.warehouse.posts_table)
        );

        let rows = sqlx::query_as::<_, DbPost>(&sql)
            .bind(account)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(account, rows = rows.len(), "Fetched posts.");
        rows.into_iter()
            .map(|row| {
                PostRecord::try_from(row)
                    .map_err(|e| self.invalid_row(&self.warehouse.posts_table, e))
            })
            .collect()
    }

    /// Fetches every scheduled post idea of an account, newest date first.
    pub async fn fetch_post_ideas(&self, account: &str) -> Result<Vec<PostIdea>, DbError> {
        let sql = format!(
            r#"
            SELECT idea_id, date, caption, post_type, themes, tone, source
            FROM {}
            WHERE account_name = $1
            ORDER BY date DESC, created_at DESC
            "#,
            self.warehouse.qualified(&self.warehouse.post_ideas_table)
        );

        let rows = sqlx::query_as::<_, DbPostIdea>(&sql)
            .bind(account)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                PostIdea::try_from(row)
                    .map_err(|e| self.invalid_row(&self.warehouse.post_ideas_table, e))
            })
            .collect()
    }

    /// The date of the latest scheduled post idea, if the account has any.
    pub async fn latest_post_idea_date(&self, account: &str) -> Result<Option<NaiveDate>, DbError> {
        let sql = format!(
            "SELECT MAX(date) FROM {} WHERE account_name = $1",
            self.warehouse.qualified(&self.warehouse.post_ideas_table)
        );

        let latest = sqlx::query_scalar::<_, Option<NaiveDate>>(&sql)
            .bind(account)
            .fetch_one(&self.pool)
            .await?;

        Ok(latest)
    }

    /// Saves a scheduled post idea for an account.
    pub async fn save_post_idea(&self, account: &str, idea: &PostIdea) -> Result<(), DbError> {
        let sql = format!(
            r#"
            INSERT INTO {} (idea_id, account_name, date, caption, post_type, themes, tone, source, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
            "#,
            self.warehouse.qualified(&self.warehouse.post_ideas_table)
        );

        sqlx::query(&sql)
            .bind(idea.idea_id)
            .bind(account)
            .bind(idea.date)
            .bind(&idea.caption)
            .bind(idea.post_type.as_str())
            .bind(&idea.themes)
            .bind(idea.tone.as_str())
            .bind(idea.source.as_str())
            .execute(&self.pool)
            .await?;

        tracing::info!(account, idea_id = %idea.idea_id, date = %idea.date, "Saved post idea.");
        Ok(())
    }

    fn invalid_row(&self, table: &str, source: CoreError) -> DbError {
        DbError::InvalidRow {
            table: self.warehouse.qualified(table),
            source,
        }
    }
}
