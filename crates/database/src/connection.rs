use crate::error::DbError;
use configuration::Warehouse;
use sqlx::{PgPool, postgres::PgPoolOptions};
use std::env;
use std::time::Duration;

/// The schema created by the embedded migrations.
pub const MIGRATED_SCHEMA: &str = "social";
/// The tables created by the embedded migrations: account snapshots, posts
/// and post ideas.
pub const MIGRATED_TABLES: [&str; 3] = ["account_snapshots", "posts", "post_ideas"];

/// Establishes a connection pool to the PostgreSQL warehouse.
///
/// This function reads the `DATABASE_URL` from the environment, creates a small
/// connection pool and returns it. Loading a `.env` file is left to the caller.
pub async fn connect() -> Result<PgPool, DbError> {
    let database_url = env::var("DATABASE_URL")
        .map_err(|_e| DbError::ConnectionConfigError("DATABASE_URL must be set.".to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to the warehouse.");
    Ok(pool)
}

/// Applies the embedded migrations, creating the warehouse tables when missing.
///
/// Refuses to run when `warehouse` points at tables the migrations do not
/// create, since the repository would then query relations that never exist.
pub async fn run_migrations(pool: &PgPool, warehouse: &Warehouse) -> Result<(), DbError> {
    check_migrated_layout(warehouse)?;

    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Checks that the configured schema and tables are the ones the migrations create.
pub fn check_migrated_layout(warehouse: &Warehouse) -> Result<(), DbError> {
    let configured = [
        warehouse.account_table.as_str(),
        warehouse.posts_table.as_str(),
        warehouse.post_ideas_table.as_str(),
    ];
    if warehouse.schema == MIGRATED_SCHEMA && configured == MIGRATED_TABLES {
        return Ok(());
    }

    Err(DbError::LayoutMismatch {
        expected: layout(MIGRATED_SCHEMA, &MIGRATED_TABLES),
        configured: layout(&warehouse.schema, &configured),
    })
}

fn layout(schema: &str, tables: &[&str]) -> String {
    let names: Vec<String> = tables.iter().map(|t| format!("{}.{}", schema, t)).collect();
    names.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn migrated_warehouse() -> Warehouse {
        Warehouse {
            schema: "social".to_string(),
            account_table: "account_snapshots".to_string(),
            posts_table: "posts".to_string(),
            post_ideas_table: "post_ideas".to_string(),
        }
    }

    #[test]
    fn default_layout_matches_migrations() {
        assert!(check_migrated_layout(&migrated_warehouse()).is_ok());
    }

    #[test]
    fn renamed_table_is_refused() {
        let warehouse = Warehouse {
            posts_table: "instagram_posts".to_string(),
            ..migrated_warehouse()
        };
        let err = check_migrated_layout(&warehouse).unwrap_err();
        match err {
            DbError::LayoutMismatch { expected, configured } => {
                assert!(expected.contains("social.posts"));
                assert!(configured.contains("social.instagram_posts"));
            }
            other => panic!("expected a layout mismatch, got {:?}", other),
        }
    }

    #[test]
    fn other_schema_is_refused() {
        let warehouse = Warehouse {
            schema: "analytics".to_string(),
            ..migrated_warehouse()
        };
        assert!(matches!(
            check_migrated_layout(&warehouse),
            Err(DbError::LayoutMismatch { .. })
        ));
    }
}
