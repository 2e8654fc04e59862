use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to load environment variables for database connection: {0}")]
    ConnectionConfigError(String),

    #[error("Database operation failed: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Migrations create {expected}, but the warehouse configuration names {configured}")]
    LayoutMismatch { expected: String, configured: String },

    #[error("Row in table '{table}' could not be decoded: {source}")]
    InvalidRow {
        table: String,
        #[source]
        source: core_types::CoreError,
    },
}
