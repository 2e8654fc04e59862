use crate::error::ConfigError;
use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub account: Account,
    pub warehouse: Warehouse,
    #[serde(default)]
    pub overview: Overview,
    #[serde(default)]
    pub scheduler: Scheduler,
}

impl Config {
    /// Checks the values that deserialization alone cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.account.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "account.name must not be empty".to_string(),
            ));
        }

        self.warehouse.validate()?;

        if self.overview.window_days == 0 {
            return Err(ConfigError::ValidationError(
                "overview.window_days must be at least 1".to_string(),
            ));
        }
        if self.overview.lookback_days == 0 {
            return Err(ConfigError::ValidationError(
                "overview.lookback_days must be at least 1".to_string(),
            ));
        }
        if self.scheduler.spacing_days == 0 {
            return Err(ConfigError::ValidationError(
                "scheduler.spacing_days must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// The account whose metrics and post ideas are tracked.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    /// The account handle, used as the key in every warehouse table.
    pub name: String,
}

/// Where the warehouse tables live.
#[derive(Debug, Clone, Deserialize)]
pub struct Warehouse {
    /// The schema (dataset) holding the tables.
    pub schema: String,
    /// Daily account snapshots.
    pub account_table: String,
    /// Published posts.
    pub posts_table: String,
    /// Scheduled post ideas.
    pub post_ideas_table: String,
}

impl Warehouse {
    /// The fully qualified, quoted name of a table in the configured schema.
    pub fn qualified(&self, table: &str) -> String {
        format!("\"{}\".\"{}\"", self.schema, table)
    }

    // Table names are interpolated into SQL, so only plain identifiers pass.
    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("warehouse.schema", &self.schema),
            ("warehouse.account_table", &self.account_table),
            ("warehouse.posts_table", &self.posts_table),
            ("warehouse.post_ideas_table", &self.post_ideas_table),
        ];
        for (key, value) in fields {
            if !is_identifier(value) {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be a plain SQL identifier, got '{}'",
                    key, value
                )));
            }
        }
        Ok(())
    }
}

/// Window lengths used by the account overview.
#[derive(Debug, Clone, Deserialize)]
pub struct Overview {
    /// Length of the KPI comparison window, in days.
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    /// How many days the daily table looks back from yesterday.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
}

impl Default for Overview {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            lookback_days: default_lookback_days(),
        }
    }
}

/// Parameters for dating new post ideas.
#[derive(Debug, Clone, Deserialize)]
pub struct Scheduler {
    /// Days between the latest scheduled idea and the next one.
    #[serde(default = "default_spacing_days")]
    pub spacing_days: u32,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            spacing_days: default_spacing_days(),
        }
    }
}

fn default_window_days() -> u32 {
    30
}

fn default_lookback_days() -> u32 {
    30
}

fn default_spacing_days() -> u32 {
    3
}

fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
