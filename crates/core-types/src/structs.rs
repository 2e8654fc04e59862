use crate::enums::{IdeaSource, MediaType, PostFormat, Tone};
use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// One day of account-level metrics for a tracked account.
///
/// Numeric fields are optional because the platform's insights API omits
/// metrics it has not yet computed for a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub date: NaiveDate,
    /// Followers gained (or lost, when negative) on this day.
    pub follower_count: Option<i64>,
    /// Cumulative follower count at the end of the day.
    pub total_followers: Option<i64>,
    pub reach: Option<i64>,
    pub impressions: Option<i64>,
}

/// A single published post and its engagement counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    pub created_time: DateTime<Utc>,
    pub post_type: MediaType,
    pub like_count: Option<i64>,
    pub comments_count: Option<i64>,
    pub reach: Option<i64>,
}

/// One calendar day of the daily table: the account snapshot for the day
/// (if any) and the number of posts published on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyJoinedRow {
    pub date: NaiveDate,
    pub follower_count: Option<i64>,
    pub total_followers: Option<i64>,
    pub reach: Option<i64>,
    pub impressions: Option<i64>,
    pub post_count: usize,
}

impl DailyJoinedRow {
    pub fn new(date: NaiveDate, snapshot: Option<&AccountSnapshot>, post_count: usize) -> Self {
        Self {
            date,
            follower_count: snapshot.and_then(|s| s.follower_count),
            total_followers: snapshot.and_then(|s| s.total_followers),
            reach: snapshot.and_then(|s| s.reach),
            impressions: snapshot.and_then(|s| s.impressions),
            post_count,
        }
    }
}

/// A post idea that has not been placed on the calendar yet.
///
/// This is the shape the idea generator hands over; it is deserialized from
/// JSON such as `{"caption": "...", "post_type": "Reel", "themes": [...], "tone": "casual"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostIdeaDraft {
    pub caption: String,
    pub post_type: PostFormat,
    #[serde(default)]
    pub themes: Vec<String>,
    pub tone: Tone,
    #[serde(default)]
    pub source: IdeaSource,
}

impl PostIdeaDraft {
    /// Places the draft on the calendar, giving it an identity.
    pub fn schedule(self, date: NaiveDate) -> PostIdea {
        PostIdea {
            idea_id: Uuid::new_v4(),
            date,
            caption: self.caption,
            post_type: self.post_type,
            themes: self.themes,
            tone: self.tone,
            source: self.source,
        }
    }
}

/// A post idea with a scheduled publication date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostIdea {
    pub idea_id: Uuid,
    pub date: NaiveDate,
    pub caption: String,
    pub post_type: PostFormat,
    pub themes: Vec<String>,
    pub tone: Tone,
    pub source: IdeaSource,
}

/// The social media strategy that post ideas are expected to follow.
///
/// An empty `tones` or `post_formats` set places no restriction on that
/// attribute; likewise an empty theme list accepts any theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentStrategy {
    #[serde(default)]
    pub content_themes: Vec<String>,
    #[serde(default)]
    pub tones: BTreeSet<Tone>,
    #[serde(default)]
    pub post_formats: BTreeSet<PostFormat>,
}

impl ContentStrategy {
    /// Checks that a draft stays inside this strategy.
    pub fn check(&self, draft: &PostIdeaDraft) -> Result<(), CoreError> {
        if !self.post_formats.is_empty() && !self.post_formats.contains(&draft.post_type) {
            return Err(CoreError::InvalidInput(
                "post_type".to_string(),
                format!("'{}' is not one of the strategy's post formats", draft.post_type),
            ));
        }

        if !self.tones.is_empty() && !self.tones.contains(&draft.tone) {
            return Err(CoreError::InvalidInput(
                "tone".to_string(),
                format!("'{}' is not one of the strategy's tones", draft.tone),
            ));
        }

        if self.content_themes.is_empty() {
            return Ok(());
        }
        for theme in &draft.themes {
            let known = self
                .content_themes
                .iter()
                .any(|t| t.trim().eq_ignore_ascii_case(theme.trim()));
            if !known {
                return Err(CoreError::InvalidInput(
                    "themes".to_string(),
                    format!("'{}' is not one of the strategy's content themes", theme),
                ));
            }
        }

        Ok(())
    }
}
