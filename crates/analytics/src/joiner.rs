use crate::error::AnalyticsError;
use chrono::{Days, NaiveDate};
use core_types::{AccountSnapshot, DailyJoinedRow, PostRecord};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Builds the daily table for the `lookback_days` days before `as_of`.
///
/// The range is `[as_of - lookback_days, as_of - 1]`: the day of invocation is
/// never part of it. Every day in the range gets exactly one row, in ascending
/// order, whether or not any data exists for it.
///
/// A post is counted on the UTC calendar day of its `created_time`, which is
/// the half-open interval `[day 00:00, next day 00:00)`. A post at exact
/// midnight therefore counts once, on the day that starts at that instant.
pub fn join_daily(
    posts: &[PostRecord],
    accounts: &[AccountSnapshot],
    as_of: NaiveDate,
    lookback_days: u32,
) -> Result<Vec<DailyJoinedRow>, AnalyticsError> {
    if lookback_days == 0 {
        return Ok(Vec::new());
    }

    let first_day = as_of
        .checked_sub_days(Days::new(u64::from(lookback_days)))
        .ok_or_else(|| {
            AnalyticsError::DateOutOfRange(format!(
                "{} days before {} is not a valid date",
                lookback_days, as_of
            ))
        })?;
    let in_range = |day: NaiveDate| first_day <= day && day < as_of;

    let mut post_counts: HashMap<NaiveDate, usize> = HashMap::new();
    for post in posts {
        let day = post.created_time.date_naive();
        if in_range(day) {
            *post_counts.entry(day).or_insert(0) += 1;
        }
    }

    let mut snapshots: HashMap<NaiveDate, &AccountSnapshot> = HashMap::new();
    for snapshot in accounts.iter().filter(|s| in_range(s.date)) {
        match snapshots.entry(snapshot.date) {
            Entry::Vacant(slot) => {
                slot.insert(snapshot);
            }
            Entry::Occupied(_) => {
                tracing::warn!(date = %snapshot.date, "Duplicate account snapshot; keeping the first one.");
            }
        }
    }

    let rows: Vec<DailyJoinedRow> = first_day
        .iter_days()
        .take(lookback_days as usize)
        .map(|day| {
            let post_count = post_counts.get(&day).copied().unwrap_or(0);
            DailyJoinedRow::new(day, snapshots.get(&day).copied(), post_count)
        })
        .collect();

    tracing::debug!(
        first_day = %first_day,
        rows = rows.len(),
        posts = posts.len(),
        snapshots = snapshots.len(),
        "Joined daily table."
    );

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use core_types::MediaType;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn post_at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> PostRecord {
        PostRecord {
            created_time: Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap(),
            post_type: MediaType::Image,
            like_count: Some(10),
            comments_count: Some(1),
            reach: Some(100),
        }
    }

    fn snapshot(date: NaiveDate, followers: i64) -> AccountSnapshot {
        AccountSnapshot {
            date,
            follower_count: Some(followers),
            total_followers: Some(1000 + followers),
            reach: Some(500),
            impressions: Some(800),
        }
    }

    #[test]
    fn every_lookback_length_yields_one_row_per_day() {
        let as_of = ymd(2024, 3, 1);
        for n in 0..=60 {
            let rows = join_daily(&[], &[], as_of, n).unwrap();
            assert_eq!(rows.len(), n as usize);
            assert!(rows.windows(2).all(|w| w[1].date == w[0].date.succ_opt().unwrap()));
            if let Some(last) = rows.last() {
                assert_eq!(last.date, ymd(2024, 2, 29));
            }
        }
    }

    #[test]
    fn range_excludes_the_as_of_day() {
        let rows = join_daily(&[], &[], ymd(2024, 1, 10), 3).unwrap();
        let dates: Vec<_> = rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![ymd(2024, 1, 7), ymd(2024, 1, 8), ymd(2024, 1, 9)]);
    }

    #[test]
    fn posts_are_bucketed_by_half_open_day() {
        let posts = vec![
            post_at(2024, 1, 8, 0, 0, 0),
            post_at(2024, 1, 8, 23, 59, 59),
            post_at(2024, 1, 9, 0, 0, 0),
            // Outside the range: the as-of day itself.
            post_at(2024, 1, 10, 9, 0, 0),
        ];
        let rows = join_daily(&posts, &[], ymd(2024, 1, 10), 3).unwrap();
        let counts: Vec<_> = rows.iter().map(|r| r.post_count).collect();
        assert_eq!(counts, vec![0, 2, 1]);
    }

    #[test]
    fn missing_snapshots_leave_metrics_absent() {
        let accounts = vec![snapshot(ymd(2024, 1, 8), 4)];
        let rows = join_daily(&[], &accounts, ymd(2024, 1, 10), 3).unwrap();

        assert_eq!(rows[0].follower_count, None);
        assert_eq!(rows[1].follower_count, Some(4));
        assert_eq!(rows[1].total_followers, Some(1004));
        assert_eq!(rows[1].impressions, Some(800));
        assert_eq!(rows[2].reach, None);
    }

    #[test]
    fn duplicate_snapshot_keeps_first() {
        let date = ymd(2024, 1, 9);
        let accounts = vec![snapshot(date, 1), snapshot(date, 2)];
        let rows = join_daily(&[], &accounts, ymd(2024, 1, 10), 1).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].follower_count, Some(1));
    }
}
