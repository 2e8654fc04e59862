use crate::delta::percentage_delta;
use crate::error::AnalyticsError;
use crate::report::{AccountOverview, Kpi, KpiSet};
use crate::window::KpiWindow;
use chrono::{DateTime, Utc};
use core_types::{AccountSnapshot, PostRecord};
use rust_decimal::Decimal;

/// A stateless calculator for deriving account KPIs from snapshots and posts.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the KPIs of the current window and of the window before it.
    ///
    /// # Arguments
    ///
    /// * `accounts` - Daily account snapshots, in any order.
    /// * `posts` - Published posts, in any order.
    /// * `window_days` - The window length in days.
    /// * `as_of` - The instant the current window closes at.
    ///
    /// # Returns
    ///
    /// A `Result` containing `(current, previous)` or an `AnalyticsError` when
    /// the windows cannot be placed on the calendar.
    pub fn compute_kpis(
        &self,
        accounts: &[AccountSnapshot],
        posts: &[PostRecord],
        window_days: u32,
        as_of: DateTime<Utc>,
    ) -> Result<(KpiSet, KpiSet), AnalyticsError> {
        let (current_window, previous_window) = KpiWindow::trailing(as_of, window_days)?;

        let current = self.kpis_for_window(&current_window, accounts, posts);
        let previous = self.kpis_for_window(&previous_window, accounts, posts);

        Ok((current, previous))
    }

    /// Computes both windows and the change between them in one call.
    pub fn overview(
        &self,
        accounts: &[AccountSnapshot],
        posts: &[PostRecord],
        window_days: u32,
        as_of: DateTime<Utc>,
    ) -> Result<AccountOverview, AnalyticsError> {
        let (current_window, previous_window) = KpiWindow::trailing(as_of, window_days)?;

        let current = self.kpis_for_window(&current_window, accounts, posts);
        let previous = self.kpis_for_window(&previous_window, accounts, posts);
        let deltas = percentage_delta(&current, &previous)?;

        Ok(AccountOverview {
            current_window,
            previous_window,
            current,
            previous,
            deltas,
        })
    }

    /// Aggregates the rows that fall inside `window` into a complete `KpiSet`.
    ///
    /// Absent numeric fields count as zero, and every ratio with a zero
    /// denominator is reported as zero.
    pub fn kpis_for_window(
        &self,
        window: &KpiWindow,
        accounts: &[AccountSnapshot],
        posts: &[PostRecord],
    ) -> KpiSet {
        let snapshots: Vec<&AccountSnapshot> = accounts
            .iter()
            .filter(|s| window.contains_date(s.date))
            .collect();
        let window_posts: Vec<&PostRecord> = posts
            .iter()
            .filter(|p| window.contains_timestamp(p.created_time))
            .collect();

        let total_posts = Decimal::from(window_posts.len());
        let followers_gained = sum(snapshots.iter().map(|s| s.follower_count));
        let total_reach = sum(snapshots.iter().map(|s| s.reach));
        let total_likes = sum(window_posts.iter().map(|p| p.like_count));
        let total_comments = sum(window_posts.iter().map(|p| p.comments_count));

        let like_rate = ratio(total_likes, total_reach);
        let average_reach = ratio(total_reach, total_posts);
        let average_likes = ratio(total_likes, total_posts);

        tracing::debug!(
            first_day = %window.first_day,
            last_day = %window.last_day,
            snapshots = snapshots.len(),
            posts = window_posts.len(),
            "Aggregated KPI window."
        );

        KpiSet::new()
            .with(Kpi::TotalPosts, total_posts)
            .with(Kpi::FollowersGained, followers_gained)
            .with(Kpi::TotalReach, total_reach)
            .with(Kpi::TotalLikes, total_likes)
            .with(Kpi::TotalComments, total_comments)
            .with(Kpi::LikeRate, like_rate)
            .with(Kpi::AverageReach, average_reach)
            .with(Kpi::AverageLikes, average_likes)
    }
}

fn sum(values: impl Iterator<Item = Option<i64>>) -> Decimal {
    values.flatten().map(Decimal::from).sum()
}

fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator > Decimal::ZERO {
        numerator / denominator
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use core_types::MediaType;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn post(created_time: DateTime<Utc>, likes: i64, comments: i64) -> PostRecord {
        PostRecord {
            created_time,
            post_type: MediaType::Reel,
            like_count: Some(likes),
            comments_count: Some(comments),
            reach: Some(250),
        }
    }

    #[test]
    fn empty_inputs_give_zeroed_sets() {
        let engine = AnalyticsEngine::new();
        let as_of = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let (current, previous) = engine.compute_kpis(&[], &[], 30, as_of).unwrap();

        assert_eq!(current, KpiSet::zeroed());
        assert_eq!(previous, KpiSet::zeroed());
    }

    #[test]
    fn single_snapshot_without_posts() {
        let accounts = vec![AccountSnapshot {
            date: ymd(2024, 1, 1),
            follower_count: Some(5),
            total_followers: Some(100),
            reach: Some(1000),
            impressions: None,
        }];
        let as_of = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let (current, previous) = AnalyticsEngine::new()
            .compute_kpis(&accounts, &[], 1, as_of)
            .unwrap();

        let expected = KpiSet::zeroed()
            .with(Kpi::FollowersGained, dec!(5))
            .with(Kpi::TotalReach, dec!(1000));
        assert_eq!(current, expected);
        assert_eq!(previous, KpiSet::zeroed());
    }

    #[test]
    fn ratios_follow_the_window_totals() {
        let accounts = vec![
            AccountSnapshot {
                date: ymd(2024, 1, 9),
                follower_count: Some(3),
                total_followers: Some(50),
                reach: Some(300),
                impressions: Some(400),
            },
            AccountSnapshot {
                date: ymd(2024, 1, 10),
                follower_count: None,
                total_followers: Some(50),
                reach: Some(100),
                impressions: None,
            },
        ];
        let posts = vec![
            post(Utc.with_ymd_and_hms(2024, 1, 9, 8, 0, 0).unwrap(), 30, 4),
            post(Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap(), 10, 2),
        ];
        let as_of = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        let (current, _) = AnalyticsEngine::new()
            .compute_kpis(&accounts, &posts, 1, as_of)
            .unwrap();

        assert_eq!(current.get(Kpi::TotalPosts), Some(dec!(2)));
        assert_eq!(current.get(Kpi::FollowersGained), Some(dec!(3)));
        assert_eq!(current.get(Kpi::TotalReach), Some(dec!(400)));
        assert_eq!(current.get(Kpi::TotalLikes), Some(dec!(40)));
        assert_eq!(current.get(Kpi::TotalComments), Some(dec!(6)));
        assert_eq!(current.get(Kpi::LikeRate), Some(dec!(0.1)));
        assert_eq!(current.get(Kpi::AverageReach), Some(dec!(200)));
        assert_eq!(current.get(Kpi::AverageLikes), Some(dec!(20)));
    }

    #[test]
    fn posts_without_reach_have_zero_like_rate() {
        let posts = vec![post(Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap(), 7, 0)];
        let as_of = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        let (current, _) = AnalyticsEngine::new()
            .compute_kpis(&[], &posts, 7, as_of)
            .unwrap();

        assert_eq!(current.get(Kpi::TotalLikes), Some(dec!(7)));
        assert_eq!(current.get(Kpi::LikeRate), Some(Decimal::ZERO));
        assert_eq!(current.get(Kpi::AverageReach), Some(Decimal::ZERO));
    }

    #[test]
    fn posts_after_as_of_are_ignored() {
        let as_of = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        let posts = vec![post(Utc.with_ymd_and_hms(2024, 1, 10, 13, 0, 0).unwrap(), 1, 1)];
        let (current, previous) = AnalyticsEngine::new()
            .compute_kpis(&[], &posts, 7, as_of)
            .unwrap();

        assert_eq!(current.get(Kpi::TotalPosts), Some(Decimal::ZERO));
        assert_eq!(previous.get(Kpi::TotalPosts), Some(Decimal::ZERO));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let engine = AnalyticsEngine::new();
        let posts = vec![
            post(Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap(), 13, 1),
            post(Utc.with_ymd_and_hms(2024, 1, 6, 8, 0, 0).unwrap(), 17, 3),
        ];
        let accounts = vec![AccountSnapshot {
            date: ymd(2024, 1, 6),
            follower_count: Some(2),
            total_followers: Some(10),
            reach: Some(7),
            impressions: Some(9),
        }];
        let as_of = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();

        let first = engine.compute_kpis(&accounts, &posts, 3, as_of).unwrap();
        let second = engine.compute_kpis(&accounts, &posts, 3, as_of).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.0.get(Kpi::LikeRate).map(|d| d.serialize()),
            second.0.get(Kpi::LikeRate).map(|d| d.serialize())
        );
    }
}
