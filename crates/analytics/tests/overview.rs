use analytics::{AnalyticsEngine, Kpi, KpiSet, join_daily, percentage_delta};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use core_types::{AccountSnapshot, MediaType, PostRecord};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Fourteen days of snapshots with steadily growing reach, and one post every
/// other day whose likes grow with it.
fn fortnight() -> (Vec<AccountSnapshot>, Vec<PostRecord>) {
    let start = ymd(2024, 6, 1);
    let mut accounts = Vec::new();
    let mut posts = Vec::new();

    for (i, day) in start.iter_days().take(14).enumerate() {
        let i = i as i64;
        accounts.push(AccountSnapshot {
            date: day,
            follower_count: Some(i),
            total_followers: Some(1_000 + i * (i + 1) / 2),
            reach: Some(100 + 10 * i),
            impressions: Some(200 + 10 * i),
        });
        if i % 2 == 0 {
            posts.push(PostRecord {
                created_time: day.and_hms_opt(18, 0, 0).unwrap().and_utc(),
                post_type: MediaType::Image,
                like_count: Some(5 + i),
                comments_count: Some(1),
                reach: Some(80),
            });
        }
    }

    (accounts, posts)
}

fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 14, 23, 0, 0).unwrap()
}

#[test]
fn overview_compares_consecutive_weeks() {
    let (accounts, posts) = fortnight();
    let overview = AnalyticsEngine::new()
        .overview(&accounts, &posts, 6, as_of())
        .unwrap();

    // Current window: June 8..=14 (i = 7..=13), previous: June 2..=7 (i = 1..=6).
    assert_eq!(overview.current_window.first_day, ymd(2024, 6, 8));
    assert_eq!(overview.previous_window.first_day, ymd(2024, 6, 2));
    assert_eq!(overview.previous_window.last_day, ymd(2024, 6, 7));

    let current = &overview.current;
    let previous = &overview.previous;
    assert_eq!(current.get(Kpi::TotalPosts), Some(dec!(3))); // i = 8, 10, 12
    assert_eq!(previous.get(Kpi::TotalPosts), Some(dec!(3))); // i = 2, 4, 6
    assert_eq!(current.get(Kpi::FollowersGained), Some(dec!(70)));
    assert_eq!(previous.get(Kpi::FollowersGained), Some(dec!(21)));
    assert_eq!(current.get(Kpi::TotalLikes), Some(dec!(45)));
    assert_eq!(previous.get(Kpi::TotalLikes), Some(dec!(27)));

    let deltas = &overview.deltas;
    assert_eq!(deltas.get(Kpi::TotalPosts), Some(Decimal::ZERO));
    assert_eq!(deltas.get(Kpi::FollowersGained), Some(dec!(233.33)));
    assert_eq!(deltas.get(Kpi::TotalLikes), Some(dec!(66.67)));
    assert_eq!(deltas.kpis().collect::<Vec<_>>(), Kpi::ALL.to_vec());
}

#[test]
fn overview_matches_separate_calls() {
    let (accounts, posts) = fortnight();
    let engine = AnalyticsEngine::new();

    let overview = engine.overview(&accounts, &posts, 5, as_of()).unwrap();
    let (current, previous) = engine.compute_kpis(&accounts, &posts, 5, as_of()).unwrap();
    let deltas = percentage_delta(&current, &previous).unwrap();

    assert_eq!(overview.current, current);
    assert_eq!(overview.previous, previous);
    assert_eq!(overview.deltas, deltas);
}

#[test]
fn daily_table_lines_up_with_window_totals() {
    let (accounts, posts) = fortnight();
    let as_of_day = as_of().date_naive() + Duration::days(1);
    let rows = join_daily(&posts, &accounts, as_of_day, 14).unwrap();

    assert_eq!(rows.len(), 14);
    assert_eq!(rows.first().map(|r| r.date), Some(ymd(2024, 6, 1)));
    assert_eq!(rows.last().map(|r| r.date), Some(ymd(2024, 6, 14)));
    assert_eq!(rows.iter().map(|r| r.post_count).sum::<usize>(), posts.len());

    let reach: i64 = rows.iter().filter_map(|r| r.reach).sum();
    let whole = AnalyticsEngine::new()
        .compute_kpis(&accounts, &posts, 13, as_of())
        .unwrap()
        .0;
    assert_eq!(whole.get(Kpi::TotalReach), Some(Decimal::from(reach)));
}

#[test]
fn identical_windows_report_no_change() {
    let set = KpiSet::zeroed()
        .with(Kpi::TotalPosts, dec!(12))
        .with(Kpi::LikeRate, dec!(0.045));
    let deltas = percentage_delta(&set, &set).unwrap();
    assert!(deltas.iter().all(|(_, d)| d == Some(Decimal::ZERO)));
}

#[test]
fn overview_serializes_for_presentation() {
    let (accounts, posts) = fortnight();
    let overview = AnalyticsEngine::new()
        .overview(&accounts, &posts, 6, as_of())
        .unwrap();
    let json = serde_json::to_value(&overview).unwrap();

    assert_eq!(json["current"]["total_posts"], "3");
    assert_eq!(json["deltas"]["total_posts"], "0");
    assert_eq!(json["current_window"]["first_day"], "2024-06-08");
}
