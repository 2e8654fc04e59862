use crate::{DailyArgs, OverviewArgs, end_of_day};
use analytics::{AccountOverview, AnalyticsEngine, Kpi, KpiWindow, join_daily};
use anyhow::{Context, ensure};
use chrono::{Days, NaiveTime, Utc};
use comfy_table::{Cell, Color, Table, presets::UTF8_FULL};
use configuration::Config;
use core_types::DailyJoinedRow;
use database::DbRepository;
use rust_decimal::Decimal;

/// Fetches both KPI windows from the warehouse and prints the comparison.
pub(crate) async fn handle_overview(
    args: OverviewArgs,
    config: &Config,
    db_repo: &DbRepository,
) -> anyhow::Result<()> {
    let window_days = args.window_days.unwrap_or(config.overview.window_days);
    ensure!(window_days >= 1, "--window-days must be at least 1");

    let as_of = args.as_of.map(end_of_day).unwrap_or_else(Utc::now);
    let account = config.account.name.as_str();

    // Only the span covered by the two windows needs to leave the warehouse.
    let (current_window, previous_window) = KpiWindow::trailing(as_of, window_days)?;
    let accounts = db_repo
        .fetch_account_snapshots(account, previous_window.first_day, current_window.last_day)
        .await
        .context("Failed to fetch account snapshots")?;
    let posts = db_repo
        .fetch_posts(account, previous_window.opens_at(), as_of)
        .await
        .context("Failed to fetch posts")?;

    tracing::info!(
        account,
        window_days,
        snapshots = accounts.len(),
        posts = posts.len(),
        "Computing account overview."
    );

    let overview = AnalyticsEngine::new().overview(&accounts, &posts, window_days, as_of)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&overview)?);
    } else {
        println!(
            "Account overview for {}: {} to {} vs {} to {}",
            account,
            overview.current_window.first_day,
            overview.current_window.last_day,
            overview.previous_window.first_day,
            overview.previous_window.last_day
        );
        println!("{}", overview_table(&overview));
    }

    Ok(())
}

/// Fetches the lookback range and prints one row per day.
pub(crate) async fn handle_daily(
    args: DailyArgs,
    config: &Config,
    db_repo: &DbRepository,
) -> anyhow::Result<()> {
    let lookback_days = args.lookback_days.unwrap_or(config.overview.lookback_days);
    let as_of = args.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let account = config.account.name.as_str();

    let first_day = as_of
        .checked_sub_days(Days::new(u64::from(lookback_days)))
        .context("Lookback reaches before the supported calendar range")?;
    let last_day = as_of.pred_opt().context("As-of date has no previous day")?;

    let accounts = db_repo
        .fetch_account_snapshots(account, first_day, last_day)
        .await
        .context("Failed to fetch account snapshots")?;
    let posts = db_repo
        .fetch_posts(
            account,
            first_day.and_time(NaiveTime::MIN).and_utc(),
            end_of_day(last_day),
        )
        .await
        .context("Failed to fetch posts")?;

    let rows = join_daily(&posts, &accounts, as_of, lookback_days)?;
    tracing::info!(account, rows = rows.len(), "Built daily table.");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("{}", daily_table(&rows));
    }

    Ok(())
}

fn overview_table(overview: &AccountOverview) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Metric", "Current", "Previous", "Change"]);

    for kpi in overview.current.kpis() {
        let delta = overview.deltas.get(kpi);
        let change = Cell::new(format_delta(delta));
        let change = match delta {
            Some(d) if d > Decimal::ZERO => change.fg(Color::Green),
            Some(d) if d < Decimal::ZERO => change.fg(Color::Red),
            _ => change,
        };

        table.add_row(vec![
            Cell::new(kpi.label()),
            Cell::new(format_value(kpi, overview.current.get(kpi))),
            Cell::new(format_value(kpi, overview.previous.get(kpi))),
            change,
        ]);
    }

    table
}

fn daily_table(rows: &[DailyJoinedRow]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Date",
        "Posts",
        "Followers +/-",
        "Total Followers",
        "Reach",
        "Impressions",
    ]);

    for row in rows {
        table.add_row(vec![
            row.date.to_string(),
            row.post_count.to_string(),
            format_count(row.follower_count),
            format_count(row.total_followers),
            format_count(row.reach),
            format_count(row.impressions),
        ]);
    }

    table
}

fn format_value(kpi: Kpi, value: Option<Decimal>) -> String {
    let Some(value) = value else {
        return "-".to_string();
    };
    match kpi {
        Kpi::LikeRate => format!("{:.2}%", value * Decimal::ONE_HUNDRED),
        Kpi::AverageReach | Kpi::AverageLikes => format!("{:.1}", value),
        _ => value.normalize().to_string(),
    }
}

fn format_delta(delta: Option<Decimal>) -> String {
    match delta {
        Some(d) if d > Decimal::ZERO => format!("+{:.2}%", d),
        Some(d) => format!("{:.2}%", d),
        None => "n/a".to_string(),
    }
}

fn format_count(value: Option<i64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn like_rate_is_shown_as_percentage() {
        assert_eq!(format_value(Kpi::LikeRate, Some(dec!(0.0425))), "4.25%");
        assert_eq!(format_value(Kpi::AverageReach, Some(dec!(200))), "200.0");
        assert_eq!(format_value(Kpi::TotalPosts, Some(dec!(12))), "12");
        assert_eq!(format_value(Kpi::TotalPosts, None), "-");
    }

    #[test]
    fn deltas_carry_a_sign() {
        assert_eq!(format_delta(Some(dec!(100))), "+100.00%");
        assert_eq!(format_delta(Some(dec!(-33.33))), "-33.33%");
        assert_eq!(format_delta(Some(Decimal::ZERO)), "0.00%");
        assert_eq!(format_delta(None), "n/a");
    }

    #[test]
    fn daily_table_shows_absent_metrics_as_dash() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let rows = vec![DailyJoinedRow::new(date, None, 0)];
        let rendered = daily_table(&rows).to_string();
        assert!(rendered.contains("2024-01-01"));
        assert!(rendered.contains('-'));
    }
}
