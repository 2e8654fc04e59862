use crate::ScheduleArgs;
use anyhow::Context;
use chrono::{Days, NaiveDate, Utc};
use comfy_table::{Table, presets::UTF8_FULL};
use configuration::Config;
use core_types::{ContentStrategy, PostIdea, PostIdeaDraft};
use database::DbRepository;
use std::path::Path;

const CAPTION_PREVIEW_CHARS: usize = 50;

/// Reads a post idea from disk, dates it after the latest scheduled idea and stores it.
pub(crate) async fn handle_schedule(
    args: ScheduleArgs,
    config: &Config,
    db_repo: &DbRepository,
) -> anyhow::Result<()> {
    let account = config.account.name.as_str();
    let draft: PostIdeaDraft = read_json(&args.idea)?;

    if let Some(path) = &args.strategy {
        let strategy: ContentStrategy = read_json(path)?;
        strategy
            .check(&draft)
            .context("Post idea does not follow the content strategy")?;
    }

    let latest = db_repo
        .latest_post_idea_date(account)
        .await
        .context("Failed to look up the latest scheduled post idea")?;
    let today = Utc::now().date_naive();
    let date = next_post_date(latest, today, config.scheduler.spacing_days)
        .context("Next post date is outside the supported calendar range")?;

    let idea = draft.schedule(date);
    db_repo
        .save_post_idea(account, &idea)
        .await
        .context("Failed to save the post idea")?;

    println!("Scheduled \"{}\" for {}", caption_preview(&idea.caption), idea.date);
    Ok(())
}

/// Prints every scheduled idea of the configured account, newest first.
pub(crate) async fn handle_ideas(config: &Config, db_repo: &DbRepository) -> anyhow::Result<()> {
    let ideas = db_repo
        .fetch_post_ideas(&config.account.name)
        .await
        .context("Failed to fetch post ideas")?;

    if ideas.is_empty() {
        println!("No post ideas scheduled for {}.", config.account.name);
        return Ok(());
    }

    println!("{}", ideas_table(&ideas));
    Ok(())
}

/// The date for the next post idea: `spacing_days` after the latest scheduled
/// idea, or after `today` when nothing is scheduled yet.
pub(crate) fn next_post_date(
    latest: Option<NaiveDate>,
    today: NaiveDate,
    spacing_days: u32,
) -> Option<NaiveDate> {
    latest
        .unwrap_or(today)
        .checked_add_days(Days::new(u64::from(spacing_days)))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

fn ideas_table(ideas: &[PostIdea]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Date", "Caption", "Post Type", "Themes", "Tone", "Source"]);

    for idea in ideas {
        table.add_row(vec![
            idea.date.to_string(),
            caption_preview(&idea.caption),
            idea.post_type.to_string(),
            idea.themes.join(", "),
            idea.tone.to_string(),
            idea.source.to_string(),
        ]);
    }

    table
}

fn caption_preview(caption: &str) -> String {
    if caption.chars().count() <= CAPTION_PREVIEW_CHARS {
        return caption.to_string();
    }
    let preview: String = caption.chars().take(CAPTION_PREVIEW_CHARS).collect();
    format!("{}...", preview)
}
