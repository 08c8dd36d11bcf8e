//! Plain-text and JSON output for the CLI.

use anyhow::Result;
use chrono::Datelike;
use sadhana_core::analytics::{day_key, Calendar, Heatmap, IntensityLevel, PracticeSummary};
use sadhana_core::format::{level_glyph, minutes_display, streak_display};
use sadhana_core::Session;

pub fn print_sessions(sessions: &[Session], calendar: &Calendar) {
    if sessions.is_empty() {
        println!("No sessions recorded yet.");
        return;
    }

    println!("{:<36}  {:<10}  {:<11}  {:>8}", "ID", "DATE", "STATUS", "TIME");
    for session in sessions {
        let date = calendar.date_of(session.completed_at.unwrap_or(session.started_at));
        let time = if session.is_completed() {
            minutes_display(session.rounded_minutes())
        } else {
            "-".to_string()
        };
        println!(
            "{:<36}  {:<10}  {:<11}  {:>8}",
            session.id,
            day_key(date),
            session.status(),
            time
        );
    }
}

pub fn print_stats(summary: &PracticeSummary) {
    let streaks = &summary.streaks;
    let window = &summary.heatmap.summary;

    println!();
    println!("PRACTICE (as of {})", day_key(summary.today));
    println!("   Current streak:  {}", streak_display(streaks.current_streak));
    println!("   Longest streak:  {}", streak_display(streaks.longest_streak));
    println!("   Sessions:        {}", streaks.total_sessions);
    println!("   Total time:      {}", minutes_display(streaks.total_minutes));
    println!("   Active days:     {}", streaks.active_days);
    println!();
    println!("LAST {} DAYS", summary.heatmap.days.len());
    println!("   Active days:     {}", window.active_days);
    println!("   Total time:      {}", minutes_display(window.total_minutes));

    if let Some(id) = &summary.active_session_id {
        println!();
        println!("   In progress:     {}", id);
    }
    println!();
}

pub fn print_stats_json(summary: &PracticeSummary) -> Result<()> {
    let json = serde_json::json!({
        "today": day_key(summary.today),
        "streaks": summary.streaks,
        "window": {
            "days": summary.heatmap.days.len(),
            "active_days": summary.heatmap.summary.active_days,
            "total_minutes": summary.heatmap.summary.total_minutes,
        },
        "active_session_id": summary.active_session_id,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

/// Print the heatmap as seven weekday rows with one column per week.
pub fn print_heatmap(heatmap: &Heatmap) {
    let weeks: Vec<_> = heatmap.weeks().collect();
    let Some(first_week) = weeks.first() else {
        return;
    };

    println!();
    for (row, first_day) in first_week.iter().enumerate() {
        let cells: String = weeks
            .iter()
            .filter_map(|week| week.get(row))
            .map(|day| level_glyph(day.level))
            .flat_map(|glyph| [glyph, ' '])
            .collect();
        println!("   {}  {}", first_day.date.weekday(), cells.trim_end());
    }

    println!();
    let legend: Vec<String> = [
        IntensityLevel::None,
        IntensityLevel::Light,
        IntensityLevel::Moderate,
        IntensityLevel::Strong,
        IntensityLevel::Intense,
    ]
    .into_iter()
    .map(|level| format!("{} {}", level_glyph(level), level.as_u8()))
    .collect();
    println!("   Levels: {}", legend.join("  "));
    println!(
        "   {} to {}: {} active days, {}",
        heatmap.first_date().map(day_key).unwrap_or_default(),
        heatmap.last_date().map(day_key).unwrap_or_default(),
        heatmap.summary.active_days,
        minutes_display(heatmap.summary.total_minutes)
    );
    println!();
}

pub fn print_heatmap_json(summary: &PracticeSummary) -> Result<()> {
    let json = serde_json::json!({
        "today": day_key(summary.today),
        "weeks": summary.heatmap.weeks().collect::<Vec<_>>(),
        "summary": summary.heatmap.summary,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
