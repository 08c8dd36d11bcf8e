//! Formatting helpers shared across front ends.

use crate::analytics::IntensityLevel;

/// Format minutes for display (e.g., "1h 05m" or "45m").
pub fn minutes_display(minutes: u64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {:02}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// Format a streak length (e.g., "1 day", "3 days").
pub fn streak_display(days: u32) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", days)
    }
}

/// Single-character cell for a heatmap level in plain-text output.
pub fn level_glyph(level: IntensityLevel) -> char {
    match level {
        IntensityLevel::None => '.',
        IntensityLevel::Light => '-',
        IntensityLevel::Moderate => '+',
        IntensityLevel::Strong => '*',
        IntensityLevel::Intense => '#',
    }
}
