//! Formatting helpers shared by the terminal reports

use crate::models::Money;
use crate::stats::UsageStatus;

/// Format a one-decimal share, e.g. `12.5%`
pub fn format_share(share: f64) -> String {
    format!("{:.1}%", share)
}

/// Horizontal bar of `width` cells filled in proportion to `value / max`
pub fn format_bar(value: Money, max: Money, width: usize) -> String {
    if !max.is_positive() || !value.is_positive() {
        return "░".repeat(width);
    }

    let filled = ((value.cents() as f64 / max.cents() as f64) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Status marker with ANSI colour for terminal output
pub fn format_status(status: Option<UsageStatus>) -> String {
    match status {
        Some(UsageStatus::Ok) => "\x1b[32mok\x1b[0m".to_string(),
        Some(UsageStatus::Warning) => "\x1b[33mwarning\x1b[0m".to_string(),
        Some(UsageStatus::Critical) => "\x1b[31mcritical\x1b[0m".to_string(),
        None => "n/a".to_string(),
    }
}

/// Truncate to `max_len` characters with an ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

pub fn separator(width: usize) -> String {
    "-".repeat(width)
}

pub fn double_separator(width: usize) -> String {
    "=".repeat(width)
}
