use crate::models::Snippet;
use chrono::{DateTime, Local, Utc};
use colored::{ColoredString, Colorize};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const RULE_WIDTH: usize = 60;
const LIST_TITLE_WIDTH: usize = 28;
const PREVIEW_CHARS: usize = 80;

fn bar() -> ColoredString {
    "┃".bright_magenta()
}

pub fn rule() {
    println!("{}", "─".repeat(RULE_WIDTH).bright_magenta());
}

pub fn line(text: &str) {
    println!("{}  {}", bar(), text);
}

pub fn heading(text: &str) {
    println!("{}  {}", bar(), text.bold());
}

pub fn success(text: &str) {
    println!("{}  {} {}", bar(), "✔".bright_green(), text.bright_green());
}

pub fn error(text: &str) {
    println!("{}  {} {}", bar(), "✘".bright_red(), text.bright_red());
}

pub fn warning(text: &str) {
    println!("{}  {} {}", bar(), "!".bright_yellow(), text.bright_yellow());
}

pub fn info(text: &str) {
    println!("{}  {} {}", bar(), "ℹ".bright_cyan(), text.bright_cyan());
}

/// Prints a block of lines between two rules
pub fn boxed(title: &str, lines: &[String]) {
    rule();
    println!("{}  {}", bar(), title.bright_yellow());
    for entry in lines {
        println!("{}    • {}", bar(), entry);
    }
    rule();
}

pub fn tag_chips(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!("#{}", tag).bright_cyan().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Detailed view of one snippet, optionally including its content
pub fn snippet_card(snippet: &Snippet, show_content: bool) {
    println!(
        "{}  {} {}",
        bar(),
        format!("#{}", snippet.id).bright_yellow().bold(),
        snippet.title.bold()
    );
    rule();

    if !snippet.tags.is_empty() {
        println!(
            "{}  {}: {}",
            bar(),
            "Tags".bright_blue(),
            tag_chips(&snippet.tags)
        );
    }
    println!(
        "{}  {}: {}",
        bar(),
        "Created".bright_blue(),
        format_time_ago(snippet.created_at, Utc::now())
    );
    println!(
        "{}  {}: {}",
        bar(),
        "Lines".bright_blue(),
        snippet.get_line_count()
    );

    if show_content {
        rule();
        for content_line in snippet.content.lines() {
            println!("{}  {}", bar(), content_line);
        }
    }
}

/// One entry of `snip list`
pub fn snippet_row(snippet: &Snippet) {
    let tags = if snippet.tags.is_empty() {
        String::new()
    } else {
        format!(" {}", tag_chips(&snippet.tags))
    };

    println!(
        "{}  {}. {}{}",
        bar(),
        snippet.id.to_string().bright_yellow(),
        truncate_title(&snippet.title, LIST_TITLE_WIDTH).bright_white().bold(),
        tags
    );
    println!(
        "{}     {}",
        bar(),
        format!("Created {}", format_time_ago(snippet.created_at, Utc::now())).bright_black()
    );
}

pub fn search_results(snippets: &[Snippet], query: &str, tag_filter: &str) {
    let scope = if tag_filter.is_empty() {
        format!("matching '{}'", query)
    } else {
        format!("matching '{}' with tag '{}'", query, tag_filter)
    };

    if snippets.is_empty() {
        info(&format!("No snippets found {}", scope));
        return;
    }

    heading(&format!("Found {} snippet(s) {}:", snippets.len(), scope));
    rule();

    for (idx, snippet) in snippets.iter().enumerate() {
        snippet_row(snippet);

        let preview = snippet.preview(PREVIEW_CHARS);
        if !preview.is_empty() {
            println!(
                "{}     {}: {}",
                bar(),
                "Preview".bright_blue(),
                preview.bright_black()
            );
        }

        if idx < snippets.len() - 1 {
            println!("{}  {}", bar(), "─".repeat(40).bright_black());
        }
    }
}

/// Human friendly age of `at` relative to `now`
pub fn format_time_ago(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(at);

    if diff.num_seconds() < 60 {
        return "just now".to_string();
    }

    let minutes = diff.num_minutes();
    if minutes < 60 {
        return plural(minutes, "minute");
    }

    let hours = diff.num_hours();
    if hours < 24 {
        return plural(hours, "hour");
    }

    let days = diff.num_days();
    if days < 7 {
        return plural(days, "day");
    }

    at.with_timezone(&Local).format("%b %-d, %Y").to_string()
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

/// Cuts `title` to fit in `max_width` terminal columns, ending in `...`
pub fn truncate_title(title: &str, max_width: usize) -> String {
    if title.width() <= max_width {
        return title.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut width = 0;
    let mut out = String::new();
    for ch in title.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        width += w;
        out.push(ch);
    }
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn time_ago_buckets() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();

        assert_eq!(format_time_ago(now - Duration::seconds(30), now), "just now");
        assert_eq!(format_time_ago(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(format_time_ago(now - Duration::minutes(45), now), "45 minutes ago");
        assert_eq!(format_time_ago(now - Duration::hours(1), now), "1 hour ago");
        assert_eq!(format_time_ago(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(format_time_ago(now - Duration::days(1), now), "1 day ago");
        assert_eq!(format_time_ago(now - Duration::days(6), now), "6 days ago");

        let old = now - Duration::days(30);
        assert_eq!(
            format_time_ago(old, now),
            old.with_timezone(&Local).format("%b %-d, %Y").to_string()
        );
    }

    #[test]
    fn future_timestamps_read_as_just_now() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        assert_eq!(format_time_ago(now + Duration::hours(3), now), "just now");
    }

    #[test]
    fn truncates_by_display_width() {
        assert_eq!(truncate_title("short", 28), "short");
        assert_eq!(truncate_title("abcdefghij", 8), "abcde...");
        // Wide characters take two columns each
        assert_eq!(truncate_title("日本語のタイトル", 9), "日本語...");
    }
}
