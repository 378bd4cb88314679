use colored::*;
use jiff::civil::Date;

use crate::countdown::{BucketCounts, CountdownDisplay, Urgency};
use crate::models::task::Task;

/// Get the terminal width, defaulting to 80 if unavailable
fn get_terminal_width() -> usize {
    term_size::dimensions().map(|(w, _)| w).unwrap_or(80)
}

/// Color a countdown cell by its urgency
pub fn style_countdown(display: &CountdownDisplay) -> ColoredString {
    match display.urgency {
        Urgency::None => display.text.dimmed(),
        Urgency::Paused => display.text.blue(),
        Urgency::Critical => display.text.red(),
        Urgency::Warning => display.text.truecolor(253, 126, 20),
        Urgency::Caution => display.text.yellow(),
        Urgency::Normal => display.text.normal(),
    }
}

/// Get the appropriate status glyph for a task
pub fn get_status_glyph(task: &Task, urgency: Urgency) -> ColoredString {
    if task.completed_at.is_some() {
        "✓".dimmed()
    } else if task.schedule.is_paused() {
        "◌".blue()
    } else if urgency == Urgency::Critical {
        "●".red()
    } else {
        "○".normal()
    }
}

/// Render a single task line with ID, glyph, title, and a right-aligned
/// countdown cell plus progress percentage
pub fn render_task_line(task: &Task, countdown: &CountdownDisplay) {
    let terminal_width = get_terminal_width();

    let id_str = format!("{:>3}", task.task_number);
    let glyph = get_status_glyph(task, countdown.urgency);
    let title = &task.title;

    let left_section = format!("  {}  {}  {}", id_str, glyph, title);

    let styled_left = if task.completed_at.is_some() {
        left_section.dimmed()
    } else {
        left_section.bold()
    };

    let right_plain = format!("{}  ·  {:>3}%", countdown.text, task.progress_percent);

    let left_visible_len = format!("  {}  {}  {}", id_str, " ", title).chars().count();
    let right_visible_len = right_plain.chars().count();
    let total_content = left_visible_len + right_visible_len;

    let styled_right = format!(
        "{}  {}  {}",
        style_countdown(countdown),
        "·".dimmed(),
        format!("{:>3}%", task.progress_percent).dimmed()
    );

    if total_content + 4 < terminal_width {
        let padding = terminal_width - total_content - 2;
        println!("{}{}{}", styled_left, " ".repeat(padding), styled_right);
    } else {
        // Not enough space for right alignment, just print normally
        println!("{} {}", styled_left, style_countdown(countdown));
    }
}

/// Render the detail line under a task: issue date, deadline, and personnel
pub fn render_task_meta_line(task: &Task, deadline: Option<Date>) {
    let mut meta_parts = vec![];

    if let Some(issued_on) = task.issued_on {
        meta_parts.push(format!("issued {}", format_short_date(issued_on)));
    }
    if let Some(deadline) = deadline {
        meta_parts.push(format!("due {}", format_short_date(deadline)));
    }
    if let Some(initiator) = &task.initiator {
        meta_parts.push(initiator.clone());
    }
    if !task.pics.is_empty() {
        meta_parts.push(format!("PIC: {}", task.pics.join(", ")));
    }

    if !meta_parts.is_empty() {
        println!(
            "       {}",
            meta_parts.join(&format!(" {} ", "•".dimmed())).dimmed()
        );
    }
}

/// Render a view header with title and count
pub fn render_view_header(title: &str, count: usize) {
    let task_word = if count == 1 { "task" } else { "tasks" };
    println!("\n  {} ({} {})\n", title.cyan().bold(), count, task_word);
}

/// Render one row of the dashboard bucket chart: label, count, and a bar
/// scaled against the largest bucket
fn render_bucket_row(label: &str, count: usize, max: usize, color: fn(&str) -> ColoredString) {
    let bar_width = if max == 0 { 0 } else { (count * 30) / max };
    let bar: String = "█".repeat(bar_width.max(usize::from(count > 0)));
    println!("  {:<22} {:>4}  {}", label, count, color(&bar));
}

/// Render the dashboard bucket chart over ongoing tasks
pub fn render_bucket_chart(counts: &BucketCounts) {
    let max = counts
        .overdue
        .max(counts.due_0_2)
        .max(counts.due_3_5)
        .max(counts.due_6_9)
        .max(counts.other);

    render_bucket_row("Over deadline", counts.overdue, max, |s| {
        s.truecolor(164, 14, 38)
    });
    render_bucket_row("Due in 0-2 wd", counts.due_0_2, max, |s| s.red());
    render_bucket_row("Due in 3-5 wd", counts.due_3_5, max, |s| {
        s.truecolor(253, 126, 20)
    });
    render_bucket_row("Due in 6-9 wd", counts.due_6_9, max, |s| s.yellow());
    render_bucket_row("Paused / other", counts.other, max, |s| s.dimmed());
    println!("\n  {} ongoing in total", counts.total.to_string().bold());
}

/// Render a stat card line (e.g., published count, total mitigation plans)
pub fn render_stat(title: &str, value: u64) {
    println!("  {:<22} {}", title, value.to_string().bold());
}

/// Format a date for row metadata (e.g., "06/01/2025")
pub fn format_short_date(date: Date) -> String {
    date.strftime("%d/%m/%Y").to_string()
}

/// Format a completion date for display (e.g., "Feb 15", "Today", "Yesterday")
pub fn format_completion_date(timestamp: jiff::Timestamp, today: Date) -> String {
    let zoned = jiff::Zoned::new(timestamp, jiff::tz::TimeZone::system());
    let date = zoned.date();

    if date == today {
        "Today".to_string()
    } else if Some(date) == today.yesterday().ok() {
        "Yesterday".to_string()
    } else {
        // Format as "Feb 15"
        date.strftime("%b %d").to_string()
    }
}
