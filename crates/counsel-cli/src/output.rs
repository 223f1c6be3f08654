//! Output helpers

use counsel_core::QueryRecord;
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Print a colored label followed by plain text
pub fn print_labeled(label: &str, text: &str, color: Color) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(color)).set_bold(true);
    let _ = stdout.set_color(&spec);
    let _ = write!(stdout, "{}", label);
    let _ = stdout.reset();
    let _ = writeln!(stdout, " {}", text);
}

/// Print the degraded-answer warning marker
pub fn print_degraded_notice() {
    print_labeled(
        "[degraded]",
        "the generation service was unavailable; this is a canned answer",
        Color::Yellow,
    );
}

/// One-line summary of a query record
pub fn format_query_line(query: &QueryRecord, score: Option<f32>) -> String {
    let marker = if query.degraded { " [degraded]" } else { "" };
    match score {
        Some(score) => format!(
            "#{} ({:.3}) [{}]{} {}",
            query.id, score, query.subject, marker, query.question
        ),
        None => format!(
            "#{} [{}]{} {}",
            query.id, query.subject, marker, query.question
        ),
    }
}

/// Pretty-print a serializable value as JSON
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
