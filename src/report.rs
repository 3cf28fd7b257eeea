//! Terminal output formatting.

use colored::Colorize;
use serde::Serialize;

use crate::analyzer::{MatchedReference, MentionReport};

#[derive(Serialize)]
struct JsonReport<'a> {
    overview_found: bool,
    report: &'a MentionReport,
}

/// Render the report as human-readable text.
pub fn render_text(report: &MentionReport, overview_found: bool, metrics: bool) -> String {
    if !overview_found {
        return format!("{}", "AI Overview Not Found".yellow());
    }
    if !report.mentioned {
        return format!("{}", "Not Found".red().bold());
    }

    let mut output = format!("{}", "Found".green().bold());
    if metrics {
        output.push_str(&render_metrics(report));
    }
    output
}

/// Render per-category counts and the matched items. The company is shown
/// lowercased, the way it is matched.
pub fn render_metrics(report: &MentionReport) -> String {
    let mut output = String::new();
    let company = report.company.to_lowercase();

    output.push_str(&format!(
        "\n\n{}: {}\n",
        format!("Headings containing {}", company).bold(),
        report.heading_matches
    ));
    for heading in &report.headings {
        output.push_str(&format!("{}\n", trim_punctuation(&heading.text)));
    }

    output.push_str(&format!(
        "\n{}: {}\n",
        format!("Snippets containing {}", company).bold(),
        report.snippet_matches
    ));

    output.push_str(&format!(
        "\n{}: {}\n",
        format!("References containing {}", company).bold(),
        report.reference_matches
    ));
    for reference in &report.references {
        output.push_str(&format!(
            "{} {}\n",
            reference_label(reference),
            format!("[{}]", reference.field).dimmed()
        ));
    }

    output.trim_end().to_string()
}

/// Render the report as pretty-printed JSON.
pub fn render_json(report: &MentionReport, overview_found: bool) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        overview_found,
        report,
    })
}

fn trim_punctuation(text: &str) -> &str {
    text.trim_end_matches(|c: char| c.is_ascii_punctuation())
}

/// Link without its `#fragment`, or the title when there is no link
fn reference_label(reference: &MatchedReference) -> &str {
    match reference.link.split('#').next() {
        Some(link) if !link.is_empty() => link,
        _ => &reference.title,
    }
}
