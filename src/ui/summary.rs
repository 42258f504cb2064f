//! End-of-run report and `check` classification report

use console::Style;

use crate::ledger::RunSummary;
use crate::resolver::Classification;
use crate::source::SourceKind;

/// Render the run summary: counts, substitutions, and names needing follow-up
pub fn render_summary(summary: &RunSummary) -> String {
    let bold = Style::new().bold();
    let mut lines = vec![format!(
        "{} {} of {} package(s) present ({} already installed)",
        Style::new().cyan().bold().apply_to("::"),
        bold.apply_to(summary.installed_count),
        summary.total(),
        summary.already_installed.len()
    )];

    let substitutions: Vec<_> = summary.substitutions().collect();
    if !substitutions.is_empty() {
        lines.push(format!("{}", bold.apply_to("Substituted:")));
        for (requested, selected) in substitutions {
            lines.push(format!(
                "  {} -> {} [{}]",
                requested, selected.name, selected.source
            ));
        }
    }

    if !summary.deferred.is_empty() {
        lines.push(format!(
            "{} {}",
            Style::new().yellow().bold().apply_to("Deferred:"),
            summary.deferred.join(" ")
        ));
    }
    if !summary.failed.is_empty() {
        lines.push(format!(
            "{} {}",
            Style::new().red().bold().apply_to("Failed:"),
            summary.failed.join(" ")
        ));
    }
    lines.join("\n")
}

pub fn print_summary(summary: &RunSummary) {
    println!("\n{}", render_summary(summary));
}

/// Render a classification without installing anything
pub fn render_classification(classification: &Classification) -> String {
    let mut lines = Vec::new();
    let mut section = |title: Style, label: &str, names: Vec<String>| {
        if names.is_empty() {
            return;
        }
        lines.push(format!(
            "{} ({})",
            title.apply_to(label),
            names.len()
        ));
        for name in names {
            lines.push(format!("  {name}"));
        }
    };

    section(
        Style::new().green().bold(),
        "Already installed",
        classification.already_installed.clone(),
    );
    section(
        Style::new().cyan().bold(),
        "Installable from repo",
        classification.installable_from(SourceKind::Primary),
    );
    section(
        Style::new().cyan().bold(),
        "Installable from AUR",
        classification.installable_from(SourceKind::Community),
    );
    section(
        Style::new().red().bold(),
        "Not found",
        classification.unresolvable.clone(),
    );
    lines.join("\n")
}

pub fn print_classification(classification: &Classification) {
    println!("{}", render_classification(classification));
}
