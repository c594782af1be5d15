//! `minijinja`-backed report strategies.

mod markdown;
mod plain;

pub use markdown::MarkdownReportStrategy;
pub use plain::PlainTextReportStrategy;

use crate::report::domain::{ReportError, ReportFormat, ReportOptions, SprintReport};
use minijinja::Environment;
use serde::Serialize;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Template context flattened from a report and its decorations.
#[derive(Serialize)]
struct ReportContext<'a> {
    header: Option<&'a str>,
    footer: Option<&'a str>,
    name: &'a str,
    sprint_type: String,
    state: String,
    start: String,
    end: String,
    scrum_master: &'a str,
    team: Vec<&'a str>,
    completed_points: u32,
    total_points: u32,
    review_document_path: Option<&'a str>,
    items: Vec<&'a str>,
}

impl<'a> ReportContext<'a> {
    fn new(report: &'a SprintReport, options: &'a ReportOptions) -> Self {
        Self {
            header: options.header.as_deref(),
            footer: options.footer.as_deref(),
            name: &report.name,
            sprint_type: report.sprint_type.to_string(),
            state: report.state.to_string(),
            start: report.start.format(DATE_FORMAT).to_string(),
            end: report.end.format(DATE_FORMAT).to_string(),
            scrum_master: &report.scrum_master.display_name,
            team: report
                .team
                .iter()
                .map(|member| member.display_name.as_str())
                .collect(),
            completed_points: report.completed_story_points(),
            total_points: report.total_story_points(),
            review_document_path: report.review_document_path.as_deref(),
            items: report.items.iter().map(|item| item.outline.as_str()).collect(),
        }
    }
}

fn render(
    format: ReportFormat,
    template: &str,
    report: &SprintReport,
    options: &ReportOptions,
) -> Result<String, ReportError> {
    let mut environment = Environment::new();
    environment.set_trim_blocks(true);
    environment.set_lstrip_blocks(true);
    environment
        .render_str(template, ReportContext::new(report, options))
        .map_err(|source| ReportError::Render { format, source })
}
