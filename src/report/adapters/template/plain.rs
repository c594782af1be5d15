//! Plain-text sprint report.

use super::render;
use crate::report::{
    domain::{ReportError, ReportFormat, ReportOptions, SprintReport},
    ports::ReportGenerationStrategy,
};

const TEMPLATE: &str = "\
{% if header %}
==================================================
{{ header }}
==================================================

{% endif %}
Sprint report: {{ name }}
Type: {{ sprint_type }}
State: {{ state }}
Period: {{ start }} - {{ end }}
Scrum Master: {{ scrum_master }}
Team: {{ team | join(', ') if team else '(none)' }}
Story points done: {{ completed_points }}/{{ total_points }}
{% if review_document_path %}
Review summary: {{ review_document_path }}
{% endif %}

Backlog items:
{% for outline in items %}
{{ outline }}
{% else %}
(no items in sprint backlog)
{% endfor %}
{% if footer %}

--------------------------------------------------
{{ footer }}
{% endif %}
";

/// Renders reports as plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextReportStrategy;

impl ReportGenerationStrategy for PlainTextReportStrategy {
    fn format(&self) -> ReportFormat {
        ReportFormat::PlainText
    }

    fn generate(
        &self,
        report: &SprintReport,
        options: &ReportOptions,
    ) -> Result<String, ReportError> {
        render(ReportFormat::PlainText, TEMPLATE, report, options)
    }
}
