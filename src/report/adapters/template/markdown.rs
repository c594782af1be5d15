//! Markdown sprint report.

use super::render;
use crate::report::{
    domain::{ReportError, ReportFormat, ReportOptions, SprintReport},
    ports::ReportGenerationStrategy,
};

const TEMPLATE: &str = "\
{% if header %}
> {{ header }}

{% endif %}
# Sprint report: {{ name }}

| Field | Value |
| --- | --- |
| Type | {{ sprint_type }} |
| State | {{ state }} |
| Period | {{ start }} to {{ end }} |
| Scrum Master | {{ scrum_master }} |
| Team | {{ team | join(', ') if team else '(none)' }} |
| Story points done | {{ completed_points }}/{{ total_points }} |
{% if review_document_path %}
| Review summary | {{ review_document_path }} |
{% endif %}

## Backlog items

{% for outline in items %}
{{ outline }}
{% else %}
_No items in sprint backlog._
{% endfor %}
{% if footer %}

---

{{ footer }}
{% endif %}
";

/// Renders reports as markdown.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownReportStrategy;

impl ReportGenerationStrategy for MarkdownReportStrategy {
    fn format(&self) -> ReportFormat {
        ReportFormat::Markdown
    }

    fn generate(
        &self,
        report: &SprintReport,
        options: &ReportOptions,
    ) -> Result<String, ReportError> {
        render(ReportFormat::Markdown, TEMPLATE, report, options)
    }
}
