use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use parking_lot::Mutex;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::domain::SummaryCounts;

use super::{
    format::format_time_of_day,
    html::{escape_html, table_body},
    view::{DashboardView, TableContent},
};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write dashboard snapshot {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

#[derive(Debug)]
struct DashboardDocument {
    table_body: String,
    summary: Option<SummaryCounts>,
    last_updated: Option<String>,
    indicator_visible: bool,
}

impl Default for DashboardDocument {
    fn default() -> Self {
        Self {
            table_body: LOADING_ROW.to_string(),
            summary: None,
            last_updated: None,
            indicator_visible: false,
        }
    }
}

const LOADING_ROW: &str = r#"<tr>
    <td colspan="6" class="text-center text-muted">Loading...</td>
</tr>"#;

/// Keeps the dashboard document in memory and mirrors it to an HTML file
/// after every change.
pub struct HtmlPageView {
    output_path: PathBuf,
    timezone: Tz,
    document: Mutex<DashboardDocument>,
}

impl HtmlPageView {
    pub fn new(output_path: PathBuf, timezone: Tz) -> Self {
        Self {
            output_path,
            timezone,
            document: Mutex::new(DashboardDocument::default()),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn page_html(&self) -> String {
        render_page(&self.document.lock())
    }

    /// Writes the current document, replacing the previous snapshot atomically.
    pub fn flush(&self) -> Result<(), RenderError> {
        let doc = self.document.lock();
        self.write_snapshot(&render_page(&doc))
    }

    // The lock is held until the snapshot is persisted so the file on disk
    // always matches the last applied change.
    fn update(&self, apply: impl FnOnce(&mut DashboardDocument)) {
        let mut doc = self.document.lock();
        apply(&mut *doc);
        if let Err(err) = self.write_snapshot(&render_page(&doc)) {
            tracing::warn!(target: "render", error = %err, "dashboard snapshot not written");
        }
    }

    fn write_snapshot(&self, html: &str) -> Result<(), RenderError> {
        let dir = match self.output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let write_err = |source: io::Error| RenderError::Write {
            path: self.output_path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(html.as_bytes()).map_err(write_err)?;
        tmp.persist(&self.output_path)
            .map_err(|err| write_err(err.error))?;
        Ok(())
    }
}

impl DashboardView for HtmlPageView {
    fn render_table(&self, content: TableContent) {
        let markup = table_body(&content, self.timezone);
        tracing::debug!(target: "render", rows = content.row_count(), "status table rendered");
        self.update(|doc| doc.table_body = markup);
    }

    fn render_summary(&self, counts: SummaryCounts) {
        tracing::debug!(
            target: "render",
            active = counts.active_monitoring,
            new_posts = counts.new_posts,
            errors = counts.errors,
            "summary updated"
        );
        self.update(|doc| doc.summary = Some(counts));
    }

    fn render_last_updated(&self, at: DateTime<Utc>) {
        let formatted = format_time_of_day(at, self.timezone);
        self.update(|doc| doc.last_updated = Some(formatted));
    }

    fn show_indicator(&self) {
        self.update(|doc| doc.indicator_visible = true);
    }

    fn hide_indicator(&self) {
        self.update(|doc| doc.indicator_visible = false);
    }
}

fn render_page(doc: &DashboardDocument) -> String {
    let counter = |pick: fn(&SummaryCounts) -> usize| {
        doc.summary
            .as_ref()
            .map(|counts| pick(counts).to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    let indicator_class = if doc.indicator_visible {
        "auto-refresh-indicator show"
    } else {
        "auto-refresh-indicator"
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Social Media Monitor Dashboard</title>
</head>
<body>
<div class="summary">
    <div class="card"><span>Active Monitoring</span> <strong id="active-monitoring">{active}</strong></div>
    <div class="card"><span>New Posts</span> <strong id="new-posts">{new_posts}</strong></div>
    <div class="card"><span>Errors</span> <strong id="error-count">{errors}</strong></div>
</div>
<p>Last updated: <span id="last-updated">{last_updated}</span></p>
<table class="table">
<thead>
<tr><th>Platform</th><th>Last Post</th><th>Last Checked</th><th>Success Rate</th><th>New Post</th><th>Status</th></tr>
</thead>
<tbody id="status-table-body">
{table_body}
</tbody>
</table>
<div class="{indicator_class}"><i class="fas fa-sync-alt fa-spin"></i> Refreshing...</div>
</body>
</html>
"#,
        active = counter(|c| c.active_monitoring),
        new_posts = counter(|c| c.new_posts),
        errors = counter(|c| c.errors),
        last_updated = escape_html(doc.last_updated.as_deref().unwrap_or("-")),
        table_body = doc.table_body,
        indicator_class = indicator_class,
    )
}
