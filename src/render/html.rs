use chrono_tz::Tz;

use crate::domain::{PlatformStatus, RowStatus};

use super::{
    format::{format_date_time, format_number},
    view::TableContent,
};

const COLUMN_COUNT: usize = 6;
const GLOBE_ICON: &str = r#"<i class="fas fa-globe"></i>"#;

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Markup for the whole `status-table-body` element.
pub fn table_body(content: &TableContent, tz: Tz) -> String {
    match content {
        TableContent::Rows(platforms) => platforms
            .iter()
            .map(|platform| platform_row(platform, tz))
            .collect::<Vec<_>>()
            .join("\n"),
        TableContent::Empty => placeholder_row(),
        TableContent::Error(message) => error_row(message),
    }
}

pub fn placeholder_row() -> String {
    format!(
        r#"<tr>
    <td colspan="{COLUMN_COUNT}" class="text-center text-muted">
        <i class="fas fa-exclamation-circle"></i>
        No monitoring data available
    </td>
</tr>"#
    )
}

pub fn error_row(message: &str) -> String {
    format!(
        r#"<tr>
    <td colspan="{COLUMN_COUNT}" class="text-center text-danger">
        <i class="fas fa-exclamation-triangle"></i>
        {}
    </td>
</tr>"#,
        escape_html(message)
    )
}

pub fn platform_row(platform: &PlatformStatus, tz: Tz) -> String {
    let last_post = escape_html(platform.last_post_text());
    let rate = platform.success_rate;
    let fill_width = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 100.0) };

    format!(
        r#"<tr>
    <td>
        {icon}
        {name}
    </td>
    <td>
        <div class="last-post-preview" title="{last_post}">
            {last_post}
        </div>
    </td>
    <td>
        <small class="text-muted">
            {checked}
        </small>
    </td>
    <td>
        <div class="d-flex align-items-center">
            <div class="success-rate-bar me-2" style="width: 60px;">
                <div class="success-rate-fill" style="width: {fill}%; background-color: {color};"></div>
            </div>
            <small>{rate}%</small>
        </div>
        <small class="text-muted">{success}/{checks}</small>
    </td>
    <td>{badge}</td>
    <td>{status}</td>
</tr>"#,
        icon = platform_icon(&platform.platform),
        name = platform_name(platform),
        last_post = last_post,
        checked = escape_html(&format_date_time(platform.last_checked.as_deref(), tz)),
        fill = format_number(fill_width),
        color = platform.rate_color().hex(),
        rate = format_number(rate),
        success = platform.success_count,
        checks = platform.check_count,
        badge = new_post_badge(platform.has_new_post),
        status = status_indicator(platform),
    )
}

/// Exact-match icon lookup; unknown platforms get the globe.
pub fn platform_icon(platform: &str) -> &'static str {
    match platform {
        "LinkedIn" => r#"<i class="fab fa-linkedin platform-linkedin"></i>"#,
        "TikTok" => r#"<i class="fab fa-tiktok platform-tiktok"></i>"#,
        "Facebook" => r#"<i class="fab fa-facebook platform-facebook"></i>"#,
        "X" => r#"<i class="fab fa-x-twitter platform-x"></i>"#,
        _ => GLOBE_ICON,
    }
}

fn platform_name(platform: &PlatformStatus) -> String {
    let name = escape_html(&platform.platform);
    match platform.url.as_deref().filter(|url| !url.is_empty()) {
        Some(url) => format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer"><strong>{name}</strong></a>"#,
            escape_html(url)
        ),
        None => format!("<strong>{name}</strong>"),
    }
}

pub fn new_post_badge(has_new_post: bool) -> &'static str {
    if has_new_post {
        r#"<span class="badge bg-success new-post-indicator">✅ Yes</span>"#
    } else {
        r#"<span class="badge bg-secondary">⭕ No</span>"#
    }
}

pub fn status_indicator(platform: &PlatformStatus) -> String {
    match platform.row_status() {
        RowStatus::Error => format!(
            r#"<span class="status-error" title="{}"><i class="fas fa-exclamation-circle"></i> Error</span>"#,
            escape_html(platform.error().unwrap_or_default())
        ),
        RowStatus::Pending => {
            r#"<span class="status-warning"><i class="fas fa-clock"></i> Pending</span>"#.to_string()
        }
        RowStatus::Active => {
            r#"<span class="status-success"><i class="fas fa-check-circle"></i> Active</span>"#
                .to_string()
        }
    }
}
