/// HTML markup for history entries and empty states

use crate::event::{HistoryEvent, UNKNOWN, UNKNOWN_GROUP_TITLE};
use crate::filter::{HistoryFilter, filter_events};
use crate::format::{escape_html, is_navigable_url, relative_time, truncate_url};
use chrono::{DateTime, Utc};

pub const NO_HISTORY_MESSAGE: &str =
    "No history available yet. Start browsing to see tab activity!";
pub const NO_MATCHES_MESSAGE: &str = "No items match the current filter.";

fn empty_state(message: &str) -> String {
    format!(r#"<div class="no-history">{}</div>"#, message)
}

fn known(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != UNKNOWN)
}

/// Markup for one entry. Title, url and group title are escaped.
pub fn render_entry(event: &HistoryEvent, now: DateTime<Utc>) -> String {
    let mut details = String::new();

    if let Some(title) = known(event.title.as_deref()) {
        details.push_str(&format!(
            r#"<div class="event-title">{}</div>"#,
            escape_html(title)
        ));
    }

    details.push_str(&format!(
        r#"<div class="event-meta">{}</div>"#,
        event.kind.label()
    ));

    if let Some(url) = known(event.url.as_deref()).filter(|url| is_navigable_url(url)) {
        details.push_str(&format!(
            r#"<a href="{}" class="event-url" target="_blank">{}</a>"#,
            escape_html(url),
            escape_html(&truncate_url(url))
        ));
    }

    if !event.group_title.is_empty() && event.group_title != UNKNOWN_GROUP_TITLE {
        let color = event.group_color;
        details.push_str(&format!(
            concat!(
                r#"<div class="event-group group-{}">"#,
                r#"<div class="group-color-dot" style="background-color: {}"></div>"#,
                "{}</div>"
            ),
            color.as_str(),
            color.hex(),
            escape_html(&event.group_title)
        ));
    }

    format!(
        concat!(
            r#"<div class="history-item">"#,
            r#"<div class="event-icon {}">{}</div>"#,
            r#"<div class="event-details">{}</div>"#,
            r#"<div class="timestamp">{}</div>"#,
            "</div>"
        ),
        event.kind.as_str(),
        event.kind.icon(),
        details,
        relative_time(event.timestamp, now)
    )
}

/// Markup for the whole list under `filter`, or the matching empty state
pub fn render_history(events: &[HistoryEvent], filter: HistoryFilter, now: DateTime<Utc>) -> String {
    if events.is_empty() {
        return empty_state(NO_HISTORY_MESSAGE);
    }

    let visible = filter_events(events, filter);
    if visible.is_empty() {
        return empty_state(NO_MATCHES_MESSAGE);
    }

    visible
        .into_iter()
        .map(|event| render_entry(event, now))
        .collect()
}
