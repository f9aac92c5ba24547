/// Display helpers for history entries: labels, icons, colors, urls, times
use crate::event::{EventKind, GroupColor};
use chrono::{DateTime, Utc};
use url::Url;

const MAX_URL_DISPLAY_CHARS: usize = 50;

/// Schemes that cannot be opened from an extension page, or that must not be
const NON_NAVIGABLE_SCHEMES: &[&str] = &[
    "chrome",
    "chrome-extension",
    "chrome-search",
    "chrome-untrusted",
    "devtools",
    "edge",
    "about",
    "view-source",
    "javascript",
    "data",
];

impl EventKind {
    pub fn label(self) -> &'static str {
        match self {
            EventKind::TabCreated => "Tab opened",
            EventKind::TabClosed => "Tab closed",
            EventKind::TabUpdated => "Tab updated",
            EventKind::TabAttachedToGroup => "Tab added to group",
            EventKind::TabDetachedFromGroup => "Tab removed from group",
            EventKind::GroupCreated => "Group created",
            EventKind::GroupRemoved => "Group removed",
            EventKind::GroupUpdated => "Group updated",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            EventKind::TabCreated => "+",
            EventKind::TabClosed => "×",
            EventKind::TabUpdated => "↻",
            EventKind::TabAttachedToGroup => "↗",
            EventKind::TabDetachedFromGroup => "↖",
            EventKind::GroupCreated => "◉",
            EventKind::GroupRemoved => "◯",
            EventKind::GroupUpdated => "✎",
        }
    }
}

impl GroupColor {
    pub fn hex(self) -> &'static str {
        match self {
            GroupColor::Grey => "#8a8a8a",
            GroupColor::Blue => "#1976d2",
            GroupColor::Red => "#d32f2f",
            GroupColor::Yellow => "#fbc02d",
            GroupColor::Green => "#388e3c",
            GroupColor::Pink => "#c2185b",
            GroupColor::Purple => "#7b1fa2",
            GroupColor::Cyan => "#00acc1",
            GroupColor::Orange => "#f57c00",
        }
    }
}

/// Shorten a url to at most 50 characters for display
pub fn truncate_url(url: &str) -> String {
    if url.chars().count() <= MAX_URL_DISPLAY_CHARS {
        return url.to_string();
    }
    let head: String = url.chars().take(MAX_URL_DISPLAY_CHARS - 3).collect();
    format!("{}...", head)
}

/// Coarse age of `timestamp` relative to `now`
///
/// - under a minute → "Just now"
/// - under an hour → "{m}m ago"
/// - under a day → "{h}h ago"
/// - otherwise → "{d}d ago"
pub fn relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - timestamp).num_seconds();

    if seconds < 60 {
        "Just now".to_string()
    } else if seconds < 3_600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h ago", seconds / 3_600)
    } else {
        format!("{}d ago", seconds / 86_400)
    }
}

/// Escape text for insertion into HTML content or a quoted attribute
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Whether a recorded url can be offered as a link.
///
/// Urls that do not parse are still shown; they are escaped on output.
pub fn is_navigable_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => !NON_NAVIGABLE_SCHEMES.contains(&parsed.scheme()),
        Err(_) => {
            let lowered = url.trim_start().to_ascii_lowercase();
            !NON_NAVIGABLE_SCHEMES
                .iter()
                .any(|scheme| lowered.starts_with(&format!("{}:", scheme)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 28, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_labels() {
        assert_eq!(EventKind::TabCreated.label(), "Tab opened");
        assert_eq!(EventKind::TabAttachedToGroup.label(), "Tab added to group");
        assert_eq!(EventKind::TabDetachedFromGroup.label(), "Tab removed from group");
        assert_eq!(EventKind::GroupUpdated.label(), "Group updated");
    }

    #[test]
    fn test_icons() {
        assert_eq!(EventKind::TabCreated.icon(), "+");
        assert_eq!(EventKind::TabClosed.icon(), "×");
        assert_eq!(EventKind::GroupRemoved.icon(), "◯");
    }

    #[test]
    fn test_color_hex() {
        assert_eq!(GroupColor::Grey.hex(), "#8a8a8a");
        assert_eq!(GroupColor::Blue.hex(), "#1976d2");
        assert_eq!(GroupColor::Orange.hex(), "#f57c00");
        let unknown: GroupColor = serde_json::from_str("\"magenta\"").unwrap();
        assert_eq!(unknown.hex(), "#8a8a8a");
    }

    #[test]
    fn test_truncate_url() {
        let short = "https://example.com/page";
        assert_eq!(truncate_url(short), short);

        let exactly_50 = format!("https://example.com/{}", "a".repeat(30));
        assert_eq!(exactly_50.len(), 50);
        assert_eq!(truncate_url(&exactly_50), exactly_50);

        let long = format!("https://example.com/{}", "b".repeat(60));
        let truncated = truncate_url(&long);
        assert_eq!(truncated.chars().count(), 50);
        assert!(truncated.ends_with("..."));
        assert!(long.starts_with(&truncated[..47]));
    }

    #[test]
    fn test_truncate_url_multibyte() {
        let long = format!("https://例え.jp/{}", "ü".repeat(60));
        let truncated = truncate_url(&long);
        assert_eq!(truncated.chars().count(), 50);
    }

    #[test]
    fn test_relative_time_buckets() {
        assert_eq!(relative_time(now(), now()), "Just now");
        assert_eq!(relative_time(now() - Duration::seconds(59), now()), "Just now");
        assert_eq!(relative_time(now() - Duration::seconds(60), now()), "1m ago");
        assert_eq!(relative_time(now() - Duration::minutes(59), now()), "59m ago");
        assert_eq!(relative_time(now() - Duration::minutes(60), now()), "1h ago");
        assert_eq!(relative_time(now() - Duration::hours(23), now()), "23h ago");
        assert_eq!(relative_time(now() - Duration::hours(24), now()), "1d ago");
        assert_eq!(relative_time(now() - Duration::days(12), now()), "12d ago");
    }

    #[test]
    fn test_relative_time_future_is_just_now() {
        assert_eq!(relative_time(now() + Duration::hours(2), now()), "Just now");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#39;y&#39;&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain title"), "plain title");
    }

    #[test]
    fn test_is_navigable_url() {
        assert!(is_navigable_url("https://github.com/rust-lang/rust"));
        assert!(is_navigable_url("http://localhost:3000"));
        assert!(!is_navigable_url("chrome://extensions"));
        assert!(!is_navigable_url("chrome-extension://abc/popup.html"));
        assert!(!is_navigable_url("about:blank"));
        assert!(!is_navigable_url("javascript:alert(1)"));
        assert!(!is_navigable_url("JavaScript:alert(1)"));
    }
}
