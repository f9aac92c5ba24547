/// Event records for the tab and tab-group history log
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder for a url or title that could not be recovered
pub const UNKNOWN: &str = "Unknown";
pub const NO_GROUP_TITLE: &str = "No Group";
pub const UNKNOWN_GROUP_TITLE: &str = "Unknown Group";
/// Title recorded when the platform reports a tab with an empty title
pub const LOADING_TITLE: &str = "Loading...";

pub type TabId = i32;

/// Tab group identifier; `GroupId::NONE` means the tab is not in any group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub i32);

impl GroupId {
    /// Matches `chrome.tabGroups.TAB_GROUP_ID_NONE`
    pub const NONE: GroupId = GroupId(-1);

    pub fn is_none(self) -> bool {
        self == GroupId::NONE
    }
}

impl Default for GroupId {
    fn default() -> Self {
        GroupId::NONE
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The fixed tab group palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupColor {
    Blue,
    Red,
    Yellow,
    Green,
    Pink,
    Purple,
    Cyan,
    Orange,
    /// Also stands in for color names the palette does not know
    #[default]
    #[serde(other)]
    Grey,
}

impl GroupColor {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupColor::Grey => "grey",
            GroupColor::Blue => "blue",
            GroupColor::Red => "red",
            GroupColor::Yellow => "yellow",
            GroupColor::Green => "green",
            GroupColor::Pink => "pink",
            GroupColor::Purple => "purple",
            GroupColor::Cyan => "cyan",
            GroupColor::Orange => "orange",
        }
    }
}

impl FromStr for GroupColor {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "grey" => Ok(GroupColor::Grey),
            "blue" => Ok(GroupColor::Blue),
            "red" => Ok(GroupColor::Red),
            "yellow" => Ok(GroupColor::Yellow),
            "green" => Ok(GroupColor::Green),
            "pink" => Ok(GroupColor::Pink),
            "purple" => Ok(GroupColor::Purple),
            "cyan" => Ok(GroupColor::Cyan),
            "orange" => Ok(GroupColor::Orange),
            _ => Err(()),
        }
    }
}

/// Kind of lifecycle occurrence. Serialized as the snake_case type string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    TabCreated,
    TabClosed,
    TabUpdated,
    TabAttachedToGroup,
    TabDetachedFromGroup,
    GroupCreated,
    GroupRemoved,
    GroupUpdated,
}

impl EventKind {
    pub const ALL: [EventKind; 8] = [
        EventKind::TabCreated,
        EventKind::TabClosed,
        EventKind::TabUpdated,
        EventKind::TabAttachedToGroup,
        EventKind::TabDetachedFromGroup,
        EventKind::GroupCreated,
        EventKind::GroupRemoved,
        EventKind::GroupUpdated,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::TabCreated => "tab_created",
            EventKind::TabClosed => "tab_closed",
            EventKind::TabUpdated => "tab_updated",
            EventKind::TabAttachedToGroup => "tab_attached_to_group",
            EventKind::TabDetachedFromGroup => "tab_detached_from_group",
            EventKind::GroupCreated => "group_created",
            EventKind::GroupRemoved => "group_removed",
            EventKind::GroupUpdated => "group_updated",
        }
    }
}

impl FromStr for EventKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields reported changed by `tabs.onUpdated`.
///
/// Keys without a typed field (`mutedInfo`, `discarded`, ...) are kept in
/// `other` so the record is stored as the browser delivered it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fav_icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<GroupId>,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl TabChanges {
    /// Only title and url changes are worth recording
    pub fn is_recordable(&self) -> bool {
        self.title.is_some() || self.url.is_some()
    }
}

/// Current state of a tab as reported by the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSnapshot {
    pub id: TabId,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub group_id: GroupId,
}

/// Current state of a tab group as reported by the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub id: GroupId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub color: GroupColor,
}

impl GroupSnapshot {
    /// The group's title, or "Group {id}" when it has none
    pub fn display_title(&self) -> String {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => format!("Group {}", self.id),
        }
    }
}

/// Resolved group name and color attached to tab events
#[derive(Debug, Clone, PartialEq)]
pub struct GroupInfo {
    pub title: String,
    pub color: GroupColor,
}

impl GroupInfo {
    pub fn no_group() -> Self {
        GroupInfo {
            title: NO_GROUP_TITLE.to_string(),
            color: GroupColor::Grey,
        }
    }

    pub fn unknown() -> Self {
        GroupInfo {
            title: UNKNOWN_GROUP_TITLE.to_string(),
            color: GroupColor::Grey,
        }
    }
}

/// One entry of the history log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab_id: Option<TabId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub group_id: GroupId,
    #[serde(default)]
    pub group_title: String,
    #[serde(default)]
    pub group_color: GroupColor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<TabChanges>,
    pub timestamp: DateTime<Utc>,
}

/// An event record that has not been stamped and appended yet
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub kind: EventKind,
    pub tab_id: Option<TabId>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub group_id: GroupId,
    pub group_title: String,
    pub group_color: GroupColor,
    pub changes: Option<TabChanges>,
}

impl EventDraft {
    /// Event built from the live state of a tab
    pub fn from_tab(kind: EventKind, tab: &TabSnapshot, group: GroupInfo) -> Self {
        let title = if tab.title.is_empty() {
            LOADING_TITLE.to_string()
        } else {
            tab.title.clone()
        };

        EventDraft {
            kind,
            tab_id: Some(tab.id),
            url: Some(tab.url.clone()),
            title: Some(title),
            group_id: tab.group_id,
            group_title: group.title,
            group_color: group.color,
            changes: None,
        }
    }

    /// Event for a tab the platform can no longer describe, filled in from
    /// the last known record for that tab (if any)
    pub fn recovered(
        kind: EventKind,
        tab_id: TabId,
        last_known: Option<&HistoryEvent>,
        fallback_group: GroupInfo,
    ) -> Self {
        let known = |field: Option<&String>| {
            field
                .filter(|value| !value.is_empty())
                .cloned()
                .unwrap_or_else(|| UNKNOWN.to_string())
        };

        match last_known {
            Some(prior) => EventDraft {
                kind,
                tab_id: Some(tab_id),
                url: Some(known(prior.url.as_ref())),
                title: Some(known(prior.title.as_ref())),
                group_id: prior.group_id,
                group_title: if prior.group_title.is_empty() {
                    fallback_group.title
                } else {
                    prior.group_title.clone()
                },
                group_color: prior.group_color,
                changes: None,
            },
            None => EventDraft {
                kind,
                tab_id: Some(tab_id),
                url: Some(UNKNOWN.to_string()),
                title: Some(UNKNOWN.to_string()),
                group_id: GroupId::NONE,
                group_title: fallback_group.title,
                group_color: fallback_group.color,
                changes: None,
            },
        }
    }

    /// Group-only event, no tab fields
    pub fn from_group(kind: EventKind, group: &GroupSnapshot) -> Self {
        EventDraft {
            kind,
            tab_id: None,
            url: None,
            title: None,
            group_id: group.id,
            group_title: group.display_title(),
            group_color: group.color,
            changes: None,
        }
    }

    pub fn with_changes(mut self, changes: TabChanges) -> Self {
        self.changes = Some(changes);
        self
    }

    pub fn stamp(self, timestamp: DateTime<Utc>) -> HistoryEvent {
        HistoryEvent {
            kind: self.kind,
            tab_id: self.tab_id,
            url: self.url,
            title: self.title,
            group_id: self.group_id,
            group_title: self.group_title,
            group_color: self.group_color,
            changes: self.changes,
            timestamp,
        }
    }
}
