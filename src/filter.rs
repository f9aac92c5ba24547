/// Category filter for the history view

use crate::event::{EventKind, HistoryEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryFilter {
    #[default]
    All,
    /// Tab-only events: the type mentions a tab and no group
    Tab,
    /// Any event that mentions a group, including tab attach/detach
    Group,
}

impl HistoryFilter {
    pub const ALL: [HistoryFilter; 3] = [HistoryFilter::All, HistoryFilter::Tab, HistoryFilter::Group];

    pub fn matches(self, kind: EventKind) -> bool {
        let name = kind.as_str();
        match self {
            HistoryFilter::All => true,
            HistoryFilter::Tab => name.contains("tab_") && !name.contains("group"),
            HistoryFilter::Group => name.contains("group_") || name.contains("_group"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HistoryFilter::All => "All",
            HistoryFilter::Tab => "Tabs",
            HistoryFilter::Group => "Groups",
        }
    }
}

/// Events passing `filter`, in log order
pub fn filter_events<'a, I>(events: I, filter: HistoryFilter) -> Vec<&'a HistoryEvent>
where
    I: IntoIterator<Item = &'a HistoryEvent>,
{
    events
        .into_iter()
        .filter(|event| filter.matches(event.kind))
        .collect()
}
