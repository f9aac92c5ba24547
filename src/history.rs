/// The capped, newest-first history log

use crate::config::MAX_HISTORY_ENTRIES;
use crate::event::{EventDraft, EventKind, HistoryEvent, TabId};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Ordered event log, most recent event at the front.
///
/// Holds at most `max_entries` events. Appending past the cap drops the
/// oldest events from the back; existing order is never changed.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryLog {
    events: VecDeque<HistoryEvent>,
    max_entries: usize,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::with_max_entries(MAX_HISTORY_ENTRIES)
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        HistoryLog {
            events: VecDeque::new(),
            max_entries,
        }
    }

    /// Build a log from stored events (newest first), truncating to the cap
    pub fn from_events(events: Vec<HistoryEvent>, max_entries: usize) -> Self {
        let mut events = VecDeque::from(events);
        events.truncate(max_entries);
        HistoryLog {
            events,
            max_entries,
        }
    }

    /// Decode a stored JSON array one entry at a time.
    ///
    /// Entries that fail to decode are skipped. Anything other than an
    /// array decodes to an empty log.
    pub fn from_json(value: serde_json::Value, max_entries: usize) -> Self {
        let entries = match value {
            serde_json::Value::Array(entries) => entries,
            serde_json::Value::Null => Vec::new(),
            other => {
                log::warn!("Stored history is not a list, starting empty: {}", other);
                Vec::new()
            }
        };

        let events = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<HistoryEvent>(entry) {
                Ok(event) => Some(event),
                Err(e) => {
                    log::warn!("Skipping unreadable history entry: {}", e);
                    None
                }
            })
            .collect();

        Self::from_events(events, max_entries)
    }

    /// Stamp a draft and put it at the head of the log.
    /// Returns the new head, which is `None` only for a zero cap.
    pub fn append(&mut self, draft: EventDraft, at: DateTime<Utc>) -> Option<&HistoryEvent> {
        self.events.push_front(draft.stamp(at));
        self.events.truncate(self.max_entries);
        self.events.front()
    }

    /// Most recent event for `tab_id` whose kind is one of `kinds`
    pub fn last_known(&self, tab_id: TabId, kinds: &[EventKind]) -> Option<&HistoryEvent> {
        self.events
            .iter()
            .find(|event| event.tab_id == Some(tab_id) && kinds.contains(&event.kind))
    }

    /// Merge a log read from storage under the events already held.
    ///
    /// Events appended before the stored log arrived are newer than
    /// anything in it, so they stay at the head.
    pub fn restore(&mut self, stored: HistoryLog) {
        let mut merged = std::mem::take(&mut self.events);
        merged.extend(stored.events);
        merged.truncate(self.max_entries);
        self.events = merged;
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEvent> {
        self.events.iter()
    }

    /// Copy of the events in storage order (newest first)
    pub fn to_vec(&self) -> Vec<HistoryEvent> {
        self.events.iter().cloned().collect()
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new()
    }
}
