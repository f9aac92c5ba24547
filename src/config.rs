/// Storage key and size limits shared by the recorder and the viewer

/// chrome.storage.local key holding the serialized history log
pub const HISTORY_KEY: &str = "tabGroupHistory";

/// Maximum number of events kept; older events are dropped from the tail
pub const MAX_HISTORY_ENTRIES: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryConfig {
    pub storage_key: String,
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        HistoryConfig {
            storage_key: HISTORY_KEY.to_string(),
            max_entries: MAX_HISTORY_ENTRIES,
        }
    }
}
