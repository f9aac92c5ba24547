/// History recorder: turns tab and group notifications into log entries
use crate::config::HistoryConfig;
use crate::error::Result;
use crate::event::{
    EventDraft, EventKind, GroupId, GroupInfo, GroupSnapshot, HistoryEvent, TabChanges, TabId,
    TabSnapshot,
};
use crate::history::HistoryLog;
use chrono::Utc;
use futures::channel::oneshot;
use std::cell::{Cell, RefCell};

/// Kinds consulted to recover a closed tab's last known state
const CLOSE_RECOVERY_KINDS: &[EventKind] = &[EventKind::TabCreated, EventKind::TabUpdated];

/// Kinds consulted to recover a detached tab's last known state
const DETACH_RECOVERY_KINDS: &[EventKind] = &[
    EventKind::TabCreated,
    EventKind::TabUpdated,
    EventKind::TabAttachedToGroup,
];

/// Live tab and group state from the browser
#[allow(async_fn_in_trait)]
pub trait TabSource {
    async fn tab(&self, id: TabId) -> Result<TabSnapshot>;
    async fn group(&self, id: GroupId) -> Result<GroupSnapshot>;
}

/// Persistent home of the history log
#[allow(async_fn_in_trait)]
pub trait HistoryStore {
    async fn load(&self) -> Result<serde_json::Value>;
    async fn save(&self, events: &[HistoryEvent]) -> Result<()>;

    /// Overwrite the stored log with an empty list
    async fn clear(&self) -> Result<()> {
        self.save(&[]).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadState {
    Unloaded,
    Loading,
    Loaded,
}

/// Owns the in-memory log and appends one entry per notification.
///
/// All handlers take `&self` so that several may be in flight at once on
/// the single-threaded executor. The log is only borrowed between awaits,
/// which keeps appends from one recorder from overwriting each other.
///
/// The stored log is read once, before the first handler touches the log.
/// Handlers that arrive while that read is in flight wait for it.
pub struct Recorder<S, H> {
    source: S,
    store: H,
    config: HistoryConfig,
    log: RefCell<HistoryLog>,
    load_state: Cell<LoadState>,
    load_waiters: RefCell<Vec<oneshot::Sender<()>>>,
    cleared_while_loading: Cell<bool>,
}

impl<S: TabSource, H: HistoryStore> Recorder<S, H> {
    pub fn new(source: S, store: H, config: HistoryConfig) -> Self {
        let log = RefCell::new(HistoryLog::with_max_entries(config.max_entries));
        Recorder {
            source,
            store,
            config,
            log,
            load_state: Cell::new(LoadState::Unloaded),
            load_waiters: RefCell::new(Vec::new()),
            cleared_while_loading: Cell::new(false),
        }
    }

    /// Create a recorder with the stored log already loaded
    pub async fn init(source: S, store: H, config: HistoryConfig) -> Self {
        let recorder = Self::new(source, store, config);
        recorder.ensure_loaded().await;
        recorder
    }

    /// Read the stored log if that has not happened yet, or wait for the
    /// read already in flight. An empty or unreadable store leaves the log
    /// empty.
    pub async fn ensure_loaded(&self) {
        match self.load_state.get() {
            LoadState::Loaded => return,
            LoadState::Loading => {
                let (done, loaded) = oneshot::channel();
                self.load_waiters.borrow_mut().push(done);
                // Senders are only dropped once the load has finished
                let _ = loaded.await;
                return;
            }
            LoadState::Unloaded => {}
        }
        self.load_state.set(LoadState::Loading);

        let stored = match self.store.load().await {
            Ok(value) => HistoryLog::from_json(value, self.config.max_entries),
            Err(e) => {
                log::error!("Error loading history: {}", e);
                HistoryLog::with_max_entries(self.config.max_entries)
            }
        };

        if self.cleared_while_loading.replace(false) {
            log::info!("History cleared during load, ignoring {} stored events", stored.len());
        } else {
            log::debug!("Loaded {} history events", stored.len());
            self.log.borrow_mut().restore(stored);
        }
        self.load_state.set(LoadState::Loaded);

        for waiter in self.load_waiters.take() {
            let _ = waiter.send(());
        }
    }

    /// React to a write to the history key from elsewhere.
    ///
    /// The recorder never writes an empty log itself, so an empty or
    /// missing value means the history was cleared.
    pub fn on_storage_changed(&self, new_value: serde_json::Value) {
        let cleared = match &new_value {
            serde_json::Value::Null => true,
            serde_json::Value::Array(entries) => entries.is_empty(),
            _ => false,
        };
        if cleared {
            log::info!("History cleared, dropping in-memory log");
            self.log.borrow_mut().clear();
            if self.load_state.get() == LoadState::Loading {
                self.cleared_while_loading.set(true);
            }
        }
    }

    pub fn history(&self) -> Vec<HistoryEvent> {
        self.log.borrow().to_vec()
    }

    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }

    /// Name and color for a tab's group; never fails
    pub async fn group_info(&self, group_id: GroupId) -> GroupInfo {
        if group_id.is_none() {
            return GroupInfo::no_group();
        }

        match self.source.group(group_id).await {
            Ok(group) => GroupInfo {
                title: group.display_title(),
                color: group.color,
            },
            Err(e) => {
                log::debug!("Group {} lookup failed, using fallback: {}", group_id, e);
                GroupInfo::unknown()
            }
        }
    }

    pub async fn on_tab_created(&self, tab: TabSnapshot) {
        self.ensure_loaded().await;
        let group = self.group_info(tab.group_id).await;
        self.append(EventDraft::from_tab(EventKind::TabCreated, &tab, group))
            .await;
    }

    /// The platform no longer knows the tab, so its details come from history
    pub async fn on_tab_removed(&self, tab_id: TabId) {
        self.ensure_loaded().await;
        let draft = {
            let log = self.log.borrow();
            EventDraft::recovered(
                EventKind::TabClosed,
                tab_id,
                log.last_known(tab_id, CLOSE_RECOVERY_KINDS),
                GroupInfo::no_group(),
            )
        };
        self.append(draft).await;
    }

    /// Records title and url changes only
    pub async fn on_tab_updated(&self, tab_id: TabId, changes: TabChanges, tab: TabSnapshot) {
        if !changes.is_recordable() {
            log::trace!("Ignoring update for tab {}: no title or url change", tab_id);
            return;
        }
        self.ensure_loaded().await;

        let group = self.group_info(tab.group_id).await;
        let draft = EventDraft::from_tab(EventKind::TabUpdated, &tab, group).with_changes(changes);
        self.append(draft).await;
    }

    pub async fn on_tab_attached(&self, tab_id: TabId) {
        self.ensure_loaded().await;
        let tab = match self.source.tab(tab_id).await {
            Ok(tab) => tab,
            Err(e) => {
                log::error!("Error handling tab attach: {}", e);
                return;
            }
        };

        let group = self.group_info(tab.group_id).await;
        self.append(EventDraft::from_tab(
            EventKind::TabAttachedToGroup,
            &tab,
            group,
        ))
        .await;
    }

    pub async fn on_tab_detached(&self, tab_id: TabId) {
        self.ensure_loaded().await;
        let draft = {
            let log = self.log.borrow();
            EventDraft::recovered(
                EventKind::TabDetachedFromGroup,
                tab_id,
                log.last_known(tab_id, DETACH_RECOVERY_KINDS),
                GroupInfo::unknown(),
            )
        };
        self.append(draft).await;
    }

    pub async fn on_group_created(&self, group: GroupSnapshot) {
        self.ensure_loaded().await;
        self.append(EventDraft::from_group(EventKind::GroupCreated, &group))
            .await;
    }

    pub async fn on_group_removed(&self, group: GroupSnapshot) {
        self.ensure_loaded().await;
        self.append(EventDraft::from_group(EventKind::GroupRemoved, &group))
            .await;
    }

    pub async fn on_group_updated(&self, group: GroupSnapshot) {
        self.ensure_loaded().await;
        self.append(EventDraft::from_group(EventKind::GroupUpdated, &group))
            .await;
    }

    /// Stamp, prepend, truncate, then persist the whole log
    async fn append(&self, draft: EventDraft) {
        {
            let mut log = self.log.borrow_mut();
            if let Some(event) = log.append(draft, Utc::now()) {
                log::debug!("Recorded {} for tab {:?}", event.kind, event.tab_id);
            }
        }
        self.persist().await;
    }

    /// Write the full log. A failed write is logged and dropped; the next
    /// successful one still carries everything.
    async fn persist(&self) {
        let snapshot = self.log.borrow().to_vec();
        if let Err(e) = self.store.save(&snapshot).await {
            log::error!("Error saving history: {}", e);
        }
    }
}
