/// Bindings to the chrome.* extension APIs through the JS bridge module

use crate::error::{self, HistoryError};
use crate::event::{GroupId, GroupSnapshot, HistoryEvent, TabId, TabSnapshot};
use crate::recorder::{HistoryStore, TabSource};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::str::FromStr;
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getTab(tab_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getTabGroup(group_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;

    fn addStorageChangeListener(key: &str, callback: &Closure<dyn FnMut(JsValue)>);

    fn removeStorageChangeListener(callback: &Closure<dyn FnMut(JsValue)>);
}

/// Callback receiving the new value of the watched storage key
pub type StorageCallback = Closure<dyn FnMut(JsValue)>;

/// chrome.tabs / chrome.tabGroups / chrome.runtime events the worker listens to.
///
/// The worker script registers the listeners itself and forwards each
/// notification by its listener name, e.g. `"tabs.onRemoved"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserEvent {
    TabCreated,
    TabRemoved,
    TabUpdated,
    TabAttached,
    TabDetached,
    GroupCreated,
    GroupRemoved,
    GroupUpdated,
    Installed,
    Startup,
}

impl BrowserEvent {
    pub const ALL: [BrowserEvent; 10] = [
        BrowserEvent::TabCreated,
        BrowserEvent::TabRemoved,
        BrowserEvent::TabUpdated,
        BrowserEvent::TabAttached,
        BrowserEvent::TabDetached,
        BrowserEvent::GroupCreated,
        BrowserEvent::GroupRemoved,
        BrowserEvent::GroupUpdated,
        BrowserEvent::Installed,
        BrowserEvent::Startup,
    ];

    pub fn listener_name(self) -> &'static str {
        match self {
            BrowserEvent::TabCreated => "tabs.onCreated",
            BrowserEvent::TabRemoved => "tabs.onRemoved",
            BrowserEvent::TabUpdated => "tabs.onUpdated",
            BrowserEvent::TabAttached => "tabs.onAttached",
            BrowserEvent::TabDetached => "tabs.onDetached",
            BrowserEvent::GroupCreated => "tabGroups.onCreated",
            BrowserEvent::GroupRemoved => "tabGroups.onRemoved",
            BrowserEvent::GroupUpdated => "tabGroups.onUpdated",
            BrowserEvent::Installed => "runtime.onInstalled",
            BrowserEvent::Startup => "runtime.onStartup",
        }
    }
}

impl FromStr for BrowserEvent {
    type Err = HistoryError;

    fn from_str(name: &str) -> error::Result<Self> {
        BrowserEvent::ALL
            .into_iter()
            .find(|event| event.listener_name() == name)
            .ok_or_else(|| HistoryError::Decode(format!("Unknown listener: {}", name)))
    }
}

/// Subscription to changes of one chrome.storage.local key.
/// The listener is removed when this is dropped.
pub struct StorageSubscription {
    callback: StorageCallback,
}

impl StorageSubscription {
    pub fn new(key: &str, callback: StorageCallback) -> Self {
        addStorageChangeListener(key, &callback);
        StorageSubscription { callback }
    }
}

impl Drop for StorageSubscription {
    fn drop(&mut self) {
        removeStorageChangeListener(&self.callback);
    }
}

/// Keep a storage subscription alive for the lifetime of the worker
pub fn watch_storage(key: &str, callback: StorageCallback) {
    addStorageChangeListener(key, &callback);
    callback.forget();
}

/// Show a blocking confirmation prompt; false when there is no window
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|window| window.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Decode a JS value; `undefined` and `null` are decode errors
pub fn from_js<T: DeserializeOwned>(value: JsValue) -> error::Result<T> {
    if value.is_undefined() || value.is_null() {
        return Err(HistoryError::Decode("missing value".to_string()));
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| HistoryError::Decode(format!("Failed to parse: {:?}", e)))
}

/// Decode a JS value into JSON, mapping `undefined` to `null`
pub fn to_json(value: JsValue) -> error::Result<serde_json::Value> {
    if value.is_undefined() || value.is_null() {
        return Ok(serde_json::Value::Null);
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| HistoryError::Decode(format!("Failed to parse: {:?}", e)))
}

/// Encode as a plain JS object/array so chrome.storage can hold it
fn to_js<T: Serialize + ?Sized>(value: &T) -> error::Result<JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| HistoryError::Storage(format!("Failed to serialize: {:?}", e)))
}

/// Live tab and group lookups through chrome.tabs.get / chrome.tabGroups.get
pub struct ChromeTabs;

impl TabSource for ChromeTabs {
    async fn tab(&self, id: TabId) -> error::Result<TabSnapshot> {
        let tab_js = getTab(id)
            .await
            .map_err(|e| HistoryError::Lookup(format!("Failed to get tab {}: {:?}", id, e)))?;
        from_js(tab_js)
    }

    async fn group(&self, id: GroupId) -> error::Result<GroupSnapshot> {
        let group_js = getTabGroup(id.0)
            .await
            .map_err(|e| HistoryError::Lookup(format!("Failed to get group {}: {:?}", id, e)))?;
        from_js(group_js)
    }
}

/// The history log's key in chrome.storage.local
#[derive(Debug, Clone, PartialEq)]
pub struct ChromeStorage {
    key: String,
}

impl ChromeStorage {
    pub fn new(key: &str) -> Self {
        ChromeStorage {
            key: key.to_string(),
        }
    }
}

impl HistoryStore for ChromeStorage {
    async fn load(&self) -> error::Result<serde_json::Value> {
        let storage_js = getStorage(&self.key)
            .await
            .map_err(|e| HistoryError::Storage(format!("Failed to get storage: {:?}", e)))?;
        to_json(storage_js)
    }

    async fn save(&self, events: &[HistoryEvent]) -> error::Result<()> {
        let storage_js = to_js(events)?;
        setStorage(&self.key, storage_js)
            .await
            .map_err(|e| HistoryError::Storage(format!("Failed to save storage: {:?}", e)))
    }
}
