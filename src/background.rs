/// Background service worker: feeds browser notifications into the recorder

use crate::chrome::{self, BrowserEvent, ChromeStorage, ChromeTabs, from_js, to_json};
use crate::config::HistoryConfig;
use crate::error::Result;
use crate::event::{GroupSnapshot, TabChanges, TabId, TabSnapshot};
use crate::recorder::Recorder;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

type ChromeRecorder = Recorder<ChromeTabs, ChromeStorage>;

/// Handle the worker script forwards every tab, group and runtime
/// notification to. The script registers those listeners at top level and
/// queues what arrives before this exists.
#[wasm_bindgen]
pub struct BackgroundWorker {
    recorder: Rc<ChromeRecorder>,
}

#[wasm_bindgen]
impl BackgroundWorker {
    /// Run one notification as its own task so a slow lookup never holds up
    /// the listener. Arguments the event does not deliver are `undefined`.
    pub fn dispatch(&self, name: &str, a: JsValue, b: JsValue, c: JsValue) {
        let event = match name.parse::<BrowserEvent>() {
            Ok(event) => event,
            Err(e) => {
                log::warn!("Ignoring notification: {}", e);
                return;
            }
        };

        let recorder = self.recorder.clone();
        spawn_local(async move {
            if let Err(e) = handle(&recorder, event, a, b, c).await {
                log::error!("Error handling {}: {}", event.listener_name(), e);
            }
        });
    }
}

/// Build the recorder, follow its storage key and start loading the stored
/// history.
pub fn start() -> BackgroundWorker {
    let config = HistoryConfig::default();
    let key = config.storage_key.clone();
    let store = ChromeStorage::new(&key);
    let recorder = Rc::new(Recorder::new(ChromeTabs, store, config));

    {
        let recorder = recorder.clone();
        let callback = Closure::wrap(Box::new(move |new_value: JsValue| {
            match to_json(new_value) {
                Ok(value) => recorder.on_storage_changed(value),
                Err(e) => log::error!("Error reading history change: {}", e),
            }
        }) as Box<dyn FnMut(JsValue)>);
        chrome::watch_storage(&key, callback);
    }

    {
        let recorder = recorder.clone();
        spawn_local(async move {
            recorder.ensure_loaded().await;
            log::info!("History recorder started with {} events", recorder.len());
        });
    }

    BackgroundWorker { recorder }
}

/// Decode the listener arguments for `event` and pass them on
async fn handle(
    recorder: &ChromeRecorder,
    event: BrowserEvent,
    a: JsValue,
    b: JsValue,
    c: JsValue,
) -> Result<()> {
    match event {
        BrowserEvent::TabCreated => recorder.on_tab_created(from_js::<TabSnapshot>(a)?).await,
        BrowserEvent::TabRemoved => recorder.on_tab_removed(from_js::<TabId>(a)?).await,
        BrowserEvent::TabUpdated => {
            let tab_id = from_js::<TabId>(a)?;
            let changes = from_js::<TabChanges>(b)?;
            let tab = from_js::<TabSnapshot>(c)?;
            recorder.on_tab_updated(tab_id, changes, tab).await
        }
        BrowserEvent::TabAttached => recorder.on_tab_attached(from_js::<TabId>(a)?).await,
        BrowserEvent::TabDetached => recorder.on_tab_detached(from_js::<TabId>(a)?).await,
        BrowserEvent::GroupCreated => {
            recorder.on_group_created(from_js::<GroupSnapshot>(a)?).await
        }
        BrowserEvent::GroupRemoved => {
            recorder.on_group_removed(from_js::<GroupSnapshot>(a)?).await
        }
        BrowserEvent::GroupUpdated => {
            recorder.on_group_updated(from_js::<GroupSnapshot>(a)?).await
        }
        BrowserEvent::Installed | BrowserEvent::Startup => recorder.ensure_loaded().await,
    }
    Ok(())
}
