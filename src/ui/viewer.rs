/// History viewer page

use crate::chrome::{self, ChromeStorage, StorageSubscription, to_json};
use crate::config::HistoryConfig;
use crate::error;
use crate::event::HistoryEvent;
use crate::filter::HistoryFilter;
use crate::history::HistoryLog;
use crate::recorder::HistoryStore;
use crate::ui::components::{FilterBar, HistoryList};
use crate::ui::render::render_history;
use chrono::Utc;
use patternfly_yew::prelude::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

const CLEAR_CONFIRMATION: &str = "Are you sure you want to clear all history?";
const CLEAR_FAILED: &str = "Error clearing history. Please try again.";

#[derive(Clone, PartialEq)]
enum ViewState {
    Loading,
    Idle,
    Error(String),
}

/// Events to show after the history key changed.
/// A missing key or an unreadable value shows as an empty history.
fn events_from_change(
    change: error::Result<serde_json::Value>,
    max_entries: usize,
) -> Vec<HistoryEvent> {
    match change {
        Ok(value) => HistoryLog::from_json(value, max_entries).to_vec(),
        Err(e) => {
            log::error!("Error reading history change: {}", e);
            Vec::new()
        }
    }
}

#[function_component(HistoryViewer)]
pub fn history_viewer() -> Html {
    let config = use_memo((), |_| HistoryConfig::default());
    let state = use_state(|| ViewState::Loading);
    let history = use_state(Vec::<HistoryEvent>::new);
    let filter = use_state(HistoryFilter::default);
    // Set once a storage change has been shown; a slower initial load must
    // not replace it with older data
    let changed = use_mut_ref(|| false);

    // Load history on mount
    {
        let state = state.clone();
        let history = history.clone();
        let config = config.clone();
        let changed = changed.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                let store = ChromeStorage::new(&config.storage_key);
                let events = match store.load().await {
                    Ok(value) => HistoryLog::from_json(value, config.max_entries).to_vec(),
                    Err(e) => {
                        log::error!("Error loading history: {}", e);
                        Vec::new()
                    }
                };
                if !*changed.borrow() {
                    history.set(events);
                    state.set(ViewState::Idle);
                }
            });
            || ()
        });
    }

    // Follow writes from the recorder
    {
        let state = state.clone();
        let history = history.clone();
        let config = config.clone();
        let changed = changed.clone();

        use_effect_with((), move |_| {
            let max_entries = config.max_entries;
            let callback = Closure::wrap(Box::new(move |new_value: JsValue| {
                *changed.borrow_mut() = true;
                history.set(events_from_change(to_json(new_value), max_entries));
                state.set(ViewState::Idle);
            }) as Box<dyn FnMut(JsValue)>);
            let subscription = StorageSubscription::new(&config.storage_key, callback);

            move || drop(subscription)
        });
    }

    let on_filter = {
        let filter = filter.clone();
        Callback::from(move |selected: HistoryFilter| {
            filter.set(selected);
        })
    };

    let on_clear = {
        let state = state.clone();
        let history = history.clone();
        let config = config.clone();

        Callback::from(move |_: MouseEvent| {
            if !chrome::confirm(CLEAR_CONFIRMATION) {
                return;
            }

            let state = state.clone();
            let history = history.clone();
            let store = ChromeStorage::new(&config.storage_key);
            spawn_local(async move {
                match store.clear().await {
                    Ok(()) => {
                        history.set(Vec::new());
                        state.set(ViewState::Idle);
                    }
                    Err(e) => {
                        log::error!("Error clearing history: {}", e);
                        state.set(ViewState::Error(CLEAR_FAILED.to_string()));
                    }
                }
            });
        })
    };

    let markup = AttrValue::from(render_history(&history, *filter, Utc::now()));

    html! {
        <div class="container">
            <div class="header">
                <h1 class="main-title">{"Tab Group History"}</h1>
                <Button onclick={on_clear} variant={ButtonVariant::Danger}>
                    {"Clear History"}
                </Button>
            </div>

            <FilterBar active={*filter} on_select={on_filter} />

            // Status display
            {match &*state {
                ViewState::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{"Loading history..."}</p>
                    </div>
                },
                ViewState::Error(err) => html! {
                    <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                        {err.clone()}
                    </Alert>
                },
                ViewState::Idle => html! {}
            }}

            if *state != ViewState::Loading {
                <HistoryList markup={markup} />
            }
        </div>
    }
}
