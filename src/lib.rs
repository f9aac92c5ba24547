/// Tab Group History - Chrome Extension recording tab and tab group activity
/// Built with Rust + WASM + Yew

pub mod background;
pub mod chrome;
pub mod config;
pub mod error;
pub mod event;
pub mod filter;
pub mod format;
pub mod history;
pub mod recorder;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start recording tab and group events in the background service worker.
// The worker script forwards its queued and future notifications to the
// returned handle.
#[wasm_bindgen]
pub fn start_recorder() -> background::BackgroundWorker {
    background::start()
}

// Start the Yew app for the history popup
#[wasm_bindgen]
pub fn start_history_viewer() {
    yew::Renderer::<ui::viewer::HistoryViewer>::new().render();
}
