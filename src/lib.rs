/// Tab Habit Tracker - Chrome Extension for tab hygiene
/// Built with Rust + WASM + Yew

pub mod background;
pub mod classify;
pub mod domain;
pub mod registry;
pub mod storage;
pub mod tab_data;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export core domain functions for JavaScript access
#[wasm_bindgen]
pub fn extract_domain(url: &str) -> String {
    domain::extract_domain(url).unwrap_or_else(|| domain::UNGROUPED.to_string())
}

#[wasm_bindgen]
pub fn productivity_score(active_count: usize, inactive_count: usize) -> u8 {
    classify::productivity_score(active_count, inactive_count)
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
