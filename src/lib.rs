mod api;
mod app;
mod attachments;
mod auth;
mod backend;
mod components;
mod config;
mod filter;
mod ideas;
mod logging;
mod models;
mod pages;
mod state;
mod stats;
mod storage;

#[cfg(test)]
mod testing;

use crate::app::App;
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;


// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    logging::init();
    log::debug!("mounting app");
    mount_to_body(App);
}
