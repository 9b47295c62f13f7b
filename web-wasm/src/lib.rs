//! Ride-Along Checklist Web (WASM)
//!
//! 画面描画はJavaScript側に任せ、状態管理・localStorage保存・
//! レポート出力をRustで提供する。

mod console_log;
mod download;
mod local_store;
mod session;

pub use local_store::LocalStorageStore;
pub use session::ChecklistSession;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    console_log::init();
}
