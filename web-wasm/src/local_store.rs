//! localStorage 版の永続ストア
//!
//! ストレージが無効（プライベートモード等）でも panic せず、
//! エラーとして返す。保存の失敗は `SnapshotStore` 側でログに残る。

use ride_along_common::{Error, KeyValueStore, Result};
use wasm_bindgen::JsValue;

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

fn js_error(e: JsValue) -> Error {
    Error::Storage(format!("{:?}", e))
}

fn storage() -> Result<web_sys::Storage> {
    let window = web_sys::window().ok_or_else(|| Error::Storage("window がありません".into()))?;
    window
        .local_storage()
        .map_err(js_error)?
        .ok_or_else(|| Error::Storage("localStorage が無効です".into()))
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        storage()?.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        storage()?.remove_item(key).map_err(js_error)
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use ride_along_common::{Checklist, EvaluationMeta, Outline, SnapshotStore};
    use std::sync::Arc;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_local_storage_round_trip() {
        let mut store = SnapshotStore::new(LocalStorageStore);
        store.clear();
        assert!(store.load().is_none());

        let mut checklist = Checklist::new(Arc::new(Outline::home_visit()), EvaluationMeta::new("2026-01-18"));
        checklist.toggle_item("screenings", "Bladder screening");
        assert!(store.save(&checklist));

        let snapshot = store.load().expect("snapshot missing");
        assert_eq!(snapshot.completion["screenings"]["Bladder screening"], true);
        assert!(store.clear());
    }
}
