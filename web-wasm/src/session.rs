//! JavaScript から使うチェックリストセッション
//!
//! 描画側（JS）はこのオブジェクトの変更メソッドを呼び、統計や状態を
//! 読み出して表示する。生成時に localStorage から復元し、破棄するまで
//! 10秒ごとに自動保存する。

use crate::download;
use crate::local_store::LocalStorageStore;
use gloo::timers::callback::Interval;
use ride_along_common::{export_file_name, mail_subject, mailto_link, MetaField, Outline, Session};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use wasm_bindgen::prelude::*;

/// 自動保存間隔（ミリ秒）
pub const AUTOSAVE_INTERVAL_MS: u32 = 10_000;

#[wasm_bindgen]
pub struct ChecklistSession {
    inner: Rc<RefCell<Session<LocalStorageStore>>>,
    autosave: Option<Interval>,
}

/// ISO 8601 文字列から日付部分を取り出す
pub fn date_part(iso: &str) -> &str {
    iso.split('T').next().unwrap_or(iso)
}

fn today() -> String {
    let iso: String = js_sys::Date::new_0().to_iso_string().into();
    date_part(&iso).to_string()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

impl ChecklistSession {
    fn open(outline: Outline) -> Self {
        let session = Session::open(Arc::new(outline), today(), LocalStorageStore);
        let inner = Rc::new(RefCell::new(session));
        let timer_state = Rc::clone(&inner);
        let autosave = Interval::new(AUTOSAVE_INTERVAL_MS, move || {
            // 他の呼び出し中なら次の周期に回す
            if let Ok(mut session) = timer_state.try_borrow_mut() {
                session.save();
            }
        });

        Self {
            inner,
            autosave: Some(autosave),
        }
    }
}

#[wasm_bindgen]
impl ChecklistSession {
    /// 組み込みアウトラインでセッションを開始
    #[wasm_bindgen(constructor)]
    pub fn new() -> ChecklistSession {
        Self::open(Outline::home_visit())
    }

    /// カスタムアウトライン（JSON）でセッションを開始
    #[wasm_bindgen(js_name = withOutline)]
    pub fn with_outline(outline_json: &str) -> Result<ChecklistSession, JsValue> {
        let outline = Outline::from_json(outline_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self::open(outline))
    }

    pub fn outline(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.borrow().checklist().outline())
    }

    pub fn meta(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.borrow().checklist().meta())
    }

    pub fn statistics(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.borrow().checklist().statistics())
    }

    #[wasm_bindgen(js_name = isChecked)]
    pub fn is_checked(&self, section_key: &str, item: &str) -> bool {
        self.inner.borrow().checklist().is_checked(section_key, item)
    }

    pub fn note(&self, key: &str) -> String {
        self.inner.borrow().checklist().note(key).to_string()
    }

    /// 完了フラグを反転。アウトライン外なら `undefined`
    #[wasm_bindgen(js_name = toggleItem)]
    pub fn toggle_item(&self, section_key: &str, item: &str) -> Option<bool> {
        self.inner.borrow_mut().checklist_mut().toggle_item(section_key, item)
    }

    #[wasm_bindgen(js_name = setNote)]
    pub fn set_note(&self, key: &str, text: String) -> bool {
        self.inner.borrow_mut().checklist_mut().set_note(key, text)
    }

    #[wasm_bindgen(js_name = setMeta)]
    pub fn set_meta(&self, field: &str, value: String) -> Result<(), JsValue> {
        let field: MetaField = field.parse().map_err(|e: String| JsValue::from_str(&e))?;
        self.inner.borrow_mut().checklist_mut().set_meta(field, value);
        Ok(())
    }

    pub fn reset(&self) {
        self.inner.borrow_mut().checklist_mut().reset();
    }

    /// 即時保存
    pub fn save(&self) -> bool {
        self.inner.borrow_mut().save()
    }

    /// 保存データを削除し、読み込み直後と同じ状態に戻す
    #[wasm_bindgen(js_name = clearSavedData)]
    pub fn clear_saved_data(&self) -> bool {
        self.inner.borrow_mut().clear_saved(today())
    }

    pub fn report(&self) -> String {
        self.inner.borrow().checklist().report()
    }

    #[wasm_bindgen(js_name = exportFileName)]
    pub fn export_file_name(&self) -> String {
        export_file_name(self.inner.borrow().checklist().meta())
    }

    /// レポートをテキストファイルとしてダウンロード
    #[wasm_bindgen(js_name = downloadReport)]
    pub fn download_report(&self) -> Result<(), JsValue> {
        let (file_name, text) = {
            let inner = self.inner.borrow();
            (export_file_name(inner.checklist().meta()), inner.checklist().report())
        };
        download::download_text(&file_name, &text)
    }

    /// メール作成画面を開く
    #[wasm_bindgen(js_name = emailReport)]
    pub fn email_report(&self, recipient: Option<String>) -> Result<(), JsValue> {
        let link = {
            let inner = self.inner.borrow();
            mailto_link(
                recipient.as_deref().unwrap_or(""),
                &mail_subject(inner.checklist().meta()),
                &inner.checklist().report(),
            )
        };
        download::open_mailto(&link)
    }

    #[wasm_bindgen(js_name = isAutosaving)]
    pub fn is_autosaving(&self) -> bool {
        self.autosave.is_some()
    }

    /// 自動保存を止める（コンポーネント破棄時に必ず呼ぶ）
    pub fn dispose(&mut self) {
        // Interval はドロップ時にタイマーを解除する
        if self.autosave.take().is_some() {
            tracing::debug!("autosave stopped");
        }
    }
}

impl Default for ChecklistSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ChecklistSession {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_part() {
        assert_eq!(date_part("2026-01-18T03:04:05.000Z"), "2026-01-18");
        assert_eq!(date_part("2026-01-18"), "2026-01-18");
    }
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_session_save_and_reopen() {
        let mut session = ChecklistSession::new();
        session.clear_saved_data();
        assert_eq!(session.toggle_item("screenings", "Smoking screening"), Some(true));
        assert_eq!(session.toggle_item("screenings", "not an item"), None);
        session.set_meta("clinicianName", "Pat".to_string()).expect("setMeta failed");
        assert!(session.save());
        session.dispose();
        assert!(!session.is_autosaving());

        let reopened = ChecklistSession::new();
        assert!(reopened.is_checked("screenings", "Smoking screening"));
        assert!(reopened.export_file_name().starts_with("RideAlong_Pat_"));
        reopened.clear_saved_data();
    }
}
