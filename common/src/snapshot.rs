//! 永続化スナップショット
//!
//! 保存形式:
//! `{ "evalData": { date, evaluatorName, clinicianName, notes }, "checkboxes": { section: { item: bool } } }`
//!
//! 読み込みは寛容に行う。トップレベルの `evalData` / `checkboxes` が
//! オブジェクトでなければ「スナップショットなし」とし、ネストした
//! フィールドは欠落や型違いがあってもそのフィールドだけを無視する。

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// スナップショットのメタ情報（欠落フィールドは `None`）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotMeta {
    pub date: Option<String>,
    pub evaluator_name: Option<String>,
    pub clinician_name: Option<String>,
}

/// 永続化スナップショット
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedSnapshot {
    pub meta: SnapshotMeta,
    /// 保存されていたメモのみ
    pub notes: BTreeMap<String, String>,
    /// 保存されていた完了フラグのみ
    pub completion: BTreeMap<String, BTreeMap<String, bool>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireSnapshot<'a> {
    eval_data: WireEvalData<'a>,
    checkboxes: &'a BTreeMap<String, BTreeMap<String, bool>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireEvalData<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    evaluator_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    clinician_name: Option<&'a str>,
    notes: &'a BTreeMap<String, String>,
}

impl PersistedSnapshot {
    fn wire(&self) -> WireSnapshot<'_> {
        WireSnapshot {
            eval_data: WireEvalData {
                date: self.meta.date.as_deref(),
                evaluator_name: self.meta.evaluator_name.as_deref(),
                clinician_name: self.meta.clinician_name.as_deref(),
                notes: &self.notes,
            },
            checkboxes: &self.completion,
        }
    }

    /// 保存形式のJSON文字列に変換
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.wire())
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self.wire())
    }

    /// JSON文字列から読み込み（不正なら `None`）
    pub fn parse(raw: &str) -> Option<Self> {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                tracing::debug!(error = %e, "snapshot is not valid JSON");
                None
            }
        }
    }

    /// JSON値から読み込み
    ///
    /// `evalData` と `checkboxes` がともにオブジェクトの場合のみ `Some`。
    pub fn from_value(value: &Value) -> Option<Self> {
        let root = value.as_object()?;
        let eval_data = root.get("evalData")?.as_object()?;
        let checkboxes = root.get("checkboxes")?.as_object()?;

        let meta = SnapshotMeta {
            date: string_field(eval_data, "date"),
            evaluator_name: string_field(eval_data, "evaluatorName"),
            clinician_name: string_field(eval_data, "clinicianName"),
        };

        let notes = eval_data
            .get("notes")
            .and_then(Value::as_object)
            .map(|notes| {
                notes
                    .iter()
                    .filter_map(|(key, text)| text.as_str().map(|t| (key.clone(), t.to_string())))
                    .collect()
            })
            .unwrap_or_default();

        let completion = checkboxes
            .iter()
            .filter_map(|(section_key, items)| {
                let items = items
                    .as_object()?
                    .iter()
                    .filter_map(|(item, flag)| flag.as_bool().map(|f| (item.clone(), f)))
                    .collect();
                Some((section_key.clone(), items))
            })
            .collect();

        Some(Self {
            meta,
            notes,
            completion,
        })
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}
