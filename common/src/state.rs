//! チェックリスト状態（State Store）
//!
//! 完了フラグ・メモ・評価メタ情報を保持し、変更は必ずこのモジュールの
//! メソッド経由で行う。アウトラインは `Arc` で明示的に受け取る。

use crate::outline::{Outline, OVERALL_NOTE_KEY};
use crate::report;
use crate::snapshot::{PersistedSnapshot, SnapshotMeta};
use crate::stats::{self, SectionProgress, Statistics};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// 評価メタ情報
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationMeta {
    /// 評価日（YYYY-MM-DD）
    pub date: String,
    pub evaluator_name: String,
    /// 評価対象者名
    pub clinician_name: String,
}

impl EvaluationMeta {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..Default::default()
        }
    }

    pub fn get(&self, field: MetaField) -> &str {
        match field {
            MetaField::Date => &self.date,
            MetaField::EvaluatorName => &self.evaluator_name,
            MetaField::ClinicianName => &self.clinician_name,
        }
    }
}

/// メタ情報のフィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaField {
    Date,
    EvaluatorName,
    ClinicianName,
}

impl MetaField {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetaField::Date => "date",
            MetaField::EvaluatorName => "evaluatorName",
            MetaField::ClinicianName => "clinicianName",
        }
    }
}

impl std::str::FromStr for MetaField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "date" => Ok(MetaField::Date),
            "evaluatorname" | "evaluator" => Ok(MetaField::EvaluatorName),
            "clinicianname" | "clinician" => Ok(MetaField::ClinicianName),
            _ => Err(format!(
                "Unknown field: {}. Use date, evaluatorName, or clinicianName",
                s
            )),
        }
    }
}

impl std::fmt::Display for MetaField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// セクションキー → 項目 → 完了フラグ
///
/// 復元時に紛れ込んだアウトライン外のエントリも保持するが、
/// 集計・表示はアウトライン基準で行うため無視される。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionState(BTreeMap<String, BTreeMap<String, bool>>);

impl CompletionState {
    /// アウトラインの全項目を false で初期化
    pub fn for_outline(outline: &Outline) -> Self {
        let map = outline
            .sections()
            .iter()
            .map(|section| {
                let items = section.items.iter().map(|item| (item.clone(), false)).collect();
                (section.key.clone(), items)
            })
            .collect();
        Self(map)
    }

    pub fn is_checked(&self, section_key: &str, item: &str) -> bool {
        self.0
            .get(section_key)
            .and_then(|items| items.get(item))
            .copied()
            .unwrap_or(false)
    }

    pub fn set(&mut self, section_key: &str, item: &str, value: bool) {
        self.0
            .entry(section_key.to_string())
            .or_default()
            .insert(item.to_string(), value);
    }

    /// true のフラグ数（アウトライン外も含む）
    pub fn count_checked(&self) -> usize {
        self.0.values().flat_map(|items| items.values()).filter(|v| **v).count()
    }

    pub fn as_map(&self) -> &BTreeMap<String, BTreeMap<String, bool>> {
        &self.0
    }
}

/// セクションキー（＋総合評価キー）→ メモ
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotesState(BTreeMap<String, String>);

impl NotesState {
    /// 全セクションと総合評価を空文字で初期化
    pub fn for_outline(outline: &Outline) -> Self {
        let mut map: BTreeMap<String, String> = outline
            .sections()
            .iter()
            .map(|section| (section.key.clone(), String::new()))
            .collect();
        map.insert(OVERALL_NOTE_KEY.to_string(), String::new());
        Self(map)
    }

    /// 未設定は空文字
    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn overall(&self) -> &str {
        self.get(OVERALL_NOTE_KEY)
    }

    pub fn set(&mut self, key: &str, text: impl Into<String>) {
        self.0.insert(key.to_string(), text.into());
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

/// チェックリスト本体
#[derive(Debug, Clone)]
pub struct Checklist {
    outline: Arc<Outline>,
    meta: EvaluationMeta,
    notes: NotesState,
    completion: CompletionState,
}

impl Checklist {
    /// 初期状態（全フラグ false・全メモ空）
    pub fn new(outline: Arc<Outline>, meta: EvaluationMeta) -> Self {
        let notes = NotesState::for_outline(&outline);
        let completion = CompletionState::for_outline(&outline);
        Self {
            outline,
            meta,
            notes,
            completion,
        }
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn outline_arc(&self) -> Arc<Outline> {
        Arc::clone(&self.outline)
    }

    pub fn meta(&self) -> &EvaluationMeta {
        &self.meta
    }

    pub fn notes(&self) -> &NotesState {
        &self.notes
    }

    pub fn completion(&self) -> &CompletionState {
        &self.completion
    }

    pub fn is_checked(&self, section_key: &str, item: &str) -> bool {
        self.completion.is_checked(section_key, item)
    }

    pub fn note(&self, key: &str) -> &str {
        self.notes.get(key)
    }

    /// 項目の完了フラグを反転
    ///
    /// アウトラインにない組み合わせは何もしない（`None`）。
    pub fn toggle_item(&mut self, section_key: &str, item: &str) -> Option<bool> {
        if !self.outline.contains(section_key, item) {
            return None;
        }
        let next = !self.completion.is_checked(section_key, item);
        self.completion.set(section_key, item, next);
        Some(next)
    }

    /// 項目の完了フラグを設定（アウトライン外は `None`）
    pub fn set_item(&mut self, section_key: &str, item: &str, value: bool) -> Option<bool> {
        if !self.outline.contains(section_key, item) {
            return None;
        }
        self.completion.set(section_key, item, value);
        Some(value)
    }

    /// メモを上書き（トリムや長さ制限なし）
    ///
    /// セクションキーか総合評価キー以外は無視して `false` を返す。
    pub fn set_note(&mut self, key: &str, text: impl Into<String>) -> bool {
        if key != OVERALL_NOTE_KEY && self.outline.section(key).is_none() {
            return false;
        }
        self.notes.set(key, text);
        true
    }

    pub fn set_meta(&mut self, field: MetaField, value: impl Into<String>) {
        let value = value.into();
        match field {
            MetaField::Date => self.meta.date = value,
            MetaField::EvaluatorName => self.meta.evaluator_name = value,
            MetaField::ClinicianName => self.meta.clinician_name = value,
        }
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::compute(&self.outline, &self.completion)
    }

    pub fn section_progress(&self) -> Vec<SectionProgress> {
        stats::section_progress(&self.outline, &self.completion)
    }

    /// フラグとメモを初期値に戻す（メタ情報は保持）
    pub fn reset(&mut self) {
        self.notes = NotesState::for_outline(&self.outline);
        self.completion = CompletionState::for_outline(&self.outline);
    }

    /// 永続化用スナップショットを作成
    pub fn snapshot(&self) -> PersistedSnapshot {
        PersistedSnapshot {
            meta: SnapshotMeta {
                date: Some(self.meta.date.clone()),
                evaluator_name: Some(self.meta.evaluator_name.clone()),
                clinician_name: Some(self.meta.clinician_name.clone()),
            },
            notes: self.notes.as_map().clone(),
            completion: self.completion.as_map().clone(),
        }
    }

    /// スナップショットを現在の状態にマージ
    ///
    /// - メタ情報: スナップショットにあるフィールドだけ上書き
    /// - メモ: キー単位で上書き
    /// - 完了フラグ: セクション・項目単位で上書き
    pub fn restore(&mut self, snapshot: PersistedSnapshot) {
        let PersistedSnapshot {
            meta,
            notes,
            completion,
        } = snapshot;

        if let Some(date) = meta.date {
            self.meta.date = date;
        }
        if let Some(name) = meta.evaluator_name {
            self.meta.evaluator_name = name;
        }
        if let Some(name) = meta.clinician_name {
            self.meta.clinician_name = name;
        }

        for (key, text) in notes {
            self.notes.set(&key, text);
        }

        for (section_key, items) in completion {
            for (item, value) in items {
                self.completion.set(&section_key, &item, value);
            }
        }
    }

    /// テキストレポートを生成
    pub fn report(&self) -> String {
        report::format_report(
            &self.meta,
            &self.outline,
            &self.completion,
            &self.notes,
            &self.statistics(),
        )
    }
}
