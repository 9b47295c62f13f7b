//! 評価セッション
//!
//! チェックリストと永続ストアをまとめて扱う。開始時に保存済みデータを
//! マージする。CLI（ファイル）とWeb（localStorage）で共通。

use crate::outline::Outline;
use crate::state::{Checklist, EvaluationMeta};
use crate::storage::{KeyValueStore, SnapshotStore};
use std::sync::Arc;

pub struct Session<S> {
    checklist: Checklist,
    store: SnapshotStore<S>,
}

impl<S> Session<S> {
    pub fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    pub fn checklist_mut(&mut self) -> &mut Checklist {
        &mut self.checklist
    }

    pub fn store(&self) -> &SnapshotStore<S> {
        &self.store
    }
}

impl<S: KeyValueStore> Session<S> {
    /// 初期状態を作り、保存済みスナップショットがあればマージする
    pub fn open(outline: Arc<Outline>, date: String, store: S) -> Self {
        let store = SnapshotStore::new(store);
        let mut checklist = Checklist::new(outline, EvaluationMeta::new(date));
        if store.restore_into(&mut checklist) {
            tracing::info!("保存データを復元しました");
        }
        Self { checklist, store }
    }

    /// 現在の状態を保存（失敗はログのみ）
    pub fn save(&mut self) -> bool {
        self.store.save(&self.checklist)
    }

    /// 保存データを削除し、開始直後と同じ状態に戻す（メタ情報も初期化）
    pub fn clear_saved(&mut self, date: String) -> bool {
        let cleared = self.store.clear();
        self.checklist = Checklist::new(self.checklist.outline_arc(), EvaluationMeta::new(date));
        cleared
    }
}
