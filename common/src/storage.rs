//! 永続化ブリッジ
//!
//! 文字列キーの永続ストア（ブラウザの localStorage、CLIではファイル）に
//! スナップショットを書き込み・読み込みする。保存の失敗は呼び出し元に
//! 伝播させず、ログに残すだけにする。

use crate::error::Result;
use crate::snapshot::PersistedSnapshot;
use crate::state::Checklist;
use std::collections::HashMap;

/// スナップショットの保存キー
pub const STORAGE_KEY: &str = "rideAlongChecklist";

/// 文字列キーの永続ストア
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// メモリ上のストア（テスト・一時利用）
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// 固定キーにスナップショットを保存するブリッジ
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore<S> {
    store: S,
}

impl<S: KeyValueStore> SnapshotStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// 現在の状態を保存（上書き）
    ///
    /// 失敗してもエラーは返さず、ログに記録して `false` を返す。
    pub fn save(&mut self, checklist: &Checklist) -> bool {
        self.save_snapshot(&checklist.snapshot())
    }

    pub fn save_snapshot(&mut self, snapshot: &PersistedSnapshot) -> bool {
        let json = match snapshot.to_json() {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize snapshot");
                return false;
            }
        };
        match self.store.set(STORAGE_KEY, &json) {
            Ok(()) => {
                tracing::debug!(bytes = json.len(), "snapshot saved");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to save snapshot");
                false
            }
        }
    }

    /// 保存済みスナップショットを読み込み
    ///
    /// 存在しない・読めない・形式不正のときは `None`。
    pub fn load(&self) -> Option<PersistedSnapshot> {
        let raw = match self.store.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read snapshot");
                return None;
            }
        };
        let snapshot = PersistedSnapshot::parse(&raw);
        if snapshot.is_none() {
            tracing::warn!("stored snapshot is malformed, ignoring");
        }
        snapshot
    }

    /// 読み込んで状態にマージ。復元したら `true`
    pub fn restore_into(&self, checklist: &mut Checklist) -> bool {
        match self.load() {
            Some(snapshot) => {
                checklist.restore(snapshot);
                tracing::debug!("restored checklist from storage");
                true
            }
            None => false,
        }
    }

    /// 保存済みスナップショットを削除
    pub fn clear(&mut self) -> bool {
        match self.store.remove(STORAGE_KEY) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "failed to clear snapshot");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::outline::{Outline, Section, OVERALL_NOTE_KEY};
    use crate::state::{EvaluationMeta, MetaField};
    use std::sync::Arc;

    /// 書き込みが常に失敗するストア（容量超過を想定）
    struct FullStore;

    impl KeyValueStore for FullStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Storage("quota exceeded".to_string()))
        }
        fn remove(&mut self, _key: &str) -> Result<()> {
            Err(Error::Storage("disabled".to_string()))
        }
    }

    fn checklist() -> Checklist {
        let outline = Outline::new(vec![
            Section::new("a", "Section A", &["a1", "a2", "a3"]),
            Section::new("b", "Section B", &["b1", "b2"]),
        ])
        .expect("アウトライン構築失敗");
        Checklist::new(Arc::new(outline), EvaluationMeta::new("2026-01-18"))
    }

    #[test]
    fn test_load_empty_store() {
        let store = SnapshotStore::new(MemoryStore::new());
        assert!(store.load().is_none());

        let mut state = checklist();
        assert!(!store.restore_into(&mut state));
        assert_eq!(state.completion().count_checked(), 0);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let mut state = checklist();
        state.set_meta(MetaField::EvaluatorName, "Eva");
        state.toggle_item("b", "b2");
        state.set_note(OVERALL_NOTE_KEY, "solid visit");

        let mut store = SnapshotStore::new(MemoryStore::new());
        assert!(store.save(&state));
        assert_eq!(store.inner().len(), 1);

        let mut restored = checklist();
        assert!(store.restore_into(&mut restored));
        assert_eq!(restored.meta(), state.meta());
        assert_eq!(restored.notes(), state.notes());
        assert_eq!(restored.completion(), state.completion());
    }

    #[test]
    fn test_save_overwrites() {
        let mut state = checklist();
        let mut store = SnapshotStore::new(MemoryStore::new());
        store.save(&state);
        state.toggle_item("a", "a1");
        store.save(&state);

        let snapshot = store.load().expect("スナップショットなし");
        assert_eq!(snapshot.completion["a"]["a1"], true);
        assert_eq!(store.inner().len(), 1);
    }

    #[test]
    fn test_malformed_value_is_no_snapshot() {
        let mut memory = MemoryStore::new();
        memory.set(STORAGE_KEY, "{ not json").expect("set失敗");
        let store = SnapshotStore::new(memory);
        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_failure_is_swallowed() {
        let mut store = SnapshotStore::new(FullStore);
        let state = checklist();
        assert!(!store.save(&state));
        assert!(!store.clear());
    }

    #[test]
    fn test_clear() {
        let mut store = SnapshotStore::new(MemoryStore::new());
        store.save(&checklist());
        assert!(store.clear());
        assert!(store.load().is_none());
        assert!(store.inner().is_empty());
    }
}
