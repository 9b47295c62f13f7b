//! 自動保存タスク
//!
//! 一定間隔でセッションを保存する。`AutoSaver` をドロップすると
//! タスクは必ず停止する。

use crate::session::Session;
use ride_along_common::KeyValueStore;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub type SharedSession<S> = Arc<Mutex<Session<S>>>;

pub struct AutoSaver {
    handle: JoinHandle<()>,
}

impl AutoSaver {
    /// 自動保存を開始（tokioランタイム内で呼ぶこと）
    pub fn spawn<S>(session: SharedSession<S>, period: Duration) -> Self
    where
        S: KeyValueStore + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // 最初の tick は即時に返るので読み捨てる
            ticker.tick().await;
            loop {
                ticker.tick().await;
                checkpoint(&session);
            }
        });
        tracing::debug!(period_secs = period.as_secs_f64(), "autosave started");
        Self { handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// 明示的に停止（ドロップと同じ）
    pub fn stop(self) {}
}

impl Drop for AutoSaver {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::debug!("autosave stopped");
    }
}

/// セッションをロックする。保持側が panic していても中身をそのまま使う
///
/// チェックリストの変更は1回のロック内で完結するので、poison 後も状態は整合している。
pub fn lock_session<S>(session: &Mutex<Session<S>>) -> MutexGuard<'_, Session<S>> {
    session.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("session lock poisoned, saving current state anyway");
        poisoned.into_inner()
    })
}

/// 1回分の保存
fn checkpoint<S: KeyValueStore>(session: &Mutex<Session<S>>) -> bool {
    lock_session(session).save()
}
