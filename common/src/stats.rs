//! 完了統計
//!
//! アウトラインと完了状態から毎回計算する（キャッシュしない）。

use crate::outline::Outline;
use crate::state::CompletionState;
use serde::{Deserialize, Serialize};

/// 全体の完了統計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// 完了率（%、四捨五入）
    pub completion_rate: u32,
}

impl Statistics {
    /// アウトラインに含まれる項目だけを数える
    pub fn compute(outline: &Outline, completion: &CompletionState) -> Self {
        let mut total_tasks = 0;
        let mut completed_tasks = 0;
        for section in outline.sections() {
            for item in &section.items {
                total_tasks += 1;
                if completion.is_checked(&section.key, item) {
                    completed_tasks += 1;
                }
            }
        }
        Self {
            total_tasks,
            completed_tasks,
            completion_rate: completion_rate(completed_tasks, total_tasks),
        }
    }
}

/// round(completed / total × 100)、total = 0 のときは 0
///
/// 0.5 は切り上げ。整数演算で計算する。
pub fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed * 200 + total) / (total * 2)) as u32
}

/// セクション別の進捗
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionProgress {
    pub key: String,
    pub title: String,
    pub completed: usize,
    pub total: usize,
}

pub fn section_progress(outline: &Outline, completion: &CompletionState) -> Vec<SectionProgress> {
    outline
        .sections()
        .iter()
        .map(|section| SectionProgress {
            key: section.key.clone(),
            title: section.title.clone(),
            completed: section
                .items
                .iter()
                .filter(|item| completion.is_checked(&section.key, item))
                .count(),
            total: section.items.len(),
        })
        .collect()
}
