//! CLI用のセッション補助
//!
//! セッション本体は共通ライブラリにあり、ここでは日付の取得と
//! コマンド引数からセクション・項目を解決する処理を持つ。

use crate::error::{RideAlongError, Result};
use ride_along_common::{Outline, Section, OVERALL_NOTE_KEY};

pub use ride_along_common::Session;

/// 今日の日付（YYYY-MM-DD）
pub fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// セクションをキーまたは番号（1始まり）で探す
pub fn resolve_section<'a>(outline: &'a Outline, arg: &str) -> Result<&'a Section> {
    if let Some(section) = outline.section(arg) {
        return Ok(section);
    }
    arg.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| outline.sections().get(i))
        .ok_or_else(|| RideAlongError::UnknownSection(arg.to_string()))
}

/// 項目を名前または番号（1始まり）で探す
pub fn resolve_item<'a>(section: &'a Section, arg: &str) -> Result<&'a str> {
    if let Some(item) = section.items.iter().find(|i| i.as_str() == arg) {
        return Ok(item);
    }
    arg.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| section.items.get(i))
        .map(String::as_str)
        .ok_or_else(|| RideAlongError::UnknownItem {
            section: section.key.clone(),
            item: arg.to_string(),
        })
}

/// メモ対象のキーを解決
pub fn resolve_note_key(outline: &Outline, target: &crate::cli::NoteTarget) -> Result<String> {
    match target {
        crate::cli::NoteTarget::Overall => Ok(OVERALL_NOTE_KEY.to_string()),
        crate::cli::NoteTarget::Section(arg) => Ok(resolve_section(outline, arg)?.key.clone()),
    }
}
