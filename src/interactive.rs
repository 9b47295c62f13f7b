//! 対話式チェックリスト入力モジュール
//!
//! 入力中も自動保存タスクが並行して動くため、セッションは
//! `Mutex` 越しに扱い、ロックは変更の瞬間だけ取る。

use crate::autosave::SharedSession;
use crate::error::{RideAlongError, Result};
use crate::view;
use dialoguer::{Input, MultiSelect, Select};
use ride_along_common::{Checklist, KeyValueStore, MetaField, Section, OVERALL_NOTE_KEY};
use std::sync::MutexGuard;

/// メニュー操作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillAction {
    /// セクションを入力
    Section(usize),
    /// 総合評価を入力
    Overall,
    /// メタ情報を入力
    Meta,
    /// 保存して終了
    Quit,
}

/// メニューの表示項目と対応する操作
pub fn menu_entries(checklist: &Checklist) -> Vec<(String, FillAction)> {
    let mut entries: Vec<(String, FillAction)> = checklist
        .section_progress()
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            (
                format!("{} ({}/{})", p.title, p.completed, p.total),
                FillAction::Section(i),
            )
        })
        .collect();
    entries.push(("Overall Assessment".to_string(), FillAction::Overall));
    entries.push(("評価日・評価者・対象者".to_string(), FillAction::Meta));
    entries.push(("保存して終了".to_string(), FillAction::Quit));
    entries
}

/// 選択結果をセクションに反映（選ばれた項目だけ true）
pub fn apply_selection(checklist: &mut Checklist, section: &Section, selected: &[usize]) -> usize {
    let mut checked = 0;
    for (i, item) in section.items.iter().enumerate() {
        let value = selected.contains(&i);
        if checklist.set_item(&section.key, item, value) == Some(true) {
            checked += 1;
        }
    }
    checked
}

fn lock<S>(session: &SharedSession<S>) -> Result<MutexGuard<'_, crate::session::Session<S>>> {
    session
        .lock()
        .map_err(|_| RideAlongError::Interactive("セッションのロックに失敗しました".into()))
}

/// 対話式で入力（ブロッキング。`spawn_blocking` から呼ぶ）
pub fn run_fill<S: KeyValueStore>(session: SharedSession<S>) -> Result<()> {
    println!("📋 ride-along - チェックリスト入力\n");
    prompt_meta(&session)?;

    loop {
        let entries = {
            let guard = lock(&session)?;
            println!();
            println!("{}", view::format_stats_line(&guard.checklist().statistics()));
            menu_entries(guard.checklist())
        };
        let labels: Vec<&str> = entries.iter().map(|(label, _)| label.as_str()).collect();

        let choice = Select::new()
            .with_prompt("入力するセクション")
            .items(&labels)
            .default(0)
            .interact()?;

        match &entries[choice].1 {
            FillAction::Section(index) => prompt_section(&session, *index)?,
            FillAction::Overall => prompt_note(&session, OVERALL_NOTE_KEY, "総合評価")?,
            FillAction::Meta => prompt_meta(&session)?,
            FillAction::Quit => {
                println!("保存して終了します...");
                break;
            }
        }
    }

    Ok(())
}

fn prompt_meta<S>(session: &SharedSession<S>) -> Result<()> {
    let meta = lock(session)?.checklist().meta().clone();

    let fields = [
        (MetaField::Date, "評価日 (YYYY-MM-DD)", meta.date),
        (MetaField::EvaluatorName, "評価者名", meta.evaluator_name),
        (MetaField::ClinicianName, "評価対象者名", meta.clinician_name),
    ];

    for (field, prompt, current) in fields {
        let value: String = Input::new()
            .with_prompt(prompt)
            .with_initial_text(current)
            .allow_empty(true)
            .interact_text()?;
        lock(session)?.checklist_mut().set_meta(field, value);
    }
    Ok(())
}

fn prompt_section<S>(session: &SharedSession<S>, index: usize) -> Result<()> {
    let (section, defaults) = {
        let guard = lock(session)?;
        let checklist = guard.checklist();
        let section = checklist.outline().sections()[index].clone();
        let defaults: Vec<bool> = section
            .items
            .iter()
            .map(|item| checklist.is_checked(&section.key, item))
            .collect();
        (section, defaults)
    };

    let selected = MultiSelect::new()
        .with_prompt(format!("{} (スペースで切替、Enterで確定)", section.title))
        .items(&section.items)
        .defaults(&defaults)
        .interact()?;

    let checked = {
        let mut guard = lock(session)?;
        apply_selection(guard.checklist_mut(), &section, &selected)
    };
    println!("✔ {}: {}/{}", section.title, checked, section.items.len());

    prompt_note(session, &section.key, &format!("Notes on {}", section.title))
}

fn prompt_note<S>(session: &SharedSession<S>, key: &str, label: &str) -> Result<()> {
    let current = lock(session)?.checklist().note(key).to_string();
    let text: String = Input::new()
        .with_prompt(label)
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?;
    lock(session)?.checklist_mut().set_note(key, text);
    Ok(())
}
