//! 端末表示

use ride_along_common::{Checklist, Statistics};

/// 統計の1行表示
pub fn format_stats_line(stats: &Statistics) -> String {
    format!(
        "完了: {} / {} ({}%)",
        stats.completed_tasks, stats.total_tasks, stats.completion_rate
    )
}

/// 20文字幅の進捗バー
pub fn progress_bar(rate: u32) -> String {
    let filled = (rate.min(100) as usize * 20 + 50) / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(20 - filled))
}

pub fn print_stats(checklist: &Checklist) {
    let stats = checklist.statistics();
    println!("{} {}", format_stats_line(&stats), progress_bar(stats.completion_rate));
    for (i, progress) in checklist.section_progress().iter().enumerate() {
        println!(
            "  {:>2}. {} ({}/{})",
            i + 1,
            progress.title,
            progress.completed,
            progress.total
        );
    }
}

pub fn print_checklist(checklist: &Checklist) {
    let meta = checklist.meta();
    println!("評価日:     {}", meta.date);
    println!("評価者:     {}", meta.evaluator_name);
    println!("評価対象者: {}", meta.clinician_name);
    println!();

    for (i, section) in checklist.outline().sections().iter().enumerate() {
        println!("{}. {} [{}]", i + 1, section.title, section.key);
        for (j, item) in section.items.iter().enumerate() {
            let mark = if checklist.is_checked(&section.key, item) { "✔" } else { " " };
            println!("   [{}] {:>2}. {}", mark, j + 1, item);
        }
        let note = checklist.note(&section.key);
        if !note.is_empty() {
            println!("   メモ: {}", note);
        }
        println!();
    }

    let overall = checklist.notes().overall();
    if !overall.is_empty() {
        println!("総合評価: {}", overall);
        println!();
    }

    print_stats(checklist);
}
