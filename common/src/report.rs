//! テキストレポート生成
//!
//! ファイル出力とメール本文の両方で同じテキストを使う。
//! 入力が同じなら出力も同じ（現在時刻などは含めない）。

use crate::outline::Outline;
use crate::state::{CompletionState, EvaluationMeta, NotesState};
use crate::stats::Statistics;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt::Write;

pub const REPORT_TITLE: &str = "HOME VISIT RIDE-ALONG EVALUATION";
const REPORT_TITLE_RULE: &str = "=================================";
pub const OVERALL_TITLE: &str = "OVERALL ASSESSMENT";
pub const NO_NOTES: &str = "No notes provided.";
pub const NO_OVERALL: &str = "No overall assessment provided.";

/// 対象者名が空のときのファイル名
pub const DEFAULT_FILE_NAME_PART: &str = "Evaluation";

/// encodeURIComponent と同じ非エンコード文字: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// 宛先用。アドレスの `@` と複数宛先区切りの `,` はそのまま残す
const RECIPIENT: &AsciiSet = &URI_COMPONENT.remove(b'@').remove(b',');

/// レポート本文を生成
pub fn format_report(
    meta: &EvaluationMeta,
    outline: &Outline,
    completion: &CompletionState,
    notes: &NotesState,
    statistics: &Statistics,
) -> String {
    let mut report = String::new();

    // String への write! は失敗しない
    let _ = writeln!(report, "{}", REPORT_TITLE);
    let _ = writeln!(report, "{}\n", REPORT_TITLE_RULE);
    let _ = writeln!(report, "Date: {}", meta.date);
    let _ = writeln!(report, "Evaluator: {}", meta.evaluator_name);
    let _ = writeln!(report, "Clinician Being Evaluated: {}\n", meta.clinician_name);
    let _ = writeln!(
        report,
        "Tasks Completed: {} out of {} ({}%)\n",
        statistics.completed_tasks, statistics.total_tasks, statistics.completion_rate
    );

    for section in outline.sections() {
        let _ = writeln!(report, "\n{}", section.title.to_uppercase());
        let _ = writeln!(report, "{}\n", rule(&section.title));
        for item in &section.items {
            let mark = if completion.is_checked(&section.key, item) { 'X' } else { ' ' };
            let _ = writeln!(report, "[{}] {}", mark, item);
        }
        let _ = writeln!(report, "\nNotes on {}:", section.title);
        let _ = writeln!(report, "{}", or_fallback(notes.get(&section.key), NO_NOTES));
    }

    let _ = writeln!(report, "\n{}", OVERALL_TITLE);
    let _ = writeln!(report, "{}\n", rule(OVERALL_TITLE));
    let _ = writeln!(report, "{}", or_fallback(notes.overall(), NO_OVERALL));

    report
}

/// 元のタイトルの文字数分の `=`
fn rule(title: &str) -> String {
    "=".repeat(title.chars().count())
}

fn or_fallback<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    if text.is_empty() {
        fallback
    } else {
        text
    }
}

/// ダウンロード用ファイル名: `RideAlong_<対象者名>_<日付>.txt`
pub fn export_file_name(meta: &EvaluationMeta) -> String {
    let name = if meta.clinician_name.trim().is_empty() {
        DEFAULT_FILE_NAME_PART
    } else {
        meta.clinician_name.as_str()
    };
    format!("RideAlong_{}_{}.txt", name, meta.date)
}

/// メール件名
pub fn mail_subject(meta: &EvaluationMeta) -> String {
    format!("Ride-Along Evaluation - {} - {}", meta.clinician_name, meta.date)
}

/// encodeURIComponent 相当のパーセントエンコード
pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

/// `mailto:` リンクを生成（宛先は空でもよい）
///
/// 宛先に `?` や `&` が含まれていてもヘッダーが増えないようエンコードする。
pub fn mailto_link(recipient: &str, subject: &str, body: &str) -> String {
    format!(
        "mailto:{}?subject={}&body={}",
        utf8_percent_encode(recipient, RECIPIENT),
        encode_uri_component(subject),
        encode_uri_component(body)
    )
}
