//! レポートのファイル出力・メールリンク生成
//!
//! ## 変更履歴
//! - 2026-10-16: 初期作成

use crate::error::{RideAlongError, Result};
use regex::Regex;
use ride_along_common::{export_file_name, mail_subject, mailto_link, Checklist};
use std::path::{Path, PathBuf};

/// ファイル名に使えない文字を `_` に置換
pub fn sanitize_file_name(name: &str) -> String {
    lazy_static::lazy_static! {
        static ref UNSAFE_RE: Regex = Regex::new(r#"[/\\:*?"<>|\x00-\x1F]"#).unwrap();
    }
    UNSAFE_RE.replace_all(name, "_").to_string()
}

/// 出力先ディレクトリにレポートを書き出し、パスを返す
pub fn write_report(checklist: &Checklist, output_dir: &Path) -> Result<PathBuf> {
    if output_dir.exists() && !output_dir.is_dir() {
        return Err(RideAlongError::Export(format!(
            "出力先がディレクトリではありません: {}",
            output_dir.display()
        )));
    }
    std::fs::create_dir_all(output_dir)?;

    let file_name = sanitize_file_name(&export_file_name(checklist.meta()));
    let path = output_dir.join(file_name);
    std::fs::write(&path, checklist.report())?;
    Ok(path)
}

/// レポートを本文にした mailto リンク
pub fn build_mailto(checklist: &Checklist, recipient: &str) -> String {
    mailto_link(recipient, &mail_subject(checklist.meta()), &checklist.report())
}
