use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ride-along")]
#[command(about = "訪問診療同行評価チェックリスト・評価レポート生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 保存先ディレクトリ（設定より優先）
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// カスタムアウトラインJSON（設定より優先）
    #[arg(long, global = true)]
    pub outline: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// チェックリストの現在の状態を表示
    Show,

    /// 完了統計を表示
    Stats,

    /// 項目の完了フラグを切り替え
    Toggle {
        /// セクションキーまたは番号（1始まり）
        #[arg(required = true)]
        section: String,

        /// 項目名または番号（1始まり）
        #[arg(required = true)]
        item: String,
    },

    /// メモを設定（overall で総合評価）
    Note {
        /// セクションキー・番号、または overall
        #[arg(required = true)]
        section: NoteTarget,

        /// メモ本文（空文字でクリア）
        #[arg(required = true, allow_hyphen_values = true)]
        text: String,
    },

    /// 評価メタ情報を設定
    Meta {
        /// 評価日（YYYY-MM-DD）
        #[arg(short, long)]
        date: Option<String>,

        /// 評価者名
        #[arg(short, long)]
        evaluator: Option<String>,

        /// 評価対象者名
        #[arg(short, long)]
        clinician: Option<String>,
    },

    /// 対話的にチェックリストを入力（自動保存あり）
    Fill,

    /// テキストレポートをファイルに出力
    Export {
        /// 出力ディレクトリ（デフォルト: カレント）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// レポートを本文にした mailto リンクを出力
    Mail {
        /// 宛先（設定より優先）
        #[arg(long)]
        to: Option<String>,
    },

    /// 完了フラグとメモをリセット（メタ情報は保持）
    Reset,

    /// 保存データを削除
    Clear,

    /// 設定を表示/編集
    Config {
        /// メール宛先を設定（空文字で解除）
        #[arg(long)]
        set_recipient: Option<String>,

        /// 自動保存間隔（秒）を設定
        #[arg(long)]
        set_interval: Option<u64>,

        /// 保存先ディレクトリを設定
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// メモの対象
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NoteTarget {
    Overall,
    Section(String),
}

impl std::str::FromStr for NoteTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overall" | "overallassessment" | "overall-assessment" => Ok(NoteTarget::Overall),
            "" => Err("Section must not be empty".to_string()),
            _ => Ok(NoteTarget::Section(s.to_string())),
        }
    }
}
