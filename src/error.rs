use thiserror::Error;

#[derive(Error, Debug)]
pub enum RideAlongError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("セクションが見つかりません: {0}")]
    UnknownSection(String),

    #[error("項目が見つかりません: {section} / {item}")]
    UnknownItem { section: String, item: String },

    #[error("レポート出力エラー: {0}")]
    Export(String),

    #[error("対話入力エラー: {0}")]
    Interactive(String),

    #[error(transparent)]
    Common(#[from] ride_along_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

impl From<dialoguer::Error> for RideAlongError {
    fn from(e: dialoguer::Error) -> Self {
        RideAlongError::Interactive(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RideAlongError>;
