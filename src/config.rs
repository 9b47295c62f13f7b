use crate::error::{RideAlongError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 自動保存間隔のデフォルト（秒）
pub const DEFAULT_AUTOSAVE_SECS: u64 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// スナップショット保存先ディレクトリ
    pub data_dir: Option<PathBuf>,
    pub autosave_interval_secs: u64,
    /// メールの宛先（空なら宛先なし）
    pub mail_recipient: Option<String>,
    /// カスタムアウトラインJSON
    pub outline_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            autosave_interval_secs: DEFAULT_AUTOSAVE_SECS,
            mail_recipient: None,
            outline_path: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &std::path::Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// 読めない・壊れた設定ファイルは警告を出してデフォルトで続行
    ///
    /// `config --set-*` で壊れたファイルを上書きして直せるようにする。
    pub fn load_or_default() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_or_default_from(&path),
            Err(e) => {
                tracing::warn!(error = %e, "config path unavailable, using defaults");
                Self::default()
            }
        }
    }

    pub fn load_or_default_from(config_path: &std::path::Path) -> Self {
        Self::load_from(config_path).unwrap_or_else(|e| {
            tracing::warn!(path = %config_path.display(), error = %e, "failed to load config, using defaults");
            eprintln!("⚠ 設定ファイルを読み込めません（デフォルト設定で続行）: {}", e);
            Self::default()
        })
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &std::path::Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| RideAlongError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("ride-along").join("config.json"))
    }

    /// スナップショット保存先（未設定ならOSのデータディレクトリ）
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .map(|d| d.join("ride-along"))
            .unwrap_or_else(|| PathBuf::from(".ride-along"))
    }

    /// 自動保存間隔（0秒は1秒に切り上げ）
    pub fn autosave_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.autosave_interval_secs.max(1))
    }

    pub fn recipient(&self) -> &str {
        self.mail_recipient.as_deref().unwrap_or("")
    }

    pub fn set_recipient(&mut self, recipient: String) -> Result<()> {
        self.mail_recipient = if recipient.trim().is_empty() { None } else { Some(recipient) };
        self.save()
    }

    pub fn set_autosave_interval(&mut self, secs: u64) -> Result<()> {
        if secs == 0 {
            return Err(RideAlongError::Config("自動保存間隔は1秒以上にしてください".into()));
        }
        self.autosave_interval_secs = secs;
        self.save()
    }

    pub fn set_data_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.data_dir = Some(dir);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.autosave_interval_secs, 10);
        assert_eq!(config.recipient(), "");
        assert_eq!(config.autosave_interval(), std::time::Duration::from_secs(10));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"mail_recipient": "lead@example.com"}"#)
            .expect("パース失敗");
        assert_eq!(config.recipient(), "lead@example.com");
        assert_eq!(config.autosave_interval_secs, DEFAULT_AUTOSAVE_SECS);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            data_dir: Some(PathBuf::from("/tmp/ride-along")),
            autosave_interval_secs: 30,
            ..Default::default()
        };
        config.save_to(&path).expect("保存失敗");

        let loaded = Config::load_from(&path).expect("読み込み失敗");
        assert_eq!(loaded.autosave_interval_secs, 30);
        assert_eq!(loaded.resolve_data_dir(), PathBuf::from("/tmp/ride-along"));
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let loaded = Config::load_from(&dir.path().join("none.json")).expect("読み込み失敗");
        assert!(loaded.data_dir.is_none());
    }

    #[test]
    fn test_corrupt_config_falls_back_to_default() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").expect("書き込み失敗");

        assert!(Config::load_from(&path).is_err());
        let config = Config::load_or_default_from(&path);
        assert_eq!(config.autosave_interval_secs, DEFAULT_AUTOSAVE_SECS);
        assert!(config.mail_recipient.is_none());

        // デフォルトを書き戻せば次回から正常に読める
        config.save_to(&path).expect("保存失敗");
        assert!(Config::load_from(&path).is_ok());
    }
}
