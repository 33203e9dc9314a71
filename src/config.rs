//! dired 設定
//!
//! `<config_dir>/altre/dired.json` から読み込む。ファイルがなければ既定値

use crate::error::{ConfigError, Result};
use crate::logging::{LogLevel, Logger};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 設定ファイル名
pub const CONFIG_FILE_NAME: &str = "dired.json";

/// dired バッファの設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DiredConfig {
    /// `.` で始まるファイルを表示するか（`.` と `..` は常に非表示）
    pub show_dot_files: bool,
    /// ログレベル
    pub log_level: LogLevel,
    /// ログの追記先
    pub log_file: Option<PathBuf>,
}

impl Default for DiredConfig {
    fn default() -> Self {
        Self {
            show_dot_files: false,
            log_level: LogLevel::Warning,
            log_file: None,
        }
    }
}

impl DiredConfig {
    /// 既定の設定ファイルパス
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("altre").join(CONFIG_FILE_NAME))
    }

    /// 既定の場所から読み込み
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// 指定パスから読み込み（存在しなければ既定値）
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::InvalidFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::from_json(&text).map_err(|e| match e {
            crate::error::DiredError::Config(ConfigError::InvalidFile { message, .. }) => {
                ConfigError::InvalidFile {
                    path: path.display().to_string(),
                    message,
                }
                .into()
            }
            other => other,
        })
    }

    /// JSON 文字列から構築
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| {
            ConfigError::InvalidFile {
                path: "<inline>".to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// 設定に従ったロガー
    pub fn logger(&self) -> Logger {
        let logger = Logger::new(self.log_level);
        match &self.log_file {
            Some(path) => logger.with_file_output(path.clone()),
            None => logger,
        }
    }
}
