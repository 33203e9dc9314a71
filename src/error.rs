//! エラーハンドリングシステム
//!
//! dired バッファ全体で使用されるエラー型とユーティリティを定義
//! 設計方針：どのエラーもホストを停止させない。失敗した行・パスを特定してメッセージに残す

use std::io::ErrorKind;
use std::time::{Duration, Instant};
use thiserror::Error;

/// アプリケーション全体のエラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiredError {
    /// 固定カラム形式に合わない行
    #[error("Malformed listing line: {0}")]
    Format(#[from] FormatError),

    /// ファイル操作エラー
    #[error("File operation failed: {0}")]
    File(#[from] FileError),

    /// 個別エントリの stat 失敗（一覧からは除外される）
    #[error("Cannot stat {path}: {message}")]
    Stat { path: String, message: String },

    /// ディレクトリ自体が読めない
    #[error("Cannot read directory {path}: {message}")]
    DirectoryRead { path: String, message: String },

    /// 設定エラー
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// アプリケーション論理エラー
    #[error("Application error: {0}")]
    Application(String),
}

/// 行フォーマットのエラー
///
/// ユーザーが手作業でバッファを編集してカラム位置がずれた場合に発生する
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("line is {len} characters long, expected at least {min}")]
    TooShort { len: usize, min: usize },

    #[error("field `{field}` is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("line {index}: {source}")]
    AtLine {
        index: usize,
        #[source]
        source: Box<FormatError>,
    },
}

impl FormatError {
    /// バッファ内の行番号を付与
    pub fn at_line(self, index: usize) -> Self {
        match self {
            FormatError::AtLine { source, .. } => FormatError::AtLine { index, source },
            other => FormatError::AtLine {
                index,
                source: Box::new(other),
            },
        }
    }

    /// 付与された行番号（あれば）
    pub fn line_index(&self) -> Option<usize> {
        match self {
            FormatError::AtLine { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// ファイル操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Already exists: {path}")]
    AlreadyExists { path: String },

    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    #[error("IO error: {message}")]
    Io { message: String },
}

impl FileError {
    /// io::Error をパス付きで分類
    pub fn from_io(error: &std::io::Error, path: impl AsRef<std::path::Path>) -> Self {
        let path = path.as_ref().display().to_string();
        match error.kind() {
            ErrorKind::NotFound => FileError::NotFound { path },
            ErrorKind::PermissionDenied => FileError::PermissionDenied { path },
            ErrorKind::AlreadyExists => FileError::AlreadyExists { path },
            _ => FileError::Io {
                message: format!("{}: {}", path, error),
            },
        }
    }
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration file {path}: {message}")]
    InvalidFile { path: String, message: String },
}

/// エラーレベル分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLevel {
    Warning,
    Error,
}

/// エラー表示情報（ユーザー向けメッセージチャネル）
#[derive(Debug, Clone)]
pub struct ErrorDisplay {
    /// エラーメッセージ
    pub message: String,
    /// エラーレベル
    pub level: ErrorLevel,
    /// 表示開始時刻
    pub start_time: Instant,
    /// 表示持続時間
    pub duration: Duration,
}

impl ErrorDisplay {
    pub fn new(error: &DiredError) -> Self {
        let (message, level) = Self::format_error(error);
        Self::with_level(message, level)
    }

    fn with_level(message: String, level: ErrorLevel) -> Self {
        Self {
            message,
            level,
            start_time: Instant::now(),
            duration: Duration::from_secs(5),
        }
    }

    fn format_error(error: &DiredError) -> (String, ErrorLevel) {
        match error {
            DiredError::Format(format) => (
                format!(
                    "Listing format was changed by hand, reload the buffer ({})",
                    format
                ),
                ErrorLevel::Error,
            ),
            DiredError::Stat { path, message } => {
                (format!("Skipped {}: {}", path, message), ErrorLevel::Warning)
            }
            DiredError::DirectoryRead { path, message } => (
                format!("Could not read {}: {}", path, message),
                ErrorLevel::Warning,
            ),
            DiredError::File(FileError::NotFound { path }) => {
                (format!("No such file: {}", path), ErrorLevel::Error)
            }
            DiredError::File(FileError::PermissionDenied { path }) => {
                (format!("Permission denied: {}", path), ErrorLevel::Error)
            }
            DiredError::File(FileError::AlreadyExists { path }) => {
                (format!("{} already exists", path), ErrorLevel::Error)
            }
            _ => (format!("Error: {}", error), ErrorLevel::Error),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.start_time.elapsed() >= self.duration
    }
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, DiredError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_creation() {
        let error = DiredError::File(FileError::NotFound {
            path: "test.txt".to_string(),
        });
        let display = ErrorDisplay::new(&error);

        assert_eq!(display.level, ErrorLevel::Error);
        assert!(display.message.contains("test.txt"));
        assert!(!display.is_expired());
    }

    #[test]
    fn test_error_display_expiry() {
        let error = DiredError::Application("boom".to_string());
        let mut display = ErrorDisplay::new(&error);

        assert!(!display.is_expired());

        // 時間経過をシミュレート
        display.start_time = Instant::now() - Duration::from_secs(6);
        assert!(display.is_expired());
    }

    #[test]
    fn test_stat_errors_are_warnings() {
        let error = DiredError::Stat {
            path: "/tmp/gone".to_string(),
            message: "vanished".to_string(),
        };
        assert_eq!(ErrorDisplay::new(&error).level, ErrorLevel::Warning);
    }

    #[test]
    fn test_format_error_line_tag() {
        let error = FormatError::TooShort { len: 3, min: 52 }.at_line(7);
        assert_eq!(error.line_index(), Some(7));
        assert!(error.to_string().starts_with("line 7:"));

        // 再付与しても入れ子にならない
        let retagged = error.at_line(9);
        assert_eq!(retagged.line_index(), Some(9));
        assert!(!retagged.to_string().contains("line 7"));
    }

    #[test]
    fn test_io_error_classification() {
        let err = std::io::Error::new(ErrorKind::PermissionDenied, "nope");
        assert_eq!(
            FileError::from_io(&err, "/root/secret"),
            FileError::PermissionDenied {
                path: "/root/secret".to_string()
            }
        );
    }
}
