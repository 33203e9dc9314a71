//! dired バッファの1行に対応するエントリ

use super::codec;
use super::fs::EntryStat;
use super::identity::IdentityResolver;
use super::mode::{mode_string, EntryKind};
use crate::error::Result;
use chrono::{DateTime, Datelike, Local, Timelike};
use std::path::PathBuf;

/// 自分自身を表す疑似エントリ名
pub const SELF_ENTRY: &str = ".";
/// 親ディレクトリを表す疑似エントリ名
pub const PARENT_ENTRY: &str = "..";

/// ディレクトリ内の1エントリのメタデータ
///
/// 生成後に変化するのは選択フラグのみ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileItem {
    /// 親ディレクトリのパス
    pub dir_path: String,
    /// エントリ名（`.` / `..` もありうる）
    pub name: String,
    pub is_directory: bool,
    /// 特殊ファイルは is_directory / is_file のどちらでもない
    pub is_file: bool,
    pub owner: String,
    pub group: String,
    pub size: u64,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    /// `drwxr-xr-x` 形式の10文字
    pub mode: String,
    pub selected: bool,
}

impl FileItem {
    /// stat 結果から構築
    pub fn from_stat(
        dir_path: impl Into<String>,
        name: impl Into<String>,
        stat: &EntryStat,
        identity: &dyn IdentityResolver,
    ) -> Self {
        let modified: DateTime<Local> = stat.modified.into();
        Self {
            dir_path: dir_path.into(),
            name: name.into(),
            is_directory: stat.kind == EntryKind::Directory,
            is_file: stat.kind == EntryKind::File,
            owner: identity.user_name(stat.uid),
            group: identity.group_name(stat.gid),
            size: stat.size,
            month: modified.month(),
            day: modified.day(),
            hour: modified.hour(),
            minute: modified.minute(),
            mode: mode_string(stat.kind, stat.mode),
            selected: false,
        }
    }

    /// 描画済みの1行から構築
    ///
    /// ディレクトリ名の末尾 `/` は名前に残る。必要なら [`FileItem::without_trailing_slash`] を使う
    pub fn parse_line(dir_path: impl Into<String>, line: &str) -> Result<Self> {
        Ok(codec::decode(dir_path, line)?)
    }

    /// 末尾 `/` を除いた名前
    pub fn bare_name(&self) -> &str {
        if self.is_directory {
            if let Some(stripped) = self.name.strip_suffix('/') {
                if !stripped.is_empty() {
                    return stripped;
                }
            }
        }
        &self.name
    }

    /// 名前から描画用の末尾 `/` を取り除いたコピー
    pub fn without_trailing_slash(mut self) -> Self {
        let bare = self.bare_name().len();
        self.name.truncate(bare);
        self
    }

    /// `.` または `..`
    pub fn is_dot_entry(&self) -> bool {
        matches!(self.bare_name(), SELF_ENTRY | PARENT_ENTRY)
    }

    /// 隠しファイル（`.` / `..` を除く）
    pub fn is_hidden(&self) -> bool {
        !self.is_dot_entry() && self.name.starts_with('.')
    }

    /// エントリのフルパス
    pub fn path(&self) -> PathBuf {
        PathBuf::from(&self.dir_path).join(self.bare_name())
    }

    pub fn set_selected(&mut self, value: bool) {
        self.selected = value;
    }
}
