//! dired コマンド層
//!
//! カーソル位置の行を読み戻して対象を決め、ファイルシステム操作のあとにバッファを作り直す。
//! 失敗はメッセージキューに積み、エディタは継続する

use super::fs::absolute_path;
use super::item::{FileItem, PARENT_ENTRY, SELF_ENTRY};
use super::listing::{self, dir_from_header, HEADER_LINE};
use super::provider::{uri_for, DiredProvider};
use super::selection::{self, EditorView, LineBuffer, SelectionTarget};
use crate::config::DiredConfig;
use crate::error::{DiredError, ErrorDisplay, FileError, Result};
use std::path::{Path, PathBuf};

/// enter の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnterOutcome {
    /// ディレクトリに移動した
    Directory(PathBuf),
    /// ホスト側で開くべきファイル
    OpenFile(PathBuf),
    /// ヘッダー行など対象なし
    Nothing,
}

/// 1つの dired バッファの状態
pub struct DiredSession {
    provider: DiredProvider,
    dir: PathBuf,
    show_dot_files: bool,
    view: LineBuffer,
    messages: Vec<ErrorDisplay>,
}

impl DiredSession {
    pub fn new(provider: DiredProvider, config: &DiredConfig) -> Self {
        Self {
            provider,
            dir: PathBuf::new(),
            show_dot_files: config.show_dot_files,
            view: LineBuffer::default(),
            messages: Vec::new(),
        }
    }

    /// ディレクトリを開く（カーソルはヘッダー行）
    ///
    /// 別のディレクトリへ移った場合、前のバッファは閉じる
    pub fn open(&mut self, dir: impl AsRef<Path>) -> String {
        let dir = absolute_path(dir.as_ref());
        if !self.dir.as_os_str().is_empty() && self.dir != dir {
            let previous = self.uri();
            self.provider.close(&previous);
        }
        self.dir = dir;
        self.rebuild();
        self.view.set_cursor_line(HEADER_LINE);
        self.uri()
    }

    /// 現在のディレクトリを読み直す
    pub fn refresh(&mut self) {
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let rendered = self.provider.render(&self.dir, self.show_dot_files);
        for warning in &rendered.warnings {
            self.messages.push(ErrorDisplay::new(warning));
        }

        let last = rendered.lines.len().saturating_sub(1);
        let cursor = self.view.cursor_line().min(last);
        self.view = LineBuffer::new(rendered.lines);
        self.view.set_cursor_line(cursor);
    }

    pub fn uri(&self) -> String {
        uri_for(&self.dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn show_dot_files(&self) -> bool {
        self.show_dot_files
    }

    pub fn provider(&self) -> &DiredProvider {
        &self.provider
    }

    pub fn view(&self) -> &LineBuffer {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut LineBuffer {
        &mut self.view
    }

    pub fn lines(&self) -> Vec<String> {
        self.view.lines()
    }

    /// ユーザー向けメッセージ（期限切れは除く）
    pub fn messages(&self) -> Vec<&ErrorDisplay> {
        self.messages.iter().filter(|m| !m.is_expired()).collect()
    }

    pub fn take_messages(&mut self) -> Vec<ErrorDisplay> {
        std::mem::take(&mut self.messages)
    }

    fn report<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(error) = &result {
            log::warn!("dired {}: {}", self.dir.display(), error);
            self.messages.push(ErrorDisplay::new(error));
        }
        result
    }

    /// `.` 以外のエントリ表示を切り替える
    pub fn toggle_dot_files(&mut self) -> bool {
        self.show_dot_files = !self.show_dot_files;
        self.rebuild();
        self.show_dot_files
    }

    /// 親ディレクトリへ移動
    pub fn go_up(&mut self) -> Option<PathBuf> {
        let parent = self.dir.parent()?.to_path_buf();
        self.open(&parent);
        Some(parent)
    }

    /// カーソル行のエントリ（ヘッダー行なら None）
    pub fn current_item(&mut self) -> Result<Option<FileItem>> {
        let result = self.item_at(self.view.cursor_line());
        self.report(result)
    }

    fn item_at(&self, index: usize) -> Result<Option<FileItem>> {
        let lines = self.view.lines();
        if index == HEADER_LINE || index >= lines.len() {
            return Ok(None);
        }
        let dir_path = dir_from_header(&lines[HEADER_LINE]);
        let item = FileItem::parse_line(dir_path, &lines[index])
            .map_err(|e| match e {
                DiredError::Format(format) => DiredError::Format(format.at_line(index)),
                other => other,
            })?
            .without_trailing_slash();
        Ok(Some(item))
    }

    /// カーソル行を開く
    pub fn enter(&mut self) -> Result<EnterOutcome> {
        let Some(item) = self.current_item()? else {
            return Ok(EnterOutcome::Nothing);
        };
        let path = item.path();
        if item.is_directory {
            self.open(&path);
            Ok(EnterOutcome::Directory(self.dir.clone()))
        } else {
            Ok(EnterOutcome::OpenFile(path))
        }
    }

    fn child_path(&self, name: &str) -> Result<PathBuf> {
        let name = name.trim();
        if name.is_empty() || name == SELF_ENTRY || name == PARENT_ENTRY || name.contains('/') {
            return Err(FileError::InvalidPath {
                path: name.to_string(),
            }
            .into());
        }
        Ok(self.dir.join(name))
    }

    /// ディレクトリを作成
    pub fn create_dir(&mut self, name: &str) -> Result<PathBuf> {
        let result = self.child_path(name).and_then(|path| {
            self.provider.file_system().create_dir(&path)?;
            Ok(path)
        });
        let path = self.report(result)?;
        self.rebuild();
        Ok(path)
    }

    /// 空ファイルを作成（ホストはこのパスを開く）
    pub fn create_file(&mut self, name: &str) -> Result<PathBuf> {
        let result = self.child_path(name).and_then(|path| {
            self.provider.file_system().create_file(&path)?;
            Ok(path)
        });
        let path = self.report(result)?;
        self.rebuild();
        Ok(path)
    }

    fn target_item(&mut self) -> Result<FileItem> {
        let item = self.current_item()?;
        let result = match item {
            Some(item) if !item.is_dot_entry() => Ok(item),
            _ => Err(DiredError::Application("no file on this line".to_string())),
        };
        self.report(result)
    }

    /// カーソル行のエントリの名前を変更
    pub fn rename(&mut self, new_name: &str) -> Result<PathBuf> {
        let item = self.target_item()?;
        let result = self.child_path(new_name).and_then(|to| {
            self.provider.file_system().rename(&item.path(), &to)?;
            Ok(to)
        });
        let to = self.report(result)?;
        self.rebuild();
        Ok(to)
    }

    /// カーソル行のファイルを同じディレクトリに複製
    pub fn copy(&mut self, new_name: &str) -> Result<PathBuf> {
        let item = self.target_item()?;
        let result = self.child_path(new_name).and_then(|to| {
            self.provider.file_system().copy_file(&item.path(), &to)?;
            Ok(to)
        });
        let to = self.report(result)?;
        self.rebuild();
        Ok(to)
    }

    fn remove(&self, item: &FileItem) -> Result<()> {
        let fs = self.provider.file_system();
        if item.is_directory {
            fs.remove_dir(&item.path())
        } else {
            fs.remove_file(&item.path())
        }
    }

    /// カーソル行のエントリを削除（ディレクトリは空のときのみ）
    pub fn delete(&mut self) -> Result<PathBuf> {
        let item = self.target_item()?;
        let result = self.remove(&item);
        self.report(result)?;
        self.rebuild();
        Ok(item.path())
    }

    /// 選択中のエントリをすべて削除し、削除できたパスを返す
    pub fn delete_selected(&mut self) -> Result<Vec<PathBuf>> {
        let result = listing::selected_items(&self.view.lines()).map_err(DiredError::from);
        let items = self.report(result)?;

        let mut removed = Vec::new();
        for item in items.iter().filter(|item| !item.is_dot_entry()) {
            let result = self.remove(item);
            if self.report(result).is_ok() {
                removed.push(item.path());
            }
        }
        self.rebuild();
        Ok(removed)
    }

    /// 選択ジェスチャー
    pub fn select(&mut self) -> Result<SelectionTarget> {
        self.set_selection(true)
    }

    /// 選択解除ジェスチャー
    pub fn unselect(&mut self) -> Result<SelectionTarget> {
        self.set_selection(false)
    }

    fn set_selection(&mut self, value: bool) -> Result<SelectionTarget> {
        let result = selection::apply_selection(&mut self.view, value).map_err(DiredError::from);
        let target = self.report(result)?;
        let uri = self.uri();
        self.provider.update(&uri, self.view.lines());
        Ok(target)
    }

    /// 選択中のエントリ
    pub fn selected_items(&mut self) -> Result<Vec<FileItem>> {
        let result = listing::selected_items(&self.view.lines()).map_err(DiredError::from);
        self.report(result)
    }
}

impl std::fmt::Debug for DiredSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiredSession")
            .field("dir", &self.dir)
            .field("show_dot_files", &self.show_dot_files)
            .field("cursor", &self.view.cursor_line())
            .finish()
    }
}
