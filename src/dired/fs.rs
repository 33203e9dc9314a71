//! ファイルシステム操作
//!
//! dired から見たファイルシステムの窓口。実装は OS の呼び出しをそのまま使う

use super::mode::EntryKind;
use crate::error::{FileError, Result};
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

/// 1エントリの stat 結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryStat {
    pub kind: EntryKind,
    /// 権限ビット（Unix 以外では読み取り専用から近似）
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub size: u64,
    pub modified: SystemTime,
}

impl EntryStat {
    pub fn from_metadata(metadata: &std::fs::Metadata) -> Self {
        let kind = EntryKind::from_file_type(&metadata.file_type());

        #[cfg(unix)]
        let (mode, uid, gid) = {
            use std::os::unix::fs::MetadataExt;
            (metadata.mode(), metadata.uid(), metadata.gid())
        };
        #[cfg(not(unix))]
        let (mode, uid, gid) = {
            let mode = if metadata.permissions().readonly() { 0o444 } else { 0o644 };
            (mode, 0, 0)
        };

        Self {
            kind,
            mode,
            uid,
            gid,
            size: metadata.len(),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        }
    }
}

/// dired が使うファイルシステム操作のトレイト
pub trait FileSystem {
    /// ディレクトリ内のエントリ名（ファイルシステムの順序のまま）
    fn read_dir(&self, dir: &Path) -> Result<Vec<String>>;

    /// シンボリックリンクは辿らずに stat
    fn stat(&self, path: &Path) -> Result<EntryStat>;

    fn create_dir(&self, path: &Path) -> Result<()>;

    /// 空ファイルを作成（既存なら失敗）
    fn create_file(&self, path: &Path) -> Result<()>;

    fn remove_file(&self, path: &Path) -> Result<()>;

    /// 空ディレクトリのみ削除
    fn remove_dir(&self, path: &Path) -> Result<()>;

    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    /// 通常ファイルを1つ複製
    fn copy_file(&self, from: &Path, to: &Path) -> Result<()>;
}

/// ローカルディスクの実装
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

fn io_error(path: &Path) -> impl Fn(std::io::Error) -> crate::error::DiredError + '_ {
    move |e| FileError::from_io(&e, path).into()
}

impl FileSystem for LocalFileSystem {
    fn read_dir(&self, dir: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_error(dir))? {
            let entry = entry.map_err(io_error(dir))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn stat(&self, path: &Path) -> Result<EntryStat> {
        let metadata = std::fs::symlink_metadata(path).map_err(io_error(path))?;
        Ok(EntryStat::from_metadata(&metadata))
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        std::fs::create_dir(path).map_err(io_error(path))
    }

    fn create_file(&self, path: &Path) -> Result<()> {
        std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map(|_| ())
            .map_err(io_error(path))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        std::fs::remove_file(path).map_err(io_error(path))
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        std::fs::remove_dir(path).map_err(io_error(path))
    }

    // 確認から rename までの間に作られた同名エントリは上書きされうる
    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        if to.symlink_metadata().is_ok() {
            return Err(FileError::AlreadyExists {
                path: to.display().to_string(),
            }
            .into());
        }
        std::fs::rename(from, to).map_err(io_error(from))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        if !from.is_file() {
            return Err(FileError::InvalidPath {
                path: from.display().to_string(),
            }
            .into());
        }
        let mut source = std::fs::File::open(from).map_err(io_error(from))?;
        let permissions = source.metadata().map_err(io_error(from))?.permissions();
        // 複製先は新規作成のみ
        let mut target = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(to)
            .map_err(io_error(to))?;
        std::io::copy(&mut source, &mut target).map_err(io_error(to))?;
        target.set_permissions(permissions).map_err(io_error(to))
    }
}

/// 絶対パス化（存在しなくても可）
///
/// `.` は落とし、`..` は直前の要素を取り除く。シンボリックリンクは解決しない
pub fn absolute_path(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    normalize(&joined)
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                // ルートより上には行かない
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(component),
            },
            other => normalized.push(other),
        }
    }
    normalized
}
