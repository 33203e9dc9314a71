//! dired バッファの内容提供
//!
//! ディレクトリを読み込んでバッファを組み立て、URI ごとに保持する。
//! 再構築は「置き換えてから通知」を1ステップで行う

use super::fs::FileSystem;
use super::identity::IdentityResolver;
use super::item::{FileItem, PARENT_ENTRY, SELF_ENTRY};
use super::listing;
use crate::error::DiredError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// dired バッファの URI スキーム
pub const URI_SCHEME: &str = "dired";

/// ディレクトリに対応する URI
pub fn uri_for(dir: &Path) -> String {
    format!("{}://{}", URI_SCHEME, dir.display())
}

/// URI からディレクトリパスを取り出す
pub fn path_from_uri(uri: &str) -> Option<PathBuf> {
    uri.strip_prefix(URI_SCHEME)
        .and_then(|rest| rest.strip_prefix("://"))
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
}

/// リスナーの一意識別子
pub type ListenerId = usize;

/// ディレクトリ読み込み結果
#[derive(Debug, Clone, Default)]
pub struct DirectoryReport {
    /// `.` と `..` を先頭に、ファイルシステムの順序で並んだエントリ
    pub items: Vec<FileItem>,
    /// 読み込み中の警告（エントリ単位の stat 失敗、ディレクトリ読み込み失敗）
    pub warnings: Vec<DiredError>,
}

/// 描画結果
#[derive(Debug, Clone)]
pub struct RenderedBuffer {
    pub uri: String,
    pub lines: Vec<String>,
    pub warnings: Vec<DiredError>,
}

/// バッファ内容の提供者
pub struct DiredProvider {
    fs: Box<dyn FileSystem>,
    identity: Arc<dyn IdentityResolver>,
    documents: HashMap<String, Vec<String>>,
    listeners: Vec<(ListenerId, Box<dyn FnMut(&str)>)>,
    next_listener_id: ListenerId,
}

impl DiredProvider {
    pub fn new(fs: Box<dyn FileSystem>, identity: Arc<dyn IdentityResolver>) -> Self {
        Self {
            fs,
            identity,
            documents: HashMap::new(),
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    pub fn file_system(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    /// 変更通知を購読
    pub fn on_did_change(&mut self, listener: impl FnMut(&str) + 'static) -> ListenerId {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// ディレクトリを読み込む
    ///
    /// 個々のエントリの失敗は警告として残し、そのエントリだけを除外する
    pub fn read_directory(&self, dir: &Path) -> DirectoryReport {
        let dir_path = dir.display().to_string();
        let mut report = DirectoryReport::default();

        let names = match self.fs.read_dir(dir) {
            Ok(names) => names,
            Err(e) => {
                log::warn!("cannot read {}: {}", dir_path, e);
                report.warnings.push(DiredError::DirectoryRead {
                    path: dir_path,
                    message: e.to_string(),
                });
                return report;
            }
        };

        let pseudo = [SELF_ENTRY, PARENT_ENTRY].into_iter().map(str::to_string);
        for name in pseudo.chain(names) {
            let path = dir.join(&name);
            match self.fs.stat(&path) {
                Ok(stat) => report.items.push(FileItem::from_stat(
                    dir_path.clone(),
                    name,
                    &stat,
                    self.identity.as_ref(),
                )),
                Err(e) => {
                    log::warn!("skipping {}: {}", path.display(), e);
                    report.warnings.push(DiredError::Stat {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        report
    }

    /// ディレクトリを描画して保持し、購読者へ通知する
    pub fn render(&mut self, dir: &Path, show_dot_files: bool) -> RenderedBuffer {
        let report = self.read_directory(dir);
        let lines = listing::build_buffer(&dir.display().to_string(), &report.items, show_dot_files);
        let uri = uri_for(dir);
        log::debug!("rebuilt {} ({} lines)", uri, lines.len());

        self.update(&uri, lines.clone());
        RenderedBuffer {
            uri,
            lines,
            warnings: report.warnings,
        }
    }

    /// 行を置き換えて通知（選択操作の結果などを反映）
    pub fn update(&mut self, uri: &str, lines: Vec<String>) {
        self.documents.insert(uri.to_string(), lines);
        for (_, listener) in self.listeners.iter_mut() {
            listener(uri);
        }
    }

    /// 保持している行
    pub fn lines(&self, uri: &str) -> Option<&[String]> {
        self.documents.get(uri).map(Vec::as_slice)
    }

    /// エディタに渡すテキスト
    pub fn provide_content(&self, uri: &str) -> Option<String> {
        self.documents.get(uri).map(|lines| lines.join("\n"))
    }

    /// バッファを閉じる
    pub fn close(&mut self, uri: &str) -> bool {
        self.documents.remove(uri).is_some()
    }
}

impl std::fmt::Debug for DiredProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiredProvider")
            .field("documents", &self.documents.keys().collect::<Vec<_>>())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
