//! altre-dired - Emacs dired-style directory buffers
//!
//! ディレクトリ一覧を固定カラムのテキストとして描画し、読み戻して操作する

// コアモジュール
pub mod config;
pub mod error;
pub mod logging;

// dired 本体
pub mod dired;

// 公開API
pub use config::DiredConfig;
pub use dired::{DiredProvider, DiredSession, FileItem};
pub use error::{DiredError, Result};

use std::sync::Arc;

/// ローカルファイルシステムと OS のユーザー情報を使うセッションを作る
pub fn local_session(config: &DiredConfig) -> DiredSession {
    let identity = Arc::new(dired::IdentityCache::system());
    let provider = DiredProvider::new(Box::new(dired::LocalFileSystem::new()), identity);
    DiredSession::new(provider, config)
}
