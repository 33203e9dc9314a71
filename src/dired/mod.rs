//! dired モジュール
//!
//! ディレクトリの内容を編集可能なテキストバッファとして表示する：
//! - 1エントリ = 1行の固定カラム形式（名前は52桁目から）
//! - 先頭行は `<ディレクトリ>:` のヘッダー
//! - 選択状態は行頭の `*` で表し、行を読み戻して更新する
//! - ホストエディタとは `EditorView` のみで接続する

pub mod codec;
pub mod fs;
pub mod identity;
pub mod item;
pub mod listing;
pub mod mode;
pub mod provider;
pub mod selection;
pub mod session;

// 公開API
pub use codec::{decode, encode};
pub use fs::{EntryStat, FileSystem, LocalFileSystem};
pub use identity::{IdentityCache, IdentityResolver};
pub use item::FileItem;
pub use listing::{build_buffer, build_listing, header_line, select_range};
pub use mode::EntryKind;
pub use provider::{path_from_uri, uri_for, DiredProvider, DirectoryReport, RenderedBuffer};
pub use selection::{apply_selection, EditorView, LineBuffer, SelectionTarget};
pub use session::{DiredSession, EnterOutcome};
