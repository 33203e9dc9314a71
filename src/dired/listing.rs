//! dired バッファの行組み立てと選択範囲の更新
//!
//! バッファは先頭のヘッダー行 `<ディレクトリ>:` と、エントリごとの固定カラム行からなる

use super::codec;
use super::item::FileItem;
use crate::error::FormatError;

/// ヘッダー行の終端
pub const HEADER_SUFFIX: char = ':';
/// ヘッダー行の位置
pub const HEADER_LINE: usize = 0;

/// ヘッダー行を作る
pub fn header_line(dir_path: &str) -> String {
    format!("{}{}", dir_path, HEADER_SUFFIX)
}

/// ヘッダー行からディレクトリパスを取り出す
pub fn dir_from_header(header: &str) -> &str {
    header.strip_suffix(HEADER_SUFFIX).unwrap_or(header)
}

/// 表示対象のエントリか
///
/// `.` と `..` は常に除外。`show_dot_files` が false ならその他の隠しファイルも除外
pub fn is_visible(item: &FileItem, show_dot_files: bool) -> bool {
    if item.is_dot_entry() {
        return false;
    }
    show_dot_files || !item.is_hidden()
}

/// 本文の行を入力順に組み立てる（ソートしない）
pub fn build_listing(items: &[FileItem], show_dot_files: bool) -> Vec<String> {
    items
        .iter()
        .filter(|item| is_visible(item, show_dot_files))
        .map(codec::encode)
        .collect()
}

/// ヘッダー行付きのバッファ全体
pub fn build_buffer(dir_path: &str, items: &[FileItem], show_dot_files: bool) -> Vec<String> {
    let mut lines = Vec::with_capacity(items.len() + 1);
    lines.push(header_line(dir_path));
    lines.extend(build_listing(items, show_dot_files));
    lines
}

/// `[start, end)` の行の選択状態を `value` にして描画し直す
///
/// ヘッダー行は範囲に含まれていても変更しない。`allow_dot_entries` が false なら
/// `.` / `..` の行もそのまま残す。1行でも読めなければ何も変更せずにエラーを返す
pub fn select_range(
    lines: &[String],
    start: usize,
    end: usize,
    value: bool,
    allow_dot_entries: bool,
) -> Result<Vec<String>, FormatError> {
    let mut updated = lines.to_vec();
    let Some(header) = lines.get(HEADER_LINE) else {
        return Ok(updated);
    };
    let dir_path = dir_from_header(header);

    let first = start.max(HEADER_LINE + 1);
    let last = end.min(lines.len());
    for index in first..last {
        let item = codec::decode(dir_path, &lines[index])
            .map_err(|e| e.at_line(index))?
            .without_trailing_slash();

        if item.is_dot_entry() && !allow_dot_entries {
            continue;
        }

        let mut item = item;
        item.set_selected(value);
        updated[index] = codec::encode(&item);
    }

    Ok(updated)
}

/// 本文全体（ヘッダー以外）を選択・解除
pub fn select_all(lines: &[String], value: bool) -> Result<Vec<String>, FormatError> {
    select_range(lines, HEADER_LINE + 1, lines.len(), value, false)
}

/// 選択されている行のエントリ（名前の末尾 `/` は除去済み）
pub fn selected_items(lines: &[String]) -> Result<Vec<FileItem>, FormatError> {
    let Some(header) = lines.get(HEADER_LINE) else {
        return Ok(Vec::new());
    };
    let dir_path = dir_from_header(header);

    let mut selected = Vec::new();
    for (index, line) in lines.iter().enumerate().skip(HEADER_LINE + 1) {
        let item = codec::decode(dir_path, line).map_err(|e| e.at_line(index))?;
        if item.selected {
            selected.push(item.without_trailing_slash());
        }
    }
    Ok(selected)
}
