//! 選択操作（ホストエディタとの境界）
//!
//! ホストから受け取るのはカーソル行・選択範囲・全行、返すのは「全行の置き換え」のみ

use super::listing::{self, HEADER_LINE};
use crate::error::FormatError;
use std::ops::Range;

/// dired が必要とするエディタ側の最小インターフェース
pub trait EditorView {
    /// カーソルのある行
    fn cursor_line(&self) -> usize;

    /// アクティブな選択範囲（行単位、終端は含まない）。空なら None
    fn selection(&self) -> Option<Range<usize>>;

    /// ドキュメントの全行
    fn lines(&self) -> Vec<String>;

    /// 全行を置き換える
    fn replace_lines(&mut self, lines: Vec<String>);

    /// カーソルを移動する（範囲外は呼び出し側で丸める）
    fn set_cursor_line(&mut self, line: usize);
}

/// エディタなしで使うメモリ上のビュー
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<String>,
    cursor: usize,
    selection: Option<Range<usize>>,
}

impl LineBuffer {
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines,
            cursor: 0,
            selection: None,
        }
    }

    /// 行単位の選択範囲を設定（`start == end` は解除）
    pub fn set_selection(&mut self, range: Option<Range<usize>>) {
        self.selection = range.filter(|range| range.start < range.end);
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

impl EditorView for LineBuffer {
    fn cursor_line(&self) -> usize {
        self.cursor
    }

    fn selection(&self) -> Option<Range<usize>> {
        self.selection.clone()
    }

    fn lines(&self) -> Vec<String> {
        self.lines.clone()
    }

    fn replace_lines(&mut self, lines: Vec<String>) {
        self.lines = lines;
    }

    fn set_cursor_line(&mut self, line: usize) {
        self.cursor = line;
    }
}

/// 選択操作の対象
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionTarget {
    /// ヘッダー行から：本文すべて
    All,
    /// 本文の1行：その行のみ、カーソルは1行下へ
    Line(usize),
    /// アクティブな範囲内の行
    Range(Range<usize>),
}

/// カーソルと選択範囲から対象を決める
pub fn selection_target(view: &dyn EditorView) -> SelectionTarget {
    match view.selection() {
        Some(range) if range.start < range.end => SelectionTarget::Range(range),
        _ if view.cursor_line() == HEADER_LINE => SelectionTarget::All,
        _ => SelectionTarget::Line(view.cursor_line()),
    }
}

/// 選択・解除のジェスチャーを適用する
///
/// 行が読めない場合はバッファを変更せずにエラーを返す
pub fn apply_selection(view: &mut dyn EditorView, value: bool) -> Result<SelectionTarget, FormatError> {
    let target = selection_target(view);
    let lines = view.lines();

    let updated = match &target {
        SelectionTarget::All => listing::select_all(&lines, value)?,
        SelectionTarget::Line(line) => listing::select_range(&lines, *line, line + 1, value, true)?,
        SelectionTarget::Range(range) => {
            listing::select_range(&lines, range.start, range.end, value, false)?
        }
    };
    view.replace_lines(updated);

    if let SelectionTarget::Line(line) = target {
        let last = view.lines().len().saturating_sub(1);
        view.set_cursor_line((line + 1).min(last));
    }

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dired::codec;
    use crate::dired::item::FileItem;

    fn line(name: &str) -> String {
        codec::encode(&FileItem {
            dir_path: "/d".to_string(),
            name: name.to_string(),
            is_directory: false,
            is_file: true,
            owner: "me".to_string(),
            group: "me".to_string(),
            size: 1,
            month: 2,
            day: 3,
            hour: 4,
            minute: 5,
            mode: "-rw-------".to_string(),
            selected: false,
        })
    }

    fn buffer() -> LineBuffer {
        LineBuffer::new(vec!["/d:".to_string(), line("a"), line("b"), line("c")])
    }

    fn marks(view: &LineBuffer) -> Vec<bool> {
        view.lines().iter().skip(1).map(|l| l.starts_with('*')).collect()
    }

    #[test]
    fn test_header_cursor_selects_all() {
        let mut view = buffer();
        let target = apply_selection(&mut view, true).unwrap();

        assert_eq!(target, SelectionTarget::All);
        assert_eq!(marks(&view), vec![true, true, true]);
        assert_eq!(view.cursor_line(), 0);
        assert_eq!(view.lines()[0], "/d:");
    }

    #[test]
    fn test_body_cursor_toggles_one_and_advances() {
        let mut view = buffer();
        view.set_cursor_line(2);

        apply_selection(&mut view, true).unwrap();
        assert_eq!(marks(&view), vec![false, true, false]);
        assert_eq!(view.cursor_line(), 3);

        // 最終行ではそれ以上進まない
        apply_selection(&mut view, true).unwrap();
        assert_eq!(view.cursor_line(), 3);
        assert_eq!(marks(&view), vec![false, true, true]);
    }

    #[test]
    fn test_active_range_selects_within() {
        let mut view = buffer();
        view.set_cursor_line(3);
        view.set_selection(Some(1..3));

        let target = apply_selection(&mut view, true).unwrap();
        assert_eq!(target, SelectionTarget::Range(1..3));
        assert_eq!(marks(&view), vec![true, true, false]);
        assert_eq!(view.cursor_line(), 3);
    }

    #[test]
    fn test_unselect_all() {
        let mut view = buffer();
        apply_selection(&mut view, true).unwrap();
        apply_selection(&mut view, false).unwrap();
        assert_eq!(marks(&view), vec![false, false, false]);
    }

    #[test]
    fn test_empty_selection_is_ignored() {
        let mut view = buffer();
        view.set_selection(Some(2..2));
        assert_eq!(selection_target(&view), SelectionTarget::All);
    }

    #[test]
    fn test_corrupted_line_leaves_view_untouched() {
        let mut view = buffer();
        let mut lines = view.lines();
        lines[2] = "garbage".to_string();
        view.replace_lines(lines.clone());

        assert!(apply_selection(&mut view, true).is_err());
        assert_eq!(view.lines(), lines);
    }
}
