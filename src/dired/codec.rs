//! 固定カラム形式のエントリ行コーデック
//!
//! ```text
//! 0 2          13       22       31       40 43 46 49 52
//! * -rw-r--r-- root     staff          42 01 05 09:03 x.txt
//! ```
//!
//! 名前より前はすべて固定幅。ディレクトリは描画時のみ名前に `/` を付け、
//! 読み戻し時はその `/` を名前に含めたまま返す

use super::item::FileItem;
use crate::error::FormatError;
use std::fmt::Display;
use std::ops::Range;

/// 選択マーカーの位置
pub const SELECTION_COLUMN: usize = 0;
/// モード文字列
pub const MODE_COLUMNS: Range<usize> = 2..12;
/// 所有者名
pub const OWNER_COLUMNS: Range<usize> = 13..21;
/// グループ名
pub const GROUP_COLUMNS: Range<usize> = 22..30;
/// サイズ（右寄せ）
pub const SIZE_COLUMNS: Range<usize> = 31..39;
pub const MONTH_COLUMNS: Range<usize> = 40..42;
pub const DAY_COLUMNS: Range<usize> = 43..45;
pub const HOUR_COLUMNS: Range<usize> = 46..48;
pub const MINUTE_COLUMNS: Range<usize> = 49..51;
/// 名前の開始位置（行末まで）
pub const NAME_COLUMN: usize = 52;

/// 所有者・グループ欄の幅
pub const NAME_FIELD_WIDTH: usize = 8;
/// サイズ欄の最小幅
pub const SIZE_FIELD_WIDTH: usize = 8;
/// 月日時分欄の最小幅
pub const TIME_FIELD_WIDTH: usize = 2;

pub const SELECTED_MARKER: char = '*';
pub const UNSELECTED_MARKER: char = ' ';
pub const DIRECTORY_SUFFIX: char = '/';

/// 空白を足してから先頭 `NAME_FIELD_WIDTH` 文字を取る。長い名前は切り詰められる
pub fn fit_name_field(name: &str) -> String {
    name.chars()
        .chain(std::iter::repeat(' ').take(NAME_FIELD_WIDTH))
        .take(NAME_FIELD_WIDTH)
        .collect()
}

/// 幅に満たない分だけ `pad` を前に足す。幅を超える値は切り詰めない
pub fn pad_start(value: impl Display, width: usize, pad: char) -> String {
    let digits = value.to_string();
    let missing = width.saturating_sub(digits.chars().count());
    let mut padded: String = std::iter::repeat(pad).take(missing).collect();
    padded.push_str(&digits);
    padded
}

/// エントリを1行に変換
pub fn encode(item: &FileItem) -> String {
    let marker = if item.selected {
        SELECTED_MARKER
    } else {
        UNSELECTED_MARKER
    };
    let mut line = format!(
        "{} {} {} {} {} {} {} {}:{} {}",
        marker,
        item.mode,
        fit_name_field(&item.owner),
        fit_name_field(&item.group),
        pad_start(item.size, SIZE_FIELD_WIDTH, ' '),
        pad_start(item.month, TIME_FIELD_WIDTH, '0'),
        pad_start(item.day, TIME_FIELD_WIDTH, '0'),
        pad_start(item.hour, TIME_FIELD_WIDTH, '0'),
        pad_start(item.minute, TIME_FIELD_WIDTH, '0'),
        item.name,
    );
    if item.is_directory {
        line.push(DIRECTORY_SUFFIX);
    }
    line
}

/// 1行をエントリに戻す
///
/// 名前は `NAME_COLUMN` 以降をそのまま使うので、ディレクトリなら末尾 `/` が残る
pub fn decode(dir_path: impl Into<String>, line: &str) -> Result<FileItem, FormatError> {
    let columns = Columns::new(line);
    if columns.len() < NAME_COLUMN {
        return Err(FormatError::TooShort {
            len: columns.len(),
            min: NAME_COLUMN,
        });
    }

    let type_char = columns.char_at(MODE_COLUMNS.start);

    Ok(FileItem {
        dir_path: dir_path.into(),
        name: columns.tail(NAME_COLUMN).to_string(),
        is_directory: type_char == Some('d'),
        is_file: type_char == Some('-'),
        owner: columns.slice(OWNER_COLUMNS).trim_end().to_string(),
        group: columns.slice(GROUP_COLUMNS).trim_end().to_string(),
        size: parse_number("size", columns.slice(SIZE_COLUMNS))?,
        month: parse_number("month", columns.slice(MONTH_COLUMNS))?,
        day: parse_number("day", columns.slice(DAY_COLUMNS))?,
        hour: parse_number("hour", columns.slice(HOUR_COLUMNS))?,
        minute: parse_number("minute", columns.slice(MINUTE_COLUMNS))?,
        mode: columns.slice(MODE_COLUMNS).to_string(),
        selected: columns.char_at(SELECTION_COLUMN) == Some(SELECTED_MARKER),
    })
}

fn parse_number<T: std::str::FromStr>(field: &'static str, text: &str) -> Result<T, FormatError> {
    text.trim().parse().map_err(|_| FormatError::InvalidNumber {
        field,
        value: text.to_string(),
    })
}

/// 文字単位のカラム位置でスライスするためのビュー
struct Columns<'a> {
    line: &'a str,
    /// 各文字の開始バイト位置と末尾
    offsets: Vec<usize>,
}

impl<'a> Columns<'a> {
    fn new(line: &'a str) -> Self {
        let offsets = line
            .char_indices()
            .map(|(index, _)| index)
            .chain(std::iter::once(line.len()))
            .collect();
        Self { line, offsets }
    }

    fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    fn slice(&self, range: Range<usize>) -> &'a str {
        &self.line[self.offsets[range.start]..self.offsets[range.end]]
    }

    fn tail(&self, start: usize) -> &'a str {
        &self.line[self.offsets[start]..]
    }

    fn char_at(&self, column: usize) -> Option<char> {
        self.line[self.offsets[column]..].chars().next()
    }
}
