//! `ls -l` 形式のモード文字列（10文字）

/// ファイル種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    Fifo,
    Socket,
    CharDevice,
    BlockDevice,
    Unknown,
}

impl EntryKind {
    /// モード文字列の先頭文字
    pub fn type_char(self) -> char {
        match self {
            EntryKind::File => '-',
            EntryKind::Directory => 'd',
            EntryKind::Symlink => 'l',
            EntryKind::Fifo => 'p',
            EntryKind::Socket => 's',
            EntryKind::CharDevice => 'c',
            EntryKind::BlockDevice => 'b',
            EntryKind::Unknown => '?',
        }
    }

    /// メタデータから種別を判定（symlink_metadata を想定）
    pub fn from_file_type(file_type: &std::fs::FileType) -> Self {
        if file_type.is_dir() {
            return EntryKind::Directory;
        }
        if file_type.is_file() {
            return EntryKind::File;
        }
        if file_type.is_symlink() {
            return EntryKind::Symlink;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;
            if file_type.is_fifo() {
                return EntryKind::Fifo;
            }
            if file_type.is_socket() {
                return EntryKind::Socket;
            }
            if file_type.is_char_device() {
                return EntryKind::CharDevice;
            }
            if file_type.is_block_device() {
                return EntryKind::BlockDevice;
            }
        }

        EntryKind::Unknown
    }
}

/// 種別と権限ビットからモード文字列を組み立てる
///
/// setuid / setgid / sticky は実行ビットの位置に `s` `S` `t` `T` で表す
pub fn mode_string(kind: EntryKind, mode: u32) -> String {
    let mut chars = [kind.type_char(), '-', '-', '-', '-', '-', '-', '-', '-', '-'];
    let shifts = [6, 3, 0];
    for (i, &shift) in shifts.iter().enumerate() {
        let base = 1 + i * 3;
        if (mode >> (shift + 2)) & 1 != 0 {
            chars[base] = 'r';
        }
        if (mode >> (shift + 1)) & 1 != 0 {
            chars[base + 1] = 'w';
        }
        if (mode >> shift) & 1 != 0 {
            chars[base + 2] = 'x';
        }
    }

    let special = [(0o4000, 3, 's'), (0o2000, 6, 's'), (0o1000, 9, 't')];
    for (bit, index, lower) in special {
        if mode & bit != 0 {
            chars[index] = if chars[index] == 'x' {
                lower
            } else {
                lower.to_ascii_uppercase()
            };
        }
    }

    chars.iter().collect()
}
