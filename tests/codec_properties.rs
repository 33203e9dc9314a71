//! Listing codec property tests
//!
//! Exercise the public encode/decode and select_range functions over generated
//! entries so the fixed-column format stays lossless across edits.

use altre_dired::dired::codec::{self, NAME_COLUMN, SIZE_COLUMNS};
use altre_dired::dired::{build_buffer, select_range, FileItem};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

fn short_name() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_-]{0,7}"
}

fn entry_name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z0-9_][A-Za-z0-9_. -]{0,20}",
        "\\.[a-z]{1,8}",
        Just(".".to_string()),
        Just("..".to_string()),
    ]
}

prop_compose! {
    fn file_item()(
        name in entry_name(),
        is_directory in any::<bool>(),
        owner in short_name(),
        group in short_name(),
        size in 0u64..100_000_000,
        month in 1u32..=12,
        day in 1u32..=31,
        hour in 0u32..24,
        minute in 0u32..60,
        perms in "[r-][w-][x-][r-][w-][x-][r-][w-][x-]",
        selected in any::<bool>(),
    ) -> FileItem {
        let type_char = if is_directory { 'd' } else { '-' };
        FileItem {
            dir_path: "/prop".to_string(),
            name,
            is_directory,
            is_file: !is_directory,
            owner,
            group,
            size,
            month,
            day,
            hour,
            minute,
            mode: format!("{}{}", type_char, perms),
            selected,
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn decode_recovers_encoded_entry(item in file_item()) {
        let line = codec::encode(&item);
        let decoded = codec::decode(item.dir_path.clone(), &line).unwrap();

        // ディレクトリ名は末尾 `/` 付きで戻る
        if item.is_directory {
            prop_assert_eq!(decoded.name.clone(), format!("{}/", item.name));
        }
        prop_assert_eq!(decoded.without_trailing_slash(), item);
    }

    #[test]
    fn fixed_columns_hold_for_small_sizes(item in file_item()) {
        let line = codec::encode(&item);
        let chars: Vec<char> = line.chars().collect();
        prop_assert_eq!(chars[1], ' ');
        prop_assert_eq!(chars[48], ':');
        let name: String = chars[NAME_COLUMN..].iter().collect();
        prop_assert!(name.starts_with(&item.name));
        let size: String = chars[SIZE_COLUMNS].iter().collect();
        prop_assert_eq!(size.trim().parse::<u64>().unwrap(), item.size);
    }

    #[test]
    fn select_range_is_idempotent(
        items in proptest::collection::vec(file_item(), 0..8),
        start in 0usize..10,
        len in 0usize..10,
        value in any::<bool>(),
    ) {
        let lines = build_buffer("/prop", &items, true);
        let once = select_range(&lines, start, start + len, value, false).unwrap();
        let twice = select_range(&once, start, start + len, value, false).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn select_range_never_touches_header_or_dot_entries(
        items in proptest::collection::vec(file_item(), 1..8),
        value in any::<bool>(),
    ) {
        let mut lines = vec!["/prop:".to_string()];
        lines.extend(items.iter().map(codec::encode));

        let updated = select_range(&lines, 0, lines.len(), value, false).unwrap();
        prop_assert_eq!(updated.len(), lines.len());
        prop_assert_eq!(&updated[0], &lines[0]);
        for (index, item) in items.iter().enumerate() {
            let line = index + 1;
            if item.is_dot_entry() {
                prop_assert_eq!(&updated[line], &lines[line]);
            } else {
                // 選択マーカー以外は変わらない
                prop_assert_eq!(&updated[line][1..], &lines[line][1..]);
            }
        }
    }
}

#[test]
fn twelve_char_owner_is_cut_to_eight() {
    let item = FileItem {
        dir_path: "/".to_string(),
        name: "x".to_string(),
        is_directory: false,
        is_file: true,
        owner: "abcdefghijkl".to_string(),
        group: "staff".to_string(),
        size: 5,
        month: 3,
        day: 1,
        hour: 0,
        minute: 0,
        mode: "-rw-r--r--".to_string(),
        selected: false,
    };
    let line = codec::encode(&item);
    assert_eq!(&line[13..21], "abcdefgh");
    assert_eq!(&line[31..39], "       5");
    assert_eq!(&line[40..42], "03");
}
