//! 照合モジュール
//!
//! スコア表と画像インデックスを突き合わせ、
//! 画像の所在分類と行ごとの最良マッチを求める。

mod types;

pub use types::{BestMatch, ImageReport};

use crate::index::ImageIndex;
use crate::table::ScoreTable;
use std::collections::BTreeMap;

/// 表の全行を所在分類する
///
/// 比較対象画像は記載名そのままの存在確認。候補識別子は
/// あいまい解決してから存在確認し、解決後の名前で記録する。
/// 表もインデックスも変更しない。
pub fn resolve_images(table: &ScoreTable, index: &ImageIndex) -> ImageReport {
    let mut report = ImageReport::default();

    for row in table.rows() {
        if index.exists(&row.subject_image) {
            report.images.push(row.subject_image.clone());
        } else {
            report.missing_images.push(row.subject_image.clone());
        }
    }

    // 候補集合は表のスキーマ（列ヘッダ）から一度だけ読む
    for candidate in table.candidate_columns() {
        let resolved = index.resolve(candidate);
        if index.exists(&resolved) {
            report.reference_images.push(resolved);
        } else {
            report.missing_reference_images.push(resolved);
        }
    }

    report
}

/// 行ごとに最高スコアの候補を選ぶ
///
/// 厳密な大小比較なので同点は先に現れた候補が残り、
/// スコア0の候補は初期値の空候補を置き換えない。
/// 同じ比較対象画像が複数行にあれば後の行で上書きする。
pub fn select_best_matches(
    table: &ScoreTable,
    index: &ImageIndex,
) -> BTreeMap<String, BestMatch> {
    let mut matches = BTreeMap::new();

    for row in table.rows() {
        let mut highest_score = 0.0_f64;
        let mut best_candidate = "";

        for (candidate, score) in &row.candidate_scores {
            if *score > highest_score {
                highest_score = *score;
                best_candidate = candidate;
            }
        }

        matches.insert(
            row.subject_image.clone(),
            BestMatch {
                image_filename: index.resolve(best_candidate),
                score: highest_score,
            },
        );
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::EmptyFragment;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::write(path, b"dummy").unwrap();
    }

    #[test]
    fn test_resolve_images_classifies_subjects_and_references() {
        let dir = tempdir().expect("Failed to create temp dir");
        touch(&dir.path().join("a.png"));
        touch(&dir.path().join("ref1.png"));

        let table = ScoreTable::from_csv_str(
            "image_filename,ref1.png,ref2.png\na.png,0.9,0.2\nb.png,0.1,0.4\n",
        )
        .unwrap();
        let index = ImageIndex::build(dir.path());

        let report = resolve_images(&table, &index);
        assert_eq!(report.images, vec!["a.png"]);
        assert_eq!(report.missing_images, vec!["b.png"]);
        assert_eq!(report.reference_images, vec!["ref1.png"]);
        assert_eq!(report.missing_reference_images, vec!["ref2.png"]);
        assert!(!report.all_images_exist());
    }

    /// 参照画像は部分一致で解決した後の名前で記録される
    #[test]
    fn test_resolve_images_records_resolved_names() {
        let dir = tempdir().expect("Failed to create temp dir");
        touch(&dir.path().join("2024_ref1_final.png"));

        let table =
            ScoreTable::from_csv_str("image_filename,ref1\na.png,0.9\n").unwrap();
        let index = ImageIndex::build(dir.path());

        let report = resolve_images(&table, &index);
        assert_eq!(report.reference_images, vec!["2024_ref1_final.png"]);
    }

    #[test]
    fn test_resolve_images_subjects_use_exact_names() {
        let dir = tempdir().expect("Failed to create temp dir");
        touch(&dir.path().join("prefix_a.png"));

        // 比較対象画像はあいまい解決しないため部分名では見つからない
        let table =
            ScoreTable::from_csv_str("image_filename,ref1\na.png,0.5\n").unwrap();
        let index = ImageIndex::build(dir.path());

        let report = resolve_images(&table, &index);
        assert_eq!(report.missing_images, vec!["a.png"]);
    }

    #[test]
    fn test_select_best_matches_picks_highest() {
        let dir = tempdir().expect("Failed to create temp dir");
        touch(&dir.path().join("ref2.png"));

        let table = ScoreTable::from_csv_str(
            "image_filename,ref1.png,ref2.png\na.png,0.3,0.8\n",
        )
        .unwrap();
        let index = ImageIndex::build(dir.path());

        let matches = select_best_matches(&table, &index);
        let best = &matches["a.png"];
        assert_eq!(best.image_filename, "ref2.png");
        assert_eq!(best.score, 0.8);
    }

    /// 同点は先に現れた候補が残る
    #[test]
    fn test_select_best_matches_tie_keeps_first() {
        let dir = tempdir().expect("Failed to create temp dir");

        let table =
            ScoreTable::from_csv_str("image_filename,a,b\nx.png,5,5\n").unwrap();
        let index = ImageIndex::build(dir.path());

        let matches = select_best_matches(&table, &index);
        assert_eq!(matches["x.png"].image_filename, "a");
        assert_eq!(matches["x.png"].score, 5.0);
    }

    /// 全スコア0の行は空候補のまま（既定方針では未解決）
    #[test]
    fn test_select_best_matches_all_zero_scores() {
        let dir = tempdir().expect("Failed to create temp dir");
        touch(&dir.path().join("a.png"));

        let table = ScoreTable::from_csv_str(
            "image_filename,ref1.png,ref2.png\nx.png,0,0\n",
        )
        .unwrap();
        let index = ImageIndex::build(dir.path());

        let matches = select_best_matches(&table, &index);
        assert_eq!(matches["x.png"].image_filename, "");
        assert_eq!(matches["x.png"].score, 0.0);
    }

    /// 旧挙動互換では空候補が走査順の先頭画像に解決される
    #[test]
    fn test_select_best_matches_all_zero_first_entry_policy() {
        let dir = tempdir().expect("Failed to create temp dir");
        touch(&dir.path().join("a.png"));
        touch(&dir.path().join("b.png"));

        let table =
            ScoreTable::from_csv_str("image_filename,ref1.png\nx.png,0\n").unwrap();
        let index = ImageIndex::build_with_policy(dir.path(), EmptyFragment::FirstEntry);

        let matches = select_best_matches(&table, &index);
        assert_eq!(matches["x.png"].image_filename, "a.png");
        assert_eq!(matches["x.png"].score, 0.0);
    }

    /// 同じ比較対象画像は後の行が勝つ
    #[test]
    fn test_select_best_matches_duplicate_subject_last_wins() {
        let dir = tempdir().expect("Failed to create temp dir");

        let table = ScoreTable::from_csv_str(
            "image_filename,ref1.png,ref2.png\na.png,0.9,0.1\na.png,0.1,0.6\n",
        )
        .unwrap();
        let index = ImageIndex::build(dir.path());

        let matches = select_best_matches(&table, &index);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches["a.png"].image_filename, "ref2.png");
        assert_eq!(matches["a.png"].score, 0.6);
    }

    #[test]
    fn test_select_best_matches_one_entry_per_row() {
        let dir = tempdir().expect("Failed to create temp dir");

        let table = ScoreTable::from_csv_str(
            "image_filename,ref1.png\na.png,0.1\nb.png,0.2\nc.png,0.3\n",
        )
        .unwrap();
        let index = ImageIndex::build(dir.path());

        let matches = select_best_matches(&table, &index);
        assert_eq!(matches.len(), table.len());
        for row in table.rows() {
            assert!(matches.contains_key(&row.subject_image));
        }
    }
}
