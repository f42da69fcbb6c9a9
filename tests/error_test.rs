//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use photo_match_rust::error::PhotoMatchError;
use photo_match_rust::index::EmptyFragment;
use photo_match_rust::query::Query;
use photo_match_rust::store::ImportStore;
use photo_match_rust::table::ScoreTable;
use std::path::Path;
use tempfile::tempdir;

/// PhotoMatchErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        PhotoMatchError::Config("テスト設定エラー".to_string()),
        PhotoMatchError::FileNotFound("test.csv".to_string()),
        PhotoMatchError::MissingSource("results".to_string()),
        PhotoMatchError::InvalidTable("2行目".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// エラーのDebug実装確認
#[test]
fn test_error_debug() {
    let err = PhotoMatchError::Config("テスト".to_string());
    let debug = format!("{:?}", err);

    assert!(debug.contains("Config"));
    assert!(debug.contains("テスト"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: PhotoMatchError = io_err.into();

    assert!(matches!(err, PhotoMatchError::Io(_)));
    let display = format!("{}", err);
    assert!(display.contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: PhotoMatchError = json_err.into();

    assert!(matches!(err, PhotoMatchError::JsonParse(_)));
}

/// 存在しないアップロードファイルを取り込んだ場合
#[test]
fn test_import_missing_upload() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = ImportStore::new(dir.path());

    let result = Query::import(
        &store,
        "missing.csv",
        Path::new("/nonexistent/missing.csv"),
        EmptyFragment::Unresolved,
    );

    assert!(matches!(
        result.unwrap_err(),
        PhotoMatchError::FileNotFound(_)
    ));
}

/// 未インポートのファイルを開いた場合
#[test]
fn test_open_unimported() {
    let dir = tempdir().expect("Failed to create temp dir");
    let store = ImportStore::new(dir.path());

    let result = Query::open(&store, "ghost.csv", EmptyFragment::Unresolved);
    let err = result.unwrap_err();

    assert!(matches!(err, PhotoMatchError::MissingSource(_)));
    // メッセージにはソース識別子が入る
    assert!(format!("{}", err).contains("ghost"));
}

/// 数値でないスコア列は表形式エラー
#[test]
fn test_invalid_score_cell() {
    let result = ScoreTable::from_csv_str("image_filename,ref1.png\na.png,abc\n");
    let err = result.unwrap_err();

    assert!(matches!(err, PhotoMatchError::InvalidTable(_)));
    let display = format!("{}", err);
    assert!(display.contains("ref1.png"));
    assert!(display.contains("abc"));
}

/// 存在しないCSVファイルを読んだ場合
#[test]
fn test_table_from_missing_file() {
    let result = ScoreTable::from_csv(Path::new("/nonexistent/scores.csv"));
    assert!(matches!(result.unwrap_err(), PhotoMatchError::Io(_)));
}
