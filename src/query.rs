//! クエリモジュール
//!
//! 取り込んだスコアCSVと画像ディレクトリを突き合わせ、
//! 照合レポートと最良マッチを組み立てるオーケストレーション層。

use crate::error::{PhotoMatchError, Result};
use crate::index::{EmptyFragment, ImageIndex};
use crate::matcher::{self, BestMatch, ImageReport};
use crate::store::ImportStore;
use crate::table::ScoreTable;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

const RECORD_FILE_NAME: &str = "query.json";

/// インポートディレクトリに永続化するレコード
///
/// 取り込み時のファイル名と日時を保持する。壊れていたり
/// 存在しない場合は読み込みに失敗せず None 扱いとする。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRecord {
    /// 取り込んだCSVのファイル名
    pub filename: String,
    /// 取り込み日時
    pub created_at: String,
}

impl QueryRecord {
    /// レコードファイルを読み込み
    pub fn load(dir: &Path) -> Option<Self> {
        let record_path = dir.join(RECORD_FILE_NAME);
        if !record_path.exists() {
            return None;
        }

        let file = match File::open(&record_path) {
            Ok(f) => f,
            Err(_) => return None,
        };

        let reader = BufReader::new(file);
        serde_json::from_reader(reader).ok()
    }

    /// レコードファイルを保存
    pub fn save(&self, dir: &Path) -> Result<()> {
        let record_path = dir.join(RECORD_FILE_NAME);
        let file = File::create(record_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

/// 1ソース分の照合結果
///
/// スコア表の解析、画像の存在確認、最良マッチの選定までを
/// 終えた状態を表す。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    /// ソース識別子
    pub source_name: String,
    /// 取り込んだCSVのファイル名
    pub filename: String,
    /// 取り込み日時
    pub created_at: String,
    /// 画像の存在レポート
    pub report: ImageReport,
    /// 対象画像 → 最良マッチ
    pub matches: BTreeMap<String, BestMatch>,
}

impl Query {
    /// インポート済みのCSVを開いて照合を実行する
    ///
    /// 未インポートの場合は `MissingSource` を返す。
    pub fn open(store: &ImportStore, filename: &str, policy: EmptyFragment) -> Result<Self> {
        let source = ImportStore::source_name(filename);
        if !store.import_exists(&source, filename) {
            return Err(PhotoMatchError::MissingSource(source));
        }
        Self::run(store, &source, filename, policy)
    }

    /// アップロードされたCSVを取り込んで照合を実行する
    pub fn import(
        store: &ImportStore,
        filename: &str,
        uploaded: &Path,
        policy: EmptyFragment,
    ) -> Result<Self> {
        if !uploaded.is_file() {
            return Err(PhotoMatchError::FileNotFound(
                uploaded.display().to_string(),
            ));
        }

        let source = ImportStore::source_name(filename);
        store.bootstrap(&source)?;
        store.adopt_upload(&source, filename, uploaded)?;
        Self::run(store, &source, filename, policy)
    }

    /// インポート済みならそれを開き、なければ取り込む
    ///
    /// 既存データがある場合、アップロードファイルは無視される。
    pub fn load_or_import(
        store: &ImportStore,
        filename: &str,
        uploaded: Option<&Path>,
        policy: EmptyFragment,
    ) -> Result<Self> {
        let source = ImportStore::source_name(filename);
        if store.import_exists(&source, filename) {
            return Self::run(store, &source, filename, policy);
        }

        match uploaded {
            Some(path) => Self::import(store, filename, path, policy),
            None => Err(PhotoMatchError::MissingSource(source)),
        }
    }

    /// ソース識別子から照合を実行する
    ///
    /// レコードのファイル名を優先し、なければディレクトリ内の
    /// CSVを探す。どちらも無ければ `MissingSource`。
    pub fn open_source(store: &ImportStore, source: &str, policy: EmptyFragment) -> Result<Self> {
        let import_dir = store.import_dir(source);
        if !import_dir.is_dir() {
            return Err(PhotoMatchError::MissingSource(source.to_string()));
        }

        let filename = match QueryRecord::load(&import_dir) {
            Some(record) => record.filename,
            None => {
                let csv = store
                    .find_csv(source)
                    .ok_or_else(|| PhotoMatchError::MissingSource(source.to_string()))?;
                csv.file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .ok_or_else(|| PhotoMatchError::MissingSource(source.to_string()))?
            }
        };

        Self::run(store, source, &filename, policy)
    }

    /// 対象画像と参照画像がすべて揃っているか
    pub fn all_images_exist(&self) -> bool {
        self.report.all_images_exist()
    }

    /// 照合パイプライン本体
    ///
    /// レコードを確定し、スコア表を読み、画像索引を1回だけ構築して
    /// 存在レポートと最良マッチを得る。
    fn run(store: &ImportStore, source: &str, filename: &str, policy: EmptyFragment) -> Result<Self> {
        let import_dir = store.import_dir(source);
        let record = Self::ensure_record(&import_dir, filename)?;

        let csv_path = store.import_file(source, &record.filename);
        if !csv_path.is_file() {
            return Err(PhotoMatchError::FileNotFound(csv_path.display().to_string()));
        }

        let table = ScoreTable::from_csv(&csv_path)?;
        if table.is_empty() {
            return Err(PhotoMatchError::MissingSource(record.filename.clone()));
        }

        let index = ImageIndex::build_with_policy(&store.images_dir(source), policy);
        let report = matcher::resolve_images(&table, &index);
        let matches = matcher::select_best_matches(&table, &index);

        Ok(Self {
            source_name: source.to_string(),
            filename: record.filename,
            created_at: record.created_at,
            report,
            matches,
        })
    }

    /// レコードを読み込み、なければ作成して保存する
    ///
    /// 既存レコードのファイル名が引数より優先される。
    fn ensure_record(import_dir: &Path, filename: &str) -> Result<QueryRecord> {
        if let Some(record) = QueryRecord::load(import_dir) {
            return Ok(record);
        }

        let record = QueryRecord {
            filename: filename.to_string(),
            created_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };
        record.save(import_dir)?;
        Ok(record)
    }
}
