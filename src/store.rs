//! インポート保存先モジュール
//!
//! ソース識別子ごとのディレクトリ配置を決め、
//! アップロードされたスコアCSVの取り込みと一覧を担う。

use crate::error::Result;
use std::path::{Path, PathBuf};

/// インポートデータの置き場所
///
/// `<ルート>/<ソース識別子>/` に取り込んだCSVとクエリレコードを、
/// その下の `images/` に照合対象の画像を置く。
#[derive(Debug, Clone)]
pub struct ImportStore {
    root: PathBuf,
}

impl ImportStore {
    /// 保存先ルートを指定して作成
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// ファイル名からソース識別子を導出する
    ///
    /// 拡張子を除き、小文字化し、英数字以外は '_' に置き換える。
    /// 同じファイル名からは常に同じ識別子が得られる。
    pub fn source_name(filename: &str) -> String {
        let stem = Path::new(filename)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| filename.to_string());

        stem.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect()
    }

    /// ソースのインポートディレクトリ
    pub fn import_dir(&self, source: &str) -> PathBuf {
        self.root.join(source)
    }

    /// ソースの画像ディレクトリ
    pub fn images_dir(&self, source: &str) -> PathBuf {
        self.import_dir(source).join("images")
    }

    /// 取り込んだCSVの置き場所
    pub fn import_file(&self, source: &str, filename: &str) -> PathBuf {
        self.import_dir(source).join(filename)
    }

    /// ソースがインポート済みか
    pub fn import_exists(&self, source: &str, filename: &str) -> bool {
        self.import_file(source, filename).is_file()
    }

    /// インポートディレクトリを用意する
    pub fn bootstrap(&self, source: &str) -> Result<()> {
        std::fs::create_dir_all(self.import_dir(source))?;
        Ok(())
    }

    /// アップロードされたCSVを取り込み先へ複製する
    ///
    /// 元ファイルはアップロード一時ファイルとは限らないため消さない。
    pub fn adopt_upload(&self, source: &str, filename: &str, uploaded: &Path) -> Result<PathBuf> {
        let dest = self.import_file(source, filename);
        std::fs::copy(uploaded, &dest)?;
        Ok(dest)
    }

    /// インポートディレクトリ内のCSVを探す（名前順で最初の1件）
    pub fn find_csv(&self, source: &str) -> Option<PathBuf> {
        let mut csvs = Vec::new();

        if let Ok(entries) = std::fs::read_dir(self.import_dir(source)) {
            for entry in entries.flatten() {
                let path = entry.path();
                let is_csv = path
                    .extension()
                    .map(|e| e.eq_ignore_ascii_case("csv"))
                    .unwrap_or(false);
                if is_csv {
                    csvs.push(path);
                }
            }
        }

        csvs.sort();
        csvs.into_iter().next()
    }

    /// インポート済みソースの一覧（名前順）
    pub fn list_imports(&self) -> Vec<String> {
        let mut sources = Vec::new();

        if let Ok(entries) = std::fs::read_dir(&self.root) {
            for entry in entries.flatten() {
                if entry.path().is_dir() {
                    sources.push(entry.file_name().to_string_lossy().to_string());
                }
            }
        }

        sources.sort();
        sources
    }

    /// 保存先ルート
    pub fn root(&self) -> &Path {
        &self.root
    }
}
