//! 画像インデックスモジュール
//!
//! クエリの画像ディレクトリを構築時に一度だけ走査し、
//! 「このファイルは実在するか」「この断片を含むパスはどれか」に答える。
//! 以後は読み取り専用で、クエリ間で共有しない。

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 対象とする画像拡張子（大文字小文字は区別しない）
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// 空の断片を解決するときの方針
///
/// 部分一致では空の断片がすべてのエントリに一致してしまうため、
/// どちらの挙動にするかを呼び出し側が選ぶ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyFragment {
    /// 空の断片は未解決のまま返す
    #[default]
    Unresolved,
    /// 空の断片を走査順の先頭エントリに解決する（部分一致の旧挙動）
    FirstEntry,
}

/// 画像ディレクトリのインデックス
#[derive(Debug, Clone)]
pub struct ImageIndex {
    root: PathBuf,
    /// ルートからの相対パス（走査順）
    entries: Vec<String>,
    empty_fragment: EmptyFragment,
}

impl ImageIndex {
    /// ルート以下を走査してインデックスを構築する（既定方針）
    pub fn build(root: &Path) -> Self {
        Self::build_with_policy(root, EmptyFragment::default())
    }

    /// 方針を指定してインデックスを構築する
    ///
    /// 再帰的に走査し、隠しファイルと画像以外の拡張子を除外する。
    /// ディレクトリごとにファイル名順で走査するため、同じ内容なら
    /// 常に同じ順序になる。ルートが存在しなければ空のインデックスになる。
    pub fn build_with_policy(root: &Path, empty_fragment: EmptyFragment) -> Self {
        let mut entries = Vec::new();

        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            if is_hidden(path) || !has_image_extension(path) {
                continue;
            }

            if let Ok(relative) = path.strip_prefix(root) {
                entries.push(relative.to_string_lossy().to_string());
            }
        }

        Self {
            root: root.to_path_buf(),
            entries,
            empty_fragment,
        }
    }

    /// 断片を含む最初の相対パスを返す
    ///
    /// 一致がなければ断片をそのまま返す
    /// （名前が既に正しいか、欠落しているものとして扱う）。
    pub fn resolve(&self, fragment: &str) -> String {
        if fragment.is_empty() && self.empty_fragment == EmptyFragment::Unresolved {
            return fragment.to_string();
        }

        self.entries
            .iter()
            .find(|entry| entry.contains(fragment))
            .cloned()
            .unwrap_or_else(|| fragment.to_string())
    }

    /// 相対パスがルート以下のファイルとして実在するか
    ///
    /// 解決後の最終確認にのみ使う。解決そのものには使わない。
    pub fn exists(&self, filename: &str) -> bool {
        self.root.join(filename).is_file()
    }

    /// 保持しているエントリ数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 保持している相対パスの一覧（走査順）
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e))
        })
        .unwrap_or(false)
}
