//! スコア表モジュール
//!
//! 画像比較プロセスが出力するスコア行列CSVを読み込み、
//! 行レコードの順序付き列へ変換する。
//!
//! 先頭列は比較対象画像のファイル名。残りの列ヘッダが候補（参照）画像の
//! 識別子で、予約メタデータ列は候補から除外する。候補集合は列ヘッダで
//! 宣言されたものがすべての行に適用される。

use crate::error::{PhotoMatchError, Result};
use std::path::Path;

/// 候補として扱わない予約メタデータ列
const RESERVED_COLUMNS: &[&str] = &["id", "image_filename", "created_at", "updated_at"];

/// スコア行列の1行
#[derive(Debug, Clone)]
pub struct ScoreRow {
    /// 比較対象画像のファイル名（先頭列）
    pub subject_image: String,
    /// 候補識別子→スコア（列ヘッダの宣言順）
    pub candidate_scores: Vec<(String, f64)>,
}

/// スコア行列全体
///
/// 行は入力順のまま保持し、読み込み後は不変。
#[derive(Debug, Clone, Default)]
pub struct ScoreTable {
    candidate_columns: Vec<String>,
    rows: Vec<ScoreRow>,
}

impl ScoreTable {
    /// CSVファイルから読み込み
    pub fn from_csv(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_csv_str(&content)
    }

    /// CSV文字列から読み込み
    ///
    /// 空行と先頭セルが空の行は読み飛ばす。セルが欠けている行は
    /// スコア0として扱い、数値でないセルはエラーにする。
    pub fn from_csv_str(content: &str) -> Result<Self> {
        let mut lines = content.lines().enumerate();

        let header = match lines.next() {
            Some((_, line)) => line,
            None => return Ok(Self::default()),
        };
        let header_fields = parse_csv_line(header);

        // 先頭列は比較対象画像、残りから予約列を除いたものが候補
        let mut candidate_columns = Vec::new();
        let mut candidate_indices = Vec::new();
        for (i, name) in header_fields.iter().enumerate().skip(1) {
            let name = name.trim();
            if name.is_empty() || RESERVED_COLUMNS.contains(&name) {
                continue;
            }
            candidate_columns.push(name.to_string());
            candidate_indices.push(i);
        }

        let mut rows = Vec::new();
        for (line_no, line) in lines {
            if line.trim().is_empty() {
                continue;
            }

            let fields = parse_csv_line(line);
            let subject = fields.first().map(|s| s.trim()).unwrap_or_default();
            if subject.is_empty() {
                continue;
            }

            let mut candidate_scores = Vec::with_capacity(candidate_columns.len());
            for (name, &index) in candidate_columns.iter().zip(&candidate_indices) {
                let cell = fields.get(index).map(|s| s.trim()).unwrap_or_default();
                let score = if cell.is_empty() {
                    0.0
                } else {
                    cell.parse::<f64>().map_err(|_| {
                        PhotoMatchError::InvalidTable(format!(
                            "{}行目: スコア列 '{}' が数値ではありません: '{}'",
                            line_no + 1,
                            name,
                            cell,
                        ))
                    })?
                };
                candidate_scores.push((name.clone(), score));
            }

            rows.push(ScoreRow {
                subject_image: subject.to_string(),
                candidate_scores,
            });
        }

        Ok(Self {
            candidate_columns,
            rows,
        })
    }

    /// 候補識別子の一覧（列ヘッダの宣言順）
    ///
    /// 全行が同じ列集合を持つため、どの行のスコア列とも一致する。
    pub fn candidate_columns(&self) -> &[String] {
        &self.candidate_columns
    }

    /// 全行（入力順）
    pub fn rows(&self) -> &[ScoreRow] {
        &self.rows
    }

    /// 行数
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// CSV行をパース（ダブルクォート対応）
fn parse_csv_line(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut in_quotes = false;
    let mut field_start = 0;
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == ',' && !in_quotes {
            // フィールド終了
            let field = &line[field_start..byte_index(line, i)];
            fields.push(trim_quotes(field));
            field_start = byte_index(line, i + 1);
        }
        i += 1;
    }

    // 最後のフィールド
    if field_start <= line.len() {
        let field = &line[field_start..];
        fields.push(trim_quotes(field));
    }

    fields
}

fn byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn trim_quotes(s: &str) -> &str {
    let s = s.trim();
    if s.starts_with('"') && s.ends_with('"') && s.len() >= 2 {
        &s[1..s.len() - 1]
    } else {
        s
    }
}
