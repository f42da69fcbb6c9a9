//! 照合結果の型定義

use serde::{Deserialize, Serialize};

/// 画像の所在分類レポート
///
/// 参照画像は必ずあいまい解決を通した後の名前で記録する。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageReport {
    /// ディスク上に見つかった比較対象画像
    #[serde(default)]
    pub images: Vec<String>,

    /// 見つからなかった比較対象画像
    #[serde(default)]
    pub missing_images: Vec<String>,

    /// 解決後に見つかった参照画像
    #[serde(default)]
    pub reference_images: Vec<String>,

    /// 解決後も見つからなかった参照画像
    #[serde(default)]
    pub missing_reference_images: Vec<String>,
}

impl ImageReport {
    /// 全画像が揃っているか（欠落リストが両方とも空）
    pub fn all_images_exist(&self) -> bool {
        self.missing_images.is_empty() && self.missing_reference_images.is_empty()
    }
}

/// 1件の最良マッチ
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestMatch {
    /// 解決済みの画像パス（未解決なら指定名のまま）
    pub image_filename: String,

    /// 最高スコア（スコア0を超える候補が無ければ0）
    #[serde(default)]
    pub score: f64,
}
