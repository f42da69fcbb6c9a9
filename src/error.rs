use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhotoMatchError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("行データが見つかりません: {0}")]
    MissingSource(String),

    #[error("スコア表の形式が不正: {0}")]
    InvalidTable(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PhotoMatchError>;
