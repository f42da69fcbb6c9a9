//! Photo Match Library
//!
//! 画像比較スコアCSVを取り込み、画像ディレクトリと突き合わせて
//! 照合レポートと最良マッチを生成する。

pub mod cli;
pub mod config;
pub mod error;
pub mod index;
pub mod matcher;
pub mod query;
pub mod store;
pub mod table;

pub use config::Config;
pub use error::{PhotoMatchError, Result};
pub use index::{EmptyFragment, ImageIndex};
pub use matcher::{BestMatch, ImageReport};
pub use query::{Query, QueryRecord};
pub use store::ImportStore;
pub use table::{ScoreRow, ScoreTable};
