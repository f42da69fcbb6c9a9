use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photo-match")]
#[command(about = "画像比較スコアCSVの照合レポート生成ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// スコアCSVを取り込んで照合レポートを出力
    Import {
        /// スコアCSVファイルのパス
        #[arg(required = true)]
        file: PathBuf,

        /// 保存先ルート（デフォルト: 設定値）
        #[arg(long)]
        storage_root: Option<PathBuf>,

        /// 照合結果JSONの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 空文字の参照列を索引の先頭エントリに解決する
        #[arg(long)]
        first_match_on_empty: bool,
    },

    /// インポート済みソースの照合レポートを表示
    Show {
        /// ソース識別子またはCSVファイル名
        #[arg(required = true)]
        source: String,

        /// 保存先ルート（デフォルト: 設定値）
        #[arg(long)]
        storage_root: Option<PathBuf>,

        /// 照合結果JSONの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 空文字の参照列を索引の先頭エントリに解決する
        #[arg(long)]
        first_match_on_empty: bool,
    },

    /// インポート済みソースを一覧
    List {
        /// 保存先ルート（デフォルト: 設定値）
        #[arg(long)]
        storage_root: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// 保存先ルートを設定
        #[arg(long)]
        set_storage_root: Option<PathBuf>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
