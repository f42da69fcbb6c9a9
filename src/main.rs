use clap::Parser;
use photo_match_rust::{cli, config, error, index, query, store};
use cli::{Cli, Commands};
use config::Config;
use error::{PhotoMatchError, Result};
use index::EmptyFragment;
use query::{Query, QueryRecord};
use std::path::Path;
use store::ImportStore;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Import { file, storage_root, output, first_match_on_empty } => {
            println!("📥 photo-match - スコアCSV取り込み\n");

            let root = storage_root.unwrap_or_else(|| config.storage_root.clone());
            let store = ImportStore::new(&root);
            let policy = resolve_policy(&config, first_match_on_empty);

            let filename = file_name_of(&file)?;
            let source = ImportStore::source_name(&filename);
            let already_imported = store.import_exists(&source, &filename);

            // 1. 取り込みと照合
            println!("[1/2] スコアCSVを照合中...");
            let query = Query::load_or_import(&store, &filename, Some(&file), policy)?;
            if already_imported {
                println!("✔ インポート済みデータを使用: {}\n", source);
            } else {
                println!("✔ 取り込み完了: {}\n", store.import_dir(&source).display());
            }

            // 2. レポート出力
            println!("[2/2] 照合レポートを作成中...\n");
            render_report(&query, cli.verbose);

            if let Some(output) = output {
                let json = serde_json::to_string_pretty(&query)?;
                std::fs::write(&output, json)?;
                println!("\n✔ 結果を保存: {}", output.display());
            }
        }

        Commands::Show { source, storage_root, output, first_match_on_empty } => {
            println!("🔍 photo-match - 照合レポート表示\n");

            let root = storage_root.unwrap_or_else(|| config.storage_root.clone());
            let store = ImportStore::new(&root);
            let policy = resolve_policy(&config, first_match_on_empty);

            // ソース識別子とファイル名のどちらでも受け付ける
            let query = if store.import_dir(&source).is_dir() {
                Query::open_source(&store, &source, policy)?
            } else {
                Query::open(&store, &source, policy)?
            };

            render_report(&query, cli.verbose);

            if let Some(output) = output {
                let json = serde_json::to_string_pretty(&query)?;
                std::fs::write(&output, json)?;
                println!("\n✔ 結果を保存: {}", output.display());
            }
        }

        Commands::List { storage_root } => {
            println!("📋 photo-match - インポート一覧\n");

            let root = storage_root.unwrap_or_else(|| config.storage_root.clone());
            let store = ImportStore::new(&root);

            let sources = store.list_imports();
            if sources.is_empty() {
                println!("インポート済みのソースはありません");
            } else {
                for source in &sources {
                    match QueryRecord::load(&store.import_dir(source)) {
                        Some(record) => {
                            println!("  {} ({}, {})", source, record.filename, record.created_at)
                        }
                        None => println!("  {}", source),
                    }
                }
                println!("\n{}件", sources.len());
            }
        }

        Commands::Config { set_storage_root, show } => {
            let mut config = config;

            if let Some(root) = set_storage_root {
                config.set_storage_root(root)?;
                println!("✔ 保存先ルートを設定しました");
            }

            if show {
                println!("設定:");
                println!("  保存先ルート: {}", config.storage_root.display());
                println!(
                    "  空の候補の解決: {}",
                    if config.first_match_on_empty { "先頭エントリ" } else { "そのまま" }
                );
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }
    }

    Ok(())
}

/// 空文字フラグメントの解決方針を決める
fn resolve_policy(config: &Config, first_match_on_empty: bool) -> EmptyFragment {
    if first_match_on_empty || config.first_match_on_empty {
        EmptyFragment::FirstEntry
    } else {
        EmptyFragment::Unresolved
    }
}

/// パスからファイル名部分を取り出す
fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| PhotoMatchError::FileNotFound(path.display().to_string()))
}

/// 照合レポートを標準出力に描画する
fn render_report(query: &Query, verbose: bool) {
    println!("ソース: {}", query.source_name);
    println!("ファイル: {}", query.filename);
    println!("取り込み日時: {}\n", query.created_at);

    let report = &query.report;

    println!(
        "対象画像: {}件 (欠落 {}件)",
        report.images.len(),
        report.missing_images.len()
    );
    if verbose {
        for name in &report.images {
            println!("  {}", name);
        }
    }
    for name in &report.missing_images {
        println!("  ⚠ {}", name);
    }

    println!(
        "参照画像: {}件 (欠落 {}件)",
        report.reference_images.len(),
        report.missing_reference_images.len()
    );
    if verbose {
        for name in &report.reference_images {
            println!("  {}", name);
        }
    }
    for name in &report.missing_reference_images {
        println!("  ⚠ {}", name);
    }

    println!("\n最良マッチ:");
    for (subject, best) in &query.matches {
        if best.image_filename.is_empty() {
            println!("  {} → (該当なし)", subject);
        } else {
            println!("  {} → {} (スコア {:.3})", subject, best.image_filename, best.score);
        }
    }

    if query.all_images_exist() {
        println!("\n✅ 全画像が揃っています");
    } else {
        println!("\n⚠ 欠落画像があります");
    }
}
