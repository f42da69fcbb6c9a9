use crate::error::{PhotoMatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// インポートデータの保存先ルート
    pub storage_root: PathBuf,
    /// 空の最良候補を走査順の先頭画像に解決する（旧挙動互換）
    #[serde(default)]
    pub first_match_on_empty: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PhotoMatchError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("photo-match").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            storage_root: PathBuf::from("uploads"),
            first_match_on_empty: false,
        }
    }

    pub fn set_storage_root(&mut self, root: PathBuf) -> Result<()> {
        self.storage_root = root;
        self.save()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
