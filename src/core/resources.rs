use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// 全局配置，来自 `assets/config/game.toml`，缺省字段使用默认值
#[derive(Resource, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// 物品表路径（相对 assets/）
    pub item_data_path: String,
    /// 武器栏数量
    pub weapon_slots: usize,
    /// 不背背包时的通用格子数
    pub base_capacity: usize,
    /// 拖拽中的控件透明度
    pub drag_alpha: f32,
    /// 画布缩放，拖拽位移 = delta × scale_factor
    pub canvas_scale_factor: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            item_data_path: "data/items.ron".into(),
            weapon_slots: 2,
            base_capacity: 6,
            drag_alpha: 0.6,
            canvas_scale_factor: 1.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("weapon_slots must be at least 1")]
    NoWeaponSlots,
}

impl GameConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(s)?;
        if config.weapon_slots == 0 {
            return Err(ConfigError::NoWeaponSlots);
        }
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let s = std::fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}
