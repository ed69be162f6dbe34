use anyhow::Context;
use bevy::prelude::*;

mod core;
mod data;
mod equipment;
mod interface;
mod inventory;
mod items;
mod ui;

use crate::core::resources::GameConfig;
use crate::core::states;
use crate::core::CorePlugin;
use interface::debug_cli::DebugCliPlugin;

const CONFIG_PATH: &str = "assets/config/game.toml";

fn load_config() -> anyhow::Result<GameConfig> {
    GameConfig::load(CONFIG_PATH).with_context(|| format!("读取配置 {CONFIG_PATH} 失败"))
}

fn main() {
    let config = load_config().unwrap_or_else(|err| {
        eprintln!("{err:#}，使用默认配置");
        GameConfig::default()
    });

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                visible: false,
                ..default()
            }), // 不显示窗口，界面全由 CLI 驱动
            ..default()
        }))
        .add_plugins(CorePlugin { config })
        .add_plugins(data::DataPlugin)
        .add_plugins(items::ItemsPlugin)
        .add_plugins(inventory::InventoryPlugin)
        .add_plugins(equipment::EquipmentPlugin)
        .add_plugins(ui::UiPlugin)
        .add_plugins(DebugCliPlugin)
        .add_systems(Update, forward_log_event) // 简单打印
        .add_systems(Startup, |mut next: ResMut<NextState<states::AppState>>| {
            next.set(states::AppState::Loading);
        })
        .run();
}

fn forward_log_event(mut reader: EventReader<crate::core::events::LogEvent>) {
    for e in reader.read() {
        println!("> {}", e.0);
    }
}
