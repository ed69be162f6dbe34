use bevy::prelude::*;

/// 应用生命周期：Loading 等待物品表加载完成，InGame 才处理背包与界面手势
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    #[default]
    Startup,
    Loading,
    InGame,
    Shutdown,
}
