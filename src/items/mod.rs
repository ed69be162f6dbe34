pub mod ammo;
pub mod attachment;
pub mod backpack;
pub mod capabilities;
pub mod error;
pub mod hand;
pub mod registry;
pub mod weapon;

use bevy::prelude::*;

use crate::core::events::LogEvent;
use crate::core::states::AppState;
use crate::data::ItemCatalog;
pub use capabilities::{ItemId, ItemLocation};
pub use error::ItemError;
pub use registry::{ItemInstance, ItemRegistry};

/// 在地上生成一个物品
#[derive(Event)]
pub struct SpawnItemEvent {
    pub id: String,
}

pub struct ItemsPlugin;
impl Plugin for ItemsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ItemRegistry>()
            .add_event::<SpawnItemEvent>()
            .add_systems(Update, spawn_items.run_if(in_state(AppState::InGame)));
    }
}

pub fn spawn_items(
    mut ev_spawn: EventReader<SpawnItemEvent>,
    catalog: Res<ItemCatalog>,
    mut registry: ResMut<ItemRegistry>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_spawn.read() {
        let Some(def) = catalog.find(&ev.id) else {
            warn!("不存在物品 ID {}", ev.id);
            log.write(LogEvent(format!("不存在物品 ID {}", ev.id)));
            continue;
        };
        let name = def.name.clone();
        let id = registry.spawn(def);
        info!("生成 {name} #{id}");
        log.write(LogEvent(format!("地上出现 {name} #{id}")));
    }
}
