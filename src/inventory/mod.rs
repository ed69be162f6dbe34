pub mod components;
pub mod events;
pub mod mediator;
mod systems;

use bevy::prelude::*;
use crate::core::resources::GameConfig;
use crate::core::states::AppState;
use components::*;
use events::*;
use systems::*;

pub struct InventoryPlugin;
impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<GameConfig>()
            .cloned()
            .unwrap_or_default();
        app.insert_resource(Inventory::new(config.weapon_slots, config.base_capacity))
            .add_event::<CollectItemEvent>()
            .add_event::<DropItemEvent>()
            .add_event::<ListInventoryEvent>()
            .add_event::<SnapshotInventoryEvent>()
            .add_systems(OnEnter(AppState::InGame), spawn_player)
            .add_systems(
                Update,
                (collect_item, drop_item, print_inventory, print_snapshot)
                    .chain()
                    .run_if(in_state(AppState::InGame)),
            );
    }
}
