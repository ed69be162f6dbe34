pub mod backpack_slot;
pub mod channel;
pub mod components;
pub mod gestures;
pub mod loose_item;
pub mod systems;
pub mod weapon_slot;
pub mod widget;

use bevy::prelude::*;

use crate::core::states::AppState;
use crate::inventory::events::InventoryChange;
use channel::EventChannel;
use components::UiRoot;
use gestures::GestureEvent;
use systems::*;

/// 背包界面：控件、手势分派与通知频道
pub struct UiPlugin;
impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EventChannel<InventoryChange>>()
            .init_resource::<UiRoot>()
            .add_event::<GestureEvent>()
            .add_systems(OnEnter(AppState::InGame), spawn_slot_widgets)
            .add_systems(
                Update,
                (
                    subscribe_new_widgets,
                    unsubscribe_removed_widgets,
                    dispatch_gestures,
                    publish_inventory_changes,
                    deliver_inventory_changes,
                    sync_loose_widgets,
                )
                    .chain()
                    .run_if(in_state(AppState::InGame)),
            );
    }
}
