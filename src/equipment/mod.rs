pub mod actions;
pub mod events;
mod systems;

use crate::core::states::AppState;
use bevy::prelude::*;
use events::*;
use systems::*;

/// 手持、使用与配件
pub struct EquipmentPlugin;
impl Plugin for EquipmentPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<HoldEvent>()
            .add_event::<PutAwayEvent>()
            .add_event::<UseEvent>()
            .add_event::<AttachEvent>()
            .add_event::<DetachEvent>()
            .add_systems(
                Update,
                (hold_item, put_away_item, use_item, attach_item, detach_item)
                    .chain()
                    .run_if(in_state(AppState::InGame)),
            );
    }
}
