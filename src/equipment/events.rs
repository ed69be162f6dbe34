use bevy::prelude::*;

use crate::inventory::mediator::UseAction;
use crate::items::ItemId;

/// 拿起某个武器栏的枪
#[derive(Event)]
pub struct HoldEvent {
    pub slot: usize,
}

/// 收起手上的物品
#[derive(Event)]
pub struct PutAwayEvent;

#[derive(Event)]
pub struct UseEvent {
    pub action: UseAction,
}

#[derive(Event)]
pub struct AttachEvent {
    pub attachment: ItemId,
    pub weapon: ItemId,
}

#[derive(Event)]
pub struct DetachEvent {
    pub attachment: ItemId,
}
