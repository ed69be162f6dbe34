use bevy::prelude::*;

use crate::inventory::components::Inventory;

/// 玩家标记组件，作为拾取物品的持有者
#[derive(Component)]
pub struct Player;

/// 执行动作的一方：持有者实体 + 其背包的独占访问
pub struct ItemUserHand<'a> {
    pub holder: Entity,
    pub inventory: &'a mut Inventory,
}

impl<'a> ItemUserHand<'a> {
    pub fn new(holder: Entity, inventory: &'a mut Inventory) -> Self {
        Self { holder, inventory }
    }
}
