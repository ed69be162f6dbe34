use bevy::prelude::*;

use crate::items::ItemId;

/// 背包内容的变更通知，界面控件订阅后据此刷新
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryChange {
    WeaponAdded { slot: usize, item: ItemId },
    WeaponRemoved { slot: usize, item: ItemId },
    /// 交换后两栏的内容，同一次通知里一起更新
    WeaponSlotsSwapped {
        a: usize,
        b: usize,
        item_a: Option<ItemId>,
        item_b: Option<ItemId>,
    },
    BackpackAdded(ItemId),
    BackpackRemoved(ItemId),
    CommonAdded(ItemId),
    CommonRemoved(ItemId),
    InHandChanged(Option<ItemId>),
}

/// 拾取地上的物品并放进背包
#[derive(Event)]
pub struct CollectItemEvent {
    pub item: ItemId,
}

/// 把背包里的物品丢到地上
#[derive(Event)]
pub struct DropItemEvent {
    pub item: ItemId,
}

#[derive(Event)]
pub struct ListInventoryEvent; // 让 CLI 请求打印背包

#[derive(Event)]
pub struct SnapshotInventoryEvent; // 以 JSON 打印背包
