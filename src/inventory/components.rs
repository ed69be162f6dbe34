use bevy::prelude::*;
use serde::Serialize;
use thiserror::Error;

use super::events::InventoryChange;
use crate::items::ItemId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("背包已满")]
    Full,
    #[error("没有空的武器栏")]
    NoFreeWeaponSlot,
    #[error("武器栏 {0} 不存在")]
    SlotOutOfRange(usize),
    #[error("武器栏 {0} 为空")]
    EmptySlot(usize),
    #[error("物品不在背包中")]
    NotPresent,
    #[error("物品已在背包中")]
    AlreadyPresent,
    #[error("已经背着背包")]
    BackpackOccupied,
    #[error("卸下背包后放不下：需要 {needed} 格，只有 {capacity} 格")]
    WouldOverflow { needed: usize, capacity: usize },
    #[error("不能与自身交换")]
    SameSlot,
    #[error("两个武器栏都为空")]
    NothingToSwap,
}

/// 玩家背包（挂在 Resource）
///
/// 只保存 [`ItemId`]，物品本身在 `ItemRegistry` 里；每次修改都会记一条
/// [`InventoryChange`]，由界面层取走广播。
#[derive(Resource, Debug, Clone, Serialize)]
pub struct Inventory {
    weapon_slots: Vec<Option<ItemId>>,
    backpack: Option<ItemId>,
    #[serde(skip)]
    extra_capacity: usize,
    base_capacity: usize,
    common: Vec<ItemId>,
    in_hand: Option<ItemId>,
    #[serde(skip)]
    changes: Vec<InventoryChange>,
}

impl Inventory {
    pub fn new(weapon_slots: usize, base_capacity: usize) -> Self {
        Self {
            weapon_slots: vec![None; weapon_slots],
            backpack: None,
            extra_capacity: 0,
            base_capacity,
            common: Vec::new(),
            in_hand: None,
            changes: Vec::new(),
        }
    }

    /// 通用格子容量 = 基础容量 + 背包加成
    pub fn capacity(&self) -> usize {
        self.base_capacity + self.extra_capacity
    }

    pub fn weapon_slots(&self) -> &[Option<ItemId>] {
        &self.weapon_slots
    }

    pub fn weapon_at(&self, slot: usize) -> Option<ItemId> {
        self.weapon_slots.get(slot).copied().flatten()
    }

    pub fn weapon_slot_of(&self, item: ItemId) -> Option<usize> {
        self.weapon_slots.iter().position(|s| *s == Some(item))
    }

    pub fn backpack(&self) -> Option<ItemId> {
        self.backpack
    }

    pub fn common(&self) -> &[ItemId] {
        &self.common
    }

    pub fn in_hand(&self) -> Option<ItemId> {
        self.in_hand
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.weapon_slot_of(item).is_some()
            || self.backpack == Some(item)
            || self.common.contains(&item)
    }

    /// 取走待广播的变更
    pub fn drain_changes(&mut self) -> Vec<InventoryChange> {
        std::mem::take(&mut self.changes)
    }

    // ------------------------------ 武器栏 ------------------------------

    /// 放进第一个空武器栏，返回栏位
    pub fn try_add_weapon(&mut self, item: ItemId) -> Result<usize, InventoryError> {
        if self.contains(item) {
            return Err(InventoryError::AlreadyPresent);
        }
        let slot = self
            .weapon_slots
            .iter()
            .position(Option::is_none)
            .ok_or(InventoryError::NoFreeWeaponSlot)?;
        self.weapon_slots[slot] = Some(item);
        self.changes.push(InventoryChange::WeaponAdded { slot, item });
        Ok(slot)
    }

    pub fn take_weapon(&mut self, item: ItemId) -> Result<usize, InventoryError> {
        let slot = self.weapon_slot_of(item).ok_or(InventoryError::NotPresent)?;
        self.weapon_slots[slot] = None;
        self.changes.push(InventoryChange::WeaponRemoved { slot, item });
        Ok(slot)
    }

    /// 交换两个武器栏，一次完成并只记一条变更
    pub fn swap_weapon_slots(&mut self, a: usize, b: usize) -> Result<(), InventoryError> {
        let len = self.weapon_slots.len();
        for idx in [a, b] {
            if idx >= len {
                return Err(InventoryError::SlotOutOfRange(idx));
            }
        }
        if a == b {
            return Err(InventoryError::SameSlot);
        }
        if self.weapon_slots[a].is_none() && self.weapon_slots[b].is_none() {
            return Err(InventoryError::NothingToSwap);
        }
        self.weapon_slots.swap(a, b);
        self.changes.push(InventoryChange::WeaponSlotsSwapped {
            a,
            b,
            item_a: self.weapon_slots[a],
            item_b: self.weapon_slots[b],
        });
        Ok(())
    }

    // ------------------------------ 背包 ------------------------------

    pub fn try_set_backpack(&mut self, item: ItemId, extra_capacity: usize) -> Result<(), InventoryError> {
        if self.backpack.is_some() {
            return Err(InventoryError::BackpackOccupied);
        }
        self.backpack = Some(item);
        self.extra_capacity = extra_capacity;
        self.changes.push(InventoryChange::BackpackAdded(item));
        Ok(())
    }

    /// 卸下背包，剩余物品放不下时拒绝
    pub fn take_backpack(&mut self, item: ItemId) -> Result<(), InventoryError> {
        if self.backpack != Some(item) {
            return Err(InventoryError::NotPresent);
        }
        if self.common.len() > self.base_capacity {
            return Err(InventoryError::WouldOverflow {
                needed: self.common.len(),
                capacity: self.base_capacity,
            });
        }
        self.backpack = None;
        self.extra_capacity = 0;
        self.changes.push(InventoryChange::BackpackRemoved(item));
        Ok(())
    }

    // ------------------------------ 通用格子 ------------------------------

    pub fn try_add_common(&mut self, item: ItemId) -> Result<(), InventoryError> {
        if self.contains(item) {
            return Err(InventoryError::AlreadyPresent);
        }
        if self.common.len() >= self.capacity() {
            return Err(InventoryError::Full);
        }
        self.common.push(item);
        self.changes.push(InventoryChange::CommonAdded(item));
        Ok(())
    }

    pub fn take_common(&mut self, item: ItemId) -> Result<(), InventoryError> {
        let idx = self
            .common
            .iter()
            .position(|i| *i == item)
            .ok_or(InventoryError::NotPresent)?;
        self.common.remove(idx);
        self.changes.push(InventoryChange::CommonRemoved(item));
        Ok(())
    }

    // ------------------------------ 手 ------------------------------

    pub fn set_in_hand(&mut self, item: Option<ItemId>) {
        if self.in_hand != item {
            self.in_hand = item;
            self.changes.push(InventoryChange::InHandChanged(item));
        }
    }
}
