use bevy::prelude::*;

use super::backpack_slot::BackpackSlotUi;
use super::components::{SlotDisplay, SlotState, WidgetTransform};
use super::gestures::*;
use super::loose_item::LooseItemUi;
use super::weapon_slot::WeaponSlotUi;
use crate::inventory::events::InventoryChange;
use crate::items::ItemRegistry;

/// 界面控件组件，按种类分派到具体的处理逻辑
#[derive(Component, Debug, Clone)]
pub enum SlotWidget {
    Backpack(BackpackSlotUi),
    Weapon(WeaponSlotUi),
    Loose(LooseItemUi),
}

impl SlotWidget {
    pub fn handler(&self) -> &dyn GestureHandler {
        match self {
            Self::Backpack(w) => w,
            Self::Weapon(w) => w,
            Self::Loose(w) => w,
        }
    }

    pub fn handler_mut(&mut self) -> &mut dyn GestureHandler {
        match self {
            Self::Backpack(w) => w,
            Self::Weapon(w) => w,
            Self::Loose(w) => w,
        }
    }

    pub fn observer_mut(&mut self) -> &mut dyn InventoryObserver {
        match self {
            Self::Backpack(w) => w,
            Self::Weapon(w) => w,
            Self::Loose(w) => w,
        }
    }

    /// CLI 里引用控件用的短名：bp / w0 / g12
    pub fn handle(&self) -> String {
        match self {
            Self::Backpack(_) => "bp".into(),
            Self::Weapon(w) => format!("w{}", w.slot_index()),
            Self::Loose(w) => format!("g{}", w.item()),
        }
    }

    pub fn state(&self) -> SlotState {
        match self {
            Self::Backpack(w) => w.state(),
            Self::Weapon(w) => w.state(),
            Self::Loose(w) => w.state(),
        }
    }

    pub fn display(&self) -> &SlotDisplay {
        match self {
            Self::Backpack(w) => w.display(),
            Self::Weapon(w) => w.display(),
            Self::Loose(w) => w.display(),
        }
    }

    pub fn alpha(&self) -> f32 {
        match self {
            Self::Backpack(w) => w.display().alpha,
            Self::Weapon(w) => w.alpha(),
            Self::Loose(w) => w.alpha(),
        }
    }

    /// 不可拖拽的控件没有位置记录
    pub fn transform(&self) -> Option<WidgetTransform> {
        self.handler().draggable().map(|d| d.transform)
    }

    /// 只有正在拖拽的控件能作为放置物
    pub fn payload(&self, source: Entity) -> Option<DragPayload> {
        let handler = self.handler();
        handler
            .draggable()
            .filter(|d| d.is_dragging())
            .map(|_| DragPayload {
                source,
                item: handler.stored_item(),
                origin: handler.payload_origin(),
            })
    }

    pub fn on_inventory_change(&mut self, change: &InventoryChange, items: &ItemRegistry) {
        self.observer_mut().on_inventory_change(change, items);
    }
}
