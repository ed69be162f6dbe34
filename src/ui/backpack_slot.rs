use bevy::prelude::*;

use super::components::{SlotDisplay, SlotState};
use super::gestures::*;
use super::gestures::PointerButton;
use crate::data::schema::{ItemDefinition, UiTag};
use crate::inventory::events::InventoryChange;
use crate::inventory::mediator::InventoryMediator;
use crate::items::{ItemId, ItemRegistry};

/// 空背包格显示的底色透明度
pub const EMPTY_BACKPACK_ALPHA: f32 = 0.35;

/// 背包格：右键丢弃，接受从地上拖来的背包；自身不可拖拽
#[derive(Debug, Clone)]
pub struct BackpackSlotUi {
    ui_tag: UiTag,
    stored: Option<ItemId>,
    display: SlotDisplay,
}

impl Default for BackpackSlotUi {
    fn default() -> Self {
        Self {
            ui_tag: UiTag::Backpack,
            stored: None,
            display: SlotDisplay::cleared(EMPTY_BACKPACK_ALPHA),
        }
    }
}

impl BackpackSlotUi {
    pub fn ui_tag(&self) -> UiTag {
        self.ui_tag
    }

    pub fn display(&self) -> &SlotDisplay {
        &self.display
    }

    pub fn state(&self) -> SlotState {
        if self.stored.is_some() {
            SlotState::Occupied
        } else {
            SlotState::Empty
        }
    }

    pub fn set_data(&mut self, item: ItemId, definition: &ItemDefinition) {
        self.stored = Some(item);
        self.display = SlotDisplay {
            icon: Some(definition.icon.clone()),
            label: String::new(),
            alpha: 1.0,
        };
    }

    pub fn reset_data(&mut self) {
        self.stored = None;
        self.display = SlotDisplay::cleared(EMPTY_BACKPACK_ALPHA);
    }
}

impl GestureHandler for BackpackSlotUi {
    fn stored_item(&self) -> Option<ItemId> {
        self.stored
    }

    fn payload_origin(&self) -> PayloadOrigin {
        PayloadOrigin::Backpack
    }

    /// 右键丢弃背包；格子等移除通知到达后才清空
    fn pointer_down(&mut self, button: PointerButton, mediator: &mut dyn InventoryMediator) -> bool {
        if button != PointerButton::Right {
            return false;
        }
        let Some(item) = self.stored else {
            return false;
        };
        mediator.try_remove_and_drop(item).is_ok()
    }

    fn drop_received(&mut self, payload: &DragPayload, mediator: &mut dyn InventoryMediator) -> bool {
        if payload.origin != PayloadOrigin::Loose {
            return false;
        }
        let Some(item) = payload.item else {
            return false;
        };
        if mediator.ui_tag_of(item) != Some(self.ui_tag) {
            debug!("背包格拒绝 #{item}: 分类不符");
            return false;
        }
        mediator.try_add_item(item).is_ok()
    }
}

impl InventoryObserver for BackpackSlotUi {
    fn on_inventory_change(&mut self, change: &InventoryChange, items: &ItemRegistry) {
        match change {
            InventoryChange::BackpackAdded(item) => {
                if let Some(def) = items.definition(*item) {
                    self.set_data(*item, def);
                }
            }
            InventoryChange::BackpackRemoved(item) if self.stored == Some(*item) => {
                self.reset_data();
            }
            _ => {}
        }
    }
}
