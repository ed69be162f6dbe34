use bevy::prelude::*;

use super::components::{Draggable, SlotDisplay, SlotState, WidgetTransform};
use super::gestures::*;
use super::gestures::PointerButton;
use crate::data::schema::{ItemDefinition, UiTag};
use crate::inventory::events::InventoryChange;
use crate::inventory::mediator::InventoryMediator;
use crate::items::{ItemId, ItemRegistry};

/// 武器栏：拖拽交换、右键丢弃、接受从地上拖来的枪
#[derive(Debug, Clone)]
pub struct WeaponSlotUi {
    slot_index: usize,
    ui_tag: UiTag,
    stored: Option<ItemId>,
    display: SlotDisplay,
    home: WidgetTransform,
    drag: Draggable,
}

impl WeaponSlotUi {
    pub fn new(slot_index: usize, home: WidgetTransform) -> Self {
        Self {
            slot_index,
            ui_tag: UiTag::Weapon,
            stored: None,
            // 空武器栏隐藏
            display: SlotDisplay::cleared(0.0),
            home,
            drag: Draggable::anchored(home),
        }
    }

    pub fn slot_index(&self) -> usize {
        self.slot_index
    }

    pub fn ui_tag(&self) -> UiTag {
        self.ui_tag
    }

    pub fn display(&self) -> &SlotDisplay {
        &self.display
    }

    pub fn transform(&self) -> WidgetTransform {
        self.drag.transform
    }

    pub fn alpha(&self) -> f32 {
        self.drag.effective_alpha(self.display.alpha)
    }

    pub fn state(&self) -> SlotState {
        if self.drag.is_dragging() {
            SlotState::Dragging
        } else if self.stored.is_some() {
            SlotState::Occupied
        } else {
            SlotState::Empty
        }
    }

    pub fn set_data_and_show(&mut self, item: ItemId, definition: &ItemDefinition) {
        self.stored = Some(item);
        self.display = SlotDisplay {
            icon: Some(definition.icon.clone()),
            label: definition.name.clone(),
            alpha: 1.0,
        };
    }

    pub fn reset_data_and_hide(&mut self) {
        self.stored = None;
        self.display = SlotDisplay::cleared(0.0);
    }

    fn show(&mut self, item: Option<ItemId>, items: &ItemRegistry) {
        match item.and_then(|id| items.definition(id).map(|def| (id, def))) {
            Some((id, def)) => self.set_data_and_show(id, def),
            None => self.reset_data_and_hide(),
        }
    }
}

impl GestureHandler for WeaponSlotUi {
    fn stored_item(&self) -> Option<ItemId> {
        self.stored
    }

    fn payload_origin(&self) -> PayloadOrigin {
        PayloadOrigin::WeaponSlot(self.slot_index)
    }

    fn draggable(&self) -> Option<&Draggable> {
        Some(&self.drag)
    }

    fn draggable_mut(&mut self) -> Option<&mut Draggable> {
        Some(&mut self.drag)
    }

    fn pointer_down(&mut self, button: PointerButton, mediator: &mut dyn InventoryMediator) -> bool {
        if button != PointerButton::Right {
            return false;
        }
        let Some(item) = self.stored else {
            return false;
        };
        mediator.try_remove_item(item, self.slot_index).is_ok()
    }

    fn drop_received(&mut self, payload: &DragPayload, mediator: &mut dyn InventoryMediator) -> bool {
        match payload.origin {
            PayloadOrigin::WeaponSlot(source_index) => {
                if source_index == self.slot_index {
                    return false;
                }
                // 空栏拖出来的没有物品，只检查有物品的一方
                if let Some(item) = payload.item {
                    if mediator.ui_tag_of(item) != Some(self.ui_tag) {
                        return false;
                    }
                }
                mediator.swap_items(source_index, self.slot_index).is_ok()
            }
            PayloadOrigin::Loose => {
                let Some(item) = payload.item else {
                    return false;
                };
                if mediator.ui_tag_of(item) != Some(self.ui_tag) {
                    debug!("武器栏 {} 拒绝 #{item}: 分类不符", self.slot_index);
                    return false;
                }
                mediator.try_add_item(item).is_ok()
            }
            PayloadOrigin::Backpack => false,
        }
    }
}

impl InventoryObserver for WeaponSlotUi {
    fn on_inventory_change(&mut self, change: &InventoryChange, items: &ItemRegistry) {
        match *change {
            InventoryChange::WeaponAdded { slot, item } if slot == self.slot_index => {
                self.show(Some(item), items);
            }
            InventoryChange::WeaponRemoved { slot, item }
                if slot == self.slot_index && self.stored == Some(item) =>
            {
                self.reset_data_and_hide();
                self.drag.rehome(self.home);
            }
            InventoryChange::WeaponSlotsSwapped { a, b, item_a, item_b } => {
                let item = if a == self.slot_index {
                    item_a
                } else if b == self.slot_index {
                    item_b
                } else {
                    return;
                };
                self.show(item, items);
                self.drag.rehome(self.home);
            }
            _ => {}
        }
    }
}
