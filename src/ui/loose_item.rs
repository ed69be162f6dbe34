use super::components::{Draggable, SlotDisplay, SlotState, WidgetTransform};
use super::gestures::*;
use crate::data::schema::ItemDefinition;
use crate::inventory::events::InventoryChange;
use crate::inventory::mediator::InventoryMediator;
use crate::items::{ItemId, ItemRegistry};

/// 地上物品列表里的一项：可拖进背包格 / 武器栏，右键直接拾取
///
/// 物品离开地面后由 `sync_loose_widgets` 回收。
#[derive(Debug, Clone)]
pub struct LooseItemUi {
    item: ItemId,
    display: SlotDisplay,
    drag: Draggable,
}

impl LooseItemUi {
    pub fn new(item: ItemId, definition: &ItemDefinition, transform: WidgetTransform) -> Self {
        Self {
            item,
            display: SlotDisplay {
                icon: Some(definition.icon.clone()),
                label: definition.name.clone(),
                alpha: 1.0,
            },
            drag: Draggable::new(transform),
        }
    }

    pub fn item(&self) -> ItemId {
        self.item
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
        } else {
            SlotState::Occupied
        }
    }
}

impl GestureHandler for LooseItemUi {
    fn stored_item(&self) -> Option<ItemId> {
        Some(self.item)
    }

    fn payload_origin(&self) -> PayloadOrigin {
        PayloadOrigin::Loose
    }

    fn draggable(&self) -> Option<&Draggable> {
        Some(&self.drag)
    }

    fn draggable_mut(&mut self) -> Option<&mut Draggable> {
        Some(&mut self.drag)
    }

    fn pointer_down(&mut self, button: PointerButton, mediator: &mut dyn InventoryMediator) -> bool {
        button == PointerButton::Right && mediator.try_add_item(self.item).is_ok()
    }

    /// 把武器栏里的枪拖回地上列表即丢弃
    fn drop_received(&mut self, payload: &DragPayload, mediator: &mut dyn InventoryMediator) -> bool {
        match (payload.origin, payload.item) {
            (PayloadOrigin::WeaponSlot(slot), Some(item)) => mediator.try_remove_item(item, slot).is_ok(),
            _ => false,
        }
    }
}

impl InventoryObserver for LooseItemUi {
    fn on_inventory_change(&mut self, _change: &InventoryChange, _items: &ItemRegistry) {}
}
