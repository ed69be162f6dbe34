//! 手势接口：宿主（这里是 CLI）发出指针事件，控件实现处理逻辑

use bevy::prelude::*;

use super::components::Draggable;
use crate::inventory::events::InventoryChange;
use crate::inventory::mediator::InventoryMediator;
use crate::items::{ItemId, ItemRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    PointerDown(PointerButton),
    BeginDrag,
    Drag { delta: Vec2 },
    EndDrag,
    /// `source` 正在拖拽的控件被放到目标上
    Drop { source: Entity },
}

/// 同一指针的手势按顺序到达：BeginDrag → Drag* → Drop → EndDrag
#[derive(Event, Debug, Clone)]
pub struct GestureEvent {
    pub target: Entity,
    pub gesture: Gesture,
}

/// 拖拽物来自哪种控件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadOrigin {
    WeaponSlot(usize),
    Backpack,
    Loose,
}

/// 放置目标看到的拖拽物
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragPayload {
    pub source: Entity,
    pub item: Option<ItemId>,
    pub origin: PayloadOrigin,
}

pub trait GestureHandler {
    fn stored_item(&self) -> Option<ItemId>;

    fn payload_origin(&self) -> PayloadOrigin;

    /// 不可拖拽的控件返回 None
    fn draggable(&self) -> Option<&Draggable> {
        None
    }

    fn draggable_mut(&mut self) -> Option<&mut Draggable> {
        None
    }

    /// 返回是否触发了成功的领域操作
    fn pointer_down(&mut self, button: PointerButton, mediator: &mut dyn InventoryMediator) -> bool;

    /// 校验分类标签后执行领域操作；只有成功时才返回 true
    fn drop_received(&mut self, payload: &DragPayload, mediator: &mut dyn InventoryMediator) -> bool;
}

/// 订阅背包变更通知的控件
pub trait InventoryObserver {
    fn on_inventory_change(&mut self, change: &InventoryChange, items: &ItemRegistry);
}
