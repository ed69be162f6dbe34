use bevy::prelude::*;
use std::collections::BTreeMap;

use super::backpack_slot::BackpackSlotUi;
use super::channel::EventChannel;
use super::components::{UiRoot, WidgetTransform};
use super::gestures::*;
use super::loose_item::LooseItemUi;
use super::weapon_slot::WeaponSlotUi;
use super::widget::SlotWidget;
use crate::core::resources::GameConfig;
use crate::inventory::components::Inventory;
use crate::inventory::events::InventoryChange;
use crate::inventory::mediator::InventoryContext;
use crate::items::hand::Player;
use crate::items::{ItemId, ItemRegistry};

/// 武器栏之间的间距
const WEAPON_SLOT_SPACING: f32 = 120.0;
/// 地上列表每行高度
const GROUND_ROW_HEIGHT: f32 = 40.0;

/// 搭出画布的固定节点与武器栏、背包格
pub fn spawn_slot_widgets(mut commands: Commands, config: Res<GameConfig>) {
    let canvas = commands.spawn(Name::new("canvas")).id();
    let root = UiRoot {
        canvas,
        overlay: commands.spawn(Name::new("overlay")).id(),
        weapon_panel: commands.spawn(Name::new("weapon_panel")).id(),
        backpack_panel: commands.spawn(Name::new("backpack_panel")).id(),
        ground_panel: commands.spawn(Name::new("ground_panel")).id(),
    };

    for index in 0..config.weapon_slots {
        let home = WidgetTransform {
            position: Vec2::new(index as f32 * WEAPON_SLOT_SPACING, 0.0),
            parent: root.weapon_panel,
        };
        commands.spawn((
            Name::new(format!("weapon_slot_{index}")),
            SlotWidget::Weapon(WeaponSlotUi::new(index, home)),
        ));
    }
    commands.spawn((
        Name::new("backpack_slot"),
        SlotWidget::Backpack(BackpackSlotUi::default()),
    ));
    commands.insert_resource(root);
}

/// 新控件订阅背包通知
pub fn subscribe_new_widgets(
    added: Query<Entity, Added<SlotWidget>>,
    mut channel: ResMut<EventChannel<InventoryChange>>,
) {
    for entity in &added {
        channel.subscribe(entity);
    }
}

/// 控件被移除时退订
pub fn unsubscribe_removed_widgets(
    mut removed: RemovedComponents<SlotWidget>,
    mut channel: ResMut<EventChannel<InventoryChange>>,
) {
    for entity in removed.read() {
        channel.unsubscribe(entity);
    }
}

/// 把背包变更搬进通知频道
pub fn publish_inventory_changes(
    mut inventory: ResMut<Inventory>,
    mut channel: ResMut<EventChannel<InventoryChange>>,
) {
    for change in inventory.drain_changes() {
        channel.raise(change);
    }
}

/// 把通知交给订阅的控件
pub fn deliver_inventory_changes(
    mut channel: ResMut<EventChannel<InventoryChange>>,
    mut widgets: Query<&mut SlotWidget>,
    registry: Res<ItemRegistry>,
) {
    channel.broadcast(|subscriber, change| {
        if let Ok(mut widget) = widgets.get_mut(subscriber) {
            widget.on_inventory_change(change, &registry);
        }
    });
}

/// 地上物品列表跟随物品位置：新落地的生成控件，离开地面的回收
pub fn sync_loose_widgets(
    mut commands: Commands,
    registry: Res<ItemRegistry>,
    widgets: Query<(Entity, &SlotWidget)>,
    root: Res<UiRoot>,
) {
    let mut existing: BTreeMap<ItemId, Entity> = BTreeMap::new();
    for (entity, widget) in &widgets {
        if let SlotWidget::Loose(loose) = widget {
            existing.insert(loose.item(), entity);
        }
    }

    let mut row = existing.len();
    for item in registry.in_world() {
        if existing.remove(&item).is_some() {
            continue;
        }
        let Some(def) = registry.definition(item) else {
            continue;
        };
        let transform = WidgetTransform {
            position: Vec2::new(0.0, -(row as f32) * GROUND_ROW_HEIGHT),
            parent: root.ground_panel,
        };
        row += 1;
        commands.spawn((
            Name::new(format!("ground_item_{item}")),
            SlotWidget::Loose(LooseItemUi::new(item, def, transform)),
        ));
    }

    // 剩下的都已不在地上
    for entity in existing.into_values() {
        commands.entity(entity).despawn();
    }
}

/// 宿主分派器：按顺序把手势交给目标控件
pub fn dispatch_gestures(
    mut gestures: EventReader<GestureEvent>,
    mut widgets: Query<&mut SlotWidget>,
    mut registry: ResMut<ItemRegistry>,
    mut inventory: ResMut<Inventory>,
    root: Res<UiRoot>,
    config: Res<GameConfig>,
    player: Query<Entity, With<Player>>,
) {
    let Ok(holder) = player.single() else {
        return;
    };
    for ev in gestures.read() {
        let mut ctx = InventoryContext::new(holder, &mut registry, &mut inventory);
        match ev.gesture {
            Gesture::PointerDown(button) => {
                if let Ok(mut widget) = widgets.get_mut(ev.target) {
                    let ok = widget.handler_mut().pointer_down(button, &mut ctx);
                    debug!("{} 按下 {button:?}: {ok}", widget.handle());
                }
            }
            Gesture::BeginDrag => {
                if let Ok(mut widget) = widgets.get_mut(ev.target) {
                    if let Some(drag) = widget.handler_mut().draggable_mut() {
                        drag.begin(root.overlay, config.drag_alpha);
                    }
                }
            }
            Gesture::Drag { delta } => {
                if let Ok(mut widget) = widgets.get_mut(ev.target) {
                    if let Some(drag) = widget.handler_mut().draggable_mut() {
                        drag.drag(delta, config.canvas_scale_factor);
                    }
                }
            }
            Gesture::EndDrag => {
                if let Ok(mut widget) = widgets.get_mut(ev.target) {
                    if let Some(drag) = widget.handler_mut().draggable_mut() {
                        if drag.end() {
                            debug!("{} 拖拽未成功，回到原位", widget.handle());
                        }
                    }
                }
            }
            Gesture::Drop { source } => {
                if source == ev.target {
                    continue;
                }
                let Some(payload) = widgets.get(source).ok().and_then(|w| w.payload(source)) else {
                    continue;
                };
                let Ok(mut target) = widgets.get_mut(ev.target) else {
                    continue;
                };
                if !target.handler_mut().drop_received(&payload, &mut ctx) {
                    debug!("{} 忽略放置", target.handle());
                    continue;
                }
                if let Ok(mut source_widget) = widgets.get_mut(source) {
                    if let Some(drag) = source_widget.handler_mut().draggable_mut() {
                        drag.mark_success();
                    }
                }
            }
        }
    }
}
