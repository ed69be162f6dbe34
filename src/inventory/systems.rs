use super::{components::*, events::*, mediator::*};
use crate::core::events::LogEvent;
use crate::items::hand::Player;
use crate::items::{ItemId, ItemRegistry};
use bevy::prelude::*;
use serde::Serialize;

pub fn spawn_player(mut commands: Commands) {
    commands.spawn((Player, Name::new("player")));
}

/// 处理"collect"——拾取地上物品并放进背包
pub fn collect_item(
    mut ev_collect: EventReader<CollectItemEvent>,
    mut registry: ResMut<ItemRegistry>,
    mut inventory: ResMut<Inventory>,
    mut log: EventWriter<LogEvent>,
    player: Query<Entity, With<Player>>,
) {
    let Ok(holder) = player.single() else {
        return;
    };
    for ev in ev_collect.read() {
        let mut ctx = InventoryContext::new(holder, &mut registry, &mut inventory);
        let name = ctx.registry.name(ev.item).unwrap_or("?").to_string();
        match ctx.try_add_item(ev.item) {
            Ok(()) => log.write(LogEvent(format!("获得 {name} #{}", ev.item))),
            Err(err) => log.write(LogEvent(format!("无法拾取 {name} #{}: {err}", ev.item))),
        };
    }
}

/// 处理"drop"——从背包取出丢到地上
pub fn drop_item(
    mut ev_drop: EventReader<DropItemEvent>,
    mut registry: ResMut<ItemRegistry>,
    mut inventory: ResMut<Inventory>,
    mut log: EventWriter<LogEvent>,
    player: Query<Entity, With<Player>>,
) {
    let Ok(holder) = player.single() else {
        return;
    };
    for ev in ev_drop.read() {
        let mut ctx = InventoryContext::new(holder, &mut registry, &mut inventory);
        let name = ctx.registry.name(ev.item).unwrap_or("?").to_string();
        match ctx.try_remove_and_drop(ev.item) {
            Ok(()) => log.write(LogEvent(format!("丢弃 {name} #{}", ev.item))),
            Err(err) => log.write(LogEvent(format!("无法丢弃 {name} #{}: {err}", ev.item))),
        };
    }
}

fn label(registry: &ItemRegistry, item: ItemId) -> String {
    format!("{} #{item}", registry.name(item).unwrap_or("?"))
}

/// 打印背包内容
pub fn print_inventory(
    mut ev_list: EventReader<ListInventoryEvent>,
    inventory: Res<Inventory>,
    registry: Res<ItemRegistry>,
) {
    if ev_list.is_empty() {
        return;
    }
    ev_list.clear();

    for (idx, slot) in inventory.weapon_slots().iter().enumerate() {
        match slot {
            Some(item) => println!("[武器 {idx}] {}", label(&registry, *item)),
            None => println!("[武器 {idx}] (empty)"),
        }
    }
    match inventory.in_hand() {
        Some(item) => println!("[手上] {}", label(&registry, item)),
        None => println!("[手上] (empty)"),
    }
    match inventory.backpack() {
        Some(item) => println!("[背包] {}", label(&registry, item)),
        None => println!("[背包] (empty)"),
    }
    println!("[格子] {}/{}", inventory.common().len(), inventory.capacity());
    for item in inventory.common() {
        println!("  - {}", label(&registry, *item));
    }
}

#[derive(Serialize)]
struct SnapshotEntry {
    id: ItemId,
    name: String,
}

#[derive(Serialize)]
struct InventorySnapshot<'a> {
    inventory: &'a Inventory,
    names: Vec<SnapshotEntry>,
}

/// 以 JSON 打印背包
pub fn print_snapshot(
    mut ev_snapshot: EventReader<SnapshotInventoryEvent>,
    inventory: Res<Inventory>,
    registry: Res<ItemRegistry>,
    mut log: EventWriter<LogEvent>,
) {
    if ev_snapshot.is_empty() {
        return;
    }
    ev_snapshot.clear();

    let names = registry
        .iter()
        .filter(|(id, _)| inventory.contains(*id) || inventory.in_hand() == Some(*id))
        .map(|(id, item)| SnapshotEntry {
            id,
            name: item.as_identifiable().name().to_string(),
        })
        .collect();
    let snapshot = InventorySnapshot {
        inventory: &inventory,
        names,
    };
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            log.write(LogEvent(format!("无法导出背包: {err}")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::sample_catalog;

    #[test]
    fn collect_and_drop_events_drive_the_inventory() {
        let mut app = App::new();
        let mut registry = ItemRegistry::default();
        let gun = registry.spawn(sample_catalog().get("m416").unwrap());
        app.insert_resource(registry)
            .insert_resource(Inventory::new(2, 4))
            .add_event::<LogEvent>()
            .add_event::<CollectItemEvent>()
            .add_event::<DropItemEvent>()
            .add_systems(Update, (collect_item, drop_item).chain());
        app.world_mut().spawn(Player);

        app.world_mut().send_event(CollectItemEvent { item: gun });
        app.update();
        assert_eq!(app.world().resource::<Inventory>().weapon_at(0), Some(gun));

        app.world_mut().send_event(DropItemEvent { item: gun });
        app.update();
        assert_eq!(app.world().resource::<Inventory>().weapon_at(0), None);
        let registry = app.world().resource::<ItemRegistry>();
        assert_eq!(registry.in_world().collect::<Vec<_>>(), vec![gun]);
    }

    #[test]
    fn snapshot_request_is_consumed_without_error_log() {
        let mut app = App::new();
        let mut registry = ItemRegistry::default();
        let gun = registry.spawn(sample_catalog().get("m416").unwrap());
        app.insert_resource(registry)
            .insert_resource(Inventory::new(2, 4))
            .add_event::<LogEvent>()
            .add_event::<CollectItemEvent>()
            .add_event::<SnapshotInventoryEvent>()
            .add_systems(Update, (collect_item, print_snapshot).chain());
        app.world_mut().spawn(Player);

        app.world_mut().send_event(CollectItemEvent { item: gun });
        app.world_mut().send_event(SnapshotInventoryEvent);
        app.update();

        let logs = app.world().resource::<Events<LogEvent>>();
        let mut cursor = logs.get_cursor();
        let messages: Vec<_> = cursor.read(logs).map(|e| e.0.clone()).collect();
        assert!(messages.iter().all(|m| !m.starts_with("无法导出背包")));
        assert_eq!(messages.len(), 1);
    }
}
