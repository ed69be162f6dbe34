use super::{actions::describe_use_action, events::*};
use crate::core::events::LogEvent;
use crate::inventory::components::Inventory;
use crate::inventory::mediator::InventoryContext;
use crate::items::capabilities::PutAwayOutcome;
use crate::items::hand::Player;
use crate::items::ItemRegistry;
use bevy::prelude::*;

/// 拿起武器
pub fn hold_item(
    mut ev_hold: EventReader<HoldEvent>,
    mut registry: ResMut<ItemRegistry>,
    mut inventory: ResMut<Inventory>,
    mut log_event: EventWriter<LogEvent>,
    player: Query<Entity, With<Player>>,
) {
    let Ok(holder) = player.single() else {
        return;
    };
    for ev in ev_hold.read() {
        let mut ctx = InventoryContext::new(holder, &mut registry, &mut inventory);
        match ctx.try_hold(ev.slot) {
            Ok(()) => {
                let name = ctx
                    .inventory
                    .in_hand()
                    .and_then(|id| ctx.registry.name(id))
                    .unwrap_or("?");
                log_event.write(LogEvent(format!("拿起 {name}")));
            }
            Err(err) => {
                log_event.write(LogEvent(format!("无法拿起武器栏 {}: {err}", ev.slot)));
            }
        }
    }
}

/// 收起手上的武器：有空位放回，否则丢在地上
pub fn put_away_item(
    mut ev_put_away: EventReader<PutAwayEvent>,
    mut registry: ResMut<ItemRegistry>,
    mut inventory: ResMut<Inventory>,
    mut log_event: EventWriter<LogEvent>,
    player: Query<Entity, With<Player>>,
) {
    let Ok(holder) = player.single() else {
        return;
    };
    for _ in ev_put_away.read() {
        let mut ctx = InventoryContext::new(holder, &mut registry, &mut inventory);
        let msg = match ctx.try_put_away() {
            Ok(PutAwayOutcome::Stored) => "已收回武器栏".to_string(),
            Ok(PutAwayOutcome::Dropped) => "武器栏已满，武器丢在地上".to_string(),
            Err(err) => format!("无法收起: {err}"),
        };
        log_event.write(LogEvent(msg));
    }
}

/// 开火 / 开镜
pub fn use_item(
    mut ev_use: EventReader<UseEvent>,
    mut registry: ResMut<ItemRegistry>,
    mut inventory: ResMut<Inventory>,
    mut log_event: EventWriter<LogEvent>,
    player: Query<Entity, With<Player>>,
) {
    let Ok(holder) = player.single() else {
        return;
    };
    for ev in ev_use.read() {
        let mut ctx = InventoryContext::new(holder, &mut registry, &mut inventory);
        let what = describe_use_action(ev.action);
        match ctx.use_in_hand(ev.action) {
            Ok(()) => log_event.write(LogEvent(what.to_string())),
            Err(err) => log_event.write(LogEvent(format!("无法{what}: {err}"))),
        };
    }
}

pub fn attach_item(
    mut ev_attach: EventReader<AttachEvent>,
    mut registry: ResMut<ItemRegistry>,
    mut inventory: ResMut<Inventory>,
    mut log_event: EventWriter<LogEvent>,
    player: Query<Entity, With<Player>>,
) {
    let Ok(holder) = player.single() else {
        return;
    };
    for ev in ev_attach.read() {
        let mut ctx = InventoryContext::new(holder, &mut registry, &mut inventory);
        match ctx.try_attach(ev.attachment, ev.weapon) {
            Ok(()) => log_event.write(LogEvent(format!(
                "配件 #{} 已装到 #{}",
                ev.attachment, ev.weapon
            ))),
            Err(err) => log_event.write(LogEvent(format!("无法安装配件: {err}"))),
        };
    }
}

pub fn detach_item(
    mut ev_detach: EventReader<DetachEvent>,
    mut registry: ResMut<ItemRegistry>,
    mut inventory: ResMut<Inventory>,
    mut log_event: EventWriter<LogEvent>,
    player: Query<Entity, With<Player>>,
) {
    let Ok(holder) = player.single() else {
        return;
    };
    for ev in ev_detach.read() {
        let mut ctx = InventoryContext::new(holder, &mut registry, &mut inventory);
        match ctx.try_detach(ev.attachment) {
            Ok(()) => log_event.write(LogEvent(format!("配件 #{} 已放回背包", ev.attachment))),
            Err(err) => log_event.write(LogEvent(format!("无法卸下配件: {err}"))),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::sample_catalog;
    use crate::inventory::mediator::{InventoryMediator, UseAction};

    #[test]
    fn hold_fire_and_put_away_through_events() {
        let mut app = App::new();
        let mut registry = ItemRegistry::default();
        let gun = registry.spawn(sample_catalog().get("m416").unwrap());
        app.add_event::<LogEvent>()
            .add_event::<HoldEvent>()
            .add_event::<PutAwayEvent>()
            .add_event::<UseEvent>()
            .add_systems(Update, (hold_item, use_item, put_away_item).chain());
        let holder = app.world_mut().spawn(Player).id();

        let mut inventory = Inventory::new(2, 4);
        InventoryContext::new(holder, &mut registry, &mut inventory)
            .try_add_item(gun)
            .unwrap();
        app.insert_resource(registry).insert_resource(inventory);

        app.world_mut().send_event(HoldEvent { slot: 0 });
        app.world_mut().send_event(UseEvent {
            action: UseAction::PrimaryStarted,
        });
        app.update();
        assert_eq!(app.world().resource::<Inventory>().in_hand(), Some(gun));
        let weapon = app.world().resource::<ItemRegistry>().get(gun).unwrap();
        assert!(weapon.as_weapon().unwrap().is_firing());

        app.world_mut().send_event(PutAwayEvent);
        app.update();
        let inventory = app.world().resource::<Inventory>();
        assert_eq!(inventory.in_hand(), None);
        assert_eq!(inventory.weapon_at(0), Some(gun));
    }
}
