//! 背包协调者：界面手势与 CLI 通过它修改物品与背包

use bevy::prelude::*;

use super::components::{Inventory, InventoryError};
use crate::data::schema::UiTag;
use crate::items::capabilities::*;
use crate::items::hand::ItemUserHand;
use crate::items::{ItemError, ItemRegistry};

/// 界面控件依赖的最小接口，只看返回的成功与否
pub trait InventoryMediator {
    fn ui_tag_of(&self, item: ItemId) -> Option<UiTag>;

    /// 拾取并存放到与物品种类对应的位置
    fn try_add_item(&mut self, item: ItemId) -> Result<(), ItemError>;

    /// 从指定武器栏取出并丢弃，栏位里必须正是该物品
    fn try_remove_item(&mut self, item: ItemId, slot: usize) -> Result<(), ItemError>;

    /// 交换两个武器栏
    fn swap_items(&mut self, a: usize, b: usize) -> Result<(), ItemError>;

    fn try_remove_and_drop(&mut self, item: ItemId) -> Result<(), ItemError>;
}

/// 开火 / 开镜动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseAction {
    PrimaryStarted,
    PrimaryCanceled,
    SecondaryStarted,
    SecondaryCanceled,
}

/// 一次操作期间对某个持有者的物品表与背包的独占访问
pub struct InventoryContext<'a> {
    pub holder: Entity,
    pub registry: &'a mut ItemRegistry,
    pub inventory: &'a mut Inventory,
}

impl<'a> InventoryContext<'a> {
    pub fn new(holder: Entity, registry: &'a mut ItemRegistry, inventory: &'a mut Inventory) -> Self {
        Self {
            holder,
            registry,
            inventory,
        }
    }

    fn with_storable<R>(
        &mut self,
        item: ItemId,
        f: impl FnOnce(&mut dyn Storable, &mut ItemUserHand<'_>) -> Result<R, ItemError>,
    ) -> Result<R, ItemError> {
        let storable = self
            .registry
            .require_mut(item)?
            .as_storable_mut()
            .ok_or(ItemError::Unsupported)?;
        let mut hand = ItemUserHand::new(self.holder, self.inventory);
        f(storable, &mut hand)
    }

    /// 只拾取到手边（不放进背包），供配件直接装枪
    pub fn try_collect(&mut self, item: ItemId) -> Result<(), ItemError> {
        self.with_storable(item, |s, hand| s.try_collect(hand))
    }

    /// 拿起某个武器栏的枪；手上已有物品时先放下
    pub fn try_hold(&mut self, slot: usize) -> Result<(), ItemError> {
        let item = self
            .inventory
            .weapon_at(slot)
            .ok_or(InventoryError::EmptySlot(slot))?;
        if self.inventory.in_hand().is_some() {
            self.try_put_away()?;
        }
        let holdable = self
            .registry
            .require_mut(item)?
            .as_holdable_mut()
            .ok_or(ItemError::Unsupported)?;
        let mut hand = ItemUserHand::new(self.holder, self.inventory);
        holdable.hold(&mut hand)
    }

    pub fn try_put_away(&mut self) -> Result<PutAwayOutcome, ItemError> {
        let item = self.inventory.in_hand().ok_or(ItemError::NotInHand)?;
        let holdable = self
            .registry
            .require_mut(item)?
            .as_holdable_mut()
            .ok_or(ItemError::Unsupported)?;
        let mut hand = ItemUserHand::new(self.holder, self.inventory);
        holdable.try_put_away(&mut hand)
    }

    /// 对手上的物品执行开火 / 开镜
    pub fn use_in_hand(&mut self, action: UseAction) -> Result<(), ItemError> {
        let item = self.inventory.in_hand().ok_or(ItemError::NotInHand)?;
        let instance = self.registry.require_mut(item)?;
        match action {
            UseAction::PrimaryStarted | UseAction::PrimaryCanceled => {
                let usable = instance.as_primary_usable_mut().ok_or(ItemError::Unsupported)?;
                if action == UseAction::PrimaryStarted {
                    usable.primary_use_started()
                } else {
                    usable.primary_use_canceled()
                }
            }
            UseAction::SecondaryStarted | UseAction::SecondaryCanceled => {
                let usable = instance.as_secondary_usable_mut().ok_or(ItemError::Unsupported)?;
                if action == UseAction::SecondaryStarted {
                    usable.secondary_use_started()
                } else {
                    usable.secondary_use_canceled()
                }
            }
        }
    }

    /// 把配件装到枪上；配件可在背包里或在地上，失败时一切复原
    pub fn try_attach(&mut self, attachment: ItemId, weapon: ItemId) -> Result<(), ItemError> {
        let gun = self
            .registry
            .get(weapon)
            .and_then(|i| i.as_weapon())
            .ok_or(ItemError::UnknownItem(weapon))?;
        let data = gun.data().ok_or(ItemError::Unsupported)?;
        let att = self
            .registry
            .get(attachment)
            .and_then(|i| i.as_attachment())
            .ok_or(ItemError::Unsupported)?;
        if att.attached_to().is_some() {
            return Err(ItemError::AlreadyAttached);
        }
        if !att.is_weapon_compatible(data) {
            return Err(ItemError::Incompatible);
        }
        if let Some(point) = att.point().filter(|p| gun.attachment_at(*p).is_some()) {
            return Err(ItemError::PointOccupied(point));
        }
        if gun.core().location() == ItemLocation::World {
            return Err(ItemError::NotCollected);
        }

        let origin = location_of(self.registry, attachment);
        match origin {
            ItemLocation::Stored => self.with_storable(attachment, |s, hand| s.try_remove(hand))?,
            ItemLocation::World => self.try_collect(attachment)?,
            ItemLocation::Carried => {}
            _ => return Err(ItemError::AlreadyAttached),
        }

        let attached = self
            .registry
            .with_attachment_and_weapon(attachment, weapon, |att, gun| att.attach_to_weapon(gun));
        if let Err(err) = attached {
            // 复原到原来的位置
            match origin {
                ItemLocation::Stored => self.with_storable(attachment, |s, hand| s.try_store(hand))?,
                ItemLocation::World => self.with_storable(attachment, |s, _| s.drop_item())?,
                _ => {}
            }
            return Err(err);
        }
        Ok(())
    }

    /// 卸下配件放回背包；背包放不下时保持装在枪上
    pub fn try_detach(&mut self, attachment: ItemId) -> Result<(), ItemError> {
        let weapon = self
            .registry
            .get(attachment)
            .and_then(|i| i.as_attachment())
            .ok_or(ItemError::Unsupported)?
            .attached_to()
            .ok_or(ItemError::NotAttached)?;
        if location_of(self.registry, weapon) == ItemLocation::World {
            return Err(ItemError::NotCollected);
        }
        if self.inventory.common().len() >= self.inventory.capacity() {
            return Err(InventoryError::Full.into());
        }
        self.registry
            .with_attachment_and_weapon(attachment, weapon, |att, gun| att.detach_from_weapon(gun))?;
        if let Err(err) = self.with_storable(attachment, |s, hand| s.try_store(hand)) {
            self.registry
                .with_attachment_and_weapon(attachment, weapon, |att, gun| att.attach_to_weapon(gun))?;
            return Err(err);
        }
        Ok(())
    }
}

fn location_of(registry: &ItemRegistry, item: ItemId) -> ItemLocation {
    registry
        .get(item)
        .map(|i| i.location())
        .unwrap_or(ItemLocation::World)
}

impl InventoryMediator for InventoryContext<'_> {
    fn ui_tag_of(&self, item: ItemId) -> Option<UiTag> {
        self.registry.definition(item).map(|d| d.ui_tag)
    }

    fn try_add_item(&mut self, item: ItemId) -> Result<(), ItemError> {
        let result = self.with_storable(item, |s, hand| s.try_store_and_collect(hand));
        match &result {
            Ok(()) => info!("拾取 {}", self.registry.name(item).unwrap_or("?")),
            Err(err) => debug!("拾取 #{item} 失败: {err}"),
        }
        result
    }

    fn try_remove_item(&mut self, item: ItemId, slot: usize) -> Result<(), ItemError> {
        if self.inventory.weapon_at(slot) != Some(item) {
            return Err(InventoryError::NotPresent.into());
        }
        self.try_remove_and_drop(item)
    }

    fn swap_items(&mut self, a: usize, b: usize) -> Result<(), ItemError> {
        self.inventory.swap_weapon_slots(a, b)?;
        debug!("交换武器栏 {a} <-> {b}");
        Ok(())
    }

    fn try_remove_and_drop(&mut self, item: ItemId) -> Result<(), ItemError> {
        let result = self.with_storable(item, |s, hand| s.try_remove_and_drop(hand));
        match &result {
            Ok(()) => info!("丢弃 {}", self.registry.name(item).unwrap_or("?")),
            Err(err) => debug!("丢弃 #{item} 失败: {err}"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::sample_catalog;
    use crate::inventory::events::InventoryChange;

    struct World {
        registry: ItemRegistry,
        inventory: Inventory,
    }

    impl World {
        fn new() -> Self {
            Self {
                registry: ItemRegistry::default(),
                inventory: Inventory::new(2, 2),
            }
        }

        fn spawn(&mut self, def: &str) -> ItemId {
            self.registry.spawn(sample_catalog().get(def).unwrap())
        }

        fn ctx(&mut self) -> InventoryContext<'_> {
            InventoryContext::new(Entity::from_raw(1), &mut self.registry, &mut self.inventory)
        }
    }

    #[test]
    fn add_item_routes_by_kind() {
        let mut w = World::new();
        let gun = w.spawn("m416");
        let ammo = w.spawn("ammo_556");
        let pack = w.spawn("backpack_lv1");
        let mut ctx = w.ctx();
        ctx.try_add_item(gun).unwrap();
        ctx.try_add_item(ammo).unwrap();
        ctx.try_add_item(pack).unwrap();
        assert_eq!(ctx.try_add_item(gun), Err(ItemError::AlreadyCollected));

        assert_eq!(w.inventory.weapon_at(0), Some(gun));
        assert_eq!(w.inventory.common(), &[ammo]);
        assert_eq!(w.inventory.backpack(), Some(pack));
    }

    #[test]
    fn swap_exchanges_items_in_one_step() {
        let mut w = World::new();
        let x = w.spawn("m416");
        let y = w.spawn("p92");
        let mut ctx = w.ctx();
        ctx.try_add_item(x).unwrap();
        ctx.try_add_item(y).unwrap();
        ctx.inventory.drain_changes();

        ctx.swap_items(0, 1).unwrap();
        assert_eq!(w.inventory.weapon_slots(), &[Some(y), Some(x)]);
        let changes = w.inventory.drain_changes();
        assert_eq!(changes.len(), 1);
        assert!(matches!(changes[0], InventoryChange::WeaponSlotsSwapped { .. }));
    }

    #[test]
    fn remove_item_checks_the_slot() {
        let mut w = World::new();
        let gun = w.spawn("m416");
        let mut ctx = w.ctx();
        ctx.try_add_item(gun).unwrap();
        assert_eq!(
            ctx.try_remove_item(gun, 1),
            Err(ItemError::Inventory(InventoryError::NotPresent))
        );
        ctx.try_remove_item(gun, 0).unwrap();
        assert_eq!(w.registry.get(gun).unwrap().location(), ItemLocation::World);
        assert_eq!(w.inventory.weapon_at(0), None);
    }

    #[test]
    fn holding_another_weapon_puts_the_first_away() {
        let mut w = World::new();
        let a = w.spawn("m416");
        let b = w.spawn("akm");
        let mut ctx = w.ctx();
        ctx.try_add_item(a).unwrap();
        ctx.try_add_item(b).unwrap();
        ctx.try_hold(0).unwrap();
        ctx.use_in_hand(UseAction::PrimaryStarted).unwrap();

        ctx.try_hold(1).unwrap();
        assert_eq!(ctx.inventory.in_hand(), Some(b));
        assert_eq!(ctx.inventory.weapon_at(0), Some(a));
        let first = ctx.registry.get(a).unwrap().as_weapon().unwrap();
        assert!(!first.is_firing());
        assert_eq!(ctx.try_hold(1), Err(ItemError::Inventory(InventoryError::EmptySlot(1))));
    }

    #[test]
    fn use_without_anything_in_hand_fails() {
        let mut w = World::new();
        let mut ctx = w.ctx();
        assert_eq!(ctx.use_in_hand(UseAction::SecondaryStarted), Err(ItemError::NotInHand));
        assert_eq!(ctx.try_put_away(), Err(ItemError::NotInHand));
    }

    #[test]
    fn attach_from_storage_and_detach_back() {
        let mut w = World::new();
        let gun = w.spawn("m416");
        let sight = w.spawn("red_dot");
        let mut ctx = w.ctx();
        ctx.try_add_item(gun).unwrap();
        ctx.try_add_item(sight).unwrap();

        ctx.try_attach(sight, gun).unwrap();
        assert!(ctx.inventory.common().is_empty());
        assert_eq!(
            ctx.registry.get(sight).unwrap().location(),
            ItemLocation::Attached(gun)
        );

        ctx.try_detach(sight).unwrap();
        assert_eq!(ctx.inventory.common(), &[sight]);
        let weapon = ctx.registry.get(gun).unwrap().as_weapon().unwrap();
        assert!(weapon.attachments().is_empty());
    }

    #[test]
    fn incompatible_attach_leaves_attachment_stored() {
        let mut w = World::new();
        let pistol = w.spawn("p92");
        let sight = w.spawn("red_dot");
        let mut ctx = w.ctx();
        ctx.try_add_item(pistol).unwrap();
        ctx.try_add_item(sight).unwrap();

        assert_eq!(ctx.try_attach(sight, pistol), Err(ItemError::Incompatible));
        assert_eq!(ctx.inventory.common(), &[sight]);
        assert_eq!(ctx.registry.get(sight).unwrap().location(), ItemLocation::Stored);
    }

    #[test]
    fn attach_picks_up_a_ground_attachment() {
        let mut w = World::new();
        let gun = w.spawn("m416");
        let muzzle = w.spawn("compensator");
        let mut ctx = w.ctx();
        ctx.try_add_item(gun).unwrap();
        ctx.try_attach(muzzle, gun).unwrap();
        assert_eq!(ctx.registry.get(muzzle).unwrap().holder(), Some(Entity::from_raw(1)));
    }

    #[test]
    fn detach_refused_when_inventory_full() {
        let mut w = World::new();
        let gun = w.spawn("m416");
        let sight = w.spawn("red_dot");
        let a = w.spawn("ammo_556");
        let b = w.spawn("ammo_556");
        let mut ctx = w.ctx();
        ctx.try_add_item(gun).unwrap();
        ctx.try_attach(sight, gun).unwrap();
        ctx.try_add_item(a).unwrap();
        ctx.try_add_item(b).unwrap();

        assert_eq!(
            ctx.try_detach(sight),
            Err(ItemError::Inventory(InventoryError::Full))
        );
        assert_eq!(
            ctx.registry.get(sight).unwrap().location(),
            ItemLocation::Attached(gun)
        );
    }

    #[test]
    fn detach_from_a_ground_weapon_is_refused() {
        let mut w = World::new();
        let gun = w.spawn("m416");
        let sight = w.spawn("red_dot");
        let mut ctx = w.ctx();
        ctx.try_add_item(gun).unwrap();
        ctx.try_attach(sight, gun).unwrap();
        ctx.try_remove_and_drop(gun).unwrap();
        assert_eq!(ctx.registry.get(gun).unwrap().location(), ItemLocation::World);

        assert_eq!(ctx.try_detach(sight), Err(ItemError::NotCollected));
        assert!(ctx.inventory.common().is_empty());
        assert_eq!(
            ctx.registry.get(sight).unwrap().location(),
            ItemLocation::Attached(gun)
        );
    }
}
