use std::sync::Arc;

use super::capabilities::*;
use super::error::ItemError;
use super::hand::ItemUserHand;
use crate::data::schema::{ItemDefinition, ItemKind};

/// 弹药：只能拾取、存放、丢弃
#[derive(Debug, Clone)]
pub struct AmmoItem {
    core: ItemCore,
    count: u32,
}

impl AmmoItem {
    pub fn new(id: ItemId, definition: Arc<ItemDefinition>) -> Self {
        let count = match &definition.kind {
            ItemKind::Ammo(data) => data.stack,
            _ => 0,
        };
        Self {
            core: ItemCore::new(id, definition),
            count,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

impl HasItemCore for AmmoItem {
    fn core(&self) -> &ItemCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ItemCore {
        &mut self.core
    }
}

impl Storable for AmmoItem {
    fn try_store(&mut self, hand: &mut ItemUserHand) -> Result<(), ItemError> {
        self.core.check_holder(hand)?;
        if self.core.location() != ItemLocation::Carried {
            return Err(ItemError::AlreadyStored);
        }
        hand.inventory.try_add_common(self.id())?;
        self.core.set_location(ItemLocation::Stored);
        Ok(())
    }

    fn try_remove(&mut self, hand: &mut ItemUserHand) -> Result<(), ItemError> {
        if self.core.location() != ItemLocation::Stored {
            return Err(ItemError::NotStored);
        }
        self.core.check_holder(hand)?;
        hand.inventory.take_common(self.id())?;
        self.core.set_location(ItemLocation::Carried);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::sample_catalog;
    use crate::inventory::components::{Inventory, InventoryError};
    use bevy::prelude::Entity;

    #[test]
    fn stack_size_comes_from_definition() {
        let ammo = AmmoItem::new(ItemId(1), sample_catalog().get("ammo_556").unwrap());
        assert_eq!(ammo.count(), 30);
        assert_eq!(ammo.name(), "5.56mm");
    }

    #[test]
    fn full_inventory_leaves_ammo_on_the_ground() {
        let mut inv = Inventory::new(1, 0);
        let mut hand = ItemUserHand::new(Entity::from_raw(1), &mut inv);
        let mut ammo = AmmoItem::new(ItemId(1), sample_catalog().get("ammo_556").unwrap());
        assert_eq!(
            ammo.try_store_and_collect(&mut hand),
            Err(ItemError::Inventory(InventoryError::Full))
        );
        assert_eq!(ammo.core().location(), ItemLocation::World);
    }

    #[test]
    fn other_holder_cannot_remove() {
        let catalog = sample_catalog();
        let mut inv = Inventory::new(1, 4);
        let mut ammo = AmmoItem::new(ItemId(1), catalog.get("ammo_556").unwrap());
        {
            let mut hand = ItemUserHand::new(Entity::from_raw(1), &mut inv);
            ammo.try_store_and_collect(&mut hand).unwrap();
        }
        let mut stranger = ItemUserHand::new(Entity::from_raw(2), &mut inv);
        assert_eq!(ammo.try_remove(&mut stranger), Err(ItemError::InvalidHolder));
        assert!(inv.contains(ItemId(1)));
    }
}
