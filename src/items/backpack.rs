use std::sync::Arc;

use super::capabilities::*;
use super::error::ItemError;
use super::hand::ItemUserHand;
use crate::data::schema::{ItemDefinition, ItemKind};

/// 背包：背上后扩充通用格子
#[derive(Debug, Clone)]
pub struct BackpackItem {
    core: ItemCore,
}

impl BackpackItem {
    pub fn new(id: ItemId, definition: Arc<ItemDefinition>) -> Self {
        Self {
            core: ItemCore::new(id, definition),
        }
    }

    pub fn extra_capacity(&self) -> usize {
        match &self.definition().kind {
            ItemKind::Backpack(data) => data.extra_capacity,
            _ => 0,
        }
    }
}

impl HasItemCore for BackpackItem {
    fn core(&self) -> &ItemCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ItemCore {
        &mut self.core
    }
}

impl Storable for BackpackItem {
    fn try_store(&mut self, hand: &mut ItemUserHand) -> Result<(), ItemError> {
        self.core.check_holder(hand)?;
        if self.core.location() != ItemLocation::Carried {
            return Err(ItemError::AlreadyStored);
        }
        hand.inventory.try_set_backpack(self.id(), self.extra_capacity())?;
        self.core.set_location(ItemLocation::Stored);
        Ok(())
    }

    fn try_remove(&mut self, hand: &mut ItemUserHand) -> Result<(), ItemError> {
        if self.core.location() != ItemLocation::Stored {
            return Err(ItemError::NotStored);
        }
        self.core.check_holder(hand)?;
        hand.inventory.take_backpack(self.id())?;
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
    fn second_backpack_is_refused_and_stays_on_ground() {
        let catalog = sample_catalog();
        let mut inv = Inventory::new(1, 2);
        let mut hand = ItemUserHand::new(Entity::from_raw(1), &mut inv);
        let mut first = BackpackItem::new(ItemId(1), catalog.get("backpack_lv1").unwrap());
        let mut second = BackpackItem::new(ItemId(2), catalog.get("backpack_lv1").unwrap());

        first.try_store_and_collect(&mut hand).unwrap();
        assert_eq!(hand.inventory.capacity(), 6);
        assert_eq!(
            second.try_store_and_collect(&mut hand),
            Err(ItemError::Inventory(InventoryError::BackpackOccupied))
        );
        assert!(!second.is_collected());
    }

    #[test]
    fn remove_and_drop_fails_while_items_depend_on_it() {
        let catalog = sample_catalog();
        let mut inv = Inventory::new(1, 0);
        let mut hand = ItemUserHand::new(Entity::from_raw(1), &mut inv);
        let mut pack = BackpackItem::new(ItemId(1), catalog.get("backpack_lv1").unwrap());
        pack.try_store_and_collect(&mut hand).unwrap();
        hand.inventory.try_add_common(ItemId(5)).unwrap();

        assert!(matches!(
            pack.try_remove_and_drop(&mut hand),
            Err(ItemError::Inventory(InventoryError::WouldOverflow { .. }))
        ));
        assert_eq!(pack.core().location(), ItemLocation::Stored);
        assert!(pack.is_collected());
    }
}
