use bevy::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::capabilities::*;
use super::error::ItemError;
use super::hand::ItemUserHand;
use crate::data::schema::{AttachmentPoint, ItemDefinition, WeaponData};

/// 枪：可存放、可拿在手上、可开火（主要用途）与开镜（次要用途）
#[derive(Debug, Clone)]
pub struct WeaponItem {
    core: ItemCore,
    firing: bool,
    aiming: bool,
    attachments: BTreeMap<AttachmentPoint, ItemId>,
}

impl WeaponItem {
    pub fn new(id: ItemId, definition: Arc<ItemDefinition>) -> Self {
        Self {
            core: ItemCore::new(id, definition),
            firing: false,
            aiming: false,
            attachments: BTreeMap::new(),
        }
    }

    pub fn data(&self) -> Option<&WeaponData> {
        self.definition().weapon_data()
    }

    pub fn is_firing(&self) -> bool {
        self.firing
    }

    pub fn is_aiming(&self) -> bool {
        self.aiming
    }

    pub fn attachments(&self) -> &BTreeMap<AttachmentPoint, ItemId> {
        &self.attachments
    }

    pub fn attachment_at(&self, point: AttachmentPoint) -> Option<ItemId> {
        self.attachments.get(&point).copied()
    }

    pub(crate) fn mount(&mut self, point: AttachmentPoint, attachment: ItemId) -> Result<(), ItemError> {
        if self.attachments.contains_key(&point) {
            return Err(ItemError::PointOccupied(point));
        }
        self.attachments.insert(point, attachment);
        Ok(())
    }

    pub(crate) fn unmount(&mut self, point: AttachmentPoint, attachment: ItemId) -> Result<(), ItemError> {
        if self.attachments.get(&point) != Some(&attachment) {
            return Err(ItemError::NotAttached);
        }
        self.attachments.remove(&point);
        Ok(())
    }
}

impl HasItemCore for WeaponItem {
    fn core(&self) -> &ItemCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ItemCore {
        &mut self.core
    }
}

impl Storable for WeaponItem {
    fn try_store(&mut self, hand: &mut ItemUserHand) -> Result<(), ItemError> {
        self.core.check_holder(hand)?;
        if self.core.location() != ItemLocation::Carried {
            return Err(ItemError::AlreadyStored);
        }
        let slot = hand.inventory.try_add_weapon(self.id())?;
        self.core.set_location(ItemLocation::Stored);
        debug!("{} 放入武器栏 {slot}", self.name());
        Ok(())
    }

    fn try_remove(&mut self, hand: &mut ItemUserHand) -> Result<(), ItemError> {
        if self.core.location() != ItemLocation::Stored {
            return Err(ItemError::NotStored);
        }
        self.core.check_holder(hand)?;
        hand.inventory.take_weapon(self.id())?;
        self.core.set_location(ItemLocation::Carried);
        Ok(())
    }
}

impl Holdable for WeaponItem {
    fn is_in_hand(&self) -> bool {
        self.core.location() == ItemLocation::InHand
    }

    fn hold(&mut self, hand: &mut ItemUserHand) -> Result<(), ItemError> {
        if self.is_in_hand() {
            return Err(ItemError::AlreadyInHand);
        }
        self.core.check_holder(hand)?;
        if hand.inventory.in_hand().is_some() {
            return Err(ItemError::HandOccupied);
        }
        match self.core.location() {
            ItemLocation::Stored => {
                hand.inventory.take_weapon(self.id())?;
            }
            ItemLocation::Carried => {}
            _ => return Err(ItemError::NotCollected),
        }
        hand.inventory.set_in_hand(Some(self.id()));
        self.core.set_location(ItemLocation::InHand);
        Ok(())
    }

    fn try_put_away(&mut self, hand: &mut ItemUserHand) -> Result<PutAwayOutcome, ItemError> {
        if !self.is_in_hand() {
            return Err(ItemError::NotInHand);
        }
        self.core.check_holder(hand)?;
        self.firing = false;
        self.aiming = false;
        hand.inventory.set_in_hand(None);
        self.core.set_location(ItemLocation::Carried);

        if self.try_store(hand).is_ok() {
            return Ok(PutAwayOutcome::Stored);
        }
        self.drop_item()?;
        Ok(PutAwayOutcome::Dropped)
    }
}

impl PrimaryUsable for WeaponItem {
    fn primary_use_started(&mut self) -> Result<(), ItemError> {
        if !self.is_in_hand() {
            return Err(ItemError::NotInHand);
        }
        if self.firing {
            return Err(ItemError::AlreadyInUse);
        }
        self.firing = true;
        Ok(())
    }

    fn primary_use_canceled(&mut self) -> Result<(), ItemError> {
        if !self.firing {
            return Err(ItemError::NotInUse);
        }
        self.firing = false;
        Ok(())
    }
}

impl SecondaryUsable for WeaponItem {
    fn secondary_use_started(&mut self) -> Result<(), ItemError> {
        if !self.is_in_hand() {
            return Err(ItemError::NotInHand);
        }
        if self.aiming {
            return Err(ItemError::AlreadyInUse);
        }
        self.aiming = true;
        Ok(())
    }

    fn secondary_use_canceled(&mut self) -> Result<(), ItemError> {
        if !self.aiming {
            return Err(ItemError::NotInUse);
        }
        self.aiming = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::sample_catalog;
    use crate::inventory::components::Inventory;

    fn rifle(id: u64) -> WeaponItem {
        WeaponItem::new(ItemId(id), sample_catalog().get("m416").unwrap())
    }

    fn holder() -> Entity {
        Entity::from_raw(7)
    }

    #[test]
    fn second_collect_fails() {
        let mut inv = Inventory::new(2, 4);
        let mut hand = ItemUserHand::new(holder(), &mut inv);
        let mut gun = rifle(1);
        assert!(gun.try_collect(&mut hand).is_ok());
        assert_eq!(gun.try_collect(&mut hand), Err(ItemError::AlreadyCollected));
        assert!(gun.is_collected());
    }

    #[test]
    fn placeholder_holder_cannot_collect() {
        let mut inv = Inventory::new(2, 4);
        let mut hand = ItemUserHand::new(Entity::PLACEHOLDER, &mut inv);
        let mut gun = rifle(1);
        assert_eq!(gun.try_collect(&mut hand), Err(ItemError::InvalidHolder));
        assert!(!gun.is_collected());
    }

    #[test]
    fn store_then_remove_restores_carried_state() {
        let mut inv = Inventory::new(2, 4);
        let mut hand = ItemUserHand::new(holder(), &mut inv);
        let mut gun = rifle(1);
        gun.try_collect(&mut hand).unwrap();
        let before = (gun.is_collected(), gun.core().location(), gun.is_in_hand());

        gun.try_store(&mut hand).unwrap();
        assert_eq!(gun.try_store(&mut hand), Err(ItemError::AlreadyStored));
        gun.try_remove(&mut hand).unwrap();

        assert_eq!(before, (gun.is_collected(), gun.core().location(), gun.is_in_hand()));
        assert!(!inv.contains(ItemId(1)));
    }

    #[test]
    fn store_and_collect_rolls_back_when_slots_are_full() {
        let mut inv = Inventory::new(1, 4);
        inv.try_add_weapon(ItemId(50)).unwrap();
        let mut hand = ItemUserHand::new(holder(), &mut inv);
        let mut gun = rifle(1);

        let err = gun.try_store_and_collect(&mut hand).unwrap_err();
        assert!(matches!(err, ItemError::Inventory(_)));
        assert!(!gun.is_collected());
        assert_eq!(gun.core().location(), ItemLocation::World);
    }

    #[test]
    fn remove_and_drop_requires_stored_item() {
        let mut inv = Inventory::new(2, 4);
        let mut hand = ItemUserHand::new(holder(), &mut inv);
        let mut gun = rifle(1);
        assert_eq!(gun.try_remove_and_drop(&mut hand), Err(ItemError::NotStored));

        gun.try_store_and_collect(&mut hand).unwrap();
        gun.try_remove_and_drop(&mut hand).unwrap();
        assert_eq!(gun.core().location(), ItemLocation::World);
        assert!(!gun.is_collected());
    }

    #[test]
    fn put_away_stores_when_a_slot_is_free() {
        let mut inv = Inventory::new(1, 4);
        let mut hand = ItemUserHand::new(holder(), &mut inv);
        let mut gun = rifle(1);
        gun.try_store_and_collect(&mut hand).unwrap();
        gun.hold(&mut hand).unwrap();
        assert_eq!(hand.inventory.in_hand(), Some(ItemId(1)));
        assert_eq!(hand.inventory.weapon_at(0), None);

        assert_eq!(gun.try_put_away(&mut hand), Ok(PutAwayOutcome::Stored));
        assert_eq!(hand.inventory.weapon_at(0), Some(ItemId(1)));
        assert_eq!(hand.inventory.in_hand(), None);
    }

    #[test]
    fn put_away_drops_when_slots_are_full() {
        let mut inv = Inventory::new(1, 4);
        let mut hand = ItemUserHand::new(holder(), &mut inv);
        let mut gun = rifle(1);
        let mut other = rifle(2);
        gun.try_store_and_collect(&mut hand).unwrap();
        gun.hold(&mut hand).unwrap();
        other.try_store_and_collect(&mut hand).unwrap();

        assert_eq!(gun.try_put_away(&mut hand), Ok(PutAwayOutcome::Dropped));
        assert_eq!(gun.core().location(), ItemLocation::World);
        assert!(!hand.inventory.contains(ItemId(1)));
        assert_eq!(hand.inventory.in_hand(), None);
    }

    #[test]
    fn cancel_without_start_is_a_failed_noop() {
        let mut inv = Inventory::new(1, 4);
        let mut hand = ItemUserHand::new(holder(), &mut inv);
        let mut gun = rifle(1);
        assert_eq!(gun.primary_use_canceled(), Err(ItemError::NotInUse));
        assert_eq!(gun.secondary_use_canceled(), Err(ItemError::NotInUse));
        assert_eq!(gun.primary_use_started(), Err(ItemError::NotInHand));

        gun.try_store_and_collect(&mut hand).unwrap();
        gun.hold(&mut hand).unwrap();
        gun.primary_use_started().unwrap();
        gun.secondary_use_started().unwrap();
        assert!(gun.is_firing() && gun.is_aiming());
        gun.primary_use_canceled().unwrap();
        assert_eq!(gun.primary_use_canceled(), Err(ItemError::NotInUse));

        gun.try_put_away(&mut hand).unwrap();
        assert!(!gun.is_aiming());
    }

    #[test]
    fn hand_holds_one_item_at_a_time() {
        let mut inv = Inventory::new(2, 4);
        let mut hand = ItemUserHand::new(holder(), &mut inv);
        let mut a = rifle(1);
        let mut b = rifle(2);
        a.try_store_and_collect(&mut hand).unwrap();
        b.try_store_and_collect(&mut hand).unwrap();
        a.hold(&mut hand).unwrap();
        assert_eq!(b.hold(&mut hand), Err(ItemError::HandOccupied));
        assert_eq!(b.core().location(), ItemLocation::Stored);
    }
}
