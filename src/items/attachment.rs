use bevy::prelude::*;
use std::sync::Arc;

use super::capabilities::*;
use super::error::ItemError;
use super::hand::ItemUserHand;
use super::weapon::WeaponItem;
use crate::data::schema::{AttachmentData, AttachmentPoint, ItemDefinition, ItemKind, WeaponData};

/// 枪械配件：枪口、瞄具、握把、弹匣、枪托
#[derive(Debug, Clone)]
pub struct AttachmentItem {
    core: ItemCore,
    attached_to: Option<ItemId>,
}

impl AttachmentItem {
    pub fn new(id: ItemId, definition: Arc<ItemDefinition>) -> Self {
        Self {
            core: ItemCore::new(id, definition),
            attached_to: None,
        }
    }

    fn data(&self) -> Option<&AttachmentData> {
        match &self.definition().kind {
            ItemKind::Attachment(data) => Some(data),
            _ => None,
        }
    }

    pub fn point(&self) -> Option<AttachmentPoint> {
        self.data().map(|d| d.point)
    }
}

impl HasItemCore for AttachmentItem {
    fn core(&self) -> &ItemCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ItemCore {
        &mut self.core
    }
}

impl Storable for AttachmentItem {
    fn try_store(&mut self, hand: &mut ItemUserHand) -> Result<(), ItemError> {
        self.core.check_holder(hand)?;
        match self.core.location() {
            ItemLocation::Carried => {}
            ItemLocation::Attached(_) => return Err(ItemError::IsAttached),
            _ => return Err(ItemError::AlreadyStored),
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

impl WeaponAttachment for AttachmentItem {
    fn is_weapon_compatible(&self, weapon: &WeaponData) -> bool {
        self.data().is_some_and(|data| {
            weapon.points.contains(&data.point)
                && data.compatible.iter().any(|c| c.eq_ignore_ascii_case(&weapon.class))
        })
    }

    /// 配件需已拾取且不在背包里；任何检查失败时双方都不变
    fn attach_to_weapon(&mut self, weapon: &mut WeaponItem) -> Result<(), ItemError> {
        if self.attached_to.is_some() {
            return Err(ItemError::AlreadyAttached);
        }
        match self.core.location() {
            ItemLocation::Carried => {}
            ItemLocation::World => return Err(ItemError::NotCollected),
            _ => return Err(ItemError::AlreadyStored),
        }
        let compatible = weapon.data().is_some_and(|data| self.is_weapon_compatible(data));
        let Some(point) = self.point().filter(|_| compatible) else {
            return Err(ItemError::Incompatible);
        };
        weapon.mount(point, self.id())?;
        self.attached_to = Some(weapon.id());
        self.core.set_location(ItemLocation::Attached(weapon.id()));
        debug!("{} 装到 {} 的 {point:?}", self.name(), weapon.name());
        Ok(())
    }

    fn detach_from_weapon(&mut self, weapon: &mut WeaponItem) -> Result<(), ItemError> {
        if self.attached_to != Some(weapon.id()) {
            return Err(ItemError::NotAttached);
        }
        let point = self.point().ok_or(ItemError::NotAttached)?;
        weapon.unmount(point, self.id())?;
        self.attached_to = None;
        self.core.set_location(ItemLocation::Carried);
        Ok(())
    }

    fn attached_to(&self) -> Option<ItemId> {
        self.attached_to
    }
}
