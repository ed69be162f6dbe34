use bevy::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::ammo::AmmoItem;
use super::attachment::AttachmentItem;
use super::backpack::BackpackItem;
use super::capabilities::*;
use super::error::ItemError;
use super::weapon::WeaponItem;
use crate::data::schema::{ItemDefinition, ItemKind};

/// 运行时物品：按定义的种类选择具体类型
#[derive(Debug, Clone)]
pub enum ItemInstance {
    Weapon(WeaponItem),
    Attachment(AttachmentItem),
    Ammo(AmmoItem),
    Backpack(BackpackItem),
}

impl ItemInstance {
    pub fn new(id: ItemId, definition: Arc<ItemDefinition>) -> Self {
        let def = definition.clone();
        match &definition.kind {
            ItemKind::Weapon(_) => Self::Weapon(WeaponItem::new(id, def)),
            ItemKind::Attachment(_) => Self::Attachment(AttachmentItem::new(id, def)),
            ItemKind::Ammo(_) => Self::Ammo(AmmoItem::new(id, def)),
            ItemKind::Backpack(_) => Self::Backpack(BackpackItem::new(id, def)),
        }
    }

    fn core(&self) -> &ItemCore {
        match self {
            Self::Weapon(i) => i.core(),
            Self::Attachment(i) => i.core(),
            Self::Ammo(i) => i.core(),
            Self::Backpack(i) => i.core(),
        }
    }

    pub fn as_identifiable(&self) -> &dyn Identifiable {
        match self {
            Self::Weapon(i) => i,
            Self::Attachment(i) => i,
            Self::Ammo(i) => i,
            Self::Backpack(i) => i,
        }
    }

    pub fn location(&self) -> ItemLocation {
        self.core().location()
    }

    pub fn holder(&self) -> Option<Entity> {
        self.core().holder()
    }

    pub fn as_storable_mut(&mut self) -> Option<&mut dyn Storable> {
        match self {
            Self::Weapon(i) => Some(i),
            Self::Attachment(i) => Some(i),
            Self::Ammo(i) => Some(i),
            Self::Backpack(i) => Some(i),
        }
    }

    pub fn as_holdable_mut(&mut self) -> Option<&mut dyn Holdable> {
        match self {
            Self::Weapon(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_primary_usable_mut(&mut self) -> Option<&mut dyn PrimaryUsable> {
        match self {
            Self::Weapon(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_secondary_usable_mut(&mut self) -> Option<&mut dyn SecondaryUsable> {
        match self {
            Self::Weapon(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_attachment(&self) -> Option<&AttachmentItem> {
        match self {
            Self::Attachment(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_attachment_mut(&mut self) -> Option<&mut AttachmentItem> {
        match self {
            Self::Attachment(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_weapon(&self) -> Option<&WeaponItem> {
        match self {
            Self::Weapon(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_weapon_mut(&mut self) -> Option<&mut WeaponItem> {
        match self {
            Self::Weapon(i) => Some(i),
            _ => None,
        }
    }
}

/// 所有物品实例的存放处，背包与界面只引用 [`ItemId`]
#[derive(Resource, Default, Debug)]
pub struct ItemRegistry {
    next_id: u64,
    items: BTreeMap<ItemId, ItemInstance>,
}

impl ItemRegistry {
    /// 按定义生成一个在地上的新物品
    pub fn spawn(&mut self, definition: Arc<ItemDefinition>) -> ItemId {
        self.next_id += 1;
        let id = ItemId(self.next_id);
        self.items.insert(id, ItemInstance::new(id, definition));
        id
    }

    pub fn get(&self, id: ItemId) -> Option<&ItemInstance> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut ItemInstance> {
        self.items.get_mut(&id)
    }

    pub fn require_mut(&mut self, id: ItemId) -> Result<&mut ItemInstance, ItemError> {
        self.items.get_mut(&id).ok_or(ItemError::UnknownItem(id))
    }

    pub fn definition(&self, id: ItemId) -> Option<&Arc<ItemDefinition>> {
        self.get(id).map(|i| i.as_identifiable().definition())
    }

    pub fn name(&self, id: ItemId) -> Option<&str> {
        self.get(id).map(|i| i.as_identifiable().name())
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &ItemInstance)> {
        self.items.iter().map(|(id, item)| (*id, item))
    }

    /// 地上的物品（可拾取列表）
    pub fn in_world(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.iter()
            .filter(|(_, item)| item.location() == ItemLocation::World)
            .map(|(id, _)| id)
    }

    /// 同时可变访问配件与武器：配件暂时取出，操作后放回
    pub fn with_attachment_and_weapon<R>(
        &mut self,
        attachment: ItemId,
        weapon: ItemId,
        f: impl FnOnce(&mut AttachmentItem, &mut WeaponItem) -> Result<R, ItemError>,
    ) -> Result<R, ItemError> {
        if attachment == weapon {
            return Err(ItemError::Unsupported);
        }
        let mut taken = self
            .items
            .remove(&attachment)
            .ok_or(ItemError::UnknownItem(attachment))?;
        let result = match (taken.as_attachment_mut(), self.items.get_mut(&weapon)) {
            (Some(att), Some(ItemInstance::Weapon(gun))) => f(att, gun),
            (None, _) => Err(ItemError::Unsupported),
            (_, None) => Err(ItemError::UnknownItem(weapon)),
            (_, Some(_)) => Err(ItemError::Unsupported),
        };
        self.items.insert(attachment, taken);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tests::sample_catalog;

    #[test]
    fn spawn_assigns_increasing_ids_and_kinds() {
        let catalog = sample_catalog();
        let mut registry = ItemRegistry::default();
        let gun = registry.spawn(catalog.get("m416").unwrap());
        let ammo = registry.spawn(catalog.get("ammo_556").unwrap());
        assert!(gun < ammo);
        assert!(registry.get(gun).unwrap().as_weapon().is_some());
        assert!(registry.get_mut(ammo).unwrap().as_holdable_mut().is_none());
        assert_eq!(registry.in_world().count(), 2);
    }

    #[test]
    fn capability_queries_follow_item_type() {
        let catalog = sample_catalog();
        let mut registry = ItemRegistry::default();
        let gun = registry.spawn(catalog.get("m416").unwrap());
        let pack = registry.spawn(catalog.get("backpack_lv1").unwrap());

        let gun = registry.get_mut(gun).unwrap();
        assert!(gun.as_primary_usable_mut().is_some());
        assert!(gun.as_secondary_usable_mut().is_some());
        assert!(gun.as_attachment_mut().is_none());

        let pack = registry.get_mut(pack).unwrap();
        assert!(pack.as_storable_mut().is_some());
        assert!(pack.as_primary_usable_mut().is_none());
    }

    #[test]
    fn attachment_is_put_back_even_when_closure_fails() {
        let catalog = sample_catalog();
        let mut registry = ItemRegistry::default();
        let sight = registry.spawn(catalog.get("red_dot").unwrap());
        let ammo = registry.spawn(catalog.get("ammo_556").unwrap());

        let result = registry.with_attachment_and_weapon(sight, ammo, |_, _| Ok(()));
        assert_eq!(result, Err(ItemError::Unsupported));
        assert!(registry.get(sight).is_some());
    }
}
