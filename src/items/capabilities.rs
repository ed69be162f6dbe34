//! 物品能力接口：每种物品只实现自己需要的那几项

use bevy::prelude::*;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use super::error::ItemError;
use super::hand::ItemUserHand;
use crate::data::schema::{ItemDefinition, WeaponData};

/// 运行时物品实例的唯一编号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 物品当前所处位置，任一时刻只有一个
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ItemLocation {
    /// 在地上，无人持有
    World,
    /// 已被拾取，但不在任何容器里（拾取与存放之间的过渡态）
    Carried,
    Stored,
    InHand,
    Attached(ItemId),
}

/// 所有物品共有的状态
#[derive(Debug, Clone)]
pub struct ItemCore {
    id: ItemId,
    definition: Arc<ItemDefinition>,
    holder: Option<Entity>,
    location: ItemLocation,
}

impl ItemCore {
    pub fn new(id: ItemId, definition: Arc<ItemDefinition>) -> Self {
        Self {
            id,
            definition,
            holder: None,
            location: ItemLocation::World,
        }
    }

    pub fn holder(&self) -> Option<Entity> {
        self.holder
    }

    pub fn location(&self) -> ItemLocation {
        self.location
    }

    pub(crate) fn set_location(&mut self, location: ItemLocation) {
        self.location = location;
    }

    /// 校验 hand 是当前持有者
    pub(crate) fn check_holder(&self, hand: &ItemUserHand) -> Result<(), ItemError> {
        match self.holder {
            None => Err(ItemError::NotCollected),
            Some(holder) if holder == hand.holder => Ok(()),
            Some(_) => Err(ItemError::InvalidHolder),
        }
    }
}

/// 可以拿到 [`ItemCore`] 的物品自动获得 Identifiable / Collectable / Droppable
pub trait HasItemCore {
    fn core(&self) -> &ItemCore;
    fn core_mut(&mut self) -> &mut ItemCore;
}

pub trait Identifiable {
    fn id(&self) -> ItemId;
    fn name(&self) -> &str;
    fn definition(&self) -> &Arc<ItemDefinition>;
}

pub trait Collectable: Identifiable {
    fn is_collected(&self) -> bool;

    /// 交给 hand 的持有者；已被拾取或持有者无效时失败
    fn try_collect(&mut self, hand: &mut ItemUserHand) -> Result<(), ItemError>;
}

pub trait Droppable {
    /// 放回地上；只能丢弃已拾取且不在容器里的物品
    fn drop_item(&mut self) -> Result<(), ItemError>;
}

/// 可放进背包的物品（弹药、配件、背包、枪）
pub trait Storable: Collectable + Droppable {
    /// 只改存放状态，拾取状态需已正确
    fn try_store(&mut self, hand: &mut ItemUserHand) -> Result<(), ItemError>;

    fn try_remove(&mut self, hand: &mut ItemUserHand) -> Result<(), ItemError>;

    /// 拾取并存放，存放失败时撤销拾取
    fn try_store_and_collect(&mut self, hand: &mut ItemUserHand) -> Result<(), ItemError> {
        self.try_collect(hand)?;
        if let Err(err) = self.try_store(hand) {
            self.drop_item()?;
            return Err(err);
        }
        Ok(())
    }

    /// 取出并丢到地上
    fn try_remove_and_drop(&mut self, hand: &mut ItemUserHand) -> Result<(), ItemError> {
        self.try_remove(hand)?;
        self.drop_item()
    }
}

/// 主要用途：开火、挥砍、投掷
pub trait PrimaryUsable {
    fn primary_use_started(&mut self) -> Result<(), ItemError>;

    /// 未开始时取消返回 `NotInUse`，不改变状态
    fn primary_use_canceled(&mut self) -> Result<(), ItemError>;
}

/// 次要用途：开镜
pub trait SecondaryUsable {
    fn secondary_use_started(&mut self) -> Result<(), ItemError>;

    fn secondary_use_canceled(&mut self) -> Result<(), ItemError>;
}

/// 放下后物品的去向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutAwayOutcome {
    Stored,
    Dropped,
}

pub trait Holdable {
    fn is_in_hand(&self) -> bool;

    fn hold(&mut self, hand: &mut ItemUserHand) -> Result<(), ItemError>;

    /// 有空位就放回背包，否则丢到地上；调用后物品只会在手上、背包、地上三者之一
    fn try_put_away(&mut self, hand: &mut ItemUserHand) -> Result<PutAwayOutcome, ItemError>;
}

pub trait WeaponAttachment: Identifiable {
    fn is_weapon_compatible(&self, weapon: &WeaponData) -> bool;

    fn attach_to_weapon(&mut self, weapon: &mut super::weapon::WeaponItem) -> Result<(), ItemError>;

    fn detach_from_weapon(&mut self, weapon: &mut super::weapon::WeaponItem) -> Result<(), ItemError>;

    fn attached_to(&self) -> Option<ItemId>;
}

impl<T: HasItemCore> Identifiable for T {
    fn id(&self) -> ItemId {
        self.core().id
    }

    fn name(&self) -> &str {
        &self.core().definition.name
    }

    fn definition(&self) -> &Arc<ItemDefinition> {
        &self.core().definition
    }
}

impl<T: HasItemCore> Collectable for T {
    fn is_collected(&self) -> bool {
        self.core().holder.is_some()
    }

    fn try_collect(&mut self, hand: &mut ItemUserHand) -> Result<(), ItemError> {
        if hand.holder == Entity::PLACEHOLDER {
            return Err(ItemError::InvalidHolder);
        }
        let core = self.core_mut();
        if core.holder.is_some() {
            return Err(ItemError::AlreadyCollected);
        }
        core.holder = Some(hand.holder);
        core.location = ItemLocation::Carried;
        Ok(())
    }
}

impl<T: HasItemCore> Droppable for T {
    fn drop_item(&mut self) -> Result<(), ItemError> {
        let core = self.core_mut();
        match core.location {
            ItemLocation::World => Err(ItemError::NotCollected),
            ItemLocation::Stored => Err(ItemError::AlreadyStored),
            ItemLocation::InHand => Err(ItemError::AlreadyInHand),
            ItemLocation::Attached(_) => Err(ItemError::IsAttached),
            ItemLocation::Carried => {
                core.holder = None;
                core.location = ItemLocation::World;
                Ok(())
            }
        }
    }
}
