use bevy::asset::Asset;
use bevy::reflect::TypePath;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 控件分类标签：拖放时只接受同标签的物品
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum UiTag {
    Weapon,
    Backpack,
    Attachment,
    Ammo,
}

impl fmt::Display for UiTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UiTag::Weapon => "weapon",
            UiTag::Backpack => "backpack",
            UiTag::Attachment => "attachment",
            UiTag::Ammo => "ammo",
        };
        f.write_str(s)
    }
}

/// 枪上可挂配件的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum AttachmentPoint {
    Muzzle,
    Sight,
    Grip,
    Magazine,
    Stock,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeaponData {
    /// 枪械类别，配件按类别判断兼容
    pub class: String,
    #[serde(default)]
    pub damage: i32,
    #[serde(default)]
    pub magazine: u32,
    #[serde(default)]
    pub points: Vec<AttachmentPoint>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AttachmentData {
    pub point: AttachmentPoint,
    /// 兼容的枪械类别
    #[serde(default)]
    pub compatible: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AmmoData {
    pub caliber: String,
    #[serde(default = "default_stack")]
    pub stack: u32,
}

fn default_stack() -> u32 {
    30
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BackpackData {
    pub extra_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum ItemKind {
    Weapon(WeaponData),
    Attachment(AttachmentData),
    Ammo(AmmoData),
    Backpack(BackpackData),
}

/// 静态物品定义，同类实例共享（`Arc<ItemDefinition>`），只读
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    pub ui_tag: UiTag,
    /// 物品家族，例如枪械类别
    #[serde(default)]
    pub item_tag: String,
    pub kind: ItemKind,
}

impl ItemDefinition {
    pub fn weapon_data(&self) -> Option<&WeaponData> {
        match &self.kind {
            ItemKind::Weapon(data) => Some(data),
            _ => None,
        }
    }
}

#[derive(Asset, TypePath, Deserialize, Debug)]
pub struct ItemList {
    pub items: Vec<ItemDefinition>,
}
