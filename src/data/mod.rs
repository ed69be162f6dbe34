pub mod loader;
pub mod schema;

use bevy::prelude::*;
use schema::{ItemDefinition, ItemList};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::resources::GameConfig;
use crate::core::states::AppState;

// --------------------------- 资源 ---------------------------
#[derive(Resource, Default)]
pub struct ItemAssets {
    handle: Option<Handle<ItemList>>,
}

/// 物品定义表：加载完成后建立，所有实例共享同一份 `Arc<ItemDefinition>`
#[derive(Resource, Default, Debug)]
pub struct ItemCatalog {
    by_id: HashMap<String, Arc<ItemDefinition>>,
    order: Vec<String>,
}

impl ItemCatalog {
    pub fn from_definitions(defs: impl IntoIterator<Item = ItemDefinition>) -> Self {
        let mut catalog = Self::default();
        for def in defs {
            let key = def.id.to_lowercase();
            catalog.order.push(key.clone());
            catalog.by_id.insert(key, Arc::new(def));
        }
        catalog
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn get(&self, id: &str) -> Option<Arc<ItemDefinition>> {
        self.by_id.get(&id.to_lowercase()).cloned()
    }

    /// 按 id / 名称 / uuid 查询
    pub fn find(&self, token: &str) -> Option<Arc<ItemDefinition>> {
        let t_low = token.to_lowercase();
        self.get(&t_low).or_else(|| {
            self.iter()
                .find(|d| {
                    d.name.eq_ignore_ascii_case(&t_low) || uuid_from_id(&d.id).to_string() == t_low
                })
                .cloned()
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ItemDefinition>> {
        self.order.iter().filter_map(|k| self.by_id.get(k))
    }
}

/// 用固定 namespace + id 字节生成版本 5 UUID，保证可重复得到同一值
pub fn uuid_from_id(id: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, id.as_bytes())
}

// --------------------------- 插件 ---------------------------
pub struct DataPlugin;
impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<ItemList>()
            .register_asset_loader(loader::RonItemLoader)
            .init_resource::<ItemAssets>()
            .init_resource::<ItemCatalog>()
            .add_systems(OnEnter(AppState::Loading), start_loading)
            .add_systems(Update, check_loaded.run_if(in_state(AppState::Loading)));
    }
}

// --------------------------- 系统 ---------------------------
fn start_loading(
    mut item_assets: ResMut<ItemAssets>,
    asset_server: Res<AssetServer>,
    config: Res<GameConfig>,
) {
    let handle: Handle<ItemList> = asset_server.load(config.item_data_path.clone());
    item_assets.handle = Some(handle);
}

fn check_loaded(
    mut next: ResMut<NextState<AppState>>,
    item_assets: Res<ItemAssets>,
    mut lists: ResMut<Assets<ItemList>>,
    mut catalog: ResMut<ItemCatalog>,
) {
    let Some(h) = &item_assets.handle else {
        return;
    };
    // 取走资产内容，定义之后只通过 ItemCatalog 共享
    if let Some(list) = lists.remove(h) {
        *catalog = ItemCatalog::from_definitions(list.items);
        info!("物品表加载完成: {} 种", catalog.len());
        next.set(AppState::InGame);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::schema::*;
    use super::*;

    /// 测试用物品表
    pub(crate) fn sample_catalog() -> ItemCatalog {
        let weapon = |id: &str, class: &str| ItemDefinition {
            id: id.into(),
            name: id.to_uppercase(),
            icon: format!("icons/{id}.png"),
            ui_tag: UiTag::Weapon,
            item_tag: class.into(),
            kind: ItemKind::Weapon(WeaponData {
                class: class.into(),
                damage: 40,
                magazine: 3,
                points: vec![AttachmentPoint::Muzzle, AttachmentPoint::Sight],
            }),
        };
        ItemCatalog::from_definitions([
            weapon("m416", "rifle"),
            weapon("akm", "rifle"),
            weapon("p92", "pistol"),
            ItemDefinition {
                id: "red_dot".into(),
                name: "Red Dot".into(),
                icon: String::new(),
                ui_tag: UiTag::Attachment,
                item_tag: "sight".into(),
                kind: ItemKind::Attachment(AttachmentData {
                    point: AttachmentPoint::Sight,
                    compatible: vec!["rifle".into()],
                }),
            },
            ItemDefinition {
                id: "compensator".into(),
                name: "Compensator".into(),
                icon: String::new(),
                ui_tag: UiTag::Attachment,
                item_tag: "muzzle".into(),
                kind: ItemKind::Attachment(AttachmentData {
                    point: AttachmentPoint::Muzzle,
                    compatible: vec!["rifle".into()],
                }),
            },
            ItemDefinition {
                id: "ammo_556".into(),
                name: "5.56mm".into(),
                icon: String::new(),
                ui_tag: UiTag::Ammo,
                item_tag: "5.56".into(),
                kind: ItemKind::Ammo(AmmoData {
                    caliber: "5.56".into(),
                    stack: 30,
                }),
            },
            ItemDefinition {
                id: "backpack_lv1".into(),
                name: "Backpack Lv1".into(),
                icon: "icons/backpack.png".into(),
                ui_tag: UiTag::Backpack,
                item_tag: "backpack".into(),
                kind: ItemKind::Backpack(BackpackData { extra_capacity: 4 }),
            },
        ])
    }

    #[test]
    fn find_matches_id_name_and_uuid() {
        let catalog = sample_catalog();
        assert_eq!(catalog.len(), 7);
        assert_eq!(catalog.find("M416").unwrap().id, "m416");
        assert_eq!(catalog.find("red dot").unwrap().id, "red_dot");
        let uuid = uuid_from_id("p92").to_string();
        assert_eq!(catalog.find(&uuid).unwrap().id, "p92");
        assert!(catalog.find("nothing").is_none());
    }

    #[test]
    fn definitions_are_shared_not_copied() {
        let catalog = sample_catalog();
        let a = catalog.get("m416").unwrap();
        let b = catalog.get("m416").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
