use bevy::asset::{io::Reader, ron, AssetLoader, LoadContext};
use bevy::prelude::*;
use std::future::Future;
use thiserror::Error;

use super::schema::ItemList;

#[derive(Default)]
pub struct RonItemLoader;

#[derive(Debug, Error)]
pub enum RonItemLoaderError {
    #[error("Could not load asset: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse RON: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("Could not interpret bytes as UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("Duplicate item id: {0}")]
    DuplicateId(String),
}

/// 解析物品表，同一 id 只能出现一次
pub fn parse_item_list(s: &str) -> Result<ItemList, RonItemLoaderError> {
    let list: ItemList = ron::de::from_str(s)?;
    let mut seen = std::collections::HashSet::new();
    for def in &list.items {
        if !seen.insert(def.id.to_lowercase()) {
            return Err(RonItemLoaderError::DuplicateId(def.id.clone()));
        }
    }
    Ok(list)
}

impl AssetLoader for RonItemLoader {
    type Asset = ItemList;
    type Settings = ();
    type Error = RonItemLoaderError;

    fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext,
    ) -> impl Future<Output = Result<Self::Asset, Self::Error>> + Send {
        async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;

            let s = std::str::from_utf8(&bytes)?;
            parse_item_list(s)
        }
    }

    fn extensions(&self) -> &[&str] {
        &["ron"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{ItemKind, UiTag};

    const SAMPLE: &str = r#"(
        items: [
            (
                id: "m416",
                name: "M416",
                ui_tag: Weapon,
                item_tag: "rifle",
                kind: Weapon((class: "rifle", damage: 41, magazine: 30, points: [Muzzle, Sight])),
            ),
            (
                id: "ammo_556",
                name: "5.56mm",
                ui_tag: Ammo,
                kind: Ammo((caliber: "5.56")),
            ),
        ],
    )"#;

    #[test]
    fn parses_items_with_defaults() {
        let list = parse_item_list(SAMPLE).unwrap();
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].ui_tag, UiTag::Weapon);
        match &list.items[1].kind {
            ItemKind::Ammo(ammo) => assert_eq!(ammo.stack, 30),
            other => panic!("unexpected kind {other:?}"),
        }
        assert!(list.items[1].icon.is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let dup = r#"(items: [
            (id: "a", name: "A", ui_tag: Backpack, kind: Backpack((extra_capacity: 4))),
            (id: "A", name: "A2", ui_tag: Backpack, kind: Backpack((extra_capacity: 8))),
        ])"#;
        assert!(matches!(
            parse_item_list(dup),
            Err(RonItemLoaderError::DuplicateId(id)) if id == "A"
        ));
    }

    #[test]
    fn shipped_item_table_parses() {
        let list = parse_item_list(include_str!("../../assets/data/items.ron")).unwrap();
        assert!(list.items.iter().any(|d| d.ui_tag == UiTag::Backpack));
        assert!(list.items.iter().any(|d| d.weapon_data().is_some()));
    }
}
