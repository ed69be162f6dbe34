use thiserror::Error;

use super::ItemId;
use crate::data::schema::AttachmentPoint;
use crate::inventory::components::InventoryError;

/// 物品操作失败的原因；任何 Err 都意味着没有发生状态变化
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ItemError {
    #[error("无效的持有者")]
    InvalidHolder,
    #[error("物品已被拾取")]
    AlreadyCollected,
    #[error("物品尚未被拾取")]
    NotCollected,
    #[error("物品已在背包中")]
    AlreadyStored,
    #[error("物品不在背包中")]
    NotStored,
    #[error("物品已在手上")]
    AlreadyInHand,
    #[error("物品不在手上")]
    NotInHand,
    #[error("手上已有其他物品")]
    HandOccupied,
    #[error("物品正装在枪上")]
    IsAttached,
    #[error("动作已经开始")]
    AlreadyInUse,
    #[error("动作尚未开始")]
    NotInUse,
    #[error("配件与武器不兼容")]
    Incompatible,
    #[error("配件已装在枪上")]
    AlreadyAttached,
    #[error("配件未装在这把枪上")]
    NotAttached,
    #[error("武器的 {0:?} 位置已有配件")]
    PointOccupied(AttachmentPoint),
    #[error("物品不具备该能力")]
    Unsupported,
    #[error("未知物品 #{0}")]
    UnknownItem(ItemId),
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}
