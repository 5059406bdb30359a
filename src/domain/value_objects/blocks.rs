use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::blocks::BlockEntity;
use crate::domain::value_objects::enums::block_kinds::BlockKind;

#[derive(Debug, Deserialize)]
pub struct CreateBlockRequest {
    pub kind: BlockKind,
    pub content: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBlockRequest {
    pub content: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct BlockDto {
    pub id: Uuid,
    pub page_id: Uuid,
    pub kind: BlockKind,
    pub content: serde_json::Value,
    pub position: i32,
}

impl From<BlockEntity> for BlockDto {
    fn from(value: BlockEntity) -> Self {
        let kind = BlockKind::from_str(&value.kind).unwrap_or(BlockKind::Text);
        Self {
            id: value.id,
            page_id: value.page_id,
            kind,
            content: value.content,
            position: value.position,
        }
    }
}
