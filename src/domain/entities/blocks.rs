use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::blocks;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = blocks)]
pub struct BlockEntity {
    pub id: Uuid,
    pub page_id: Uuid,
    pub kind: String,
    pub content: serde_json::Value,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = blocks)]
pub struct InsertBlockEntity {
    pub page_id: Uuid,
    pub kind: String,
    pub content: serde_json::Value,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
