use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::pages;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = pages)]
pub struct PageEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pages)]
pub struct InsertPageEntity {
    pub user_id: Uuid,
    pub title: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}
