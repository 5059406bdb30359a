use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::{menu_socials, profile_socials};

/// Profile and menu socials share one shape; the tables differ only in which
/// surface renders them.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profile_socials)]
pub struct SocialEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub network: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = profile_socials)]
pub struct InsertProfileSocialEntity {
    pub user_id: Uuid,
    pub network: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = menu_socials)]
pub struct InsertMenuSocialEntity {
    pub user_id: Uuid,
    pub network: String,
    pub url: String,
    pub created_at: DateTime<Utc>,
}
