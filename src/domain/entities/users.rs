use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::app_users;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = app_users)]
pub struct UserEntity {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub account_type: String,
    pub referral_code: Option<String>,
    pub created_at: DateTime<Utc>,
}
