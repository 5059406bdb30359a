use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::users::UserEntity;
use crate::domain::value_objects::enums::account_types::AccountType;

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub account_type: AccountType,
    pub referral_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserEntity> for UserDto {
    fn from(value: UserEntity) -> Self {
        Self {
            id: value.id,
            display_name: value.display_name,
            email: value.email,
            account_type: AccountType::from_str(&value.account_type),
            referral_code: value.referral_code,
            created_at: value.created_at,
        }
    }
}
