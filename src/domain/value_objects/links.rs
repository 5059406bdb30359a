use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::links::LinkEntity;

#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLinkRequest {
    pub title: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub ordered_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct LinkDto {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub position: i32,
}

impl From<LinkEntity> for LinkDto {
    fn from(value: LinkEntity) -> Self {
        Self {
            id: value.id,
            title: value.title,
            url: value.url,
            position: value.position,
        }
    }
}
