use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::pages::PageEntity;

#[derive(Debug, Deserialize)]
pub struct CreatePageRequest {
    pub title: String,
    pub slug: String,
}

#[derive(Debug, Serialize)]
pub struct PageDto {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
}

impl From<PageEntity> for PageDto {
    fn from(value: PageEntity) -> Self {
        Self {
            id: value.id,
            title: value.title,
            slug: value.slug,
        }
    }
}
