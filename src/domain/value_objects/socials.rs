use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::socials::SocialEntity;
use crate::domain::value_objects::enums::social_surfaces::SocialSurface;

#[derive(Debug, Deserialize)]
pub struct CreateSocialRequest {
    pub surface: SocialSurface,
    pub network: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct SocialDto {
    pub id: Uuid,
    pub surface: SocialSurface,
    pub network: String,
    pub url: String,
}

impl SocialDto {
    pub fn from_entity(value: SocialEntity, surface: SocialSurface) -> Self {
        Self {
            id: value.id,
            surface,
            network: value.network,
            url: value.url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SocialListDto {
    pub profile: Vec<SocialDto>,
    pub menu: Vec<SocialDto>,
}
