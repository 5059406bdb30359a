use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::socials::{InsertMenuSocialEntity, InsertProfileSocialEntity},
    repositories::socials::SocialRepository,
    value_objects::{
        enums::social_surfaces::SocialSurface,
        socials::{CreateSocialRequest, SocialDto, SocialListDto},
        usage::ActionKind,
    },
};
use crate::usecases::{gate::can_perform_action, usage::UsageService};

#[derive(Debug, Error)]
pub enum SocialError {
    #[error("{0}")]
    LimitExceeded(String),
    #[error("social entry not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SocialError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            SocialError::LimitExceeded(_) => StatusCode::FORBIDDEN,
            SocialError::NotFound => StatusCode::NOT_FOUND,
            SocialError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub struct SocialsUseCase<S, U>
where
    S: SocialRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    social_repo: Arc<S>,
    usage: Arc<U>,
}

impl<S, U> SocialsUseCase<S, U>
where
    S: SocialRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    pub fn new(social_repo: Arc<S>, usage: Arc<U>) -> Self {
        Self { social_repo, usage }
    }

    /// Creates a social entry on either surface. Both surfaces draw from the
    /// same quota, so the gate check is identical regardless of target table.
    pub async fn create_social(
        &self,
        user_id: Uuid,
        request: CreateSocialRequest,
    ) -> Result<SocialDto, SocialError> {
        let snapshot = self.usage.get_limits(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "socials: failed to load usage snapshot");
            SocialError::Internal(err)
        })?;

        let decision = can_perform_action(&snapshot, ActionKind::AddSocial);
        if !decision.allowed {
            warn!(
                %user_id,
                surface = %request.surface,
                current = snapshot.socials.current,
                max = snapshot.socials.max,
                status = axum::http::StatusCode::FORBIDDEN.as_u16(),
                "socials: social limit reached"
            );
            return Err(SocialError::LimitExceeded(
                decision.message.unwrap_or_default(),
            ));
        }

        let now = Utc::now();
        let social_id = match request.surface {
            SocialSurface::Profile => self
                .social_repo
                .insert_profile(InsertProfileSocialEntity {
                    user_id,
                    network: request.network.clone(),
                    url: request.url.clone(),
                    created_at: now,
                })
                .await,
            SocialSurface::Menu => self
                .social_repo
                .insert_menu(InsertMenuSocialEntity {
                    user_id,
                    network: request.network.clone(),
                    url: request.url.clone(),
                    created_at: now,
                })
                .await,
        }
        .map_err(|err| {
            error!(%user_id, db_error = ?err, "socials: failed to insert social");
            SocialError::Internal(err)
        })?;

        self.usage.invalidate(user_id);
        info!(%user_id, %social_id, surface = %request.surface, "socials: social created");

        Ok(SocialDto {
            id: social_id,
            surface: request.surface,
            network: request.network,
            url: request.url,
        })
    }

    pub async fn list_socials(&self, user_id: Uuid) -> Result<SocialListDto, SocialError> {
        let profile = self
            .social_repo
            .list_profile_by_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "socials: failed to list profile socials");
                SocialError::Internal(err)
            })?;
        let menu = self
            .social_repo
            .list_menu_by_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "socials: failed to list menu socials");
                SocialError::Internal(err)
            })?;

        Ok(SocialListDto {
            profile: profile
                .into_iter()
                .map(|entity| SocialDto::from_entity(entity, SocialSurface::Profile))
                .collect(),
            menu: menu
                .into_iter()
                .map(|entity| SocialDto::from_entity(entity, SocialSurface::Menu))
                .collect(),
        })
    }

    pub async fn delete_social(
        &self,
        user_id: Uuid,
        social_id: Uuid,
        surface: SocialSurface,
    ) -> Result<(), SocialError> {
        let deleted = match surface {
            SocialSurface::Profile => self.social_repo.delete_profile(social_id, user_id).await,
            SocialSurface::Menu => self.social_repo.delete_menu(social_id, user_id).await,
        }
        .map_err(|err| {
            error!(%user_id, %social_id, db_error = ?err, "socials: failed to delete social");
            SocialError::Internal(err)
        })?;

        if deleted == 0 {
            return Err(SocialError::NotFound);
        }

        self.usage.invalidate(user_id);
        info!(%user_id, %social_id, surface = %surface, "socials: social deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        repositories::socials::MockSocialRepository,
        value_objects::usage::{ResourceCounts, UsageSnapshot},
    };
    use crate::usecases::usage::MockUsageService;
    use mockall::predicate::eq;

    fn usage_with_socials(current: i64) -> MockUsageService {
        let mut usage = MockUsageService::new();
        usage.expect_get_limits().returning(move |_| {
            Box::pin(async move {
                Ok(UsageSnapshot::free_tier(ResourceCounts {
                    socials: current,
                    ..ResourceCounts::default()
                }))
            })
        });
        usage
    }

    #[tokio::test]
    async fn menu_social_is_denied_when_profile_socials_fill_the_shared_quota() {
        // Free tier allows 3 socials total across both tables.
        let usecase = SocialsUseCase::new(
            Arc::new(MockSocialRepository::new()),
            Arc::new(usage_with_socials(3)),
        );

        let err = usecase
            .create_social(
                Uuid::new_v4(),
                CreateSocialRequest {
                    surface: SocialSurface::Menu,
                    network: "instagram".to_string(),
                    url: "https://instagram.com/cafe".to_string(),
                },
            )
            .await
            .unwrap_err();

        match err {
            SocialError::LimitExceeded(message) => assert!(message.contains("3")),
            other => panic!("expected LimitExceeded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_targets_the_requested_surface() {
        let user_id = Uuid::new_v4();

        let mut usage = usage_with_socials(0);
        usage
            .expect_invalidate()
            .with(eq(user_id))
            .times(1)
            .returning(|_| ());

        let mut social_repo = MockSocialRepository::new();
        social_repo
            .expect_insert_menu()
            .withf(|entity| entity.network == "instagram")
            .times(1)
            .returning(|_| Box::pin(async { Ok(Uuid::new_v4()) }));
        // insert_profile has no expectation: a call would panic.

        let usecase = SocialsUseCase::new(Arc::new(social_repo), Arc::new(usage));

        let dto = usecase
            .create_social(
                user_id,
                CreateSocialRequest {
                    surface: SocialSurface::Menu,
                    network: "instagram".to_string(),
                    url: "https://instagram.com/cafe".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(dto.surface, SocialSurface::Menu);
    }

    #[tokio::test]
    async fn delete_of_a_foreign_social_reports_not_found() {
        let mut social_repo = MockSocialRepository::new();
        social_repo
            .expect_delete_profile()
            .returning(|_, _| Box::pin(async { Ok(0) }));

        let usecase =
            SocialsUseCase::new(Arc::new(social_repo), Arc::new(MockUsageService::new()));

        assert!(matches!(
            usecase
                .delete_social(Uuid::new_v4(), Uuid::new_v4(), SocialSurface::Profile)
                .await,
            Err(SocialError::NotFound)
        ));
    }
}
