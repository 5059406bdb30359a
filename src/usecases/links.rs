use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::links::InsertLinkEntity,
    repositories::links::LinkRepository,
    value_objects::{
        links::{CreateLinkRequest, LinkDto, UpdateLinkRequest},
        usage::ActionKind,
    },
};
use crate::usecases::{
    gate::can_perform_action,
    ordering,
    usage::UsageService,
};

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("{0}")]
    LimitExceeded(String),
    #[error("link not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl LinkError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            LinkError::LimitExceeded(_) => StatusCode::FORBIDDEN,
            LinkError::NotFound => StatusCode::NOT_FOUND,
            LinkError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub struct LinksUseCase<L, U>
where
    L: LinkRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    link_repo: Arc<L>,
    usage: Arc<U>,
}

impl<L, U> LinksUseCase<L, U>
where
    L: LinkRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    pub fn new(link_repo: Arc<L>, usage: Arc<U>) -> Self {
        Self { link_repo, usage }
    }

    pub async fn create_link(
        &self,
        user_id: Uuid,
        request: CreateLinkRequest,
    ) -> Result<LinkDto, LinkError> {
        let snapshot = self.usage.get_limits(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "links: failed to load usage snapshot");
            LinkError::Internal(err)
        })?;

        let decision = can_perform_action(&snapshot, ActionKind::AddLink);
        if !decision.allowed {
            warn!(
                %user_id,
                current = snapshot.links.current,
                max = snapshot.links.max,
                status = axum::http::StatusCode::FORBIDDEN.as_u16(),
                "links: link limit reached"
            );
            return Err(LinkError::LimitExceeded(
                decision.message.unwrap_or_default(),
            ));
        }

        let position = ordering::next_position(
            self.link_repo.max_position(user_id).await.map_err(|err| {
                error!(%user_id, db_error = ?err, "links: failed to read max position");
                LinkError::Internal(err)
            })?,
        );

        let now = Utc::now();
        let link_id = self
            .link_repo
            .insert(InsertLinkEntity {
                user_id,
                title: request.title.clone(),
                url: request.url.clone(),
                position,
                created_at: now,
                updated_at: now,
            })
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "links: failed to insert link");
                LinkError::Internal(err)
            })?;

        self.usage.invalidate(user_id);
        info!(%user_id, %link_id, position, "links: link created");

        Ok(LinkDto {
            id: link_id,
            title: request.title,
            url: request.url,
            position,
        })
    }

    pub async fn list_links(&self, user_id: Uuid) -> Result<Vec<LinkDto>, LinkError> {
        let links = self.link_repo.list_by_user(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "links: failed to list links");
            LinkError::Internal(err)
        })?;

        Ok(links.into_iter().map(LinkDto::from).collect())
    }

    pub async fn update_link(
        &self,
        link_id: Uuid,
        user_id: Uuid,
        request: UpdateLinkRequest,
    ) -> Result<(), LinkError> {
        let updated = self
            .link_repo
            .update(link_id, user_id, request.title, request.url)
            .await
            .map_err(|err| {
                error!(%user_id, %link_id, db_error = ?err, "links: failed to update link");
                LinkError::Internal(err)
            })?;

        if updated == 0 {
            return Err(LinkError::NotFound);
        }

        Ok(())
    }

    pub async fn delete_link(&self, link_id: Uuid, user_id: Uuid) -> Result<(), LinkError> {
        let deleted = self.link_repo.delete(link_id, user_id).await.map_err(|err| {
            error!(%user_id, %link_id, db_error = ?err, "links: failed to delete link");
            LinkError::Internal(err)
        })?;

        if deleted == 0 {
            return Err(LinkError::NotFound);
        }

        self.usage.invalidate(user_id);
        info!(%user_id, %link_id, "links: link deleted");

        Ok(())
    }

    /// Applies a caller-declared full ordering. A request naming any id the
    /// user does not own is dropped without an error, so probing for other
    /// users' rows learns nothing.
    pub async fn reorder_links(
        &self,
        user_id: Uuid,
        ordered_ids: Vec<Uuid>,
    ) -> Result<(), LinkError> {
        let owned = self
            .link_repo
            .list_ids_by_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "links: failed to list owned ids");
                LinkError::Internal(err)
            })?;

        if !ordering::is_same_id_set(&owned, &ordered_ids) {
            warn!(
                %user_id,
                supplied = ordered_ids.len(),
                owned = owned.len(),
                "links: reorder ids do not match owned set, ignoring"
            );
            return Ok(());
        }

        self.link_repo
            .set_positions(user_id, ordered_ids)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "links: failed to write positions");
                LinkError::Internal(err)
            })?;

        info!(%user_id, "links: reorder applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        repositories::links::MockLinkRepository,
        value_objects::usage::{ResourceCounts, UsageSnapshot},
    };
    use crate::usecases::usage::MockUsageService;
    use mockall::predicate::eq;

    fn free_tier_with_links(current: i64) -> UsageSnapshot {
        UsageSnapshot::free_tier(ResourceCounts {
            links: current,
            ..ResourceCounts::default()
        })
    }

    fn usage_returning(snapshot: UsageSnapshot) -> MockUsageService {
        let mut usage = MockUsageService::new();
        usage.expect_get_limits().returning(move |_| {
            let snapshot = snapshot.clone();
            Box::pin(async move { Ok(snapshot) })
        });
        usage
    }

    #[tokio::test]
    async fn create_is_denied_at_capacity_with_limit_in_message() {
        let user_id = Uuid::new_v4();
        let usage = usage_returning(free_tier_with_links(5));

        // No insert expectation: reaching the repository would panic.
        let usecase = LinksUseCase::new(Arc::new(MockLinkRepository::new()), Arc::new(usage));

        let err = usecase
            .create_link(
                user_id,
                CreateLinkRequest {
                    title: "My site".to_string(),
                    url: "https://example.com".to_string(),
                },
            )
            .await
            .unwrap_err();

        match err {
            LinkError::LimitExceeded(message) => assert!(message.contains("5")),
            other => panic!("expected LimitExceeded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_fills_the_last_slot_and_appends_after_max() {
        let user_id = Uuid::new_v4();
        let mut usage = usage_returning(free_tier_with_links(4));
        usage
            .expect_invalidate()
            .with(eq(user_id))
            .times(1)
            .returning(|_| ());

        let mut link_repo = MockLinkRepository::new();
        link_repo
            .expect_max_position()
            .with(eq(user_id))
            .returning(|_| Box::pin(async { Ok(Some(5)) }));
        link_repo
            .expect_insert()
            .withf(|entity| entity.position == 6)
            .returning(|_| Box::pin(async { Ok(Uuid::new_v4()) }));

        let usecase = LinksUseCase::new(Arc::new(link_repo), Arc::new(usage));

        let dto = usecase
            .create_link(
                user_id,
                CreateLinkRequest {
                    title: "My site".to_string(),
                    url: "https://example.com".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(dto.position, 6);
    }

    #[tokio::test]
    async fn create_succeeds_after_a_delete_frees_a_slot() {
        let user_id = Uuid::new_v4();

        // At capacity first.
        let usage = usage_returning(free_tier_with_links(5));
        let usecase = LinksUseCase::new(Arc::new(MockLinkRepository::new()), Arc::new(usage));
        let request = CreateLinkRequest {
            title: "My site".to_string(),
            url: "https://example.com".to_string(),
        };
        assert!(matches!(
            usecase.create_link(user_id, request).await,
            Err(LinkError::LimitExceeded(_))
        ));

        // After deleting one link the retried create lands at max + 1.
        let mut usage = usage_returning(free_tier_with_links(4));
        usage.expect_invalidate().returning(|_| ());
        let mut link_repo = MockLinkRepository::new();
        link_repo
            .expect_max_position()
            .returning(|_| Box::pin(async { Ok(Some(3)) }));
        link_repo
            .expect_insert()
            .withf(|entity| entity.position == 4)
            .returning(|_| Box::pin(async { Ok(Uuid::new_v4()) }));

        let usecase = LinksUseCase::new(Arc::new(link_repo), Arc::new(usage));
        let dto = usecase
            .create_link(
                user_id,
                CreateLinkRequest {
                    title: "My site".to_string(),
                    url: "https://example.com".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(dto.position, 4);
    }

    #[tokio::test]
    async fn first_link_starts_at_position_zero() {
        let user_id = Uuid::new_v4();
        let mut usage = usage_returning(free_tier_with_links(0));
        usage.expect_invalidate().returning(|_| ());

        let mut link_repo = MockLinkRepository::new();
        link_repo
            .expect_max_position()
            .returning(|_| Box::pin(async { Ok(None) }));
        link_repo
            .expect_insert()
            .withf(|entity| entity.position == 0)
            .returning(|_| Box::pin(async { Ok(Uuid::new_v4()) }));

        let usecase = LinksUseCase::new(Arc::new(link_repo), Arc::new(usage));

        let dto = usecase
            .create_link(
                user_id,
                CreateLinkRequest {
                    title: "First".to_string(),
                    url: "https://example.com".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(dto.position, 0);
    }

    #[tokio::test]
    async fn reorder_applies_a_valid_permutation() {
        let user_id = Uuid::new_v4();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();

        let mut link_repo = MockLinkRepository::new();
        link_repo
            .expect_list_ids_by_user()
            .with(eq(user_id))
            .returning(move |_| Box::pin(async move { Ok(vec![a, b, c]) }));
        link_repo
            .expect_set_positions()
            .with(eq(user_id), eq(vec![c, a, b]))
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));

        let usecase = LinksUseCase::new(Arc::new(link_repo), Arc::new(MockUsageService::new()));

        usecase.reorder_links(user_id, vec![c, a, b]).await.unwrap();
    }

    #[tokio::test]
    async fn reorder_with_a_foreign_id_is_a_silent_no_op() {
        let user_id = Uuid::new_v4();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let mut link_repo = MockLinkRepository::new();
        link_repo
            .expect_list_ids_by_user()
            .returning(move |_| Box::pin(async move { Ok(vec![a, b]) }));
        // set_positions has no expectation: any call panics the mock.

        let usecase = LinksUseCase::new(Arc::new(link_repo), Arc::new(MockUsageService::new()));

        usecase
            .reorder_links(user_id, vec![a, Uuid::new_v4()])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delete_invalidates_the_usage_snapshot() {
        let user_id = Uuid::new_v4();
        let link_id = Uuid::new_v4();

        let mut usage = MockUsageService::new();
        usage
            .expect_invalidate()
            .with(eq(user_id))
            .times(1)
            .returning(|_| ());

        let mut link_repo = MockLinkRepository::new();
        link_repo
            .expect_delete()
            .with(eq(link_id), eq(user_id))
            .returning(|_, _| Box::pin(async { Ok(1) }));

        let usecase = LinksUseCase::new(Arc::new(link_repo), Arc::new(usage));

        usecase.delete_link(link_id, user_id).await.unwrap();
    }

    #[tokio::test]
    async fn delete_of_a_foreign_link_reports_not_found() {
        let mut link_repo = MockLinkRepository::new();
        link_repo
            .expect_delete()
            .returning(|_, _| Box::pin(async { Ok(0) }));

        let usecase = LinksUseCase::new(Arc::new(link_repo), Arc::new(MockUsageService::new()));

        assert!(matches!(
            usecase.delete_link(Uuid::new_v4(), Uuid::new_v4()).await,
            Err(LinkError::NotFound)
        ));
    }
}
