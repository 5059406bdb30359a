use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::pages::InsertPageEntity,
    repositories::pages::PageRepository,
    value_objects::{
        pages::{CreatePageRequest, PageDto},
        usage::ActionKind,
    },
};
use crate::usecases::{gate::can_perform_action, usage::UsageService};

#[derive(Debug, Error)]
pub enum PageError {
    #[error("{0}")]
    LimitExceeded(String),
    #[error("page not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PageError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PageError::LimitExceeded(_) => StatusCode::FORBIDDEN,
            PageError::NotFound => StatusCode::NOT_FOUND,
            PageError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub struct PagesUseCase<P, U>
where
    P: PageRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    page_repo: Arc<P>,
    usage: Arc<U>,
}

impl<P, U> PagesUseCase<P, U>
where
    P: PageRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    pub fn new(page_repo: Arc<P>, usage: Arc<U>) -> Self {
        Self { page_repo, usage }
    }

    pub async fn create_page(
        &self,
        user_id: Uuid,
        request: CreatePageRequest,
    ) -> Result<PageDto, PageError> {
        let snapshot = self.usage.get_limits(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "pages: failed to load usage snapshot");
            PageError::Internal(err)
        })?;

        let decision = can_perform_action(&snapshot, ActionKind::AddPage);
        if !decision.allowed {
            warn!(
                %user_id,
                current = snapshot.pages.current,
                max = snapshot.pages.max,
                status = axum::http::StatusCode::FORBIDDEN.as_u16(),
                "pages: page limit reached"
            );
            return Err(PageError::LimitExceeded(
                decision.message.unwrap_or_default(),
            ));
        }

        let page_id = self
            .page_repo
            .insert(InsertPageEntity {
                user_id,
                title: request.title.clone(),
                slug: request.slug.clone(),
                created_at: Utc::now(),
            })
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "pages: failed to insert page");
                PageError::Internal(err)
            })?;

        self.usage.invalidate(user_id);
        info!(%user_id, %page_id, "pages: page created");

        Ok(PageDto {
            id: page_id,
            title: request.title,
            slug: request.slug,
        })
    }

    pub async fn list_pages(&self, user_id: Uuid) -> Result<Vec<PageDto>, PageError> {
        let pages = self.page_repo.list_by_user(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "pages: failed to list pages");
            PageError::Internal(err)
        })?;

        Ok(pages.into_iter().map(PageDto::from).collect())
    }

    pub async fn delete_page(&self, page_id: Uuid, user_id: Uuid) -> Result<(), PageError> {
        let deleted = self.page_repo.delete(page_id, user_id).await.map_err(|err| {
            error!(%user_id, %page_id, db_error = ?err, "pages: failed to delete page");
            PageError::Internal(err)
        })?;

        if deleted == 0 {
            return Err(PageError::NotFound);
        }

        // The page's blocks went with it, so block counts changed too.
        self.usage.invalidate(user_id);
        info!(%user_id, %page_id, "pages: page deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        repositories::pages::MockPageRepository,
        value_objects::usage::{ResourceCounts, UsageSnapshot},
    };
    use crate::usecases::usage::MockUsageService;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn create_is_denied_when_page_quota_is_full() {
        let user_id = Uuid::new_v4();

        let mut usage = MockUsageService::new();
        usage.expect_get_limits().returning(|_| {
            Box::pin(async {
                Ok(UsageSnapshot::free_tier(ResourceCounts {
                    pages: 1,
                    ..ResourceCounts::default()
                }))
            })
        });

        let usecase = PagesUseCase::new(Arc::new(MockPageRepository::new()), Arc::new(usage));

        let err = usecase
            .create_page(
                user_id,
                CreatePageRequest {
                    title: "Menu".to_string(),
                    slug: "menu".to_string(),
                },
            )
            .await
            .unwrap_err();

        match err {
            PageError::LimitExceeded(message) => assert!(message.contains("1")),
            other => panic!("expected LimitExceeded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_inserts_and_invalidates_when_under_quota() {
        let user_id = Uuid::new_v4();
        let page_id = Uuid::new_v4();

        let mut usage = MockUsageService::new();
        usage
            .expect_get_limits()
            .returning(|_| Box::pin(async { Ok(UsageSnapshot::free_tier(ResourceCounts::default())) }));
        usage
            .expect_invalidate()
            .with(eq(user_id))
            .times(1)
            .returning(|_| ());

        let mut page_repo = MockPageRepository::new();
        page_repo
            .expect_insert()
            .withf(|entity| entity.slug == "menu")
            .returning(move |_| Box::pin(async move { Ok(page_id) }));

        let usecase = PagesUseCase::new(Arc::new(page_repo), Arc::new(usage));

        let dto = usecase
            .create_page(
                user_id,
                CreatePageRequest {
                    title: "Menu".to_string(),
                    slug: "menu".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(dto.id, page_id);
    }

    #[tokio::test]
    async fn delete_of_a_foreign_page_reports_not_found() {
        let mut page_repo = MockPageRepository::new();
        page_repo
            .expect_delete()
            .returning(|_, _| Box::pin(async { Ok(0) }));

        let usecase = PagesUseCase::new(Arc::new(page_repo), Arc::new(MockUsageService::new()));

        assert!(matches!(
            usecase.delete_page(Uuid::new_v4(), Uuid::new_v4()).await,
            Err(PageError::NotFound)
        ));
    }
}
