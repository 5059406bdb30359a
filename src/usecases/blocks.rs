use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::blocks::InsertBlockEntity,
    repositories::{blocks::BlockRepository, pages::PageRepository},
    value_objects::{
        blocks::{BlockDto, CreateBlockRequest, UpdateBlockRequest},
        usage::ActionKind,
    },
};
use crate::usecases::{gate::can_perform_action, ordering, usage::UsageService};

#[derive(Debug, Error)]
pub enum BlockError {
    #[error("{0}")]
    LimitExceeded(String),
    #[error("page not found")]
    PageNotFound,
    #[error("block not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl BlockError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            BlockError::LimitExceeded(_) => StatusCode::FORBIDDEN,
            BlockError::PageNotFound | BlockError::NotFound => StatusCode::NOT_FOUND,
            BlockError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Blocks are ordered within their page; every operation first pins the page
/// to the requesting user so a foreign page behaves like a missing one.
pub struct BlocksUseCase<B, P, U>
where
    B: BlockRepository + Send + Sync + 'static,
    P: PageRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    block_repo: Arc<B>,
    page_repo: Arc<P>,
    usage: Arc<U>,
}

impl<B, P, U> BlocksUseCase<B, P, U>
where
    B: BlockRepository + Send + Sync + 'static,
    P: PageRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    pub fn new(block_repo: Arc<B>, page_repo: Arc<P>, usage: Arc<U>) -> Self {
        Self {
            block_repo,
            page_repo,
            usage,
        }
    }

    async fn ensure_page_owned(&self, page_id: Uuid, user_id: Uuid) -> Result<(), BlockError> {
        let page = self
            .page_repo
            .find_owned(page_id, user_id)
            .await
            .map_err(|err| {
                error!(%user_id, %page_id, db_error = ?err, "blocks: failed to load page");
                BlockError::Internal(err)
            })?;

        if page.is_none() {
            return Err(BlockError::PageNotFound);
        }

        Ok(())
    }

    pub async fn create_block(
        &self,
        user_id: Uuid,
        page_id: Uuid,
        request: CreateBlockRequest,
    ) -> Result<BlockDto, BlockError> {
        self.ensure_page_owned(page_id, user_id).await?;

        let snapshot = self.usage.get_limits(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "blocks: failed to load usage snapshot");
            BlockError::Internal(err)
        })?;

        let decision = can_perform_action(&snapshot, ActionKind::AddBlock);
        if !decision.allowed {
            warn!(
                %user_id,
                %page_id,
                current = snapshot.blocks.current,
                max = snapshot.blocks.max,
                status = axum::http::StatusCode::FORBIDDEN.as_u16(),
                "blocks: block limit reached"
            );
            return Err(BlockError::LimitExceeded(
                decision.message.unwrap_or_default(),
            ));
        }

        let position = ordering::next_position(
            self.block_repo.max_position(page_id).await.map_err(|err| {
                error!(%page_id, db_error = ?err, "blocks: failed to read max position");
                BlockError::Internal(err)
            })?,
        );

        let now = Utc::now();
        let block_id = self
            .block_repo
            .insert(InsertBlockEntity {
                page_id,
                kind: request.kind.to_string(),
                content: request.content.clone(),
                position,
                created_at: now,
                updated_at: now,
            })
            .await
            .map_err(|err| {
                error!(%user_id, %page_id, db_error = ?err, "blocks: failed to insert block");
                BlockError::Internal(err)
            })?;

        self.usage.invalidate(user_id);
        info!(%user_id, %page_id, %block_id, position, "blocks: block created");

        Ok(BlockDto {
            id: block_id,
            page_id,
            kind: request.kind,
            content: request.content,
            position,
        })
    }

    pub async fn list_blocks(
        &self,
        user_id: Uuid,
        page_id: Uuid,
    ) -> Result<Vec<BlockDto>, BlockError> {
        self.ensure_page_owned(page_id, user_id).await?;

        let blocks = self.block_repo.list_by_page(page_id).await.map_err(|err| {
            error!(%page_id, db_error = ?err, "blocks: failed to list blocks");
            BlockError::Internal(err)
        })?;

        Ok(blocks.into_iter().map(BlockDto::from).collect())
    }

    pub async fn update_block(
        &self,
        user_id: Uuid,
        page_id: Uuid,
        block_id: Uuid,
        request: UpdateBlockRequest,
    ) -> Result<(), BlockError> {
        self.ensure_page_owned(page_id, user_id).await?;

        let updated = self
            .block_repo
            .update_content(block_id, page_id, request.content)
            .await
            .map_err(|err| {
                error!(%page_id, %block_id, db_error = ?err, "blocks: failed to update block");
                BlockError::Internal(err)
            })?;

        if updated == 0 {
            return Err(BlockError::NotFound);
        }

        Ok(())
    }

    pub async fn delete_block(
        &self,
        user_id: Uuid,
        page_id: Uuid,
        block_id: Uuid,
    ) -> Result<(), BlockError> {
        self.ensure_page_owned(page_id, user_id).await?;

        let deleted = self
            .block_repo
            .delete(block_id, page_id)
            .await
            .map_err(|err| {
                error!(%page_id, %block_id, db_error = ?err, "blocks: failed to delete block");
                BlockError::Internal(err)
            })?;

        if deleted == 0 {
            return Err(BlockError::NotFound);
        }

        self.usage.invalidate(user_id);
        info!(%user_id, %page_id, %block_id, "blocks: block deleted");

        Ok(())
    }

    /// Same contract as link reordering, scoped to one page's sibling set.
    pub async fn reorder_blocks(
        &self,
        user_id: Uuid,
        page_id: Uuid,
        ordered_ids: Vec<Uuid>,
    ) -> Result<(), BlockError> {
        self.ensure_page_owned(page_id, user_id).await?;

        let owned = self
            .block_repo
            .list_ids_by_page(page_id)
            .await
            .map_err(|err| {
                error!(%page_id, db_error = ?err, "blocks: failed to list block ids");
                BlockError::Internal(err)
            })?;

        if !ordering::is_same_id_set(&owned, &ordered_ids) {
            warn!(
                %user_id,
                %page_id,
                supplied = ordered_ids.len(),
                owned = owned.len(),
                "blocks: reorder ids do not match page's set, ignoring"
            );
            return Ok(());
        }

        self.block_repo
            .set_positions(page_id, ordered_ids)
            .await
            .map_err(|err| {
                error!(%page_id, db_error = ?err, "blocks: failed to write positions");
                BlockError::Internal(err)
            })?;

        info!(%user_id, %page_id, "blocks: reorder applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::pages::PageEntity,
        repositories::{blocks::MockBlockRepository, pages::MockPageRepository},
        value_objects::{
            enums::block_kinds::BlockKind,
            usage::{ResourceCounts, UsageSnapshot},
        },
    };
    use crate::usecases::usage::MockUsageService;
    use mockall::predicate::eq;
    use serde_json::json;

    fn owned_page(page_id: Uuid, user_id: Uuid) -> PageEntity {
        PageEntity {
            id: page_id,
            user_id,
            title: "Menu".to_string(),
            slug: "menu".to_string(),
            created_at: Utc::now(),
        }
    }

    fn page_repo_owning(page_id: Uuid, user_id: Uuid) -> MockPageRepository {
        let mut page_repo = MockPageRepository::new();
        page_repo
            .expect_find_owned()
            .with(eq(page_id), eq(user_id))
            .returning(move |_, _| {
                let page = owned_page(page_id, user_id);
                Box::pin(async move { Ok(Some(page)) })
            });
        page_repo
    }

    #[tokio::test]
    async fn create_on_a_foreign_page_reports_page_not_found() {
        let mut page_repo = MockPageRepository::new();
        page_repo
            .expect_find_owned()
            .returning(|_, _| Box::pin(async { Ok(None) }));

        let usecase = BlocksUseCase::new(
            Arc::new(MockBlockRepository::new()),
            Arc::new(page_repo),
            Arc::new(MockUsageService::new()),
        );

        let err = usecase
            .create_block(
                Uuid::new_v4(),
                Uuid::new_v4(),
                CreateBlockRequest {
                    kind: BlockKind::Text,
                    content: json!({"text": "hi"}),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BlockError::PageNotFound));
    }

    #[tokio::test]
    async fn create_is_denied_when_block_quota_is_full() {
        let user_id = Uuid::new_v4();
        let page_id = Uuid::new_v4();

        let mut usage = MockUsageService::new();
        usage.expect_get_limits().returning(|_| {
            Box::pin(async {
                Ok(UsageSnapshot::free_tier(ResourceCounts {
                    blocks: 10,
                    ..ResourceCounts::default()
                }))
            })
        });

        let usecase = BlocksUseCase::new(
            Arc::new(MockBlockRepository::new()),
            Arc::new(page_repo_owning(page_id, user_id)),
            Arc::new(usage),
        );

        let err = usecase
            .create_block(
                user_id,
                page_id,
                CreateBlockRequest {
                    kind: BlockKind::Text,
                    content: json!({"text": "hi"}),
                },
            )
            .await
            .unwrap_err();

        match err {
            BlockError::LimitExceeded(message) => assert!(message.contains("10")),
            other => panic!("expected LimitExceeded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_appends_within_the_page_sibling_set() {
        let user_id = Uuid::new_v4();
        let page_id = Uuid::new_v4();

        let mut usage = MockUsageService::new();
        usage
            .expect_get_limits()
            .returning(|_| Box::pin(async { Ok(UsageSnapshot::free_tier(ResourceCounts::default())) }));
        usage.expect_invalidate().returning(|_| ());

        let mut block_repo = MockBlockRepository::new();
        block_repo
            .expect_max_position()
            .with(eq(page_id))
            .returning(|_| Box::pin(async { Ok(Some(2)) }));
        block_repo
            .expect_insert()
            .withf(|entity| entity.position == 3 && entity.kind == "link")
            .returning(|_| Box::pin(async { Ok(Uuid::new_v4()) }));

        let usecase = BlocksUseCase::new(
            Arc::new(block_repo),
            Arc::new(page_repo_owning(page_id, user_id)),
            Arc::new(usage),
        );

        let dto = usecase
            .create_block(
                user_id,
                page_id,
                CreateBlockRequest {
                    kind: BlockKind::Link,
                    content: json!({"url": "https://example.com"}),
                },
            )
            .await
            .unwrap();

        assert_eq!(dto.position, 3);
    }

    #[tokio::test]
    async fn reorder_with_a_foreign_block_id_is_a_silent_no_op() {
        let user_id = Uuid::new_v4();
        let page_id = Uuid::new_v4();
        let a = Uuid::new_v4();

        let mut block_repo = MockBlockRepository::new();
        block_repo
            .expect_list_ids_by_page()
            .returning(move |_| Box::pin(async move { Ok(vec![a]) }));

        let usecase = BlocksUseCase::new(
            Arc::new(block_repo),
            Arc::new(page_repo_owning(page_id, user_id)),
            Arc::new(MockUsageService::new()),
        );

        usecase
            .reorder_blocks(user_id, page_id, vec![Uuid::new_v4()])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn reorder_writes_index_positions_for_a_permutation() {
        let user_id = Uuid::new_v4();
        let page_id = Uuid::new_v4();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let mut block_repo = MockBlockRepository::new();
        block_repo
            .expect_list_ids_by_page()
            .returning(move |_| Box::pin(async move { Ok(vec![a, b]) }));
        block_repo
            .expect_set_positions()
            .with(eq(page_id), eq(vec![b, a]))
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));

        let usecase = BlocksUseCase::new(
            Arc::new(block_repo),
            Arc::new(page_repo_owning(page_id, user_id)),
            Arc::new(MockUsageService::new()),
        );

        usecase
            .reorder_blocks(user_id, page_id, vec![b, a])
            .await
            .unwrap();
    }
}
