use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::teams::{InsertTeamEntity, InsertTeamMemberEntity},
    repositories::teams::TeamRepository,
    value_objects::{
        enums::team_roles::TeamRole,
        teams::{AddTeamMemberRequest, CreateTeamRequest, TeamMemberDto},
    },
};
use crate::usecases::usage::UsageService;

#[derive(Debug, Error)]
pub enum TeamError {
    #[error("{0}")]
    LimitExceeded(String),
    #[error("team not found")]
    NotFound,
    #[error("user already belongs to a team")]
    AlreadyOnTeam,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl TeamError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            TeamError::LimitExceeded(_) => StatusCode::FORBIDDEN,
            TeamError::NotFound => StatusCode::NOT_FOUND,
            TeamError::AlreadyOnTeam => StatusCode::CONFLICT,
            TeamError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub struct TeamsUseCase<T, U>
where
    T: TeamRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    team_repo: Arc<T>,
    usage: Arc<U>,
}

impl<T, U> TeamsUseCase<T, U>
where
    T: TeamRepository + Send + Sync + 'static,
    U: UsageService + 'static,
{
    pub fn new(team_repo: Arc<T>, usage: Arc<U>) -> Self {
        Self { team_repo, usage }
    }

    pub async fn create_team(
        &self,
        owner_id: Uuid,
        request: CreateTeamRequest,
    ) -> Result<Uuid, TeamError> {
        let now = Utc::now();
        let team_id = self
            .team_repo
            .create_team(InsertTeamEntity {
                owner_id,
                name: request.name,
                created_at: now,
            })
            .await
            .map_err(|err| {
                error!(%owner_id, db_error = ?err, "teams: failed to create team");
                TeamError::Internal(err)
            })?;

        // The owner is the team's first member.
        self.team_repo
            .add_member(InsertTeamMemberEntity {
                team_id,
                user_id: owner_id,
                role: TeamRole::Owner.to_string(),
                created_at: now,
            })
            .await
            .map_err(|err| {
                error!(%owner_id, %team_id, db_error = ?err, "teams: failed to add owner member");
                TeamError::Internal(err)
            })?;

        self.usage.invalidate(owner_id);
        info!(%owner_id, %team_id, "teams: team created");

        Ok(team_id)
    }

    /// Member creation is gated inline with the same comparison the action
    /// gate uses: a count already at capacity denies, the last slot fills.
    pub async fn add_member(
        &self,
        owner_id: Uuid,
        team_id: Uuid,
        request: AddTeamMemberRequest,
    ) -> Result<(), TeamError> {
        self.ensure_team_owned(team_id, owner_id).await?;

        let existing = self
            .team_repo
            .find_team_of_user(request.user_id)
            .await
            .map_err(|err| {
                error!(user_id = %request.user_id, db_error = ?err, "teams: failed to check membership");
                TeamError::Internal(err)
            })?;
        if existing.is_some() {
            return Err(TeamError::AlreadyOnTeam);
        }

        let snapshot = self.usage.get_limits(owner_id).await.map_err(|err| {
            error!(%owner_id, db_error = ?err, "teams: failed to load usage snapshot");
            TeamError::Internal(err)
        })?;

        if snapshot.team_members.at_capacity() {
            warn!(
                %owner_id,
                %team_id,
                current = snapshot.team_members.current,
                max = snapshot.team_members.max,
                status = axum::http::StatusCode::FORBIDDEN.as_u16(),
                "teams: member limit reached"
            );
            return Err(TeamError::LimitExceeded(format!(
                "You have reached your team member limit of {}. Upgrade your plan to add more.",
                snapshot.team_members.max
            )));
        }

        self.team_repo
            .add_member(InsertTeamMemberEntity {
                team_id,
                user_id: request.user_id,
                role: request.role.to_string(),
                created_at: Utc::now(),
            })
            .await
            .map_err(|err| {
                error!(%team_id, user_id = %request.user_id, db_error = ?err, "teams: failed to add member");
                TeamError::Internal(err)
            })?;

        self.usage.invalidate(owner_id);
        info!(%team_id, user_id = %request.user_id, "teams: member added");

        Ok(())
    }

    pub async fn remove_member(
        &self,
        owner_id: Uuid,
        team_id: Uuid,
        member_user_id: Uuid,
    ) -> Result<(), TeamError> {
        self.ensure_team_owned(team_id, owner_id).await?;

        let removed = self
            .team_repo
            .remove_member(team_id, member_user_id)
            .await
            .map_err(|err| {
                error!(%team_id, user_id = %member_user_id, db_error = ?err, "teams: failed to remove member");
                TeamError::Internal(err)
            })?;

        if removed == 0 {
            return Err(TeamError::NotFound);
        }

        self.usage.invalidate(owner_id);
        // The removed user's own snapshot now reports zero team members.
        self.usage.invalidate(member_user_id);
        info!(%team_id, user_id = %member_user_id, "teams: member removed");

        Ok(())
    }

    /// Shared entries are visible only while the requester belongs to the
    /// team; anyone else sees the same "not found" as for a missing team.
    pub async fn list_members(&self, requester_id: Uuid) -> Result<Vec<TeamMemberDto>, TeamError> {
        let team_id = self
            .team_repo
            .find_team_of_user(requester_id)
            .await
            .map_err(|err| {
                error!(%requester_id, db_error = ?err, "teams: failed to resolve membership");
                TeamError::Internal(err)
            })?
            .ok_or(TeamError::NotFound)?;

        let members = self.team_repo.list_members(team_id).await.map_err(|err| {
            error!(%team_id, db_error = ?err, "teams: failed to list members");
            TeamError::Internal(err)
        })?;

        Ok(members
            .into_iter()
            .map(|member| TeamMemberDto {
                user_id: member.user_id,
                role: TeamRole::from_str(&member.role),
            })
            .collect())
    }

    async fn ensure_team_owned(&self, team_id: Uuid, owner_id: Uuid) -> Result<(), TeamError> {
        let team = self
            .team_repo
            .find_owned(team_id, owner_id)
            .await
            .map_err(|err| {
                error!(%team_id, %owner_id, db_error = ?err, "teams: failed to load team");
                TeamError::Internal(err)
            })?;

        if team.is_none() {
            return Err(TeamError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::teams::TeamEntity,
        repositories::teams::MockTeamRepository,
        value_objects::usage::{ResourceCounts, UsageSnapshot},
    };
    use crate::usecases::usage::MockUsageService;
    use mockall::predicate::eq;

    fn team_repo_owning(team_id: Uuid, owner_id: Uuid) -> MockTeamRepository {
        let mut team_repo = MockTeamRepository::new();
        team_repo
            .expect_find_owned()
            .with(eq(team_id), eq(owner_id))
            .returning(move |_, _| {
                let team = TeamEntity {
                    id: team_id,
                    owner_id,
                    name: "Cafe crew".to_string(),
                    created_at: Utc::now(),
                };
                Box::pin(async move { Ok(Some(team)) })
            });
        team_repo
    }

    fn usage_with_members(current: i64) -> MockUsageService {
        let mut usage = MockUsageService::new();
        usage.expect_get_limits().returning(move |_| {
            Box::pin(async move {
                Ok(UsageSnapshot::free_tier(ResourceCounts {
                    team_members: current,
                    ..ResourceCounts::default()
                }))
            })
        });
        usage
    }

    #[tokio::test]
    async fn add_member_is_denied_once_member_count_is_at_capacity() {
        let owner_id = Uuid::new_v4();
        let team_id = Uuid::new_v4();

        let mut team_repo = team_repo_owning(team_id, owner_id);
        team_repo
            .expect_find_team_of_user()
            .returning(|_| Box::pin(async { Ok(None) }));

        // Free tier allows a single member (the owner).
        let usecase = TeamsUseCase::new(Arc::new(team_repo), Arc::new(usage_with_members(1)));

        let err = usecase
            .add_member(
                owner_id,
                team_id,
                AddTeamMemberRequest {
                    user_id: Uuid::new_v4(),
                    role: TeamRole::Member,
                },
            )
            .await
            .unwrap_err();

        match err {
            TeamError::LimitExceeded(message) => assert!(message.contains("1")),
            other => panic!("expected LimitExceeded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn add_member_rejects_users_already_on_a_team() {
        let owner_id = Uuid::new_v4();
        let team_id = Uuid::new_v4();

        let mut team_repo = team_repo_owning(team_id, owner_id);
        team_repo
            .expect_find_team_of_user()
            .returning(|_| Box::pin(async { Ok(Some(Uuid::new_v4())) }));

        let usecase = TeamsUseCase::new(Arc::new(team_repo), Arc::new(MockUsageService::new()));

        assert!(matches!(
            usecase
                .add_member(
                    owner_id,
                    team_id,
                    AddTeamMemberRequest {
                        user_id: Uuid::new_v4(),
                        role: TeamRole::Member,
                    },
                )
                .await,
            Err(TeamError::AlreadyOnTeam)
        ));
    }

    #[tokio::test]
    async fn remove_member_invalidates_both_snapshots() {
        let owner_id = Uuid::new_v4();
        let team_id = Uuid::new_v4();
        let member_id = Uuid::new_v4();

        let mut team_repo = team_repo_owning(team_id, owner_id);
        team_repo
            .expect_remove_member()
            .with(eq(team_id), eq(member_id))
            .returning(|_, _| Box::pin(async { Ok(1) }));

        let mut usage = MockUsageService::new();
        usage
            .expect_invalidate()
            .with(eq(owner_id))
            .times(1)
            .returning(|_| ());
        usage
            .expect_invalidate()
            .with(eq(member_id))
            .times(1)
            .returning(|_| ());

        let usecase = TeamsUseCase::new(Arc::new(team_repo), Arc::new(usage));

        usecase
            .remove_member(owner_id, team_id, member_id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn members_are_hidden_from_users_not_on_the_team() {
        let mut team_repo = MockTeamRepository::new();
        team_repo
            .expect_find_team_of_user()
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = TeamsUseCase::new(Arc::new(team_repo), Arc::new(MockUsageService::new()));

        assert!(matches!(
            usecase.list_members(Uuid::new_v4()).await,
            Err(TeamError::NotFound)
        ));
    }
}
