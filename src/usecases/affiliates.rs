use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::{
    entities::affiliates::InsertReferralEntity,
    repositories::affiliates::AffiliateRepository,
    value_objects::affiliates::{CommissionDto, RegisterReferralRequest},
};

/// Share of each referred payment credited to the referrer, in percent.
pub const COMMISSION_RATE_PERCENT: i32 = 20;

#[derive(Debug, Error)]
pub enum AffiliateError {
    #[error("referral code not found")]
    CodeNotFound,
    #[error("you cannot use your own referral code")]
    SelfReferral,
    #[error("user is already referred")]
    AlreadyReferred,
    #[error("commission not found")]
    CommissionNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AffiliateError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            AffiliateError::CodeNotFound => StatusCode::NOT_FOUND,
            AffiliateError::SelfReferral => StatusCode::BAD_REQUEST,
            AffiliateError::AlreadyReferred => StatusCode::CONFLICT,
            AffiliateError::CommissionNotFound => StatusCode::NOT_FOUND,
            AffiliateError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, AffiliateError>;

pub struct AffiliatesUseCase<A>
where
    A: AffiliateRepository + Send + Sync + 'static,
{
    affiliate_repo: Arc<A>,
}

impl<A> AffiliatesUseCase<A>
where
    A: AffiliateRepository + Send + Sync + 'static,
{
    pub fn new(affiliate_repo: Arc<A>) -> Self {
        Self { affiliate_repo }
    }

    pub async fn register_referral(
        &self,
        user_id: Uuid,
        request: RegisterReferralRequest,
    ) -> UseCaseResult<()> {
        let code = request.code.trim();

        let referrer_id = self
            .affiliate_repo
            .find_code_owner(code)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "affiliates: code lookup failed");
                AffiliateError::Internal(err)
            })?
            .ok_or(AffiliateError::CodeNotFound)?;

        if referrer_id == user_id {
            return Err(AffiliateError::SelfReferral);
        }

        let existing = self
            .affiliate_repo
            .find_referrer_of(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "affiliates: referrer lookup failed");
                AffiliateError::Internal(err)
            })?;
        if existing.is_some() {
            return Err(AffiliateError::AlreadyReferred);
        }

        self.affiliate_repo
            .insert_referral(InsertReferralEntity {
                referrer_id,
                referred_user_id: user_id,
                code: code.to_string(),
                created_at: Utc::now(),
            })
            .await
            .map_err(|err| {
                error!(%user_id, %referrer_id, db_error = ?err, "affiliates: failed to insert referral");
                AffiliateError::Internal(err)
            })?;

        info!(%user_id, %referrer_id, "affiliates: referral registered");
        Ok(())
    }

    pub async fn list_commissions(&self, referrer_id: Uuid) -> UseCaseResult<Vec<CommissionDto>> {
        let commissions = self
            .affiliate_repo
            .list_commissions_by_referrer(referrer_id)
            .await
            .map_err(|err| {
                error!(%referrer_id, db_error = ?err, "affiliates: failed to list commissions");
                AffiliateError::Internal(err)
            })?;

        Ok(commissions.into_iter().map(CommissionDto::from).collect())
    }

    pub async fn mark_commission_paid(&self, commission_id: Uuid) -> UseCaseResult<()> {
        let updated = self
            .affiliate_repo
            .mark_commission_paid(commission_id)
            .await
            .map_err(|err| {
                error!(%commission_id, db_error = ?err, "affiliates: failed to mark commission paid");
                AffiliateError::Internal(err)
            })?;

        if updated == 0 {
            return Err(AffiliateError::CommissionNotFound);
        }

        info!(%commission_id, "affiliates: commission marked paid");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::affiliates::MockAffiliateRepository;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn registers_a_referral_against_the_code_owner() {
        let user_id = Uuid::new_v4();
        let referrer_id = Uuid::new_v4();

        let mut affiliate_repo = MockAffiliateRepository::new();
        affiliate_repo
            .expect_find_code_owner()
            .with(eq("FRIEND20"))
            .returning(move |_| Box::pin(async move { Ok(Some(referrer_id)) }));
        affiliate_repo
            .expect_find_referrer_of()
            .with(eq(user_id))
            .returning(|_| Box::pin(async { Ok(None) }));
        affiliate_repo
            .expect_insert_referral()
            .withf(move |referral| {
                referral.referrer_id == referrer_id && referral.referred_user_id == user_id
            })
            .times(1)
            .returning(|_| Box::pin(async { Ok(Uuid::new_v4()) }));

        let usecase = AffiliatesUseCase::new(Arc::new(affiliate_repo));

        usecase
            .register_referral(
                user_id,
                RegisterReferralRequest {
                    code: " FRIEND20 ".to_string(),
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rejects_using_your_own_referral_code() {
        let user_id = Uuid::new_v4();

        let mut affiliate_repo = MockAffiliateRepository::new();
        affiliate_repo
            .expect_find_code_owner()
            .returning(move |_| Box::pin(async move { Ok(Some(user_id)) }));

        let usecase = AffiliatesUseCase::new(Arc::new(affiliate_repo));

        let result = usecase
            .register_referral(
                user_id,
                RegisterReferralRequest {
                    code: "MYCODE".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AffiliateError::SelfReferral)));
    }

    #[tokio::test]
    async fn rejects_a_second_referral_for_the_same_user() {
        let user_id = Uuid::new_v4();

        let mut affiliate_repo = MockAffiliateRepository::new();
        affiliate_repo
            .expect_find_code_owner()
            .returning(|_| Box::pin(async { Ok(Some(Uuid::new_v4())) }));
        affiliate_repo
            .expect_find_referrer_of()
            .returning(|_| Box::pin(async { Ok(Some(Uuid::new_v4())) }));

        let usecase = AffiliatesUseCase::new(Arc::new(affiliate_repo));

        let result = usecase
            .register_referral(
                user_id,
                RegisterReferralRequest {
                    code: "FRIEND20".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AffiliateError::AlreadyReferred)));
    }

    #[tokio::test]
    async fn unknown_referral_code_is_not_found() {
        let mut affiliate_repo = MockAffiliateRepository::new();
        affiliate_repo
            .expect_find_code_owner()
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = AffiliatesUseCase::new(Arc::new(affiliate_repo));

        let result = usecase
            .register_referral(
                Uuid::new_v4(),
                RegisterReferralRequest {
                    code: "NOPE".to_string(),
                },
            )
            .await;

        assert!(matches!(result, Err(AffiliateError::CodeNotFound)));
    }
}
