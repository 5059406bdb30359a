use std::sync::Arc;

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::{
    entities::{
        affiliates::InsertCommissionEntity, payments::InsertPaymentEntity,
        subscriptions::InsertSubscriptionEntity,
    },
    repositories::{
        affiliates::AffiliateRepository, plans::PlanRepository,
        subscriptions::SubscriptionRepository,
    },
    value_objects::{
        enums::{
            commission_statuses::CommissionStatus, payment_statuses::PaymentStatus,
            subscription_statuses::SubscriptionStatus,
        },
        subscriptions::{CurrentSubscriptionDto, PlanDto},
    },
};
use crate::infrastructure::payments::gateway_client::{GatewayClient, GatewayEvent};
use crate::usecases::affiliates::COMMISSION_RATE_PERCENT;

/// Gateway event type that completes a checkout and activates the plan.
const CHECKOUT_COMPLETED: &str = "checkout.completed";

#[cfg_attr(test, mockall::automock)]
pub trait PaymentGateway: Send + Sync {
    fn verify_webhook_signature(&self, payload: &[u8], signature: &str) -> AnyResult<GatewayEvent>;
}

impl PaymentGateway for GatewayClient {
    fn verify_webhook_signature(&self, payload: &[u8], signature: &str) -> AnyResult<GatewayEvent> {
        self.verify_webhook_signature(payload, signature)
    }
}

#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("plan not found")]
    PlanNotFound,
    #[error("invalid webhook payload: {0}")]
    InvalidWebhook(String),
    #[error("no active subscription to cancel")]
    SubscriptionNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl SubscriptionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            SubscriptionError::PlanNotFound => StatusCode::NOT_FOUND,
            SubscriptionError::InvalidWebhook(_) => StatusCode::BAD_REQUEST,
            SubscriptionError::SubscriptionNotFound => StatusCode::NOT_FOUND,
            SubscriptionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, SubscriptionError>;

pub struct SubscriptionUseCase<P, S, A, G>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    A: AffiliateRepository + Send + Sync + 'static,
    G: PaymentGateway + 'static,
{
    plan_repo: Arc<P>,
    subscription_repo: Arc<S>,
    affiliate_repo: Arc<A>,
    gateway: Arc<G>,
}

impl<P, S, A, G> SubscriptionUseCase<P, S, A, G>
where
    P: PlanRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    A: AffiliateRepository + Send + Sync + 'static,
    G: PaymentGateway + 'static,
{
    pub fn new(
        plan_repo: Arc<P>,
        subscription_repo: Arc<S>,
        affiliate_repo: Arc<A>,
        gateway: Arc<G>,
    ) -> Self {
        Self {
            plan_repo,
            subscription_repo,
            affiliate_repo,
            gateway,
        }
    }

    pub async fn list_plans(&self) -> UseCaseResult<Vec<PlanDto>> {
        let plans = self.plan_repo.list_active_plans().await.map_err(|err| {
            error!(db_error = ?err, "subscriptions: failed to list active plans");
            SubscriptionError::Internal(err)
        })?;

        Ok(plans.into_iter().map(PlanDto::from).collect())
    }

    pub async fn get_current_subscription(
        &self,
        user_id: Uuid,
    ) -> UseCaseResult<Option<CurrentSubscriptionDto>> {
        let pair = self
            .subscription_repo
            .find_active_with_plan(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscriptions: failed to load current subscription");
                SubscriptionError::Internal(err)
            })?;

        Ok(pair.map(|(subscription, plan)| CurrentSubscriptionDto {
            plan_id: plan.id,
            plan_name: plan.name,
            status: SubscriptionStatus::from_str(&subscription.status),
            starts_at: subscription.starts_at,
            ends_at: subscription.ends_at,
            limits: plan.limits,
        }))
    }

    pub async fn cancel_subscription(&self, user_id: Uuid) -> UseCaseResult<()> {
        let canceled = self
            .subscription_repo
            .cancel_current(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscriptions: failed to cancel subscription");
                SubscriptionError::Internal(err)
            })?;

        if canceled == 0 {
            return Err(SubscriptionError::SubscriptionNotFound);
        }

        info!(%user_id, "subscriptions: subscription canceled");
        Ok(())
    }

    /// Entry point for gateway callbacks. Verifies the HMAC signature over
    /// the raw payload before trusting anything inside it; events other than
    /// checkout completion are acknowledged and ignored.
    pub async fn handle_webhook(&self, payload: &[u8], signature: &str) -> UseCaseResult<()> {
        let event = self
            .gateway
            .verify_webhook_signature(payload, signature)
            .map_err(|err| {
                warn!(
                    error = %err,
                    status = axum::http::StatusCode::BAD_REQUEST.as_u16(),
                    "subscriptions: webhook signature rejected"
                );
                SubscriptionError::InvalidWebhook(err.to_string())
            })?;

        if event.type_ != CHECKOUT_COMPLETED {
            info!(event_type = %event.type_, "subscriptions: ignoring webhook event");
            return Ok(());
        }

        let session = GatewayClient::extract_checkout_session(&event).ok_or_else(|| {
            SubscriptionError::InvalidWebhook("malformed checkout session".to_string())
        })?;
        let metadata = session.metadata.unwrap_or_default();

        let user_id = metadata
            .get("user_id")
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .ok_or_else(|| {
                SubscriptionError::InvalidWebhook("missing or invalid user_id".to_string())
            })?;
        let plan_id = metadata
            .get("plan_id")
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .ok_or_else(|| {
                SubscriptionError::InvalidWebhook("missing or invalid plan_id".to_string())
            })?;

        self.activate_from_checkout(user_id, plan_id, session.amount_total, session.payment_ref)
            .await
    }

    /// Subscription row, payment record, and account-type upgrade land in one
    /// repository transaction, so a crash cannot leave a paid-but-inactive
    /// account behind.
    pub async fn activate_from_checkout(
        &self,
        user_id: Uuid,
        plan_id: Uuid,
        amount_total: Option<i64>,
        provider_ref: Option<String>,
    ) -> UseCaseResult<()> {
        let plan = self
            .plan_repo
            .find_active_plan_by_id(plan_id)
            .await
            .map_err(|err| {
                error!(%plan_id, db_error = ?err, "subscriptions: failed to load plan");
                SubscriptionError::Internal(err)
            })?
            .ok_or(SubscriptionError::PlanNotFound)?;

        let amount_minor = amount_total
            .and_then(|total| i32::try_from(total).ok())
            .unwrap_or(plan.price_minor);

        let now = Utc::now();
        let ends_at = now + Duration::days(plan.duration_days.into());

        let (subscription_id, payment_id) = self
            .subscription_repo
            .activate(
                InsertSubscriptionEntity {
                    user_id,
                    plan_id,
                    starts_at: now,
                    ends_at,
                    status: SubscriptionStatus::Active.to_string(),
                    canceled_at: None,
                },
                InsertPaymentEntity {
                    user_id,
                    plan_id,
                    amount_minor,
                    provider_ref,
                    status: PaymentStatus::Succeeded.to_string(),
                },
            )
            .await
            .map_err(|err| {
                error!(%user_id, %plan_id, db_error = ?err, "subscriptions: failed to activate");
                SubscriptionError::Internal(err)
            })?;

        info!(
            %user_id,
            %plan_id,
            %subscription_id,
            "subscriptions: subscription activated"
        );

        self.accrue_commission(user_id, payment_id, amount_minor)
            .await;

        Ok(())
    }

    /// Commission failures are logged, never bubbled: the activation already
    /// committed and the gateway must not see the webhook as failed.
    async fn accrue_commission(&self, user_id: Uuid, payment_id: Uuid, amount_minor: i32) {
        let referrer = match self.affiliate_repo.find_referrer_of(user_id).await {
            Ok(referrer) => referrer,
            Err(err) => {
                error!(%user_id, db_error = ?err, "subscriptions: referrer lookup failed");
                return;
            }
        };

        let Some(referrer_id) = referrer else {
            return;
        };

        // Widened so large amounts cannot overflow before the division.
        let commission_minor =
            (i64::from(amount_minor) * i64::from(COMMISSION_RATE_PERCENT) / 100) as i32;
        match self
            .affiliate_repo
            .insert_commission(InsertCommissionEntity {
                referrer_id,
                payment_id,
                amount_minor: commission_minor,
                status: CommissionStatus::Pending.to_string(),
                paid_at: None,
            })
            .await
        {
            Ok(commission_id) => {
                info!(
                    %referrer_id,
                    %commission_id,
                    commission_minor,
                    "subscriptions: commission accrued"
                );
            }
            Err(err) => {
                error!(%referrer_id, %payment_id, db_error = ?err, "subscriptions: commission insert failed");
            }
        }
    }
}
