use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::{
        entities::{
            payments::InsertPaymentEntity,
            plans::{PlanEntity, PlanRow},
            subscriptions::{InsertSubscriptionEntity, SubscriptionEntity},
        },
        repositories::subscriptions::SubscriptionRepository,
        value_objects::enums::{
            account_types::AccountType, subscription_statuses::SubscriptionStatus,
        },
    },
    infrastructure::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{app_users, payments, plans, subscriptions},
    },
};

pub struct SubscriptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl SubscriptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl SubscriptionRepository for SubscriptionPostgres {
    async fn find_active_with_plan(
        &self,
        user_id: Uuid,
    ) -> Result<Option<(SubscriptionEntity, PlanEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let pair = subscriptions::table
            .inner_join(plans::table)
            .filter(subscriptions::user_id.eq(user_id))
            .filter(subscriptions::status.eq(SubscriptionStatus::Active.to_string()))
            .filter(subscriptions::ends_at.gt(Utc::now()))
            .select((SubscriptionEntity::as_select(), PlanRow::as_select()))
            .first::<(SubscriptionEntity, PlanRow)>(&mut conn)
            .optional()?;

        Ok(pair.map(|(subscription, row)| (subscription, PlanEntity::from(row))))
    }

    async fn activate(
        &self,
        insert_subscription_entity: InsertSubscriptionEntity,
        insert_payment_entity: InsertPaymentEntity,
    ) -> Result<(Uuid, Uuid)> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let user_id = insert_subscription_entity.user_id;

        let ids = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            // Prior active subscriptions give way to the new one.
            update(subscriptions::table)
                .filter(subscriptions::user_id.eq(user_id))
                .filter(subscriptions::status.eq(SubscriptionStatus::Active.to_string()))
                .set((
                    subscriptions::status.eq(SubscriptionStatus::Canceled.to_string()),
                    subscriptions::canceled_at.eq(Some(Utc::now())),
                ))
                .execute(conn)?;

            let subscription_id = insert_into(subscriptions::table)
                .values(&insert_subscription_entity)
                .returning(subscriptions::id)
                .get_result::<Uuid>(conn)?;

            let payment_id = insert_into(payments::table)
                .values(&insert_payment_entity)
                .returning(payments::id)
                .get_result::<Uuid>(conn)?;

            update(app_users::table)
                .filter(app_users::id.eq(user_id))
                .set(app_users::account_type.eq(AccountType::Business.to_string()))
                .execute(conn)?;

            Ok((subscription_id, payment_id))
        })?;

        Ok(ids)
    }

    async fn cancel_current(&self, user_id: Uuid) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = update(subscriptions::table)
            .filter(subscriptions::user_id.eq(user_id))
            .filter(subscriptions::status.eq(SubscriptionStatus::Active.to_string()))
            .filter(subscriptions::ends_at.gt(Utc::now()))
            .set((
                subscriptions::status.eq(SubscriptionStatus::Canceled.to_string()),
                subscriptions::canceled_at.eq(Some(Utc::now())),
            ))
            .execute(&mut conn)?;

        Ok(rows)
    }
}
