use crate::entities::user_subscription_entity as us;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::PriceFilter;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use std::future::Future;
use std::time::Duration;

/// Upper bound for a single storage round-trip.
pub const DB_TIMEOUT: Duration = Duration::from_secs(5);

async fn with_timeout<T>(fut: impl Future<Output = AppResult<T>>) -> AppResult<T> {
    tokio::time::timeout(DB_TIMEOUT, fut)
        .await
        .map_err(|_| AppError::Timeout)?
}

/// The row that stands for a user: latest start month, then highest id.
fn latest_for_user(user_id: &str) -> Select<us::Entity> {
    us::Entity::find()
        .filter(us::Column::UserId.eq(user_id))
        .order_by_desc(us::Column::StartDate)
        .order_by_desc(us::Column::Id)
}

/// Applies the non-zero fields of `patch` onto `current`. The user id is
/// never taken from the patch.
fn merge(mut current: us::Model, patch: &SubscriptionPayload) -> us::Model {
    if !patch.service_name.is_empty() {
        current.service_name = patch.service_name.clone();
    }
    if patch.monthly_price > 0 {
        current.monthly_price = patch.monthly_price;
    }
    if let Some(start) = patch.start_date {
        current.start_date = start.to_date();
    }
    if let Some(end) = patch.end_date {
        current.end_date = Some(end.to_date());
    }
    current
}

pub struct SubscriptionService {
    pool: DatabaseConnection,
}

impl SubscriptionService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create(&self, sub: NewSubscription) -> AppResult<SubscriptionResponse> {
        with_timeout(async move {
            let model = us::ActiveModel {
                service_name: Set(sub.service_name),
                monthly_price: Set(sub.monthly_price),
                user_id: Set(sub.user_id),
                start_date: Set(sub.start_date.to_date()),
                end_date: Set(sub.end_date.map(MonthYear::to_date)),
                ..Default::default()
            }
            .insert(&self.pool)
            .await?;

            log::info!(
                "Created subscription {} ({}) for user {}",
                model.id,
                model.service_name,
                model.user_id
            );
            Ok(SubscriptionResponse::from(model))
        })
        .await
    }

    pub async fn find_latest(&self, user_id: &str) -> AppResult<SubscriptionResponse> {
        if user_id.trim().is_empty() {
            return Err(AppError::MissingIdentity);
        }

        with_timeout(async {
            latest_for_user(user_id)
                .one(&self.pool)
                .await?
                .map(SubscriptionResponse::from)
                .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))
        })
        .await
    }

    pub async fn list(&self) -> AppResult<Vec<SubscriptionResponse>> {
        with_timeout(async {
            let models = us::Entity::find()
                .order_by_asc(us::Column::Id)
                .all(&self.pool)
                .await?;
            Ok(models.into_iter().map(SubscriptionResponse::from).collect())
        })
        .await
    }

    /// Merges `patch` onto the user's current row and writes the result to
    /// every row of that user.
    ///
    /// Fetch and write share one transaction; on Postgres the fetched row is
    /// locked so concurrent updates for the same user are serialized.
    pub async fn update(
        &self,
        user_id: &str,
        patch: SubscriptionPayload,
    ) -> AppResult<SubscriptionResponse> {
        if user_id.trim().is_empty() {
            return Err(AppError::MissingIdentity);
        }

        with_timeout(async {
            let txn = self.pool.begin().await?;

            let mut query = latest_for_user(user_id);
            if txn.get_database_backend() == DbBackend::Postgres {
                query = query.lock_exclusive();
            }
            let current = query
                .one(&txn)
                .await?
                .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))?;

            if !patch.user_id.is_empty() && patch.user_id != user_id {
                return Err(AppError::ImmutableField("user_id".to_string()));
            }

            let merged = merge(current, &patch);

            let result = us::Entity::update_many()
                .col_expr(
                    us::Column::ServiceName,
                    Expr::value(merged.service_name.clone()),
                )
                .col_expr(us::Column::MonthlyPrice, Expr::value(merged.monthly_price))
                .col_expr(us::Column::StartDate, Expr::value(merged.start_date))
                .col_expr(us::Column::EndDate, Expr::value(merged.end_date))
                .filter(us::Column::UserId.eq(user_id))
                .exec(&txn)
                .await?;

            txn.commit().await?;

            log::info!(
                "Updated {} subscription row(s) for user {user_id}",
                result.rows_affected
            );
            Ok(SubscriptionResponse::from(merged))
        })
        .await
    }

    /// Removes every row of the user. Deleting an unknown user is not an
    /// error.
    pub async fn delete(&self, user_id: &str) -> AppResult<u64> {
        if user_id.trim().is_empty() {
            return Err(AppError::MissingIdentity);
        }

        with_timeout(async {
            let result = us::Entity::delete_many()
                .filter(us::Column::UserId.eq(user_id))
                .exec(&self.pool)
                .await?;

            log::info!(
                "Deleted {} subscription row(s) for user {user_id}",
                result.rows_affected
            );
            Ok(result.rows_affected)
        })
        .await
    }

    /// Sum of monthly prices of the subscriptions active in the window.
    /// No matching rows sums to zero.
    pub async fn total_price(&self, params: &TotalPriceParams) -> AppResult<i64> {
        #[derive(Debug, sea_orm::FromQueryResult)]
        struct TotalRow {
            total: Option<i64>,
        }

        let filter = PriceFilter::from_params(params);

        with_timeout(async move {
            let total = us::Entity::find()
                .select_only()
                .column_as(Expr::col(us::Column::MonthlyPrice).sum(), "total")
                .filter(filter.into_condition())
                .into_model::<TotalRow>()
                .one(&self.pool)
                .await?
                .and_then(|r| r.total)
                .unwrap_or(0);
            Ok(total)
        })
        .await
    }
}
