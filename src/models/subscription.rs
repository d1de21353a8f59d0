use crate::entities::user_subscription_entity as us;
use crate::error::{AppError, AppResult};
use crate::models::MonthYear;
use crate::utils::validate_uuid4;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Request body for both create and update.
///
/// Missing fields decode to their zero value. On create every required field
/// must be set; on update a zero value means "keep the stored one".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct SubscriptionPayload {
    #[validate(length(min = 1, message = "service_name is required"))]
    #[schema(example = "Yandex Plus")]
    pub service_name: String,
    #[validate(range(min = 1, message = "monthly_price must be greater than 0"))]
    #[schema(example = 400)]
    pub monthly_price: i32,
    #[validate(custom(function = "validate_uuid4"))]
    #[schema(example = "60601fee-2bf1-4721-ae6f-7636e79a0cba")]
    pub user_id: String,
    #[validate(required(message = "start_date is required"))]
    #[schema(value_type = Option<String>, example = "07-2025")]
    pub start_date: Option<MonthYear>,
    #[schema(value_type = Option<String>, example = "12-2025")]
    pub end_date: Option<MonthYear>,
}

impl SubscriptionPayload {
    /// True when every field is at its zero value.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn into_new_subscription(self) -> AppResult<NewSubscription> {
        if self.is_empty() {
            return Err(AppError::ValidationError("request body is empty".into()));
        }
        self.validate()?;

        let start_date = self
            .start_date
            .ok_or_else(|| AppError::ValidationError("start_date is required".into()))?;

        Ok(NewSubscription {
            service_name: self.service_name,
            monthly_price: self.monthly_price,
            user_id: self.user_id,
            start_date,
            end_date: self.end_date,
        })
    }
}

/// A subscription that passed validation and can be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub service_name: String,
    pub monthly_price: i32,
    pub user_id: String,
    pub start_date: MonthYear,
    pub end_date: Option<MonthYear>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: i32,
    pub service_name: String,
    pub monthly_price: i32,
    pub user_id: String,
    #[schema(value_type = String, example = "07-2025")]
    pub start_date: MonthYear,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, example = "12-2025")]
    pub end_date: Option<MonthYear>,
}

impl From<us::Model> for SubscriptionResponse {
    fn from(m: us::Model) -> Self {
        Self {
            id: m.id,
            service_name: m.service_name,
            monthly_price: m.monthly_price,
            user_id: m.user_id,
            start_date: MonthYear::from_date(m.start_date),
            end_date: m.end_date.map(MonthYear::from_date),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TotalPriceQuery {
    /// First month of the window, `MM-YYYY`
    pub start_date: Option<String>,
    /// Last month of the window, `MM-YYYY`
    pub end_date: Option<String>,
    pub user_id: Option<String>,
    pub service_name: Option<String>,
}

/// Parsed total-price request. Blank optional filters are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct TotalPriceParams {
    pub start_date: MonthYear,
    pub end_date: MonthYear,
    pub user_id: Option<String>,
    pub service_name: Option<String>,
}

impl TryFrom<TotalPriceQuery> for TotalPriceParams {
    type Error = AppError;

    fn try_from(q: TotalPriceQuery) -> Result<Self, Self::Error> {
        let month = |value: Option<String>, name: &str| -> AppResult<MonthYear> {
            let value = value
                .filter(|v| !v.is_empty())
                .ok_or_else(|| AppError::InvalidDateFormat(format!("{name} is required")))?;
            value.parse().map_err(|e: AppError| match e {
                AppError::InvalidDateFormat(msg) => {
                    AppError::InvalidDateFormat(format!("{name}: {msg}"))
                }
                other => other,
            })
        };

        let start_date = month(q.start_date, "start_date")?;
        let end_date = month(q.end_date, "end_date")?;

        Ok(Self {
            start_date,
            end_date,
            user_id: q.user_id.filter(|v| !v.is_empty()),
            service_name: q.service_name.filter(|v| !v.is_empty()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TotalPriceResponse {
    pub total_price: i64,
}
