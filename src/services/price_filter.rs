use crate::entities::user_subscription_entity as us;
use crate::models::{MonthYear, TotalPriceParams};
use sea_orm::{ColumnTrait, Condition, sea_query::IntoCondition};

/// Predicates of a total-price query, joined with AND.
///
/// Each predicate carries its own bound value, so placeholders are numbered
/// in the order the predicates were added no matter which optional filters
/// are present.
#[derive(Debug, Clone)]
pub struct PriceFilter {
    condition: Condition,
    #[cfg(test)]
    len: usize,
}

impl PriceFilter {
    /// Rows whose active months intersect `[start, end]`. A row without an
    /// end date is still running and only needs to have started by `end`.
    pub fn window(start: MonthYear, end: MonthYear) -> Self {
        Self {
            condition: Condition::all(),
            #[cfg(test)]
            len: 0,
        }
        .push(us::Column::StartDate.lte(end.to_date()))
        .push(
            Condition::any()
                .add(us::Column::EndDate.is_null())
                .add(us::Column::EndDate.gte(start.to_date())),
        )
    }

    pub fn from_params(params: &TotalPriceParams) -> Self {
        Self::window(params.start_date, params.end_date)
            .user_id(params.user_id.as_deref())
            .service_name(params.service_name.as_deref())
    }

    pub fn user_id(self, user_id: Option<&str>) -> Self {
        match user_id.filter(|v| !v.is_empty()) {
            Some(v) => self.push(us::Column::UserId.eq(v)),
            None => self,
        }
    }

    pub fn service_name(self, service_name: Option<&str>) -> Self {
        match service_name.filter(|v| !v.is_empty()) {
            Some(v) => self.push(us::Column::ServiceName.eq(v)),
            None => self,
        }
    }

    fn push<C: IntoCondition>(mut self, predicate: C) -> Self {
        self.condition = self.condition.add(predicate.into_condition());
        #[cfg(test)]
        {
            self.len += 1;
        }
        self
    }

    #[cfg(test)]
    fn predicate_count(&self) -> usize {
        self.len
    }

    pub fn into_condition(self) -> Condition {
        self.condition
    }
}
