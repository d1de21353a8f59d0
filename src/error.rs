use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Database operation timed out")]
    Timeout,

    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("User id is missing")]
    MissingIdentity,

    #[error("Field cannot be changed: {0}")]
    ImmutableField(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::ValidationError(errors.to_string())
    }
}

impl AppError {
    fn code(&self) -> &'static str {
        match self {
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::Timeout => "TIMEOUT",
            AppError::InvalidDateFormat(_) => "INVALID_DATE_FORMAT",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::MissingIdentity => "MISSING_IDENTITY",
            AppError::ImmutableField(_) => "IMMUTABLE_FIELD",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ConfigError(_) | AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidDateFormat(_)
            | AppError::ValidationError(_)
            | AppError::MissingIdentity
            | AppError::ImmutableField(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_)
            | AppError::Timeout
            | AppError::ConfigError(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let message = match self {
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                "Database error".to_string()
            }
            AppError::Timeout => {
                log::error!("Database operation timed out");
                "Database operation timed out".to_string()
            }
            AppError::ConfigError(_) | AppError::InternalError(_) => {
                log::error!("Internal error: {self}");
                "Internal server error".to_string()
            }
            AppError::NotFound(msg) => msg.clone(),
            _ => {
                log::warn!("{self}");
                self.to_string()
            }
        };

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": self.code(),
                "message": message
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::InvalidDateFormat("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::ImmutableField("user_id".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::MissingIdentity.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("gone".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Timeout.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::DatabaseError(sea_orm::DbErr::Custom("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn test_error_response_hides_database_details() {
        let resp = AppError::DatabaseError(sea_orm::DbErr::Custom("secret dsn".into()))
            .error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "DATABASE_ERROR");
        assert_eq!(body["error"]["message"], "Database error");
    }
}
