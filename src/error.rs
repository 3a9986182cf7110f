use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::{Display, From};
use serde_json::json;
use tracing::error;

#[derive(Debug, Display, From)]
pub enum AppError {
    /// Rejected input; nothing was written.
    #[display(fmt = "{}", _0)]
    #[from(ignore)]
    Validation(String),

    #[display(fmt = "Colaborador {} not found", _0)]
    #[from(ignore)]
    NotFound(i64),

    #[display(fmt = "Store error: {}", _0)]
    Store(sqlx::Error),

    #[display(fmt = "Export error: {}", _0)]
    Export(csv::Error),
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Store(e) => Some(e),
            AppError::Export(e) => Some(e),
            AppError::Validation(_) | AppError::NotFound(_) => None,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Store(e) => {
                error!(error = %e, "Store operation failed");
                "Internal Server Error".to_string()
            }
            AppError::Export(e) => {
                error!(error = %e, "Export failed");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(
            AppError::Validation("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::NotFound(9).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::from(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_errors_do_not_leak_details() {
        let resp = AppError::from(sqlx::Error::PoolTimedOut).error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
