use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::model::staff::StaffRecord;
use crate::tracker::PresenceTracker;

#[derive(Deserialize, ToSchema)]
pub struct StatusPayload {
    /// Complete set of checked-in ids. Numeric strings are accepted,
    /// anything else is dropped.
    #[schema(value_type = Option<Vec<i64>>, example = json!([1, 4, 7]))]
    pub logados: Option<Value>,
}

impl StatusPayload {
    fn ids(&self) -> Vec<i64> {
        let Some(Value::Array(items)) = &self.logados else {
            return Vec::new();
        };

        items
            .iter()
            .filter_map(|item| match item {
                Value::Number(n) => n.as_i64().or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
                        .map(|f| f as i64)
                }),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
            .collect()
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = 3)]
    pub total_logados: i64,
}

#[derive(Serialize, ToSchema)]
pub struct CheckedInResponse {
    #[schema(example = 1)]
    pub total: i64,
    pub list: Vec<StaffRecord>,
}

#[utoipa::path(
    post,
    path = "/api/status",
    request_body = StatusPayload,
    responses(
        (status = 200, description = "Checked-in set replaced", body = StatusResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Presence",
    security(("bearer_auth" = []))
)]
pub async fn save_status(
    tracker: web::Data<PresenceTracker>,
    payload: web::Json<StatusPayload>,
) -> Result<HttpResponse, AppError> {
    let ids = payload.ids();
    let total = tracker.set_checked_in_set(ids).await?;

    info!(total, "Checked-in set saved");
    Ok(HttpResponse::Ok().json(StatusResponse {
        success: true,
        total_logados: total,
    }))
}

fn parse_flag(raw: &str) -> Result<bool, AppError> {
    match raw {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => Err(AppError::Validation(format!(
            "Invalid value: {} (expected 0 or 1)",
            other
        ))),
    }
}

#[utoipa::path(
    post,
    path = "/api/logado/{id}/{val}",
    params(
        ("id" = i64, Path, description = "Colaborador ID"),
        ("val" = String, Path, description = "1 to check in, 0 to check out")
    ),
    responses(
        (status = 200, description = "Flag updated", body = Object, example = json!({
            "success": true
        })),
        (status = 400, description = "Invalid id or value"),
        (status = 404, description = "Colaborador not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Presence",
    security(("bearer_auth" = []))
)]
pub async fn set_logado(
    tracker: web::Data<PresenceTracker>,
    path: web::Path<(i64, String)>,
) -> Result<HttpResponse, AppError> {
    let (id, raw) = path.into_inner();
    let checked_in = parse_flag(&raw)?;

    tracker.set_individual(id, checked_in).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[utoipa::path(
    get,
    path = "/api/ativos",
    responses(
        (status = 200, description = "Checked-in staff, newest first", body = CheckedInResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Presence",
    security(("bearer_auth" = []))
)]
pub async fn list_ativos(tracker: web::Data<PresenceTracker>) -> Result<HttpResponse, AppError> {
    let total = tracker.count_checked_in().await?;
    let list = tracker.list_checked_in().await?;

    Ok(HttpResponse::Ok().json(CheckedInResponse { total, list }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_ids_keep_only_numeric_entries() {
        let payload: StatusPayload =
            serde_json::from_value(json!({"logados": [1, "2", " 3 ", "x", null, 4.5, 5.0]})).unwrap();
        assert_eq!(payload.ids(), vec![1, 2, 3, 5]);
    }

    #[test]
    fn non_array_logados_means_empty_set() {
        let payload: StatusPayload = serde_json::from_value(json!({"logados": "1,2"})).unwrap();
        assert!(payload.ids().is_empty());

        let payload: StatusPayload = serde_json::from_value(json!({})).unwrap();
        assert!(payload.ids().is_empty());
    }

    #[test]
    fn flag_accepts_digits_and_words() {
        assert!(parse_flag("1").unwrap());
        assert!(!parse_flag("0").unwrap());
        assert!(parse_flag("true").unwrap());
        assert!(parse_flag("2").is_err());
    }
}
