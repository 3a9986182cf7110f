use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;
use crate::model::staff::StaffDraft;
use crate::tracker::PresenceTracker;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct StaffPayload {
    /// Display name; `nome` is accepted for older clients.
    #[serde(alias = "nome")]
    #[schema(example = "Maria Souza")]
    pub name: Option<String>,
    #[schema(example = "ativo")]
    pub status: Option<String>,
}

impl StaffPayload {
    fn into_draft(self) -> Result<StaffDraft, AppError> {
        StaffDraft::new(self.name.as_deref(), self.status.as_deref())
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StaffQuery {
    /// Case-insensitive name substring
    pub q: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/collaboradores",
    params(StaffQuery),
    responses(
        (status = 200, description = "Staff list, newest first", body = [crate::model::staff::StaffRecord]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Colaboradores",
    security(("bearer_auth" = []))
)]
pub async fn list_staff(
    tracker: web::Data<PresenceTracker>,
    query: web::Query<StaffQuery>,
) -> Result<HttpResponse, AppError> {
    let records = tracker.store().list(query.q.as_deref()).await?;
    Ok(HttpResponse::Ok().json(records))
}

#[utoipa::path(
    post,
    path = "/api/collaboradores",
    request_body = StaffPayload,
    responses(
        (status = 201, description = "Colaborador created", body = crate::model::staff::StaffRecord),
        (status = 400, description = "Missing name or invalid status", body = Object, example = json!({
            "error": "Name is required"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Colaboradores",
    security(("bearer_auth" = []))
)]
pub async fn create_staff(
    tracker: web::Data<PresenceTracker>,
    payload: web::Json<StaffPayload>,
) -> Result<HttpResponse, AppError> {
    let draft = payload.into_inner().into_draft()?;
    let record = tracker.store().create(&draft).await?;

    info!(id = record.id, name = %record.name, "Colaborador created");
    Ok(HttpResponse::Created().json(record))
}

#[utoipa::path(
    put,
    path = "/api/collaboradores/{id}",
    params(
        ("id" = i64, Path, description = "Colaborador ID")
    ),
    request_body = StaffPayload,
    responses(
        (status = 200, description = "Colaborador updated", body = crate::model::staff::StaffRecord),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Colaborador not found", body = Object, example = json!({
            "error": "Colaborador 9 not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Colaboradores",
    security(("bearer_auth" = []))
)]
pub async fn update_staff(
    tracker: web::Data<PresenceTracker>,
    path: web::Path<i64>,
    payload: web::Json<StaffPayload>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let draft = payload.into_inner().into_draft()?;

    match tracker.store().update(id, &draft).await? {
        Some(record) => Ok(HttpResponse::Ok().json(record)),
        None => Err(AppError::NotFound(id)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/collaboradores/{id}",
    params(
        ("id" = i64, Path, description = "Colaborador ID")
    ),
    responses(
        (status = 204, description = "Removed, or was already absent"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Colaboradores",
    security(("bearer_auth" = []))
)]
pub async fn delete_staff(
    tracker: web::Data<PresenceTracker>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let removed = tracker.store().remove(id).await?;

    info!(id, removed, "Colaborador delete");
    Ok(HttpResponse::NoContent().finish())
}
