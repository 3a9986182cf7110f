use actix_web::http::header::CONTENT_DISPOSITION;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

use crate::error::AppError;
use crate::export::{ExportFormat, ExportKind, to_csv};
use crate::tracker::PresenceTracker;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    /// `logados` (default) or `nao`
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// `csv` (default) or `json`
    pub format: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/export",
    params(ExportQuery),
    responses(
        (status = 200, description = "Attachment with the selected records", content_type = "text/csv"),
        (status = 400, description = "Unknown type or format"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Export",
    security(("bearer_auth" = []))
)]
pub async fn export(
    tracker: web::Data<PresenceTracker>,
    query: web::Query<ExportQuery>,
) -> Result<HttpResponse, AppError> {
    let kind = ExportKind::parse_input(query.kind.as_deref())?;
    let format = ExportFormat::parse_input(query.format.as_deref())?;

    let rows = kind.select(tracker.store().list(None).await?);
    let disposition = format!("attachment; filename=\"{}\"", kind.file_name(format));
    info!(kind = kind.as_ref(), format = format.as_ref(), rows = rows.len(), "Export");

    let response = match format {
        ExportFormat::Json => HttpResponse::Ok()
            .insert_header((CONTENT_DISPOSITION, disposition))
            .json(rows),
        ExportFormat::Csv => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((CONTENT_DISPOSITION, disposition))
            .body(to_csv(&rows)?),
    };

    Ok(response)
}
