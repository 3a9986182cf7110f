use crate::api::presence::{CheckedInResponse, StatusPayload, StatusResponse};
use crate::api::staff::StaffPayload;
use crate::model::staff::{StaffRecord, StaffStatus};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Presença API",
        version = "0.1.0",
        description = r#"
## Staff presence board

Tracks which colaboradores are checked in ("logados") during the current
working day.

### Features
- **Colaboradores**: create, rename, change status, remove
- **Presence**: replace the whole checked-in set, toggle one person, list who is in
- **Daily reset**: every check-in is cleared once per UTC day
- **Export**: checked-in or checked-out staff as CSV or JSON

### Security
When the server runs with `JWT_SECRET`, every `/api` route requires an
`Authorization: Bearer <token>` header issued by the identity provider.
"#,
    ),
    paths(
        crate::api::staff::list_staff,
        crate::api::staff::create_staff,
        crate::api::staff::update_staff,
        crate::api::staff::delete_staff,

        crate::api::presence::save_status,
        crate::api::presence::set_logado,
        crate::api::presence::list_ativos,

        crate::api::export::export
    ),
    components(
        schemas(
            StaffRecord,
            StaffStatus,
            StaffPayload,
            StatusPayload,
            StatusResponse,
            CheckedInResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Colaboradores", description = "Staff record management"),
        (name = "Presence", description = "Check-in tracking"),
        (name = "Export", description = "CSV/JSON snapshots"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme so Swagger UI can send the token.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
