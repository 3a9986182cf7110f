use crate::{
    api::{export, presence, staff},
    auth::middleware::auth_middleware,
    config::Config,
    error::AppError,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{
    HttpResponse,
    middleware::{Condition, from_fn},
    web,
};

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            (60_000 / requests_per_min as u64).max(1)
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min.max(1))
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap_or_default();
        Governor::new(&cfg)
    }

    cfg.route("/health", web::get().to(|| async { HttpResponse::Ok().body("ok") }));

    cfg.service(
        web::scope(&config.api_prefix)
            // extractor failures are client errors, including a non-numeric {id}
            .app_data(web::PathConfig::default().error_handler(|err, _req| {
                AppError::Validation(format!("Invalid path: {}", err)).into()
            }))
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::Validation(format!("Invalid body: {}", err)).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                AppError::Validation(format!("Invalid query: {}", err)).into()
            }))
            .wrap(from_fn(auth_middleware))
            .wrap(Condition::new(
                config.rate_per_min > 0,
                build_limiter(config.rate_per_min),
            ))
            .service(
                web::resource("/collaboradores")
                    .route(web::get().to(staff::list_staff))
                    .route(web::post().to(staff::create_staff)),
            )
            .service(
                web::resource("/collaboradores/{id}")
                    .route(web::put().to(staff::update_staff))
                    .route(web::delete().to(staff::delete_staff)),
            )
            .service(web::resource("/status").route(web::post().to(presence::save_status)))
            .service(
                web::resource("/logado/{id}/{val}").route(web::post().to(presence::set_logado)),
            )
            .service(web::resource("/ativos").route(web::get().to(presence::list_ativos)))
            .service(web::resource("/export").route(web::get().to(export::export))),
    );
}
