use actix_web::web;

pub mod config;
pub mod db;
pub mod discovery;
pub mod error;
pub mod handlers;
pub mod models;
pub mod reporting;
pub mod tracking;

/// Route table shared by the server binary and the integration tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/hotels")
            .route("", web::get().to(handlers::hotels::discover))
            .route("/{id}", web::get().to(handlers::hotels::get_hotel_by_id))
            .route("/{id}/views", web::post().to(handlers::events::record_view))
            .route("/{id}/booking", web::get().to(handlers::events::open_booking)),
    )
    .service(
        web::scope("/owners/{owner_id}/hotels")
            .route("", web::get().to(handlers::owners::list_own_hotels))
            .route("", web::post().to(handlers::owners::create_hotel))
            .route("/{id}", web::put().to(handlers::owners::update_hotel))
            .route("/{id}", web::delete().to(handlers::owners::delete_hotel)),
    )
    .service(
        web::scope("/admin")
            .route("/hotels", web::get().to(handlers::admin::list_hotels))
            .route(
                "/hotels/{id}/status",
                web::put().to(handlers::admin::change_status),
            )
            .route("/stats", web::get().to(handlers::admin::stats)),
    );
}
