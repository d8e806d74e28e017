use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::db;
use crate::discovery::filter::{DeepLinkParams, FilterInput};
use crate::discovery::query::Scope;
use crate::discovery::session::{Completion, DiscoverySession};
use crate::error::ApiError;
use crate::models::hotel::{HotelId, HotelStatus};
use crate::tracking::EventTracker;

/// Public discovery view: filtered markers and list entries, plus the
/// deep-linked focus from `?hotelId=` on first load.
pub async fn discover(
    pool: web::Data<SqlitePool>,
    tracker: web::Data<EventTracker>,
    filters: web::Query<FilterInput>,
    link: web::Query<DeepLinkParams>,
) -> Result<HttpResponse, ApiError> {
    let tracker = tracker.get_ref().clone();
    let mut session = DiscoverySession::new(Scope::Public, link.hotel_id(), Some(tracker));
    session.apply_input(&filters);

    match session.refresh(pool.get_ref()).await {
        Completion::Failed => Err(ApiError::QueryFailed),
        Completion::Rendered { hotels, markers, .. } => {
            log::debug!("discovery rendered {hotels} hotels, {markers} on the map");
            Ok(HttpResponse::Ok().json(session.view()))
        }
        Completion::Stale => Ok(HttpResponse::Ok().json(session.view())),
    }
}

pub async fn get_hotel_by_id(
    pool: web::Data<SqlitePool>,
    path: web::Path<HotelId>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    match db::hotels::find_hotel(pool.get_ref(), id).await? {
        Some(hotel) if hotel.status == HotelStatus::Approved => Ok(HttpResponse::Ok().json(hotel)),
        _ => Err(ApiError::NotFound("Hotel")),
    }
}
