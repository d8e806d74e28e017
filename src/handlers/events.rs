use actix_web::http::header;
use actix_web::{web, HttpResponse};
use sqlx::SqlitePool;

use crate::db;
use crate::error::ApiError;
use crate::models::hotel::{Hotel, HotelId, HotelStatus};
use crate::tracking::EventTracker;

/// Marker click or "show on map" from a page that drives its own map.
pub async fn record_view(
    pool: web::Data<SqlitePool>,
    tracker: web::Data<EventTracker>,
    path: web::Path<HotelId>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    listed_hotel(pool.get_ref(), id).await?;

    tracker.track_view(id);
    Ok(HttpResponse::Accepted().json(serde_json::json!({ "status": "queued" })))
}

/// Counts an affiliate click and sends the visitor on to the booking site.
pub async fn open_booking(
    pool: web::Data<SqlitePool>,
    tracker: web::Data<EventTracker>,
    path: web::Path<HotelId>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let hotel = listed_hotel(pool.get_ref(), id).await?;
    let url = hotel.booking_url().ok_or(ApiError::NotFound("Booking link"))?;

    tracker.track_affiliate_click(id);
    Ok(HttpResponse::SeeOther()
        .insert_header((header::LOCATION, url))
        .finish())
}

/// Only publicly listed hotels collect views and clicks.
async fn listed_hotel(pool: &SqlitePool, id: HotelId) -> Result<Hotel, ApiError> {
    db::hotels::find_hotel(pool, id)
        .await?
        .filter(|hotel| hotel.status == HotelStatus::Approved)
        .ok_or(ApiError::NotFound("Hotel"))
}
