use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::db;
use crate::discovery::filter::{FilterInput, FilterState};
use crate::discovery::query::{translate, Scope};
use crate::discovery::HotelSource;
use crate::error::ApiError;
use crate::models::hotel::{HotelId, HotelStatus, StatusChange};
use crate::reporting;

pub async fn list_hotels(
    pool: web::Data<SqlitePool>,
    filters: web::Query<FilterInput>,
) -> Result<HttpResponse, ApiError> {
    let query = translate(&FilterState::from(&*filters), &Scope::Moderation);
    let hotels = HotelSource::fetch(pool.get_ref(), &query).await.map_err(|err| {
        log::error!("Error fetching hotels for moderation: {err}");
        ApiError::QueryFailed
    })?;
    Ok(HttpResponse::Ok().json(hotels))
}

pub async fn change_status(
    pool: web::Data<SqlitePool>,
    path: web::Path<HotelId>,
    body: web::Json<StatusChange>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if body.status == HotelStatus::Pending {
        return Err(ApiError::BadRequest(
            "Status must be approved, rejected or disabled".to_string(),
        ));
    }

    if !db::hotels::set_status(pool.get_ref(), id, body.status).await? {
        return Err(ApiError::NotFound("Hotel"));
    }
    log::info!("hotel {id} is now {}", body.status.as_str());

    let hotel = db::hotels::find_hotel(pool.get_ref(), id)
        .await?
        .ok_or(ApiError::NotFound("Hotel"))?;
    Ok(HttpResponse::Ok().json(hotel))
}

#[derive(Deserialize)]
pub struct StatsParams {
    pub days: Option<i64>,
}

/// Most clicked hotels over the last `days` (default 30).
pub async fn stats(
    pool: web::Data<SqlitePool>,
    params: web::Query<StatsParams>,
) -> Result<HttpResponse, ApiError> {
    let days = params
        .days
        .unwrap_or(reporting::DEFAULT_WINDOW_DAYS)
        .clamp(1, 365);
    let since = chrono::Utc::now().naive_utc() - chrono::Duration::days(days);

    let events = db::events::events_since(pool.get_ref(), since).await?;
    let meta = db::events::hotel_meta(pool.get_ref(), &reporting::hotel_ids(&events)).await?;

    Ok(HttpResponse::Ok().json(reporting::summarize(&events, &meta)))
}
