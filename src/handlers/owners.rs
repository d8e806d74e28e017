use actix_web::{web, HttpResponse};
use serde::Serialize;
use sqlx::SqlitePool;
use validator::Validate;

use crate::db;
use crate::discovery::filter::{FilterInput, FilterState};
use crate::discovery::query::{translate, Scope};
use crate::discovery::HotelSource;
use crate::error::ApiError;
use crate::models::hotel::{Hotel, HotelId, HotelInput, HotelStatus};
use crate::reporting::EventCounts;

#[derive(Serialize)]
pub struct OwnerHotelRow {
    #[serde(flatten)]
    pub hotel: Hotel,
    pub stats: EventCounts,
}

/// Owner dashboard: every own hotel regardless of status, with its totals.
pub async fn list_own_hotels(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
    filters: web::Query<FilterInput>,
) -> Result<HttpResponse, ApiError> {
    let owner_id = path.into_inner();
    let query = translate(&FilterState::from(&*filters), &Scope::Owner(owner_id));

    let hotels = HotelSource::fetch(pool.get_ref(), &query).await.map_err(|err| {
        log::error!("Error fetching owner hotels: {err}");
        ApiError::QueryFailed
    })?;

    let ids: Vec<HotelId> = hotels.iter().map(|hotel| hotel.id).collect();
    let mut counts = db::events::count_events_for(pool.get_ref(), &ids).await?;
    let rows: Vec<OwnerHotelRow> = hotels
        .into_iter()
        .map(|hotel| OwnerHotelRow {
            stats: counts.remove(&hotel.id).unwrap_or_default(),
            hotel,
        })
        .collect();

    Ok(HttpResponse::Ok().json(rows))
}

pub async fn create_hotel(
    pool: web::Data<SqlitePool>,
    path: web::Path<String>,
    body: web::Json<HotelInput>,
) -> Result<HttpResponse, ApiError> {
    let owner_id = path.into_inner();
    check_input(&body)?;

    let id = db::hotels::insert_hotel(pool.get_ref(), &owner_id, &body).await?;
    log::info!("owner {owner_id} submitted hotel {id} for review");

    Ok(HttpResponse::Created().json(serde_json::json!({
        "id": id,
        "status": HotelStatus::Pending,
    })))
}

pub async fn update_hotel(
    pool: web::Data<SqlitePool>,
    path: web::Path<(String, HotelId)>,
    body: web::Json<HotelInput>,
) -> Result<HttpResponse, ApiError> {
    let (owner_id, id) = path.into_inner();
    check_input(&body)?;

    if !db::hotels::update_hotel(pool.get_ref(), &owner_id, id, &body).await? {
        return Err(ApiError::NotFound("Hotel"));
    }

    let hotel = db::hotels::find_hotel(pool.get_ref(), id)
        .await?
        .ok_or(ApiError::NotFound("Hotel"))?;
    Ok(HttpResponse::Ok().json(hotel))
}

pub async fn delete_hotel(
    pool: web::Data<SqlitePool>,
    path: web::Path<(String, HotelId)>,
) -> Result<HttpResponse, ApiError> {
    let (owner_id, id) = path.into_inner();

    if !db::hotels::delete_hotel(pool.get_ref(), &owner_id, id).await? {
        return Err(ApiError::NotFound("Hotel"));
    }
    log::info!("owner {owner_id} deleted hotel {id}");

    Ok(HttpResponse::NoContent().finish())
}

fn check_input(input: &HotelInput) -> Result<(), ApiError> {
    input.validate()?;
    if input.has_partial_coordinates() {
        return Err(ApiError::BadRequest(
            "Latitude and longitude must be given together".to_string(),
        ));
    }
    Ok(())
}
