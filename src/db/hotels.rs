use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use crate::discovery::query::{HotelQuery, Predicate, SortOrder};
use crate::discovery::HotelSource;
use crate::error::StoreError;
use crate::models::hotel::{Hotel, HotelId, HotelInput, HotelStatus};

#[async_trait]
impl HotelSource for SqlitePool {
    async fn fetch(&self, query: &HotelQuery) -> Result<Vec<Hotel>, StoreError> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM hotels WHERE 1=1");
        for predicate in &query.predicates {
            builder.push(" AND ");
            push_predicate(&mut builder, predicate);
        }
        match query.order {
            SortOrder::NewestFirst => builder.push(" ORDER BY created_at DESC, id ASC"),
        };

        let hotels = builder.build_query_as::<Hotel>().fetch_all(self).await?;
        Ok(hotels)
    }
}

fn push_predicate(builder: &mut QueryBuilder<'_, Sqlite>, predicate: &Predicate) {
    match predicate {
        Predicate::StatusIs(status) => {
            builder.push("status = ").push_bind(status.as_str());
        }
        Predicate::OwnedBy(owner) => {
            builder.push("owner_id = ").push_bind(owner.clone());
        }
        Predicate::CityContains(needle) => {
            builder
                .push("city_folded LIKE ")
                .push_bind(like_pattern(needle))
                .push(" ESCAPE '\\'");
        }
        Predicate::WifiAtLeast(min) => {
            builder
                .push("(wifi_speed_mbps IS NOT NULL AND wifi_speed_mbps >= ")
                .push_bind(i64::from(*min))
                .push(")");
        }
        Predicate::FlagSet(flag) => {
            builder.push(flag.column()).push(" = 1");
        }
        Predicate::AnyOf(options) => {
            builder.push("(");
            if options.is_empty() {
                builder.push("0");
            }
            for (i, option) in options.iter().enumerate() {
                if i > 0 {
                    builder.push(" OR ");
                }
                push_predicate(builder, option);
            }
            builder.push(")");
        }
        Predicate::MinNightsAtMost(max) => {
            builder
                .push("(long_stay_min_nights IS NULL OR long_stay_min_nights <= ")
                .push_bind(i64::from(*max))
                .push(")");
        }
    }
}

/// `%needle%` with LIKE wildcards in the needle taken literally. Matched
/// against `city_folded`, so the needle is folded the same way.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub async fn find_hotel(pool: &SqlitePool, id: HotelId) -> Result<Option<Hotel>, StoreError> {
    let hotel = sqlx::query_as::<_, Hotel>("SELECT * FROM hotels WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(hotel)
}

/// New listings always start out pending.
pub async fn insert_hotel(
    pool: &SqlitePool,
    owner_id: &str,
    input: &HotelInput,
) -> Result<HotelId, StoreError> {
    let row = sqlx::query(
        r#"
        INSERT INTO hotels (
            owner_id, name, country, city, city_folded, address, latitude, longitude,
            price_per_night, wifi_speed_mbps, workspace_in_room, coworking_on_site,
            coworking_nearby, long_stay_possible, long_stay_min_nights, affiliate_url, description, rating,
            amenities, home_office_amenities, status
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'pending')
        RETURNING id
        "#,
    )
    .bind(owner_id)
    .bind(&input.name)
    .bind(&input.country)
    .bind(&input.city)
    .bind(input.city.to_lowercase())
    .bind(&input.address)
    .bind(input.latitude)
    .bind(input.longitude)
    .bind(input.price_per_night)
    .bind(input.wifi_speed_mbps.map(i64::from))
    .bind(input.workspace_in_room)
    .bind(input.coworking_on_site)
    .bind(input.coworking_nearby)
    .bind(input.long_stay_possible)
    .bind(input.effective_min_nights().map(i64::from))
    .bind(input.affiliate_url.as_deref())
    .bind(input.description.as_deref())
    .bind(input.rating)
    .bind(Json(&input.amenities))
    .bind(Json(&input.home_office_amenities))
    .fetch_one(pool)
    .await?;

    Ok(row.get::<i64, _>("id"))
}

/// Updates an owner's hotel, leaving its moderation status alone. Returns
/// `false` when no hotel with that id belongs to the owner.
pub async fn update_hotel(
    pool: &SqlitePool,
    owner_id: &str,
    id: HotelId,
    input: &HotelInput,
) -> Result<bool, StoreError> {
    let result = sqlx::query(
        r#"
        UPDATE hotels SET
            name = ?, country = ?, city = ?, city_folded = ?, address = ?, latitude = ?,
            longitude = ?, price_per_night = ?, wifi_speed_mbps = ?, workspace_in_room = ?,
            coworking_on_site = ?, coworking_nearby = ?, long_stay_possible = ?,
            long_stay_min_nights = ?, affiliate_url = ?, description = ?, rating = ?,
            amenities = ?, home_office_amenities = ?
        WHERE id = ? AND owner_id = ?
        "#,
    )
    .bind(&input.name)
    .bind(&input.country)
    .bind(&input.city)
    .bind(input.city.to_lowercase())
    .bind(&input.address)
    .bind(input.latitude)
    .bind(input.longitude)
    .bind(input.price_per_night)
    .bind(input.wifi_speed_mbps.map(i64::from))
    .bind(input.workspace_in_room)
    .bind(input.coworking_on_site)
    .bind(input.coworking_nearby)
    .bind(input.long_stay_possible)
    .bind(input.effective_min_nights().map(i64::from))
    .bind(input.affiliate_url.as_deref())
    .bind(input.description.as_deref())
    .bind(input.rating)
    .bind(Json(&input.amenities))
    .bind(Json(&input.home_office_amenities))
    .bind(id)
    .bind(owner_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn set_status(
    pool: &SqlitePool,
    id: HotelId,
    status: HotelStatus,
) -> Result<bool, StoreError> {
    let result = sqlx::query("UPDATE hotels SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Removes an owner's hotel along with its tracked events. Returns `false`
/// when no hotel with that id belongs to the owner.
pub async fn delete_hotel(
    pool: &SqlitePool,
    owner_id: &str,
    id: HotelId,
) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM hotels WHERE id = ? AND owner_id = ?")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
