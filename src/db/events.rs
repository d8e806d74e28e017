use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::StoreError;
use crate::models::event::{EventType, HotelEvent, NewHotelEvent};
use crate::models::hotel::HotelId;
use crate::reporting::{EventCounts, HotelMeta};
use crate::tracking::EventSink;

#[async_trait]
impl EventSink for SqlitePool {
    async fn record(&self, event: &NewHotelEvent) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO hotel_events (hotel_id, event_type, created_at) VALUES (?, ?, ?)")
            .bind(event.hotel_id)
            .bind(event.event_type)
            .bind(event.created_at)
            .execute(self)
            .await?;
        Ok(())
    }
}

/// Lifetime view and click totals for one hotel.
pub async fn count_events(pool: &SqlitePool, hotel_id: HotelId) -> Result<EventCounts, StoreError> {
    let mut counts = count_events_for(pool, &[hotel_id]).await?;
    Ok(counts.remove(&hotel_id).unwrap_or_default())
}

/// Lifetime totals for several hotels in one query. Hotels without any
/// events are absent from the map.
pub async fn count_events_for(
    pool: &SqlitePool,
    ids: &[HotelId],
) -> Result<HashMap<HotelId, EventCounts>, StoreError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut builder = QueryBuilder::<Sqlite>::new(
        "SELECT hotel_id, event_type, COUNT(*) FROM hotel_events WHERE hotel_id IN (",
    );
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(") GROUP BY hotel_id, event_type");

    let rows: Vec<(HotelId, EventType, i64)> = builder.build_query_as().fetch_all(pool).await?;

    let mut counts: HashMap<HotelId, EventCounts> = HashMap::new();
    for (hotel_id, event_type, count) in rows {
        counts
            .entry(hotel_id)
            .or_default()
            .add(event_type, u64::try_from(count).unwrap_or_default());
    }
    Ok(counts)
}

pub async fn events_since(
    pool: &SqlitePool,
    since: chrono::NaiveDateTime,
) -> Result<Vec<HotelEvent>, StoreError> {
    let events = sqlx::query_as::<_, HotelEvent>(
        "SELECT * FROM hotel_events WHERE created_at >= ? ORDER BY created_at, id",
    )
    .bind(since)
    .fetch_all(pool)
    .await?;
    Ok(events)
}

/// Name and location for the given hotels, whatever their status.
pub async fn hotel_meta(
    pool: &SqlitePool,
    ids: &[HotelId],
) -> Result<HashMap<HotelId, HotelMeta>, StoreError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut builder =
        QueryBuilder::<Sqlite>::new("SELECT id, name, city, country FROM hotels WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let metas = builder.build_query_as::<HotelMeta>().fetch_all(pool).await?;
    Ok(metas.into_iter().map(|meta| (meta.id, meta)).collect())
}
