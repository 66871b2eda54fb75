use axum::http::StatusCode;
use geohash::Coord;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use shared::{
    domain::{Category, Coordinate},
    error::ApiError,
};
use tracing::{error, info, warn};
use url::Url;

pub const GEOHASH_PRECISION: usize = 7;
pub const MAX_GEOHASH_PRECISION: usize = 12;
pub const DEFAULT_RADIUS: &str = "10";
pub const DISTANCE_UNIT: &str = "miles";

pub const MISSING_PARAMETERS: &str = "Missing required parameters";
pub const INVALID_COORDINATES: &str = "Invalid coordinates";
pub const EVENTS_FAILED: &str = "Failed to fetch events";
pub const MISSING_EVENT_ID: &str = "Missing event ID";
pub const EVENT_FAILED: &str = "Failed to fetch event details";
pub const MISSING_VENUE_KEYWORD: &str = "Missing venue keyword";
pub const VENUE_FAILED: &str = "Failed to fetch venue details";

pub type ApiResult<T> = Result<T, (StatusCode, ApiError)>;

#[derive(Clone)]
pub struct ApiContext {
    pub http: Client,
    pub base_url: String,
    pub api_key: String,
    pub page_size: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub keyword: String,
    pub distance: String,
    pub category: String,
    pub lat: String,
    pub lon: String,
    #[serde(rename = "geoPoint")]
    pub geo_point: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventQuery {
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VenueQuery {
    pub keyword: String,
}

fn bad_request(message: &str) -> (StatusCode, ApiError) {
    (StatusCode::BAD_REQUEST, ApiError::new(message))
}

fn internal(message: impl Into<String>) -> (StatusCode, ApiError) {
    (StatusCode::INTERNAL_SERVER_ERROR, ApiError::new(message))
}

/// `geoPoint` wins when given; otherwise `lat`/`lon` are geohashed.
pub fn resolve_geo_point(query: &SearchQuery) -> ApiResult<String> {
    let geo_point = query.geo_point.trim();
    if !geo_point.is_empty() {
        return Ok(geo_point.to_string());
    }

    let (lat, lon) = (query.lat.trim(), query.lon.trim());
    if lat.is_empty() || lon.is_empty() {
        return Err(bad_request(MISSING_PARAMETERS));
    }
    let (Ok(lat), Ok(lon)) = (lat.parse::<f64>(), lon.parse::<f64>()) else {
        return Err(bad_request(INVALID_COORDINATES));
    };
    encode_geo_point(Coordinate::new(lat, lon), GEOHASH_PRECISION)
}

pub fn encode_geo_point(coordinate: Coordinate, precision: usize) -> ApiResult<String> {
    if !(1..=MAX_GEOHASH_PRECISION).contains(&precision) {
        return Err(internal(format!(
            "geohash precision must be between 1 and {MAX_GEOHASH_PRECISION}, got {precision}"
        )));
    }
    // NaN passes the crate's own bounds check.
    if !coordinate.is_in_range() {
        return Err(bad_request(INVALID_COORDINATES));
    }
    let point = Coord {
        x: coordinate.lon,
        y: coordinate.lat,
    };
    geohash::encode(point, precision).map_err(|err| {
        warn!(%coordinate, error = %err, "proxy: geohash encoding failed");
        bad_request(INVALID_COORDINATES)
    })
}

/// Upstream query for an event search, in upstream key order.
pub fn search_params(
    ctx: &ApiContext,
    query: &SearchQuery,
) -> ApiResult<Vec<(&'static str, String)>> {
    let keyword = query.keyword.trim();
    if keyword.is_empty() {
        return Err(bad_request(MISSING_PARAMETERS));
    }
    let geo_point = resolve_geo_point(query)?;
    let radius = match query.distance.trim() {
        "" => DEFAULT_RADIUS,
        distance => distance,
    };

    let mut params = vec![
        ("apikey", ctx.api_key.clone()),
        ("keyword", keyword.to_string()),
        ("geoPoint", geo_point),
        ("radius", radius.to_string()),
        ("unit", DISTANCE_UNIT.to_string()),
        ("size", ctx.page_size.to_string()),
    ];
    if let Some(category) = Category::from_name(query.category.trim()) {
        params.push(("segmentId", category.segment_id().to_string()));
    }
    Ok(params)
}

impl ApiContext {
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| internal(format!("invalid upstream base url: {err}")))?;
        url.path_segments_mut()
            .map_err(|_| internal("upstream base url cannot take a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch(
        &self,
        url: Url,
        params: &[(&str, String)],
        failure: &'static str,
    ) -> ApiResult<Value> {
        let response = self
            .http
            .get(url.clone())
            .query(params)
            .send()
            .await
            .map_err(|err| {
                error!(path = url.path(), error = %err, "proxy: upstream request failed");
                internal(err.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(path = url.path(), status = status.as_u16(), "proxy: upstream returned an error");
            let status = StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
            return Err((status, ApiError::new(failure)));
        }

        response.json::<Value>().await.map_err(|err| {
            error!(path = url.path(), error = %err, "proxy: upstream body is not json");
            internal(err.to_string())
        })
    }
}

pub async fn search_events(ctx: &ApiContext, query: &SearchQuery) -> ApiResult<Value> {
    let params = search_params(ctx, query)?;
    info!(keyword = %query.keyword.trim(), "proxy: searching events");
    ctx.fetch(ctx.endpoint(&["events.json"])?, &params, EVENTS_FAILED)
        .await
}

pub async fn event_details(ctx: &ApiContext, query: &EventQuery) -> ApiResult<Value> {
    let id = query.id.trim();
    if id.is_empty() {
        return Err(bad_request(MISSING_EVENT_ID));
    }
    let file = format!("{id}.json");
    let params = [("apikey", ctx.api_key.clone())];
    ctx.fetch(ctx.endpoint(&["events", file.as_str()])?, &params, EVENT_FAILED)
        .await
}

pub async fn venue_search(ctx: &ApiContext, query: &VenueQuery) -> ApiResult<Value> {
    let keyword = query.keyword.trim();
    if keyword.is_empty() {
        return Err(bad_request(MISSING_VENUE_KEYWORD));
    }
    let params = [
        ("apikey", ctx.api_key.clone()),
        ("keyword", keyword.to_string()),
    ];
    ctx.fetch(ctx.endpoint(&["venues.json"])?, &params, VENUE_FAILED)
        .await
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
