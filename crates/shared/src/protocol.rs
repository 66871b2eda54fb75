//! Wire shapes for the catalog proxy and the location services.
//!
//! Every nested field is optional and defaults when absent or `null` so
//! that one malformed record never fails a whole response.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::Coordinate;

/// Reads an explicit `null` as the default. Missing keys are covered by
/// `#[serde(default)]` on the container.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Canonical search query. Field order is the wire key order:
/// `keyword, distance, category, lat, lon`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    pub keyword: String,
    pub distance: String,
    pub category: String,
    pub lat: f64,
    pub lon: f64,
}

impl SearchParams {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResponse {
    #[serde(rename = "_embedded", skip_serializing_if = "Option::is_none")]
    pub embedded: Option<EventsEmbedded>,
}

impl SearchResponse {
    pub fn into_events(self) -> Vec<EventRaw> {
        self.embedded.map(|e| e.events).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsEmbedded {
    #[serde(deserialize_with = "null_as_default")]
    pub events: Vec<EventRaw>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventRaw {
    pub id: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub dates: Option<EventDatesRaw>,
    #[serde(deserialize_with = "null_as_default")]
    pub images: Vec<ImageRaw>,
    #[serde(deserialize_with = "null_as_default")]
    pub classifications: Vec<ClassificationRaw>,
    #[serde(deserialize_with = "null_as_default")]
    pub price_ranges: Vec<PriceRangeRaw>,
    pub seatmap: Option<SeatmapRaw>,
    #[serde(rename = "_embedded")]
    pub embedded: Option<EventEmbeddedRaw>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventEmbeddedRaw {
    #[serde(deserialize_with = "null_as_default")]
    pub venues: Vec<VenueRaw>,
    #[serde(deserialize_with = "null_as_default")]
    pub attractions: Vec<AttractionRaw>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventDatesRaw {
    pub start: Option<EventStartRaw>,
    pub status: Option<EventStatusRaw>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventStartRaw {
    pub local_date: Option<String>,
    pub local_time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EventStatusRaw {
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageRaw {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NamedRaw {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassificationRaw {
    pub segment: Option<NamedRaw>,
    pub genre: Option<NamedRaw>,
    pub sub_genre: Option<NamedRaw>,
    #[serde(rename = "type")]
    pub kind: Option<NamedRaw>,
    pub sub_type: Option<NamedRaw>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceRangeRaw {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeatmapRaw {
    pub static_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttractionRaw {
    pub name: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VenueSearchResponse {
    #[serde(rename = "_embedded", skip_serializing_if = "Option::is_none")]
    pub embedded: Option<VenuesEmbedded>,
}

impl VenueSearchResponse {
    pub fn into_first_venue(self) -> Option<VenueRaw> {
        self.embedded?.venues.into_iter().next()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VenuesEmbedded {
    #[serde(deserialize_with = "null_as_default")]
    pub venues: Vec<VenueRaw>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VenueRaw {
    pub name: Option<String>,
    pub url: Option<String>,
    pub postal_code: Option<String>,
    pub address: Option<AddressRaw>,
    pub city: Option<NamedRaw>,
    pub state: Option<StateRaw>,
    #[serde(deserialize_with = "null_as_default")]
    pub images: Vec<ImageRaw>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressRaw {
    pub line1: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StateRaw {
    pub state_code: Option<String>,
}

/// IP-location lookup body. `loc` is `"lat,lon"` when detection worked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IpInfoResponse {
    pub loc: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodeResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub results: Vec<GeocodeResult>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodeResult {
    #[serde(deserialize_with = "null_as_default")]
    pub geometry: GeocodeGeometry,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodeGeometry {
    /// Absent when the service returned a result without a position.
    pub location: Option<GeocodeLatLng>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GeocodeLatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<GeocodeLatLng> for Coordinate {
    fn from(value: GeocodeLatLng) -> Self {
        Coordinate::new(value.lat, value.lng)
    }
}
