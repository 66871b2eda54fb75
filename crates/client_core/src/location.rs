use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::Coordinate,
    protocol::{GeocodeResponse, IpInfoResponse},
};
use tracing::{info, warn};

use crate::{config::ClientSettings, error::LocationError};

const STATUS_OK: &str = "OK";
const STATUS_REQUEST_DENIED: &str = "REQUEST_DENIED";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// The two ways of turning the user's context into a coordinate.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// IP-based detection. Any failure is `DetectionFailed`.
    async fn detect(&self) -> Result<Coordinate, LocationError>;
    /// Address geocoding.
    async fn geocode(&self, address: &str) -> Result<Coordinate, LocationError>;
}

pub struct MissingLocationProvider;

#[async_trait]
impl LocationProvider for MissingLocationProvider {
    async fn detect(&self) -> Result<Coordinate, LocationError> {
        Err(LocationError::DetectionFailed(
            "location provider unavailable".to_string(),
        ))
    }

    async fn geocode(&self, _address: &str) -> Result<Coordinate, LocationError> {
        Err(LocationError::NotConfigured)
    }
}

pub fn coordinate_from_ip_info(body: IpInfoResponse) -> Result<Coordinate, LocationError> {
    let loc = body
        .loc
        .ok_or_else(|| LocationError::DetectionFailed("response has no loc field".to_string()))?;
    let coordinate = loc
        .parse::<Coordinate>()
        .map_err(|err| LocationError::DetectionFailed(err.to_string()))?;
    if !coordinate.is_in_range() {
        return Err(LocationError::DetectionFailed(format!(
            "loc {loc:?} is out of range"
        )));
    }
    Ok(coordinate)
}

/// Maps a geocoding status to an outcome. Only `OK` with at least one
/// result produces a coordinate, taken from the first result, which must
/// carry an in-range position.
pub fn coordinate_from_geocode(body: GeocodeResponse) -> Result<Coordinate, LocationError> {
    match body.status.as_str() {
        STATUS_OK => {
            let result = body
                .results
                .into_iter()
                .next()
                .ok_or_else(|| LocationError::ServiceError("OK with no results".to_string()))?;
            let location = result.geometry.location.ok_or_else(|| {
                LocationError::ServiceError("result has no geometry.location".to_string())
            })?;
            let coordinate = Coordinate::from(location);
            if !coordinate.is_in_range() {
                return Err(LocationError::ServiceError(format!(
                    "location {coordinate} is out of range"
                )));
            }
            Ok(coordinate)
        }
        STATUS_REQUEST_DENIED => Err(LocationError::InvalidCredentials),
        STATUS_ZERO_RESULTS => Err(LocationError::ZeroResults),
        other => Err(LocationError::ServiceError(other.to_string())),
    }
}

pub struct LocationResolver {
    http: Client,
    ipinfo_url: String,
    ipinfo_token: String,
    geocoding_url: String,
    geocoding_api_key: Option<String>,
}

impl LocationResolver {
    pub fn new(http: Client, settings: &ClientSettings) -> Self {
        Self {
            http,
            ipinfo_url: settings.ipinfo_url.clone(),
            ipinfo_token: settings.ipinfo_token.clone(),
            geocoding_url: settings.geocoding_url.clone(),
            geocoding_api_key: settings.geocoding_api_key.clone(),
        }
    }

    async fn fetch_ip_info(&self) -> reqwest::Result<IpInfoResponse> {
        self.http
            .get(&self.ipinfo_url)
            .query(&[("token", self.ipinfo_token.as_str())])
            .send()
            .await?
            .json()
            .await
    }
}

#[async_trait]
impl LocationProvider for LocationResolver {
    async fn detect(&self) -> Result<Coordinate, LocationError> {
        let body = self.fetch_ip_info().await.map_err(|err| {
            warn!(error = %err, "location: ip detection request failed");
            LocationError::DetectionFailed(err.to_string())
        })?;
        let coordinate = coordinate_from_ip_info(body).inspect_err(|err| {
            warn!(error = %err, "location: ip detection returned no usable location");
        })?;
        info!(%coordinate, "location: detected from ip");
        Ok(coordinate)
    }

    async fn geocode(&self, address: &str) -> Result<Coordinate, LocationError> {
        let Some(key) = self.geocoding_api_key.as_deref() else {
            warn!("location: geocoding requested without an api key");
            return Err(LocationError::NotConfigured);
        };

        let body: GeocodeResponse = self
            .http
            .get(&self.geocoding_url)
            .query(&[("address", address), ("key", key)])
            .send()
            .await
            .map_err(|err| LocationError::ServiceError(err.to_string()))?
            .json()
            .await
            .map_err(|err| LocationError::ServiceError(err.to_string()))?;

        let status = body.status.clone();
        coordinate_from_geocode(body).inspect_err(|err| {
            warn!(%status, error = %err, "location: geocoding failed");
        })
    }
}

#[cfg(test)]
#[path = "tests/location_tests.rs"]
mod tests;
