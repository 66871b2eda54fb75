use std::sync::Arc;

use shared::{domain::Coordinate, protocol::SearchParams};
use tracing::{info, warn};

use crate::{
    catalog::CatalogApi,
    error::{LocationError, SearchError, ValidationError},
    fields::summarize_event,
    location::LocationProvider,
    types::EventSummary,
};

pub const DEFAULT_DISTANCE: &str = "10";

/// Raw form values as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    pub keyword: String,
    pub distance: String,
    pub category: String,
    pub location: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationMode {
    Manual,
    /// `detected` is filled once detection succeeds.
    Auto { detected: Option<Coordinate> },
}

impl LocationMode {
    pub fn is_auto(&self) -> bool {
        matches!(self, LocationMode::Auto { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    Detected(Coordinate),
    Address(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedForm {
    pub keyword: String,
    pub distance: String,
    pub category: String,
    pub location: LocationInput,
}

pub fn validate(form: &SearchForm, mode: LocationMode) -> Result<ValidatedForm, ValidationError> {
    let keyword = form.keyword.trim();
    if keyword.is_empty() {
        return Err(ValidationError::MissingKeyword);
    }

    let distance = match form.distance.trim() {
        "" => DEFAULT_DISTANCE,
        other => other,
    };

    let location = match mode {
        LocationMode::Auto {
            detected: Some(coordinate),
        } => LocationInput::Detected(coordinate),
        LocationMode::Auto { detected: None } => {
            return Err(ValidationError::MissingLocation { auto_detect: true })
        }
        LocationMode::Manual => match form.location.trim() {
            "" => return Err(ValidationError::MissingLocation { auto_detect: false }),
            address => LocationInput::Address(address.to_string()),
        },
    };

    Ok(ValidatedForm {
        keyword: keyword.to_string(),
        distance: distance.to_string(),
        category: form.category.trim().to_string(),
        location,
    })
}

/// One submission's query. Built per submit and dropped after dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub keyword: String,
    pub distance: String,
    pub category: String,
    pub coordinate: Coordinate,
}

impl SearchQuery {
    pub fn new(form: ValidatedForm, coordinate: Coordinate) -> Self {
        Self {
            keyword: form.keyword,
            distance: form.distance,
            category: form.category,
            coordinate,
        }
    }

    pub fn to_params(&self) -> SearchParams {
        SearchParams {
            keyword: self.keyword.clone(),
            distance: self.distance.clone(),
            category: self.category.clone(),
            lat: self.coordinate.lat,
            lon: self.coordinate.lon,
        }
    }
}

pub struct SearchOrchestrator {
    catalog: Arc<dyn CatalogApi>,
    location: Arc<dyn LocationProvider>,
}

impl SearchOrchestrator {
    pub fn new(catalog: Arc<dyn CatalogApi>, location: Arc<dyn LocationProvider>) -> Self {
        Self { catalog, location }
    }

    /// Auto mode uses the cached detection result; manual mode geocodes.
    pub async fn resolve(&self, form: ValidatedForm) -> Result<SearchQuery, LocationError> {
        let coordinate = match &form.location {
            LocationInput::Detected(coordinate) => *coordinate,
            LocationInput::Address(address) => self.location.geocode(address).await?,
        };
        Ok(SearchQuery::new(form, coordinate))
    }

    /// Runs the catalog search. An empty vector means "no results"; rows
    /// keep server order.
    pub async fn run(&self, query: &SearchQuery) -> Result<Vec<EventSummary>, SearchError> {
        let params = query.to_params();
        let response = self.catalog.search(&params).await.inspect_err(|err| {
            warn!(keyword = %params.keyword, error = %err, "search: catalog request failed");
        })?;
        let rows: Vec<EventSummary> = response
            .into_events()
            .iter()
            .filter_map(summarize_event)
            .collect();
        info!(
            keyword = %params.keyword,
            distance = %params.distance,
            category = %params.category,
            rows = rows.len(),
            "search: completed"
        );
        Ok(rows)
    }
}

#[cfg(test)]
#[path = "tests/search_tests.rs"]
mod tests;
