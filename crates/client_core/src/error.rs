use thiserror::Error;

/// Pre-submit form validation failures. These are the only search-path
/// errors besides location resolution that reach the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("keyword is required")]
    MissingKeyword,
    #[error("location is required (auto_detect={auto_detect})")]
    MissingLocation { auto_detect: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("geocoding API key not configured")]
    NotConfigured,
    #[error("geocoding API key invalid or service disabled")]
    InvalidCredentials,
    #[error("no geocoding results for address")]
    ZeroResults,
    #[error("unable to detect location: {0}")]
    DetectionFailed(String),
    #[error("geocoding failed: {0}")]
    ServiceError(String),
}

/// Transport-level failure talking to the catalog proxy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
    #[error("catalog transport failed: {0}")]
    Transport(String),
    #[error("catalog returned HTTP {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("catalog response could not be decoded: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            CatalogError::Decode(value.to_string())
        } else {
            CatalogError::Transport(value.to_string())
        }
    }
}

/// Search failures always degrade to the empty-result display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("search failed: {0}")]
    Catalog(#[from] CatalogError),
}

/// Event/venue detail failures are logged only; panel state stays put.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetailFetchError {
    #[error("event {event_id} fetch failed: {source}")]
    Event {
        event_id: String,
        source: CatalogError,
    },
    #[error("venue {keyword:?} fetch failed: {source}")]
    Venue {
        keyword: String,
        source: CatalogError,
    },
    #[error("no venue matches {keyword:?}")]
    NoVenueMatch { keyword: String },
    #[error("venue panel requires an open event panel")]
    NoEventPanel,
}

/// Failure of one dispatched session command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Detail(#[from] DetailFetchError),
    #[error("unsupported sort column {0:?}")]
    UnknownSortColumn(String),
}
