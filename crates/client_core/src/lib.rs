//! Client core for the ticketed-events search front ends.
//!
//! [`EventsSession`] owns all per-session state and is driven through
//! [`Command`]s. Network collaborators sit behind the [`CatalogApi`] and
//! [`LocationProvider`] traits; user-facing notices go through a
//! [`NotificationSurface`].

pub mod catalog;
pub mod config;
pub mod error;
pub mod fields;
pub mod location;
pub mod notify;
pub mod panels;
pub mod results;
pub mod search;
pub mod session;
pub mod types;

pub use catalog::{CatalogApi, HttpCatalogClient, MissingCatalogApi};
pub use config::{load_settings, ClientSettings};
pub use error::{
    CatalogError, CommandError, DetailFetchError, LocationError, SearchError, ValidationError,
};
pub use location::{LocationProvider, LocationResolver, MissingLocationProvider};
pub use notify::{LogOnlyNotifications, Notice, NoticeTarget, NotificationBoard, NotificationSurface};
pub use panels::{DetailPanelCoordinator, PanelState, PanelView};
pub use results::{ResultSetStore, SortColumn, SortDirection, SortState};
pub use search::{LocationMode, SearchForm, SearchOrchestrator, SearchQuery};
pub use session::{Command, EventsSession, ResultsDisplay, SessionEvent, SessionSnapshot};
pub use types::{EventDetail, EventSummary, VenueDetail, PLACEHOLDER};
