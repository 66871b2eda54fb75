use std::sync::Arc;

use anyhow::Result;
use shared::domain::{Coordinate, EventId};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    catalog::{CatalogApi, HttpCatalogClient},
    config::ClientSettings,
    error::{CommandError, DetailFetchError},
    location::{LocationProvider, LocationResolver, MissingLocationProvider},
    notify::{
        location_notice, validation_notice, LogOnlyNotifications, Notice, NotificationSurface,
        DEFAULT_NOTICE_DURATION,
    },
    panels::{DetailPanelCoordinator, PanelState, PanelView},
    results::{ResultSetStore, SortState},
    search::{validate, LocationMode, SearchForm, SearchOrchestrator},
    types::EventSummary,
};

const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultsDisplay {
    #[default]
    Hidden,
    NoResults,
    Table,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    ResultsUpdated {
        display: ResultsDisplay,
        rows: usize,
    },
    SortChanged(SortState),
    NoticeShown(Notice),
    LocationModeChanged {
        auto_detect: bool,
    },
    LocationDetected(Coordinate),
    EventPanelRendered {
        event_id: EventId,
        venue_trigger: Option<String>,
    },
    VenuePanelRendered {
        venue_name: String,
    },
    VenuePanelClosed,
    PanelsClosed,
    Cleared,
}

/// User interactions the session understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(SearchForm),
    Sort(String),
    OpenEvent(EventId),
    OpenVenue(String),
    CloseEvent,
    CloseVenue,
    SetAutoDetect(bool),
    Clear,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Search(_) => "search",
            Command::Sort(_) => "sort",
            Command::OpenEvent(_) => "open_event",
            Command::OpenVenue(_) => "open_venue",
            Command::CloseEvent => "close_event",
            Command::CloseVenue => "close_venue",
            Command::SetAutoDetect(_) => "set_auto_detect",
            Command::Clear => "clear",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub location_mode: LocationMode,
    pub display: ResultsDisplay,
    /// Rows in display order.
    pub rows: Vec<EventSummary>,
    pub sort: SortState,
    pub panels: PanelView,
}

struct SessionState {
    location_mode: LocationMode,
    /// Bumped on every mode change so late detection results can be told apart.
    detect_generation: u64,
    results: ResultSetStore,
    display: ResultsDisplay,
}

pub struct EventsSession {
    search: SearchOrchestrator,
    location: Arc<dyn LocationProvider>,
    notifications: Arc<dyn NotificationSurface>,
    panels: DetailPanelCoordinator,
    inner: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl EventsSession {
    /// Session without location services; notices go to the log.
    pub fn new(catalog: Arc<dyn CatalogApi>) -> Arc<Self> {
        Self::new_with_dependencies(
            catalog,
            Arc::new(MissingLocationProvider),
            Arc::new(LogOnlyNotifications),
        )
    }

    pub fn from_settings(
        settings: &ClientSettings,
        notifications: Arc<dyn NotificationSurface>,
    ) -> Result<Arc<Self>> {
        let http = settings.http_client()?;
        let catalog = HttpCatalogClient::new(http.clone(), settings.catalog_url.clone());
        let location = LocationResolver::new(http, settings);
        info!(catalog_url = %settings.catalog_url, "session: created");
        Ok(Self::new_with_dependencies(
            Arc::new(catalog),
            Arc::new(location),
            notifications,
        ))
    }

    pub fn new_with_dependencies(
        catalog: Arc<dyn CatalogApi>,
        location: Arc<dyn LocationProvider>,
        notifications: Arc<dyn NotificationSurface>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            search: SearchOrchestrator::new(catalog.clone(), location.clone()),
            location,
            notifications,
            panels: DetailPanelCoordinator::new(catalog, events.clone()),
            inner: Mutex::new(SessionState {
                location_mode: LocationMode::Manual,
                detect_generation: 0,
                results: ResultSetStore::default(),
                display: ResultsDisplay::Hidden,
            }),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn dispatch(&self, command: Command) -> Result<(), CommandError> {
        debug!(command = command.name(), "session: dispatching command");
        match command {
            Command::Search(form) => self.submit(form).await.map(|_| ()),
            Command::Sort(column) => self.sort(&column).await.map(|_| ()),
            Command::OpenEvent(event_id) => Ok(self.panels.open_event(event_id).await?),
            Command::OpenVenue(venue_name) => Ok(self.panels.open_venue(&venue_name).await?),
            Command::CloseEvent => {
                self.panels.close_event().await;
                Ok(())
            }
            Command::CloseVenue => {
                self.panels.close_venue().await;
                Ok(())
            }
            Command::SetAutoDetect(enabled) => self.set_auto_detect(enabled).await,
            Command::Clear => {
                self.clear().await;
                Ok(())
            }
        }
    }

    /// Runs one search submission and returns the number of rows shown.
    /// Catalog failures still leave the "no results" display in place.
    pub async fn submit(&self, form: SearchForm) -> Result<usize, CommandError> {
        self.notifications.hide_all().await;

        let mode = self.inner.lock().await.location_mode;
        let validated = match validate(&form, mode) {
            Ok(validated) => validated,
            Err(err) => {
                debug!(error = %err, "session: search form rejected");
                self.notify(validation_notice(&err)).await;
                return Err(err.into());
            }
        };

        let query = match self.search.resolve(validated).await {
            Ok(query) => query,
            Err(err) => {
                self.notify(location_notice(&err)).await;
                return Err(err.into());
            }
        };

        let outcome = self.search.run(&query).await;
        let (display, rows) = {
            let mut guard = self.inner.lock().await;
            match &outcome {
                Ok(rows) if !rows.is_empty() => {
                    guard.results.replace(rows.clone());
                    guard.display = ResultsDisplay::Table;
                }
                _ => {
                    guard.results.clear();
                    guard.display = ResultsDisplay::NoResults;
                }
            }
            (guard.display, guard.results.len())
        };
        let _ = self
            .events
            .send(SessionEvent::ResultsUpdated { display, rows });

        match outcome {
            Ok(_) => Ok(rows),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn sort(&self, column: &str) -> Result<SortState, CommandError> {
        let state = {
            let mut guard = self.inner.lock().await;
            if !guard.results.sort(column) {
                debug!(%column, "session: ignoring unsupported sort column");
                return Err(CommandError::UnknownSortColumn(column.to_string()));
            }
            guard.results.sort_state()
        };
        let _ = self.events.send(SessionEvent::SortChanged(state));
        Ok(state)
    }

    /// Turning auto-detect on runs detection straight away. A failed
    /// detection drops back to manual mode; a result that arrives after the
    /// mode changed again is ignored.
    pub async fn set_auto_detect(&self, enabled: bool) -> Result<(), CommandError> {
        let generation = {
            let mut guard = self.inner.lock().await;
            guard.detect_generation += 1;
            guard.location_mode = if enabled {
                LocationMode::Auto { detected: None }
            } else {
                LocationMode::Manual
            };
            guard.detect_generation
        };
        let _ = self.events.send(SessionEvent::LocationModeChanged {
            auto_detect: enabled,
        });
        if !enabled {
            return Ok(());
        }

        let detected = self.location.detect().await;
        let current = {
            let mut guard = self.inner.lock().await;
            let current = guard.detect_generation == generation;
            if current {
                guard.location_mode = match &detected {
                    Ok(coordinate) => LocationMode::Auto {
                        detected: Some(*coordinate),
                    },
                    Err(_) => LocationMode::Manual,
                };
            }
            current
        };
        if !current {
            debug!("session: discarding stale location detection result");
            return Ok(());
        }

        match detected {
            Ok(coordinate) => {
                let _ = self.events.send(SessionEvent::LocationDetected(coordinate));
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "session: auto-detect failed; switching to manual entry");
                self.notify(location_notice(&err)).await;
                let _ = self.events.send(SessionEvent::LocationModeChanged {
                    auto_detect: false,
                });
                Err(err.into())
            }
        }
    }

    /// Back to the initial state: manual location, no results, no panels,
    /// no notices.
    pub async fn clear(&self) {
        {
            let mut guard = self.inner.lock().await;
            guard.detect_generation += 1;
            guard.location_mode = LocationMode::Manual;
            guard.results.clear();
            guard.display = ResultsDisplay::Hidden;
        }
        self.notifications.hide_all().await;
        self.panels.close_event().await;
        let _ = self.events.send(SessionEvent::Cleared);
    }

    pub async fn open_event(&self, event_id: EventId) -> Result<(), DetailFetchError> {
        self.panels.open_event(event_id).await
    }

    pub async fn open_venue(&self, venue_name: &str) -> Result<(), DetailFetchError> {
        self.panels.open_venue(venue_name).await
    }

    /// Opens an event without waiting on it. Overlapping opens are not
    /// cancelled; whichever response lands last is what the panel shows.
    pub fn spawn_open_event(
        self: &Arc<Self>,
        event_id: EventId,
    ) -> JoinHandle<Result<(), DetailFetchError>> {
        let session = Arc::clone(self);
        tokio::spawn(async move { session.panels.open_event(event_id).await })
    }

    pub async fn panel_state(&self) -> PanelState {
        self.panels.state().await
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let (location_mode, display, rows, sort) = {
            let guard = self.inner.lock().await;
            (
                guard.location_mode,
                guard.display,
                guard.results.rows(),
                guard.results.sort_state(),
            )
        };
        SessionSnapshot {
            location_mode,
            display,
            rows,
            sort,
            panels: self.panels.snapshot().await,
        }
    }

    async fn notify(&self, notice: Notice) {
        self.notifications
            .show(notice.target, &notice.message, DEFAULT_NOTICE_DURATION)
            .await;
        let _ = self.events.send(SessionEvent::NoticeShown(notice));
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
