//! Event and Venue detail panels.
//!
//! Panel state is a plain value with pure transitions ([`PanelState`],
//! [`PanelView`]); [`DetailPanelCoordinator`] only fetches and then applies
//! a transition under its lock. The lock is never held across a fetch, so
//! overlapping opens each apply their result when they complete and the
//! last response to arrive wins.

use std::sync::Arc;

use shared::domain::EventId;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

use crate::{
    catalog::CatalogApi,
    error::DetailFetchError,
    fields::{event_detail, venue_detail},
    session::SessionEvent,
    types::{EventDetail, VenueDetail},
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    None,
    EventOnly {
        event_id: EventId,
    },
    EventAndVenue {
        event_id: EventId,
        venue_name: String,
    },
}

impl PanelState {
    pub fn current_event_id(&self) -> Option<&EventId> {
        match self {
            PanelState::None => None,
            PanelState::EventOnly { event_id } | PanelState::EventAndVenue { event_id, .. } => {
                Some(event_id)
            }
        }
    }

    pub fn current_venue_name(&self) -> Option<&str> {
        match self {
            PanelState::EventAndVenue { venue_name, .. } => Some(venue_name),
            _ => None,
        }
    }

    pub fn is_venue_open(&self) -> bool {
        matches!(self, PanelState::EventAndVenue { .. })
    }

    /// An event panel opened. An open venue panel stays open.
    pub fn with_event(&self, event_id: EventId) -> PanelState {
        match self {
            PanelState::None | PanelState::EventOnly { .. } => PanelState::EventOnly { event_id },
            PanelState::EventAndVenue { venue_name, .. } => PanelState::EventAndVenue {
                event_id,
                venue_name: venue_name.clone(),
            },
        }
    }

    /// A venue panel opened. `None` when no event panel is open.
    pub fn with_venue(&self, venue_name: String) -> Option<PanelState> {
        let event_id = self.current_event_id()?.clone();
        Some(PanelState::EventAndVenue {
            event_id,
            venue_name,
        })
    }

    pub fn without_venue(&self) -> PanelState {
        match self {
            PanelState::EventAndVenue { event_id, .. } => PanelState::EventOnly {
                event_id: event_id.clone(),
            },
            other => other.clone(),
        }
    }
}

/// Venue to re-fetch after `opened` finished loading, given the panel state
/// the loaded event replaced. A venue panel closed while the event was in
/// flight therefore stays closed.
///
/// Fires only when a venue panel is open for a different event and the new
/// event names a venue, even if it is the same venue. An event without a
/// venue leaves the old venue panel in place.
pub fn venue_refresh_target(
    prior: &PanelState,
    opened: &EventId,
    new_venue_name: Option<&str>,
) -> Option<String> {
    match prior {
        PanelState::EventAndVenue { event_id, .. } if event_id != opened => {
            new_venue_name.map(str::to_string)
        }
        _ => None,
    }
}

/// Everything the panels currently show.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelView {
    pub state: PanelState,
    pub event: Option<EventDetail>,
    pub venue: Option<VenueDetail>,
    /// Venue name behind the "show venue" action when it is offered.
    pub venue_trigger: Option<String>,
}

impl PanelView {
    /// Returns the state the event replaced.
    pub fn apply_event(&mut self, detail: EventDetail) -> PanelState {
        let replaced = std::mem::replace(&mut self.state, PanelState::None);
        self.state = replaced.with_event(detail.id.clone());
        self.venue_trigger = detail.venue_name.clone();
        self.event = Some(detail);
        replaced
    }

    /// Returns `false` (and changes nothing) when no event panel is open.
    pub fn apply_venue(&mut self, venue_name: String, detail: VenueDetail) -> bool {
        let Some(next) = self.state.with_venue(venue_name) else {
            return false;
        };
        self.state = next;
        self.venue = Some(detail);
        self.venue_trigger = None;
        true
    }

    /// Closing the event panel closes the venue panel with it.
    pub fn close_event(&mut self) {
        *self = PanelView::default();
    }

    pub fn close_venue(&mut self) {
        self.state = self.state.without_venue();
        self.venue = None;
    }
}

pub struct DetailPanelCoordinator {
    catalog: Arc<dyn CatalogApi>,
    view: Mutex<PanelView>,
    events: broadcast::Sender<SessionEvent>,
}

impl DetailPanelCoordinator {
    pub fn new(catalog: Arc<dyn CatalogApi>, events: broadcast::Sender<SessionEvent>) -> Self {
        Self {
            catalog,
            view: Mutex::new(PanelView::default()),
            events,
        }
    }

    pub async fn state(&self) -> PanelState {
        self.view.lock().await.state.clone()
    }

    pub async fn snapshot(&self) -> PanelView {
        self.view.lock().await.clone()
    }

    pub async fn open_event(&self, event_id: EventId) -> Result<(), DetailFetchError> {
        let raw = self.catalog.get_event(&event_id).await.map_err(|source| {
            error!(event_id = %event_id, error = %source, "panels: failed to fetch event details");
            DetailFetchError::Event {
                event_id: event_id.to_string(),
                source,
            }
        })?;

        let detail = event_detail(event_id.clone(), &raw);
        let venue_trigger = detail.venue_name.clone();

        let replaced = self.view.lock().await.apply_event(detail);
        let refresh = venue_refresh_target(&replaced, &event_id, venue_trigger.as_deref());
        if replaced.is_venue_open() && venue_trigger.is_none() {
            debug!(event_id = %event_id, "panels: event has no venue; venue panel keeps previous data");
        }
        let _ = self.events.send(SessionEvent::EventPanelRendered {
            event_id: event_id.clone(),
            venue_trigger,
        });

        if let Some(venue_name) = refresh {
            info!(event_id = %event_id, %venue_name, "panels: refreshing open venue panel");
            if let Err(err) = self.open_venue(&venue_name).await {
                warn!(event_id = %event_id, error = %err, "panels: unable to auto-refresh venue details");
            }
        }
        Ok(())
    }

    pub async fn open_venue(&self, venue_name: &str) -> Result<(), DetailFetchError> {
        if self.state().await.current_event_id().is_none() {
            warn!(%venue_name, "panels: venue requested with no event panel open");
            return Err(DetailFetchError::NoEventPanel);
        }

        let response = self.catalog.find_venue(venue_name).await.map_err(|source| {
            error!(%venue_name, error = %source, "panels: failed to fetch venue details");
            DetailFetchError::Venue {
                keyword: venue_name.to_string(),
                source,
            }
        })?;
        let Some(raw) = response.into_first_venue() else {
            error!(%venue_name, "panels: no venue matched");
            return Err(DetailFetchError::NoVenueMatch {
                keyword: venue_name.to_string(),
            });
        };

        let applied = self
            .view
            .lock()
            .await
            .apply_venue(venue_name.to_string(), venue_detail(&raw));
        if !applied {
            warn!(%venue_name, "panels: event panel closed before venue arrived; discarding");
            return Err(DetailFetchError::NoEventPanel);
        }

        let _ = self.events.send(SessionEvent::VenuePanelRendered {
            venue_name: venue_name.to_string(),
        });
        Ok(())
    }

    pub async fn close_event(&self) {
        self.view.lock().await.close_event();
        let _ = self.events.send(SessionEvent::PanelsClosed);
    }

    pub async fn close_venue(&self) {
        self.view.lock().await.close_venue();
        let _ = self.events.send(SessionEvent::VenuePanelClosed);
    }
}

#[cfg(test)]
#[path = "tests/panels_tests.rs"]
mod tests;
