use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};
use shared::protocol::{EventRaw, SearchParams, SearchResponse, VenueSearchResponse};

use super::*;
use crate::{
    catalog::MissingCatalogApi,
    error::{CatalogError, LocationError, ValidationError},
    notify::{
        NoticeTarget, NotificationBoard, DETECTION_FALLBACK, FIELD_REQUIRED, LOCATION_NOT_FOUND,
        SERVICE_NOT_CONFIGURED,
    },
    results::{SortColumn, SortDirection},
};

struct StubCatalog {
    search_body: Value,
    calls: AtomicUsize,
    searches: Mutex<Vec<SearchParams>>,
}

impl StubCatalog {
    fn new(search_body: Value) -> Arc<Self> {
        Arc::new(Self {
            search_body,
            calls: AtomicUsize::new(0),
            searches: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CatalogApi for StubCatalog {
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.searches.lock().await.push(params.clone());
        serde_json::from_value(self.search_body.clone())
            .map_err(|err| CatalogError::Decode(err.to_string()))
    }

    async fn get_event(&self, id: &EventId) -> Result<EventRaw, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        serde_json::from_value(json!({ "id": id.as_str(), "name": "Detail" }))
            .map_err(|err| CatalogError::Decode(err.to_string()))
    }

    async fn find_venue(&self, _keyword: &str) -> Result<VenueSearchResponse, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(VenueSearchResponse::default())
    }
}

struct StubLocation {
    detect: Result<Coordinate, LocationError>,
    geocode: Result<Coordinate, LocationError>,
    calls: AtomicUsize,
}

impl StubLocation {
    fn new(
        detect: Result<Coordinate, LocationError>,
        geocode: Result<Coordinate, LocationError>,
    ) -> Arc<Self> {
        Arc::new(Self {
            detect,
            geocode,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl LocationProvider for StubLocation {
    async fn detect(&self) -> Result<Coordinate, LocationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.detect.clone()
    }

    async fn geocode(&self, _address: &str) -> Result<Coordinate, LocationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.geocode.clone()
    }
}

fn three_events() -> Value {
    json!({
        "_embedded": { "events": [
            { "id": "1", "name": "Charlie", "classifications": [{ "segment": { "name": "Music" } }] },
            { "id": "2", "name": "Alpha" },
            { "id": "3", "name": "Bravo", "classifications": [{ "segment": { "name": "Sports" } }] }
        ] }
    })
}

fn form(keyword: &str, location: &str) -> SearchForm {
    SearchForm {
        keyword: keyword.to_string(),
        distance: String::new(),
        category: String::new(),
        location: location.to_string(),
    }
}

fn session_with(
    catalog: Arc<StubCatalog>,
    location: Arc<StubLocation>,
) -> (Arc<EventsSession>, Arc<NotificationBoard>) {
    let board = Arc::new(NotificationBoard::new());
    let session = EventsSession::new_with_dependencies(catalog, location, board.clone());
    (session, board)
}

#[tokio::test]
async fn blank_keyword_makes_no_network_calls() {
    let catalog = StubCatalog::new(three_events());
    let location = StubLocation::new(
        Ok(Coordinate::new(40.0, -74.0)),
        Ok(Coordinate::new(40.0, -74.0)),
    );
    let (session, board) = session_with(catalog.clone(), location.clone());

    let err = session.submit(form("   ", "Los Angeles")).await.unwrap_err();
    assert_eq!(err, CommandError::Validation(ValidationError::MissingKeyword));
    assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
    assert_eq!(location.calls.load(Ordering::SeqCst), 0);

    let visible = board.visible().await;
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].target, NoticeTarget::Keyword);
    assert_eq!(visible[0].message, FIELD_REQUIRED);
    assert_eq!(session.snapshot().await.display, ResultsDisplay::Hidden);
}

#[tokio::test]
async fn fresh_search_resets_sort_and_restores_server_order() {
    let catalog = StubCatalog::new(three_events());
    let location = StubLocation::new(
        Err(LocationError::DetectionFailed("unused".into())),
        Ok(Coordinate::new(34.05, -118.24)),
    );
    let (session, _board) = session_with(catalog, location);

    assert_eq!(session.submit(form("rock", "Los Angeles")).await, Ok(3));
    session.sort("name").await.expect("sortable");
    let state = session.sort("name").await.expect("sortable");
    assert_eq!(state.direction, SortDirection::Desc);
    let names: Vec<String> = session
        .snapshot()
        .await
        .rows
        .iter()
        .map(|row| row.name_text().to_string())
        .collect();
    assert_eq!(names, ["Charlie", "Bravo", "Alpha"]);

    session.submit(form("rock", "Los Angeles")).await.expect("search");
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.sort, SortState::default());
    assert_eq!(snapshot.display, ResultsDisplay::Table);
    let ids: Vec<&str> = snapshot.rows.iter().map(|row| row.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3"]);
}

#[tokio::test]
async fn unsupported_sort_column_is_a_no_op() {
    let catalog = StubCatalog::new(three_events());
    let location = StubLocation::new(
        Err(LocationError::DetectionFailed("unused".into())),
        Ok(Coordinate::new(34.05, -118.24)),
    );
    let (session, _board) = session_with(catalog, location);
    session.submit(form("rock", "LA")).await.expect("search");
    session.sort("genre").await.expect("sortable");

    let err = session.sort("date").await.unwrap_err();
    assert_eq!(err, CommandError::UnknownSortColumn("date".into()));
    assert_eq!(
        session.snapshot().await.sort.active_column,
        Some(SortColumn::Genre)
    );
}

#[tokio::test]
async fn detection_failure_falls_back_to_manual_entry() {
    let catalog = StubCatalog::new(three_events());
    let location = StubLocation::new(
        Err(LocationError::DetectionFailed("timeout".into())),
        Ok(Coordinate::new(34.05, -118.24)),
    );
    let (session, board) = session_with(catalog.clone(), location);

    assert!(session.dispatch(Command::SetAutoDetect(true)).await.is_err());
    assert_eq!(session.snapshot().await.location_mode, LocationMode::Manual);
    assert_eq!(board.visible().await[0].message, DETECTION_FALLBACK);

    let err = session.submit(form("jazz", "")).await.unwrap_err();
    assert_eq!(
        err,
        CommandError::Validation(ValidationError::MissingLocation { auto_detect: false })
    );
    assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn detected_coordinate_feeds_the_query() {
    let catalog = StubCatalog::new(three_events());
    let location = StubLocation::new(
        Ok(Coordinate::new(40.0, -74.0)),
        Err(LocationError::NotConfigured),
    );
    let (session, _board) = session_with(catalog.clone(), location);

    session
        .dispatch(Command::SetAutoDetect(true))
        .await
        .expect("detected");
    session
        .dispatch(Command::Search(form("jazz", "")))
        .await
        .expect("search");

    let searches = catalog.searches.lock().await;
    assert_eq!(
        searches[0],
        SearchParams {
            keyword: "jazz".into(),
            distance: "10".into(),
            category: String::new(),
            lat: 40.0,
            lon: -74.0,
        }
    );
}

#[tokio::test]
async fn geocoding_failures_produce_distinct_notices() {
    for (error, expected) in [
        (LocationError::ZeroResults, LOCATION_NOT_FOUND),
        (LocationError::InvalidCredentials, SERVICE_NOT_CONFIGURED),
    ] {
        let catalog = StubCatalog::new(three_events());
        let location = StubLocation::new(
            Err(LocationError::DetectionFailed("unused".into())),
            Err(error.clone()),
        );
        let (session, board) = session_with(catalog.clone(), location);

        let err = session.submit(form("jazz", "Atlantis")).await.unwrap_err();
        assert_eq!(err, CommandError::Location(error));
        assert_eq!(board.visible().await[0].message, expected);
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test]
async fn catalog_failure_shows_no_results() {
    let catalog = StubCatalog::new(json!({ "_embedded": "not a list" }));
    let location = StubLocation::new(
        Err(LocationError::DetectionFailed("unused".into())),
        Ok(Coordinate::new(34.05, -118.24)),
    );
    let (session, board) = session_with(catalog, location);

    assert!(matches!(
        session.submit(form("jazz", "LA")).await,
        Err(CommandError::Search(_))
    ));
    assert_eq!(session.snapshot().await.display, ResultsDisplay::NoResults);
    assert!(board.visible().await.is_empty());
}

#[tokio::test]
async fn empty_result_set_shows_no_results() {
    let catalog = StubCatalog::new(json!({}));
    let location = StubLocation::new(
        Err(LocationError::DetectionFailed("unused".into())),
        Ok(Coordinate::new(34.05, -118.24)),
    );
    let (session, _board) = session_with(catalog, location);

    assert_eq!(session.submit(form("jazz", "LA")).await, Ok(0));
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.display, ResultsDisplay::NoResults);
    assert!(snapshot.rows.is_empty());
}

#[tokio::test]
async fn clear_resets_everything() {
    let catalog = StubCatalog::new(three_events());
    let location = StubLocation::new(
        Ok(Coordinate::new(40.0, -74.0)),
        Ok(Coordinate::new(40.0, -74.0)),
    );
    let (session, board) = session_with(catalog, location);
    let mut events = session.subscribe_events();

    session.set_auto_detect(true).await.expect("detected");
    session.submit(form("jazz", "")).await.expect("search");
    session
        .dispatch(Command::OpenEvent(EventId::from("1")))
        .await
        .expect("event");
    session.submit(form("", "")).await.unwrap_err();
    assert!(!board.visible().await.is_empty());

    session.dispatch(Command::Clear).await.expect("clear");

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.location_mode, LocationMode::Manual);
    assert_eq!(snapshot.display, ResultsDisplay::Hidden);
    assert!(snapshot.rows.is_empty());
    assert_eq!(snapshot.panels, PanelView::default());
    assert!(board.visible().await.is_empty());

    let mut saw_cleared = false;
    while let Ok(event) = events.try_recv() {
        saw_cleared |= event == SessionEvent::Cleared;
    }
    assert!(saw_cleared);
}

#[tokio::test]
async fn spawned_open_event_renders_panel() {
    let catalog = StubCatalog::new(three_events());
    let location = StubLocation::new(
        Err(LocationError::NotConfigured),
        Err(LocationError::NotConfigured),
    );
    let (session, _board) = session_with(catalog, location);

    session
        .spawn_open_event(EventId::from("2"))
        .await
        .expect("join")
        .expect("opened");
    assert_eq!(
        session.panel_state().await,
        PanelState::EventOnly {
            event_id: EventId::from("2")
        }
    );
}

#[tokio::test]
async fn unconfigured_session_degrades_quietly() {
    let session = EventsSession::new(Arc::new(MissingCatalogApi));
    let err = session.submit(form("jazz", "LA")).await.unwrap_err();
    assert_eq!(err, CommandError::Location(LocationError::NotConfigured));
    assert!(session.open_event(EventId::from("x")).await.is_err());
    assert_eq!(session.panel_state().await, PanelState::None);
}

#[test]
fn command_names_are_stable() {
    assert_eq!(Command::Sort("name".into()).name(), "sort");
    assert_eq!(Command::SetAutoDetect(true).name(), "set_auto_detect");
    assert_eq!(Command::Clear.name(), "clear");
}
