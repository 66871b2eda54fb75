//! Fail-soft field accessors over raw catalog payloads.
//!
//! Each accessor answers `None` for anything absent or empty; callers decide
//! between the `"N/A"` placeholder and omitting the row. Nothing here panics
//! or errors on a missing nested field.

use shared::{
    domain::EventId,
    protocol::{ClassificationRaw, EventRaw, ImageRaw, NamedRaw, VenueRaw},
};
use tracing::warn;
use url::Url;

use crate::types::{
    Artist, EventDetail, EventSummary, PriceRange, TicketStatus, TicketStatusCategory, VenueDetail,
};

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/";
const UNDEFINED_LEVEL: &str = "Undefined";
const DEFAULT_CURRENCY: &str = "USD";
const EVENT_TITLE_FALLBACK: &str = "Event Details";

fn text(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

fn named(value: Option<&NamedRaw>) -> Option<&str> {
    text(value.and_then(|n| n.name.as_ref()))
}

fn first_image(images: &[ImageRaw]) -> Option<&str> {
    text(images.first().and_then(|image| image.url.as_ref()))
}

fn first_classification(event: &EventRaw) -> Option<&ClassificationRaw> {
    event.classifications.first()
}

pub fn event_id(event: &EventRaw) -> Option<EventId> {
    text(event.id.as_ref()).map(EventId::from)
}

pub fn event_name(event: &EventRaw) -> Option<&str> {
    text(event.name.as_ref())
}

pub fn start_date(event: &EventRaw) -> Option<&str> {
    text(
        event
            .dates
            .as_ref()
            .and_then(|d| d.start.as_ref())
            .and_then(|s| s.local_date.as_ref()),
    )
}

pub fn start_time(event: &EventRaw) -> Option<&str> {
    text(
        event
            .dates
            .as_ref()
            .and_then(|d| d.start.as_ref())
            .and_then(|s| s.local_time.as_ref()),
    )
}

pub fn venue_name(event: &EventRaw) -> Option<&str> {
    text(
        event
            .embedded
            .as_ref()
            .and_then(|e| e.venues.first())
            .and_then(|v| v.name.as_ref()),
    )
}

/// Table genre column: the top-level segment of the first classification.
pub fn segment_name(event: &EventRaw) -> Option<&str> {
    named(first_classification(event).and_then(|c| c.segment.as_ref()))
}

pub fn image_url(event: &EventRaw) -> Option<&str> {
    first_image(&event.images)
}

/// Classification levels from most to least specific, without empty levels
/// or the `"Undefined"` marker, joined by `" | "`. `None` means the genre
/// row is omitted.
pub fn genre_path(event: &EventRaw) -> Option<String> {
    let classification = first_classification(event)?;
    let levels = [
        &classification.sub_genre,
        &classification.genre,
        &classification.segment,
        &classification.sub_type,
        &classification.kind,
    ];
    let parts: Vec<&str> = levels
        .into_iter()
        .filter_map(|level| named(level.as_ref()))
        .filter(|name| *name != UNDEFINED_LEVEL)
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}

pub fn price_range(event: &EventRaw) -> Option<PriceRange> {
    let range = event.price_ranges.first()?;
    Some(PriceRange {
        min: range.min,
        max: range.max,
        currency: text(range.currency.as_ref())
            .unwrap_or(DEFAULT_CURRENCY)
            .to_string(),
    })
}

pub fn ticket_status(event: &EventRaw) -> Option<TicketStatus> {
    let code = text(
        event
            .dates
            .as_ref()
            .and_then(|d| d.status.as_ref())
            .and_then(|s| s.code.as_ref()),
    )?;
    Some(TicketStatus {
        code: code.to_string(),
        category: TicketStatusCategory::from_code(code),
    })
}

pub fn artists(event: &EventRaw) -> Vec<Artist> {
    event
        .embedded
        .as_ref()
        .map(|e| e.attractions.as_slice())
        .unwrap_or_default()
        .iter()
        .filter_map(|attraction| {
            let name = text(attraction.name.as_ref())?;
            Some(Artist {
                name: name.to_string(),
                url: text(attraction.url.as_ref()).map(str::to_string),
            })
        })
        .collect()
}

fn date_time(event: &EventRaw) -> Option<String> {
    match (start_date(event), start_time(event)) {
        (Some(date), Some(time)) => Some(format!("{date} {time}")),
        (Some(date), None) => Some(date.to_string()),
        (None, Some(time)) => Some(time.to_string()),
        (None, None) => None,
    }
}

/// Projects a raw search hit into a table row. Rows without an id cannot be
/// opened, so they are dropped.
pub fn summarize_event(event: &EventRaw) -> Option<EventSummary> {
    let Some(id) = event_id(event) else {
        warn!(name = ?event_name(event), "catalog: dropping search row without id");
        return None;
    };
    Some(EventSummary {
        id,
        start_date: start_date(event).map(str::to_string),
        start_time: start_time(event).map(str::to_string),
        name: event_name(event).map(str::to_string),
        venue_name: venue_name(event).map(str::to_string),
        genre: segment_name(event).map(str::to_string),
        image_url: image_url(event).map(str::to_string),
    })
}

pub fn event_detail(id: EventId, event: &EventRaw) -> EventDetail {
    EventDetail {
        id,
        title: event_name(event).unwrap_or(EVENT_TITLE_FALLBACK).to_string(),
        date_time: date_time(event),
        artists: artists(event),
        venue_name: venue_name(event).map(str::to_string),
        genre_path: genre_path(event),
        price_range: price_range(event),
        ticket_status: ticket_status(event),
        purchase_url: text(event.url.as_ref()).map(str::to_string),
        seatmap_url: text(
            event
                .seatmap
                .as_ref()
                .and_then(|s| s.static_url.as_ref()),
        )
        .map(str::to_string),
    }
}

fn venue_city(venue: &VenueRaw) -> Option<&str> {
    named(venue.city.as_ref())
}

fn venue_state_code(venue: &VenueRaw) -> Option<&str> {
    text(venue.state.as_ref().and_then(|s| s.state_code.as_ref()))
}

fn venue_address_line(venue: &VenueRaw) -> Option<&str> {
    text(venue.address.as_ref().and_then(|a| a.line1.as_ref()))
}

/// `"City, ST"`, or whichever half is present.
pub fn city_state(venue: &VenueRaw) -> Option<String> {
    let parts: Vec<&str> = [venue_city(venue), venue_state_code(venue)]
        .into_iter()
        .flatten()
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

pub fn full_address(venue: &VenueRaw) -> String {
    [
        text(venue.name.as_ref()),
        venue_address_line(venue),
        venue_city(venue),
        venue_state_code(venue),
        text(venue.postal_code.as_ref()),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(", ")
}

pub fn maps_search_url(full_address: &str) -> Option<String> {
    if full_address.is_empty() {
        return None;
    }
    Url::parse_with_params(MAPS_SEARCH_URL, &[("api", "1"), ("query", full_address)])
        .ok()
        .map(String::from)
}

pub fn venue_detail(venue: &VenueRaw) -> VenueDetail {
    let full_address = full_address(venue);
    let maps_search_url = maps_search_url(&full_address);
    VenueDetail {
        name: text(venue.name.as_ref()).map(str::to_string),
        address_line: venue_address_line(venue).map(str::to_string),
        city_state: city_state(venue),
        postal_code: text(venue.postal_code.as_ref()).map(str::to_string),
        more_events_url: text(venue.url.as_ref()).map(str::to_string),
        image_url: first_image(&venue.images).map(str::to_string),
        full_address,
        maps_search_url,
    }
}

#[cfg(test)]
#[path = "tests/fields_tests.rs"]
mod tests;
