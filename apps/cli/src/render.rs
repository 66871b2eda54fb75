//! Plain-text rendering of the session for the terminal.

use client_core::{
    types::{EventDetail, VenueDetail},
    LocationMode, Notice, PanelView, ResultsDisplay, SessionSnapshot, SortColumn, SortDirection,
    PLACEHOLDER,
};

const NO_RESULTS: &str = "No records found";
const DATE_WIDTH: usize = 17;
const NAME_WIDTH: usize = 36;
const GENRE_WIDTH: usize = 14;
const VENUE_WIDTH: usize = 30;

pub fn screen(snapshot: &SessionSnapshot, notices: &[Notice]) -> String {
    let mut sections = vec![location_line(snapshot.location_mode)];
    if !notices.is_empty() {
        sections.push(notice_lines(notices));
    }
    if let Some(results) = results(snapshot) {
        sections.push(results);
    }
    sections.extend(panels(&snapshot.panels));
    sections.join("\n\n")
}

pub fn location_line(mode: LocationMode) -> String {
    match mode {
        LocationMode::Manual => "Location: manual entry".to_string(),
        LocationMode::Auto { detected: None } => "Location: auto (not detected)".to_string(),
        LocationMode::Auto {
            detected: Some(coordinate),
        } => format!("Location: auto ({coordinate})"),
    }
}

pub fn notice_lines(notices: &[Notice]) -> String {
    notices
        .iter()
        .map(|notice| format!("! [{}] {}", notice.target.as_str(), notice.message))
        .collect::<Vec<_>>()
        .join("\n")
}

fn cell(text: &str, width: usize) -> String {
    let clipped: String = text.chars().take(width).collect();
    format!("{clipped:<width$}")
}

fn header(label: &str, column: SortColumn, snapshot: &SessionSnapshot) -> String {
    if snapshot.sort.active_column != Some(column) {
        return label.to_string();
    }
    match snapshot.sort.direction {
        SortDirection::Asc => format!("{label} (asc)"),
        SortDirection::Desc => format!("{label} (desc)"),
    }
}

/// `None` while the results area is hidden.
pub fn results(snapshot: &SessionSnapshot) -> Option<String> {
    match snapshot.display {
        ResultsDisplay::Hidden => None,
        ResultsDisplay::NoResults => Some(NO_RESULTS.to_string()),
        ResultsDisplay::Table => {
            let mut lines = vec![format!(
                "{:>3}  {} {} {} {}",
                "#",
                cell("Date", DATE_WIDTH),
                cell(&header("Event", SortColumn::Name, snapshot), NAME_WIDTH),
                cell(&header("Genre", SortColumn::Genre, snapshot), GENRE_WIDTH),
                header("Venue", SortColumn::VenueName, snapshot),
            )];
            for (position, row) in snapshot.rows.iter().enumerate() {
                lines.push(format!(
                    "{:>3}  {} {} {} {}",
                    position + 1,
                    cell(&row.date_time_text(), DATE_WIDTH),
                    cell(row.name_text(), NAME_WIDTH),
                    cell(row.genre_text(), GENRE_WIDTH),
                    cell(row.venue_text(), VENUE_WIDTH).trim_end(),
                ));
            }
            Some(lines.join("\n"))
        }
    }
}

pub fn panels(view: &PanelView) -> Vec<String> {
    let mut sections = Vec::new();
    if let Some(event) = &view.event {
        sections.push(event_panel(event, view.venue_trigger.as_deref()));
    }
    if let Some(venue) = &view.venue {
        sections.push(venue_panel(venue));
    }
    sections
}

pub fn event_panel(event: &EventDetail, venue_trigger: Option<&str>) -> String {
    let mut lines = vec![format!("== {} ==", event.title)];
    if let Some(date_time) = &event.date_time {
        lines.push(format!("Date: {date_time}"));
    }
    if !event.artists.is_empty() {
        let artists = event
            .artists
            .iter()
            .map(|artist| match &artist.url {
                Some(url) => format!("{} <{url}>", artist.name),
                None => artist.name.clone(),
            })
            .collect::<Vec<_>>()
            .join(" | ");
        lines.push(format!("Artist/Team: {artists}"));
    }
    if let Some(venue) = &event.venue_name {
        lines.push(format!("Venue: {venue}"));
    }
    if let Some(genre) = &event.genre_path {
        lines.push(format!("Genre: {genre}"));
    }
    if let Some(price) = &event.price_range {
        lines.push(format!("Price Ranges: {}", price.text()));
    }
    if let Some(status) = &event.ticket_status {
        lines.push(format!(
            "Ticket Status: {} [{}]",
            status.code,
            status.category.as_str()
        ));
    }
    if let Some(url) = &event.purchase_url {
        lines.push(format!("Buy Ticket At: {url}"));
    }
    if let Some(url) = &event.seatmap_url {
        lines.push(format!("Seat Map: {url}"));
    }
    if let Some(venue) = venue_trigger {
        lines.push(format!("(type `venue` for details on {venue})"));
    }
    lines.join("\n")
}

pub fn venue_panel(venue: &VenueDetail) -> String {
    let title = venue.name.as_deref().unwrap_or("Venue Details");
    let mut lines = vec![
        format!("== {title} =="),
        format!("Address: {}", venue.address_text()),
    ];
    let locality: Vec<&str> = [venue.city_state.as_deref(), venue.postal_code.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !locality.is_empty() {
        lines.push(format!("         {}", locality.join(" ")));
    }
    lines.push(format!(
        "Open in Google Maps: {}",
        venue.maps_search_url.as_deref().unwrap_or(PLACEHOLDER)
    ));
    lines.push(format!(
        "More events at this venue: {}",
        venue.more_events_url.as_deref().unwrap_or(PLACEHOLDER)
    ));
    lines.join("\n")
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
