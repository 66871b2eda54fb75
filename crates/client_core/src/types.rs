use shared::domain::EventId;

/// Placeholder rendered for any absent optional field.
pub const PLACEHOLDER: &str = "N/A";

/// One row of the result table.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSummary {
    pub id: EventId,
    pub start_date: Option<String>,
    pub start_time: Option<String>,
    pub name: Option<String>,
    pub venue_name: Option<String>,
    pub genre: Option<String>,
    pub image_url: Option<String>,
}

impl EventSummary {
    pub fn name_text(&self) -> &str {
        self.name.as_deref().unwrap_or(PLACEHOLDER)
    }

    pub fn genre_text(&self) -> &str {
        self.genre.as_deref().unwrap_or(PLACEHOLDER)
    }

    pub fn venue_text(&self) -> &str {
        self.venue_name.as_deref().unwrap_or(PLACEHOLDER)
    }

    pub fn image_text(&self) -> &str {
        self.image_url.as_deref().unwrap_or(PLACEHOLDER)
    }

    pub fn date_time_text(&self) -> String {
        match (self.start_date.as_deref(), self.start_time.as_deref()) {
            (Some(date), Some(time)) => format!("{date} {time}"),
            (Some(date), None) => date.to_string(),
            (None, Some(time)) => time.to_string(),
            (None, None) => PLACEHOLDER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artist {
    pub name: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub currency: String,
}

impl PriceRange {
    pub fn text(&self) -> String {
        let min = self
            .min
            .map(|v| v.to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        let max = self
            .max
            .map(|v| v.to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        format!("{min} - {max} {}", self.currency)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatusCategory {
    OnSale,
    OffSale,
    Cancelled,
    Postponed,
    Other,
}

impl TicketStatusCategory {
    /// Classifies an upstream status code. Matching is by substring on the
    /// lowercased code, first match wins.
    pub fn from_code(code: &str) -> Self {
        let lower = code.to_ascii_lowercase();
        if lower.contains("onsale") {
            TicketStatusCategory::OnSale
        } else if lower.contains("offsale") {
            TicketStatusCategory::OffSale
        } else if lower.contains("cancel") {
            TicketStatusCategory::Cancelled
        } else if lower.contains("postponed") || lower.contains("rescheduled") {
            TicketStatusCategory::Postponed
        } else {
            TicketStatusCategory::Other
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatusCategory::OnSale => "onsale",
            TicketStatusCategory::OffSale => "offsale",
            TicketStatusCategory::Cancelled => "cancelled",
            TicketStatusCategory::Postponed => "postponed",
            TicketStatusCategory::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketStatus {
    pub code: String,
    pub category: TicketStatusCategory,
}

/// Event panel content. `None` fields are rows the panel omits.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDetail {
    pub id: EventId,
    pub title: String,
    pub date_time: Option<String>,
    pub artists: Vec<Artist>,
    pub venue_name: Option<String>,
    pub genre_path: Option<String>,
    pub price_range: Option<PriceRange>,
    pub ticket_status: Option<TicketStatus>,
    pub purchase_url: Option<String>,
    pub seatmap_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueDetail {
    pub name: Option<String>,
    pub address_line: Option<String>,
    pub city_state: Option<String>,
    pub postal_code: Option<String>,
    pub more_events_url: Option<String>,
    pub image_url: Option<String>,
    pub full_address: String,
    pub maps_search_url: Option<String>,
}

impl VenueDetail {
    pub fn name_text(&self) -> &str {
        self.name.as_deref().unwrap_or(PLACEHOLDER)
    }

    pub fn address_text(&self) -> &str {
        self.address_line.as_deref().unwrap_or(PLACEHOLDER)
    }

    pub fn city_state_text(&self) -> &str {
        self.city_state.as_deref().unwrap_or(PLACEHOLDER)
    }

    pub fn postal_code_text(&self) -> &str {
        self.postal_code.as_deref().unwrap_or(PLACEHOLDER)
    }
}
