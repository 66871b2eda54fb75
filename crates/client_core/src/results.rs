use shared::domain::EventId;

use crate::types::EventSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Name,
    Genre,
    VenueName,
}

impl SortColumn {
    /// Accepts the column names used by result-table headers. Anything else
    /// is unsupported and sorting on it is a no-op.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "name" | "event" => Some(SortColumn::Name),
            "genre" => Some(SortColumn::Genre),
            "venueName" | "venue_name" | "venue" => Some(SortColumn::VenueName),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::Genre => "genre",
            SortColumn::VenueName => "venueName",
        }
    }

    /// The defaulted display text rows are ordered by.
    pub fn key(self, row: &EventSummary) -> &str {
        match self {
            SortColumn::Name => row.name_text(),
            SortColumn::Genre => row.genre_text(),
            SortColumn::VenueName => row.venue_text(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub active_column: Option<SortColumn>,
    pub direction: SortDirection,
}

impl SortState {
    /// Same column flips direction, a new column starts ascending.
    pub fn toggled(self, column: SortColumn) -> Self {
        if self.active_column == Some(column) {
            Self {
                active_column: Some(column),
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                active_column: Some(column),
                direction: SortDirection::Asc,
            }
        }
    }
}

/// Reorders `order` (indices into `rows`) by `column`. Stable: rows with
/// equal keys keep their relative position from before the call.
pub fn sort_order(
    order: &mut [usize],
    rows: &[EventSummary],
    column: SortColumn,
    direction: SortDirection,
) {
    order.sort_by(|&a, &b| {
        let ordering = column.key(&rows[a]).cmp(column.key(&rows[b]));
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Rows of the last successful search plus their current display order.
#[derive(Debug, Clone, Default)]
pub struct ResultSetStore {
    rows: Vec<EventSummary>,
    order: Vec<usize>,
    sort: SortState,
}

impl ResultSetStore {
    /// Replaces the whole result set. Server order becomes the baseline and
    /// the sort indicator resets.
    pub fn replace(&mut self, rows: Vec<EventSummary>) {
        self.order = (0..rows.len()).collect();
        self.rows = rows;
        self.sort = SortState::default();
    }

    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    /// Applies a header activation. Returns `false` for unsupported column
    /// names, which leave everything untouched.
    pub fn sort(&mut self, column_name: &str) -> bool {
        let Some(column) = SortColumn::parse(column_name) else {
            return false;
        };
        self.sort = self.sort.toggled(column);
        sort_order(&mut self.order, &self.rows, column, self.sort.direction);
        true
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in display order.
    pub fn rows(&self) -> Vec<EventSummary> {
        self.order.iter().map(|&i| self.rows[i].clone()).collect()
    }

    /// Row at a zero-based display position.
    pub fn row_at(&self, position: usize) -> Option<&EventSummary> {
        self.order.get(position).map(|&i| &self.rows[i])
    }

    pub fn find(&self, id: &EventId) -> Option<&EventSummary> {
        self.rows.iter().find(|row| &row.id == id)
    }

    /// Server-provided order of the last successful search.
    pub fn baseline(&self) -> &[EventSummary] {
        &self.rows
    }
}

#[cfg(test)]
#[path = "tests/results_tests.rs"]
mod tests;
