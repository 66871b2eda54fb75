use std::sync::Arc;

use client_core::{Command, EventSummary, EventsSession, NotificationBoard, SearchForm};
use shared::domain::EventId;
use tracing::debug;

use crate::{
    render,
    repl::{LineCommand, Toggle},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Render(String),
    Quit,
}

pub struct App {
    session: Arc<EventsSession>,
    board: Arc<NotificationBoard>,
}

/// Row numbers are 1-based positions in the current display order. Anything
/// else is taken as an event id.
pub fn resolve_event(target: &str, rows: &[EventSummary]) -> EventId {
    match target.parse::<usize>() {
        Ok(position) if (1..=rows.len()).contains(&position) => rows[position - 1].id.clone(),
        _ => EventId::from(target),
    }
}

impl App {
    pub fn new(session: Arc<EventsSession>, board: Arc<NotificationBoard>) -> Self {
        Self { session, board }
    }

    pub async fn execute(&self, line: LineCommand) -> Outcome {
        let command = match line {
            LineCommand::Quit => return Outcome::Quit,
            LineCommand::Show => return Outcome::Render(self.screen().await),
            LineCommand::Search {
                keyword,
                distance,
                category,
                location,
            } => Command::Search(SearchForm {
                keyword: keyword.join(" "),
                distance,
                category,
                location,
            }),
            LineCommand::Auto { state } => Command::SetAutoDetect(state == Toggle::On),
            LineCommand::Sort { column } => Command::Sort(column),
            LineCommand::Open { target } => {
                let rows = self.session.snapshot().await.rows;
                Command::OpenEvent(resolve_event(&target, &rows))
            }
            LineCommand::Venue => {
                let panels = self.session.snapshot().await.panels;
                let venue = panels.venue_trigger.or_else(|| {
                    panels
                        .event
                        .and_then(|event| event.venue_name)
                });
                match venue {
                    Some(venue) => Command::OpenVenue(venue),
                    None => return Outcome::Render("No venue for the open event.".to_string()),
                }
            }
            LineCommand::CloseEvent => Command::CloseEvent,
            LineCommand::CloseVenue => Command::CloseVenue,
            LineCommand::Clear => Command::Clear,
        };

        let name = command.name();
        if let Err(err) = self.session.dispatch(command).await {
            debug!(command = name, error = %err, "cli: command did not complete");
        }
        Outcome::Render(self.screen().await)
    }

    async fn screen(&self) -> String {
        let snapshot = self.session.snapshot().await;
        let notices = self.board.visible().await;
        render::screen(&snapshot, &notices)
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
