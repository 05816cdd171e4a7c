//! Place selection and replace-on-fetch bookkeeping.
//!
//! A session hands out a [`FetchTicket`] per selection. Only the first result
//! for the latest ticket is accepted; anything else is dropped.

use crate::{error::FetchError, model::ForecastResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    place: String,
}

impl FetchTicket {
    pub fn place(&self) -> &str {
        &self.place
    }
}

/// What [`ForecastSession::complete`] did with a result.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Updated,
    /// The fetch failed; the previous response, if any, is still held.
    Failed,
    /// The ticket belongs to a selection that has since changed, or was
    /// already completed.
    Stale,
}

#[derive(Debug, Default)]
pub struct ForecastSession {
    generation: u64,
    place: Option<String>,
    pending: bool,
    response: Option<ForecastResponse>,
    last_error: Option<FetchError>,
}

impl ForecastSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to `place` and start a new fetch cycle.
    pub fn select(&mut self, place: impl Into<String>) -> FetchTicket {
        let place = place.into();
        self.generation += 1;
        self.place = Some(place.clone());
        self.pending = true;
        self.last_error = None;

        FetchTicket { generation: self.generation, place }
    }

    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        result: Result<ForecastResponse, FetchError>,
    ) -> Outcome {
        if ticket.generation != self.generation || !self.pending {
            tracing::warn!(
                place = %ticket.place,
                current = ?self.place,
                "ignoring forecast result for a selection that is no longer pending"
            );
            return Outcome::Stale;
        }

        self.pending = false;
        match result {
            Ok(response) => {
                self.response = Some(response);
                Outcome::Updated
            }
            Err(err) => {
                tracing::warn!(place = %ticket.place, error = %err, "forecast fetch failed");
                self.last_error = Some(err);
                Outcome::Failed
            }
        }
    }

    pub fn selected_place(&self) -> Option<&str> {
        self.place.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending
    }

    /// The response for the current selection. `None` while a fetch is outstanding.
    pub fn current(&self) -> Option<&ForecastResponse> {
        if self.pending { None } else { self.response.as_ref() }
    }

    /// Most recent successful response regardless of loading state.
    pub fn last_known(&self) -> Option<&ForecastResponse> {
        self.response.as_ref()
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    pub fn clear(&mut self) {
        self.response = None;
        self.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CityInfo;
    use chrono::{FixedOffset, TimeZone, Utc};

    fn response(name: &str) -> ForecastResponse {
        ForecastResponse {
            samples: Vec::new(),
            city: CityInfo {
                name: name.into(),
                country: String::new(),
                sunrise: Utc.timestamp_opt(0, 0).unwrap(),
                sunset: Utc.timestamp_opt(0, 0).unwrap(),
                timezone: FixedOffset::east_opt(0).unwrap(),
            },
        }
    }

    #[test]
    fn loading_hides_previous_data() {
        let mut session = ForecastSession::new();
        let first = session.select("Oakland");
        assert!(session.is_loading());
        assert_eq!(session.complete(&first, Ok(response("Oakland"))), Outcome::Updated);
        assert_eq!(session.current().unwrap().city.name, "Oakland");

        session.select("Berlin");
        assert!(session.current().is_none());
        assert_eq!(session.last_known().unwrap().city.name, "Oakland");
    }

    #[test]
    fn late_result_for_old_place_is_ignored() {
        let mut session = ForecastSession::new();
        let old = session.select("Oakland");
        let new = session.select("Berlin");

        assert_eq!(session.complete(&new, Ok(response("Berlin"))), Outcome::Updated);
        assert_eq!(session.complete(&old, Ok(response("Oakland"))), Outcome::Stale);
        assert_eq!(session.current().unwrap().city.name, "Berlin");
        assert_eq!(session.selected_place(), Some("Berlin"));
    }

    #[test]
    fn failure_keeps_previous_response() {
        let mut session = ForecastSession::new();
        let first = session.select("Oakland");
        session.complete(&first, Ok(response("Oakland")));

        let second = session.select("Nowhere");
        let outcome = session.complete(
            &second,
            Err(FetchError::Status { status: 404, message: "city not found".into() }),
        );

        assert_eq!(outcome, Outcome::Failed);
        assert!(!session.is_loading());
        assert_eq!(session.current().unwrap().city.name, "Oakland");
        assert!(session.last_error().unwrap().is_unknown_place());

        session.clear();
        assert!(session.current().is_none());
    }

    #[test]
    fn stale_error_leaves_last_error_untouched() {
        let mut session = ForecastSession::new();
        let old = session.select("Nowhere");
        let current = session.select("Oakland");
        session.complete(&current, Err(FetchError::EmptyPlace));

        let outcome = session.complete(
            &old,
            Err(FetchError::Status { status: 404, message: "city not found".into() }),
        );

        assert_eq!(outcome, Outcome::Stale);
        assert!(matches!(session.last_error(), Some(FetchError::EmptyPlace)));
    }

    #[test]
    fn ticket_completes_only_once() {
        let mut session = ForecastSession::new();
        let ticket = session.select("Oakland");
        assert_eq!(session.complete(&ticket, Ok(response("Oakland"))), Outcome::Updated);

        assert_eq!(session.complete(&ticket, Ok(response("Elsewhere"))), Outcome::Stale);
        assert_eq!(
            session.complete(&ticket, Err(FetchError::EmptyPlace)),
            Outcome::Stale
        );
        assert_eq!(session.current().unwrap().city.name, "Oakland");
        assert!(session.last_error().is_none());
    }
}
