use agenda_domain::Event;
use agenda_infra::Config;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// `page` starts at 1. Both fall back to the first page of the
/// configured default size when missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventsPage {
    pub events: Vec<Event>,
    pub has_next_page: bool,
}

#[derive(Debug, PartialEq)]
pub enum PaginationError {
    InvalidPage,
    InvalidLimit,
}

/// Rows to skip and to return for `pagination`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageWindow {
    pub skip: usize,
    pub limit: usize,
}

impl PageWindow {
    pub fn create(pagination: &Pagination, config: &Config) -> Result<Self, PaginationError> {
        let page = pagination.page.unwrap_or(1);
        if page == 0 {
            return Err(PaginationError::InvalidPage);
        }
        let limit = match pagination.limit {
            Some(0) => return Err(PaginationError::InvalidLimit),
            Some(limit) => limit.min(config.events_page_limit),
            None => config.default_events_page_size,
        };

        // Stores address rows with a signed 64 bit offset
        let skip = (page - 1)
            .checked_mul(limit)
            .filter(|skip| i64::try_from(*skip).is_ok())
            .ok_or(PaginationError::InvalidPage)?;

        Ok(Self { skip, limit })
    }

    /// One extra row tells whether another page follows
    pub fn fetch_limit(&self) -> usize {
        self.limit.saturating_add(1)
    }

    pub fn page_of(&self, mut events: Vec<Event>) -> EventsPage {
        let has_next_page = events.len() > self.limit;
        events.truncate(self.limit);
        EventsPage {
            events,
            has_next_page,
        }
    }
}
