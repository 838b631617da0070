//! Calendar date by which a task expects completion or review.

use super::TaskDomainError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Feedback date at day granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackDate(NaiveDate);

impl FeedbackDate {
    /// Wraps an already validated calendar date.
    #[must_use]
    pub const fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parses a caller-supplied date.
    ///
    /// Accepts `YYYY-MM-DD`, or an RFC 3339 timestamp which is reduced to
    /// its UTC calendar date.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidFeedbackDate`] when the value is
    /// empty or matches neither format.
    pub fn parse(value: &str) -> Result<Self, TaskDomainError> {
        let trimmed = value.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
            return Ok(Self(date));
        }
        DateTime::parse_from_rfc3339(trimmed)
            .map(|timestamp| Self(timestamp.with_timezone(&Utc).date_naive()))
            .map_err(|_| TaskDomainError::InvalidFeedbackDate(value.to_owned()))
    }

    /// Returns the calendar date.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for FeedbackDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}
