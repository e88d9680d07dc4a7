//! Interpretation of the `GET /todos` query string.

use chrono::TimeDelta;

use crate::error::CoreError;
use crate::types::NaiveTimestamp;

/// Store-level filter for listing todos. Both conditions combine with AND.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoFilter {
    /// Only todos whose `completed` flag equals this value.
    pub completed: Option<bool>,
    /// Only todos with a deadline at or before this instant. Todos without a
    /// deadline never match.
    pub deadline_on_or_before: Option<NaiveTimestamp>,
}

impl TodoFilter {
    /// Build a filter from the raw `completed` and `window` query values.
    ///
    /// `now` is the server's current UTC time; the window horizon is
    /// `now + window days`.
    pub fn from_query(
        completed: Option<&str>,
        window: Option<&str>,
        now: NaiveTimestamp,
    ) -> Result<Self, CoreError> {
        let deadline_on_or_before = window
            .map(|raw| parse_window(raw).and_then(|days| deadline_horizon(now, days)))
            .transpose()?;

        Ok(Self {
            completed: completed.map(completed_flag),
            deadline_on_or_before,
        })
    }

    /// Whether a todo with these attributes passes the filter.
    pub fn matches(&self, completed: bool, deadline_at: Option<NaiveTimestamp>) -> bool {
        if self.completed.is_some_and(|want| want != completed) {
            return false;
        }
        match self.deadline_on_or_before {
            Some(horizon) => deadline_at.is_some_and(|deadline| deadline <= horizon),
            None => true,
        }
    }
}

/// Only a case-insensitive `"true"` selects completed todos. Every other
/// value, including `"1"` and `"yes"`, selects incomplete ones.
pub fn completed_flag(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true")
}

/// Parse the `window` parameter as a signed number of days.
pub fn parse_window(raw: &str) -> Result<i64, CoreError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| CoreError::Validation(format!("invalid window: {raw}")))
}

/// `now + days`, or a validation error when the result is not representable.
pub fn deadline_horizon(now: NaiveTimestamp, days: i64) -> Result<NaiveTimestamp, CoreError> {
    TimeDelta::try_days(days)
        .and_then(|delta| now.checked_add_signed(delta))
        .ok_or_else(|| CoreError::Validation(format!("window out of range: {days}")))
}
