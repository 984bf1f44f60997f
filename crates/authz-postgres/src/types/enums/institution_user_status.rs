//! Institution user status derived from archival and deactivation columns.

use jiff::Timestamp;
use jiff::civil::Date;
#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::types::local_date;

/// Lifecycle status of an institution membership.
///
/// Status is never stored. It follows from `archived_at` and
/// `deactivation_date` evaluated against the current day in `Europe/Tallinn`,
/// with precedence `Archived > Deactivated > Active`.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum InstitutionUserStatus {
    /// Membership is in effect
    #[serde(rename = "ACTIVE")]
    #[default]
    Active,

    /// Deactivation date has been reached
    #[serde(rename = "DEACTIVATED")]
    Deactivated,

    /// Membership has been archived and is read-only
    #[serde(rename = "ARCHIVED")]
    Archived,
}

impl InstitutionUserStatus {
    /// Derives the status of a membership at the instant `now`.
    pub fn derive(
        archived_at: Option<Timestamp>,
        deactivation_date: Option<Date>,
        now: Timestamp,
    ) -> Self {
        if archived_at.is_some() {
            return Self::Archived;
        }

        match deactivation_date {
            Some(date) if date <= local_date(now) => Self::Deactivated,
            _ => Self::Active,
        }
    }

    /// Returns whether the membership is currently in effect.
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, InstitutionUserStatus::Active)
    }

    /// Returns whether the membership can no longer be modified.
    #[inline]
    pub fn is_read_only(self) -> bool {
        matches!(self, InstitutionUserStatus::Archived)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    fn ts(value: &str) -> Timestamp {
        value.parse().unwrap()
    }

    #[test]
    fn archived_takes_precedence() {
        let now = ts("2024-05-01T10:00:00Z");
        let status = InstitutionUserStatus::derive(Some(now), Some(date(2024, 1, 1)), now);
        assert_eq!(status, InstitutionUserStatus::Archived);
    }

    #[test]
    fn future_deactivation_is_still_active() {
        let now = ts("2024-05-01T10:00:00Z");
        let status = InstitutionUserStatus::derive(None, Some(date(2024, 5, 2)), now);
        assert_eq!(status, InstitutionUserStatus::Active);
        assert_eq!(
            InstitutionUserStatus::derive(None, None, now),
            InstitutionUserStatus::Active
        );
    }

    #[test]
    fn deactivation_uses_tallinn_day() {
        // 22:30 UTC on March 10 is already March 11 in Tallinn.
        let now = ts("2024-03-10T22:30:00Z");
        let status = InstitutionUserStatus::derive(None, Some(date(2024, 3, 11)), now);
        assert_eq!(status, InstitutionUserStatus::Deactivated);

        let earlier = ts("2024-03-10T21:59:00Z");
        let status = InstitutionUserStatus::derive(None, Some(date(2024, 3, 11)), earlier);
        assert_eq!(status, InstitutionUserStatus::Active);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(
            "deactivated".parse::<InstitutionUserStatus>().ok(),
            Some(InstitutionUserStatus::Deactivated)
        );
        assert_eq!(InstitutionUserStatus::Archived.to_string(), "ARCHIVED");
    }
}
