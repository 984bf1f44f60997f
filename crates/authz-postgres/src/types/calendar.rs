//! Calendar-day helpers anchored to the institution time zone.
//!
//! Dates such as `deactivation_date` are compared against "today" as it is
//! observed in Estonia, regardless of the server's own time zone.

use std::sync::LazyLock;

use jiff::Timestamp;
use jiff::civil::Date;
use jiff::tz::{self, TimeZone};

/// IANA name of the time zone used for calendar-day comparisons.
pub const TALLINN_TIME_ZONE: &str = "Europe/Tallinn";

static TALLINN: LazyLock<TimeZone> = LazyLock::new(|| {
    TimeZone::get(TALLINN_TIME_ZONE).unwrap_or_else(|error| {
        tracing::error!(
            target: crate::TRACING_TARGET_DOMAIN,
            error = %error,
            "Time zone database lookup failed, falling back to a fixed +02:00 offset"
        );
        TimeZone::fixed(tz::offset(2))
    })
});

/// Returns the `Europe/Tallinn` time zone.
#[inline]
pub fn tallinn() -> &'static TimeZone {
    &TALLINN
}

/// Returns the calendar date of `instant` in `Europe/Tallinn`.
#[inline]
pub fn local_date(instant: Timestamp) -> Date {
    instant.to_zoned(tallinn().clone()).date()
}

/// Returns today's calendar date in `Europe/Tallinn`.
#[inline]
pub fn local_today() -> Date {
    local_date(Timestamp::now())
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;

    #[test]
    fn late_evening_utc_is_next_day_in_winter() {
        let instant: Timestamp = "2024-03-10T22:30:00Z".parse().unwrap();
        assert_eq!(local_date(instant), date(2024, 3, 11));
    }

    #[test]
    fn summer_offset_is_three_hours() {
        let before: Timestamp = "2024-07-01T20:59:59Z".parse().unwrap();
        let after: Timestamp = "2024-07-01T21:00:00Z".parse().unwrap();
        assert_eq!(local_date(before), date(2024, 7, 1));
        assert_eq!(local_date(after), date(2024, 7, 2));
    }
}
