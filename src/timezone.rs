use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use time_tz::{OffsetDateTimeExt, OffsetResult, PrimitiveDateTimeExt, Tz};

use crate::Error;

/// Look up `canonical_timezone`, e.g. "Pacific/Auckland".
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if the name is not a known timezone.
pub fn get_timezone(canonical_timezone: &str) -> Result<&'static Tz, Error> {
    time_tz::timezones::get_by_name(canonical_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", canonical_timezone);
        Error::InvalidTimezoneError(canonical_timezone.to_owned())
    })
}

/// The calendar date of `timestamp` in `timezone`.
pub fn local_date(timestamp: OffsetDateTime, timezone: &Tz) -> Date {
    timestamp.to_timezone(timezone).date()
}

/// The first instant of `date` in `timezone`, using the offset in force on
/// that date.
pub fn start_of_day(date: Date, timezone: &Tz) -> OffsetDateTime {
    let (earliest, _) = assume_local(date.with_time(Time::MIDNIGHT), timezone);

    earliest
}

/// The last instant of `date` in `timezone`, using the offset in force on
/// that date.
pub fn end_of_day(date: Date, timezone: &Tz) -> OffsetDateTime {
    let last_instant = Time::from_hms_nano(23, 59, 59, 999_999_999).unwrap_or(Time::MIDNIGHT);
    let (_, latest) = assume_local(date.with_time(last_instant), timezone);

    latest
}

/// The earliest and latest instants a local wall-clock time can refer to.
///
/// They differ when clocks go back. A time skipped when clocks go forward
/// takes the offset in force at the same wall-clock time in UTC.
fn assume_local(local: PrimitiveDateTime, timezone: &Tz) -> (OffsetDateTime, OffsetDateTime) {
    match local.assume_timezone(timezone) {
        OffsetResult::Some(instant) => (instant, instant),
        OffsetResult::Ambiguous(first, second) => (first.min(second), first.max(second)),
        OffsetResult::None => {
            let instant = local.assume_timezone_utc(timezone);
            (instant, instant)
        }
    }
}
