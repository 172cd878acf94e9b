use crate::checks::options::{
    ABORT_ON_FAIL, MFA_ON_FAIL, Options, bool_option, int_list_option, int_option, str_option,
};
use crate::clock::Clock;
use crate::whitelist::Whitelist;
use passgate_types::{CheckResult, Stage, ids};
use std::sync::Arc;
use time::{Date, Duration, Month, OffsetDateTime, Time};

const DEFAULT_TOLERANCE_SECONDS: i64 = 300;
/// One leap year.
const MAX_TOLERANCE_SECONDS: i64 = 366 * 24 * 60 * 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scale {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Scale {
    fn parse(v: &str) -> Self {
        match v {
            "weekly" => Scale::Weekly,
            "monthly" => Scale::Monthly,
            "yearly" => Scale::Yearly,
            _ => Scale::Daily,
        }
    }
}

/// Restricts a job to a time-of-day window and a set of allowed days.
///
/// Options:
/// - `time`: window start as `HH:MM:SS` (defaults to the construction instant)
/// - `tolerance`: window length in seconds, at most one leap year (default 300)
/// - `scale`: `daily` | `weekly` | `monthly` | `yearly` (default `daily`)
/// - `intervals`: allowed weekday (Sunday = 0), day of month, or day of year (default `[0]`)
/// - `abortOnFail` (default `true`), `mfaOnFail` (default `false`)
///
/// A start field out of range falls back to the current one. A tolerance that is negative
/// or longer than a leap year falls back to 300. When neither fail flag is set and both
/// windows miss, the two failure messages are joined with `; `.
#[derive(Clone, Debug)]
pub struct DateTimeCheck {
    pub(crate) job_name: String,
    pub(crate) scale: Scale,
    pub(crate) intervals: Vec<i64>,
    pub(crate) tolerance: i64,
    pub(crate) abort_on_fail: bool,
    pub(crate) mfa_on_fail: bool,
    pub(crate) hours: i64,
    pub(crate) minutes: i64,
    pub(crate) seconds: i64,
    clock: Arc<dyn Clock>,
}

impl DateTimeCheck {
    pub fn new(options: &Options, job_name: &str, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        let (hours, minutes, seconds) = parse_start(str_option(options, "time"), now);

        Self {
            job_name: job_name.to_string(),
            scale: str_option(options, "scale")
                .map(Scale::parse)
                .unwrap_or(Scale::Daily),
            intervals: int_list_option(options, "intervals").unwrap_or_else(|| vec![0]),
            tolerance: int_option(options, "tolerance")
                .filter(|t| (0..=MAX_TOLERANCE_SECONDS).contains(t))
                .unwrap_or(DEFAULT_TOLERANCE_SECONDS),
            abort_on_fail: bool_option(options, ABORT_ON_FAIL, true),
            mfa_on_fail: bool_option(options, MFA_ON_FAIL, false),
            hours,
            minutes,
            seconds,
            clock,
        }
    }

    pub fn evaluate(&self, _whitelist: &Whitelist) -> CheckResult {
        let now = self.clock.now();
        let mut result = CheckResult::new(ids::NAME_DATE_TIME, ids::CHECK_VERSION);

        // The time window is checked first; the first failing window that carries a
        // failure policy decides the result.
        if !self.within_time(now) {
            result.details = ids::DETAILS_TIME_NOT_ALLOWED.to_string();
            if self.fail(&mut result) {
                return result;
            }
        }

        if !self.on_allowed_day(now.date()) {
            if !result.details.is_empty() {
                result.details.push_str("; ");
            }
            result.details.push_str(ids::DETAILS_DATE_NOT_ALLOWED);
            if self.fail(&mut result) {
                return result;
            }
        }

        if result.details.is_empty() {
            result.details = ids::DETAILS_SUCCESS.to_string();
        }
        result
    }

    pub fn applies_to_stage(&self, _stage: Stage) -> bool {
        true
    }

    fn fail(&self, result: &mut CheckResult) -> bool {
        if self.abort_on_fail {
            result.abort = true;
        } else if self.mfa_on_fail {
            result.mfa_required = true;
        }
        result.abort || result.mfa_required
    }

    /// `now` (to the second) lies within `[start, start + tolerance]`, both ends inclusive.
    ///
    /// A start past the last representable date is never reached; an end past it never
    /// closes the window.
    fn within_time(&self, now: OffsetDateTime) -> bool {
        let now = now.replace_nanosecond(0).unwrap_or(now);
        let midnight = now.replace_time(Time::MIDNIGHT);

        let Some(start) = midnight.checked_add(hms(self.hours, self.minutes, self.seconds)) else {
            return false;
        };

        let end = window_end(self.hours, self.minutes, self.seconds, self.tolerance);
        let end = midnight
            .checked_add(Duration::days(end.days))
            .and_then(|d| d.checked_add(hms(end.hours, end.minutes, end.seconds)));

        start <= now && end.is_none_or(|end| now <= end)
    }

    fn on_allowed_day(&self, today: Date) -> bool {
        self.intervals.iter().any(|&interval| match self.scale {
            Scale::Daily => true,
            Scale::Weekly => i64::from(today.weekday().number_days_from_sunday()) == interval,
            Scale::Monthly => i64::from(today.day()) == interval,
            Scale::Yearly => day_of_year(today) == interval,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct WindowEnd {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

/// Add `tolerance` seconds to a time of day, carrying seconds into minutes, minutes
/// into hours and hours into days.
pub(crate) fn window_end(hours: i64, minutes: i64, seconds: i64, tolerance: i64) -> WindowEnd {
    let total_seconds = seconds.saturating_add(tolerance);
    let total_minutes = minutes.saturating_add(total_seconds / 60);
    let total_hours = hours.saturating_add(total_minutes / 60);

    WindowEnd {
        days: total_hours / 24,
        hours: total_hours % 24,
        minutes: total_minutes % 60,
        seconds: total_seconds % 60,
    }
}

/// 1-indexed day of the year: lengths of the completed months plus the day of month.
pub(crate) fn day_of_year(date: Date) -> i64 {
    let mut total = 0;
    let mut month = Month::January;
    while month != date.month() {
        total += month_length(date.year(), month);
        month = month.next();
    }
    total + i64::from(date.day())
}

fn month_length(year: i32, month: Month) -> i64 {
    match month {
        Month::February if is_leap_year(year) => 29,
        Month::February => 28,
        Month::April | Month::June | Month::September | Month::November => 30,
        _ => 31,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn hms(hours: i64, minutes: i64, seconds: i64) -> Duration {
    Duration::hours(hours) + Duration::minutes(minutes) + Duration::seconds(seconds)
}

/// Parse `HH:MM:SS`. A wrong number of fields falls back to `now` entirely; a single bad
/// or out-of-range field falls back to the matching component of `now`.
fn parse_start(value: Option<&str>, now: OffsetDateTime) -> (i64, i64, i64) {
    let current = (
        i64::from(now.hour()),
        i64::from(now.minute()),
        i64::from(now.second()),
    );

    let Some(value) = value else {
        return current;
    };
    let parts: Vec<&str> = value.split(':').collect();
    let [h, m, s] = parts.as_slice() else {
        return current;
    };

    let field = |raw: &str, bound: u32, fallback: i64| {
        raw.trim()
            .parse::<u32>()
            .ok()
            .filter(|v| *v < bound)
            .map(i64::from)
            .unwrap_or(fallback)
    };
    (
        field(*h, 24, current.0),
        field(*m, 60, current.1),
        field(*s, 60, current.2),
    )
}
