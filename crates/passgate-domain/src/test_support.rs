use crate::checks::Options;
use crate::clock::{Clock, FixedClock};
use serde_json::Value;
use std::sync::Arc;
use time::macros::{date, offset};
use time::{Date, OffsetDateTime, Time};

pub const IMAGE: &str =
    "app:1@sha256:aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

/// Monday 2026-10-19.
pub const MONDAY: Date = date!(2026 - 10 - 19);

pub fn options(v: Value) -> Options {
    v.as_object().cloned().expect("options must be a JSON object")
}

pub fn instant(date: Date, hour: u8, minute: u8, second: u8) -> OffsetDateTime {
    let time = Time::from_hms(hour, minute, second).expect("valid time");
    date.with_time(time).assume_offset(offset!(+2))
}

pub fn clock_at(date: Date, hour: u8, minute: u8, second: u8) -> Arc<dyn Clock> {
    Arc::new(FixedClock(instant(date, hour, minute, second)))
}

