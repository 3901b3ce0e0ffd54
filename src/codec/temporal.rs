//! Wall-clock <-> epoch conversion under the configured zone
//!
//! DATE and DATETIME columns hold wall-clock values; documents hold instants.
//! Non-existent local times (spring-forward gaps) resolve one hour later,
//! ambiguous ones (fall-back overlaps) resolve to the earlier instant.

use chrono::{Duration, FixedOffset, Local, LocalResult, NaiveDateTime, TimeZone, Utc};

use crate::config::TimeZoneSetting;

/// Epoch seconds of a wall-clock time in `zone`
pub fn local_to_epoch(zone: TimeZoneSetting, wall: NaiveDateTime) -> i64 {
    match zone {
        TimeZoneSetting::Local => resolve(&Local, wall),
        TimeZoneSetting::Utc => resolve(&Utc, wall),
        TimeZoneSetting::OffsetSeconds(offset) => match FixedOffset::east_opt(offset) {
            Some(tz) => resolve(&tz, wall),
            None => resolve(&Utc, wall),
        },
    }
}

/// Wall-clock time in `zone` of an epoch second, `None` when out of range
pub fn epoch_to_local(zone: TimeZoneSetting, seconds: i64) -> Option<NaiveDateTime> {
    match zone {
        TimeZoneSetting::Local => wall_clock(&Local, seconds),
        TimeZoneSetting::Utc => wall_clock(&Utc, seconds),
        TimeZoneSetting::OffsetSeconds(offset) => match FixedOffset::east_opt(offset) {
            Some(tz) => wall_clock(&tz, seconds),
            None => wall_clock(&Utc, seconds),
        },
    }
}

fn resolve<Tz: TimeZone>(tz: &Tz, wall: NaiveDateTime) -> i64 {
    match tz.from_local_datetime(&wall) {
        LocalResult::Single(t) => t.timestamp(),
        LocalResult::Ambiguous(earliest, _) => earliest.timestamp(),
        LocalResult::None => wall
            .checked_add_signed(Duration::hours(1))
            .and_then(|shifted| tz.from_local_datetime(&shifted).earliest())
            .map(|t| t.timestamp())
            .unwrap_or_else(|| Utc.from_utc_datetime(&wall).timestamp()),
    }
}

fn wall_clock<Tz: TimeZone>(tz: &Tz, seconds: i64) -> Option<NaiveDateTime> {
    tz.timestamp_opt(seconds, 0)
        .single()
        .map(|t| t.naive_local())
}
