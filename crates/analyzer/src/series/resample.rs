//! Resample: group records into hourly, daily or weekly buckets.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::parser::TrafficRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Hourly,
    Daily,
    Weekly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Hourly => "hourly",
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown granularity: {0} (expected hourly, daily or weekly)")]
pub struct UnknownGranularity(pub String);

impl FromStr for Granularity {
    type Err = UnknownGranularity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hourly" | "hour" | "h" => Ok(Granularity::Hourly),
            "daily" | "day" | "d" => Ok(Granularity::Daily),
            "weekly" | "week" | "w" => Ok(Granularity::Weekly),
            _ => Err(UnknownGranularity(s.to_string())),
        }
    }
}

/// What a bucket accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMetric {
    /// Sum of reported byte counts (records without one add nothing)
    Bytes,
    /// Number of records
    Count,
}

/// Identity of the bucket a timestamp falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BucketKey {
    Hour { year: i32, month: u32, day: u32, hour: u32 },
    Day { year: i32, month: u32, day: u32 },
    /// Sunday-based week of the year; week 1 contains January 1st
    Week { year: i32, week: u32 },
}

impl BucketKey {
    pub fn of(ts: DateTime<Utc>, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Hourly => BucketKey::Hour {
                year: ts.year(),
                month: ts.month(),
                day: ts.day(),
                hour: ts.hour(),
            },
            Granularity::Daily => BucketKey::Day {
                year: ts.year(),
                month: ts.month(),
                day: ts.day(),
            },
            Granularity::Weekly => BucketKey::Week {
                year: ts.year(),
                week: week_of_year(ts.date_naive()),
            },
        }
    }

    /// The instant at which this bucket opens.
    ///
    /// Weekly buckets open on the Sunday that starts the computed week, which
    /// for week 1 may fall in the previous December.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        let naive = match *self {
            BucketKey::Hour { year, month, day, hour } => {
                NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, 0, 0)?
            }
            BucketKey::Day { year, month, day } => {
                NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)?
            }
            BucketKey::Week { year, week } => {
                let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
                let offset = jan1.weekday().num_days_from_sunday() as i64;
                let sunday = jan1 - Duration::days(offset);
                (sunday + Duration::days((week as i64 - 1) * 7)).and_hms_opt(0, 0, 0)?
            }
        };
        Some(Utc.from_utc_datetime(&naive))
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketKey::Hour { year, month, day, hour } => write!(f, "{}-{}-{}-{}", year, month, day, hour),
            BucketKey::Day { year, month, day } => write!(f, "{}-{}-{}", year, month, day),
            BucketKey::Week { year, week } => write!(f, "{}-W{}", year, week),
        }
    }
}

/// `ceil((day_of_year + jan1_weekday + 1) / 7)`, with `day_of_year` counted
/// from 0 and weekdays from Sunday = 0.
///
/// Not ISO-8601: weeks start on Sunday and week 1 is whatever week holds
/// January 1st.
pub fn week_of_year(date: NaiveDate) -> u32 {
    let jan1_weekday = NaiveDate::from_ymd_opt(date.year(), 1, 1)
        .map(|jan1| jan1.weekday().num_days_from_sunday())
        .unwrap_or(0);
    (date.ordinal0() + jan1_weekday + 1).div_ceil(7)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSeriesPoint {
    /// Bucket start
    pub timestamp: DateTime<Utc>,
    pub value: u64,
}

/// Resample records into one point per non-empty bucket, ascending by bucket start.
///
/// Empty buckets are not emitted. Buckets are merged by their start instant,
/// so two week keys that straddle a year boundary collapse into one point.
pub fn resample(records: &[TrafficRecord], granularity: Granularity, metric: ValueMetric) -> Vec<TimeSeriesPoint> {
    let mut buckets: BTreeMap<DateTime<Utc>, u64> = BTreeMap::new();

    for record in records {
        let key = BucketKey::of(record.timestamp, granularity);
        let Some(start) = key.start() else {
            debug!("Bucket {} has no representable start, skipping record", key);
            continue;
        };

        let amount = match metric {
            ValueMetric::Bytes => record.bytes.unwrap_or(0),
            ValueMetric::Count => 1,
        };
        let slot = buckets.entry(start).or_insert(0);
        *slot = slot.saturating_add(amount);
    }

    buckets
        .into_iter()
        .map(|(timestamp, value)| TimeSeriesPoint { timestamp, value })
        .collect()
}
