//! Aggregate: scalar and grouped statistics over a batch of records.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use serde::Serialize;

use crate::parser::TrafficRecord;
use super::tally::{RankedEntry, Tally};

pub const DEFAULT_TOP_N: usize = 10;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;
const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Read-only statistics snapshot for one batch of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateResult {
    pub total_records: usize,

    /// Sum of every reported byte count (absent counts contribute nothing)
    pub total_bytes: u64,
    pub total_mb: f64,
    pub total_gb: f64,
    pub avg_bytes_per_record: Option<f64>,
    /// Whether any record in the batch reported a byte count
    pub has_byte_counts: bool,

    pub unique_sources: usize,
    pub unique_destinations: usize,

    pub top_sources: Vec<RankedEntry<String>>,
    pub top_sources_by_traffic: Vec<RankedEntry<String>>,
    pub top_destinations: Vec<RankedEntry<String>>,
    pub top_destinations_by_traffic: Vec<RankedEntry<String>>,

    pub top_destination_ports: Vec<RankedEntry<u32>>,
    pub top_ports_by_traffic: Vec<RankedEntry<u32>>,

    pub protocol_distribution: Vec<RankedEntry<String>>,

    pub timespan: Option<TimeSpan>,

    /// Bytes per hour of day, or record counts when the batch has no byte counts
    pub traffic_by_hour: Vec<HourBucket>,
    pub connections_by_hour: Vec<HourBucket>,
    /// Bytes per weekday (Sunday first), same fallback as `traffic_by_hour`
    pub traffic_by_day: Vec<DayBucket>,
    pub connections_by_day: Vec<DayBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourBucket {
    pub hour: u32,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    pub day: &'static str,
    pub value: u64,
}

/// Compute statistics with the default top-N size.
pub fn aggregate_default(records: &[TrafficRecord]) -> AggregateResult {
    aggregate(records, DEFAULT_TOP_N)
}

/// Compute every statistic in a single pass over `records`.
pub fn aggregate(records: &[TrafficRecord], top_n: usize) -> AggregateResult {
    let mut total_bytes: u64 = 0;
    let mut has_byte_counts = false;

    let mut unique_sources: HashSet<&str> = HashSet::new();
    let mut unique_destinations: HashSet<&str> = HashSet::new();

    let mut sources = Tally::new();
    let mut sources_by_traffic = Tally::new();
    let mut destinations = Tally::new();
    let mut destinations_by_traffic = Tally::new();
    let mut ports = Tally::new();
    let mut ports_by_traffic = Tally::new();
    let mut protocols = Tally::new();

    let mut hour_counts = [0u64; 24];
    let mut hour_bytes = [0u64; 24];
    let mut day_counts = [0u64; 7];
    let mut day_bytes = [0u64; 7];

    let mut start: Option<DateTime<Utc>> = None;
    let mut end: Option<DateTime<Utc>> = None;

    for record in records {
        if let Some(bytes) = record.bytes {
            has_byte_counts = true;
            total_bytes = total_bytes.saturating_add(bytes);
        }

        if let Some(ip) = record.src_ip.as_deref() {
            unique_sources.insert(ip);
            sources.add(ip.to_string(), 1);
            if let Some(bytes) = record.bytes {
                sources_by_traffic.add(ip.to_string(), bytes);
            }
        }

        if let Some(ip) = record.dst_ip.as_deref() {
            unique_destinations.insert(ip);
            destinations.add(ip.to_string(), 1);
            if let Some(bytes) = record.bytes {
                destinations_by_traffic.add(ip.to_string(), bytes);
            }
        }

        if let Some(port) = record.dst_port {
            ports.add(port, 1);
            if let Some(bytes) = record.bytes {
                ports_by_traffic.add(port, bytes);
            }
        }

        if let Some(protocol) = record.protocol.as_deref() {
            protocols.add(protocol.to_string(), 1);
        }

        let ts = record.timestamp;
        start = Some(start.map_or(ts, |s| s.min(ts)));
        end = Some(end.map_or(ts, |e| e.max(ts)));

        let hour = ts.hour() as usize;
        let day = ts.weekday().num_days_from_sunday() as usize;
        let bytes = record.bytes.unwrap_or(0);
        hour_counts[hour] += 1;
        hour_bytes[hour] = hour_bytes[hour].saturating_add(bytes);
        day_counts[day] += 1;
        day_bytes[day] = day_bytes[day].saturating_add(bytes);
    }

    let timespan = match (start, end) {
        (Some(start), Some(end)) => Some(TimeSpan {
            start,
            end,
            duration_hours: (end - start).num_milliseconds() as f64 / 3_600_000.0,
        }),
        _ => None,
    };

    let traffic_hours = if has_byte_counts { &hour_bytes } else { &hour_counts };
    let traffic_days = if has_byte_counts { &day_bytes } else { &day_counts };

    let avg_bytes_per_record = if has_byte_counts && !records.is_empty() {
        Some(total_bytes as f64 / records.len() as f64)
    } else {
        None
    };

    AggregateResult {
        total_records: records.len(),
        total_bytes,
        total_mb: total_bytes as f64 / BYTES_PER_MB,
        total_gb: total_bytes as f64 / BYTES_PER_GB,
        avg_bytes_per_record,
        has_byte_counts,
        unique_sources: unique_sources.len(),
        unique_destinations: unique_destinations.len(),
        top_sources: sources.top(top_n),
        top_sources_by_traffic: sources_by_traffic.top(top_n),
        top_destinations: destinations.top(top_n),
        top_destinations_by_traffic: destinations_by_traffic.top(top_n),
        top_destination_ports: ports.top(top_n),
        top_ports_by_traffic: ports_by_traffic.top(top_n),
        protocol_distribution: protocols.ranked(),
        timespan,
        traffic_by_hour: hour_buckets(&hour_counts, traffic_hours),
        connections_by_hour: hour_buckets(&hour_counts, &hour_counts),
        traffic_by_day: day_buckets(&day_counts, traffic_days),
        connections_by_day: day_buckets(&day_counts, &day_counts),
    }
}

/// Buckets for hours that occur at least once, ascending
fn hour_buckets(counts: &[u64; 24], values: &[u64; 24]) -> Vec<HourBucket> {
    (0..24)
        .filter(|&h| counts[h] > 0)
        .map(|h| HourBucket { hour: h as u32, value: values[h] })
        .collect()
}

/// Buckets for weekdays that occur at least once, Sunday first
fn day_buckets(counts: &[u64; 7], values: &[u64; 7]) -> Vec<DayBucket> {
    const WEEK: [Weekday; 7] = [
        Weekday::Sun, Weekday::Mon, Weekday::Tue, Weekday::Wed,
        Weekday::Thu, Weekday::Fri, Weekday::Sat,
    ];

    WEEK.iter()
        .enumerate()
        .filter(|(i, _)| counts[*i] > 0)
        .map(|(i, day)| DayBucket { day: weekday_name(*day), value: values[i] })
        .collect()
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}
