//! Heatmap: fixed day-of-week × hour-of-day grid.

use chrono::{Datelike, Timelike};
use serde::Serialize;

use crate::parser::TrafficRecord;

pub const DAYS: usize = 7;
pub const HOURS: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeatmapCell {
    /// 0 = Sunday ... 6 = Saturday
    pub day_of_week: u32,
    pub hour: u32,
    pub value: u64,
}

/// Build the full 7 × 24 grid, Sunday 00h first.
///
/// Every cell is emitted, including empty ones. A record adds its byte count
/// when it reported one and 1 otherwise.
pub fn hourly_heatmap(records: &[TrafficRecord]) -> Vec<HeatmapCell> {
    let mut grid = [[0u64; HOURS]; DAYS];

    for record in records {
        let day = record.timestamp.weekday().num_days_from_sunday() as usize;
        let hour = record.timestamp.hour() as usize;
        let amount = record.bytes.unwrap_or(1);
        grid[day][hour] = grid[day][hour].saturating_add(amount);
    }

    grid.iter()
        .enumerate()
        .flat_map(|(day, hours)| {
            hours.iter().enumerate().map(move |(hour, &value)| HeatmapCell {
                day_of_week: day as u32,
                hour: hour as u32,
                value,
            })
        })
        .collect()
}
