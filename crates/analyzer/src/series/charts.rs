//! Charts: chart-ready series shapes built on the resampler and tallies.
//!
//! Byte values are converted to megabytes here and nowhere earlier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::parser::TrafficRecord;
use crate::stats::Tally;
use super::resample::{resample, Granularity, ValueMetric};

pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

pub fn to_megabytes(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandwidthPoint {
    pub timestamp: DateTime<Utc>,
    pub megabytes: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConnectionPoint {
    pub timestamp: DateTime<Utc>,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtocolCount {
    pub protocol: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IpTraffic {
    pub ip: String,
    pub megabytes: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PortValue {
    pub port: u32,
    pub value: f64,
}

/// Which address of a record to rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressRole {
    Source,
    Destination,
}

impl AddressRole {
    fn pick(self, record: &TrafficRecord) -> Option<&str> {
        match self {
            AddressRole::Source => record.src_ip.as_deref(),
            AddressRole::Destination => record.dst_ip.as_deref(),
        }
    }
}

/// How ports are ranked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortMetric {
    /// Megabytes transferred by records that reported a byte count
    Traffic,
    /// Number of records
    #[default]
    Connections,
}

pub fn bandwidth_over_time(records: &[TrafficRecord], granularity: Granularity) -> Vec<BandwidthPoint> {
    resample(records, granularity, ValueMetric::Bytes)
        .into_iter()
        .map(|p| BandwidthPoint { timestamp: p.timestamp, megabytes: to_megabytes(p.value) })
        .collect()
}

pub fn connections_over_time(records: &[TrafficRecord], granularity: Granularity) -> Vec<ConnectionPoint> {
    resample(records, granularity, ValueMetric::Count)
        .into_iter()
        .map(|p| ConnectionPoint { timestamp: p.timestamp, count: p.value })
        .collect()
}

/// Record count per protocol token, most common first
pub fn protocol_distribution(records: &[TrafficRecord]) -> Vec<ProtocolCount> {
    let mut tally = Tally::new();
    for protocol in records.iter().filter_map(|r| r.protocol.as_deref()) {
        tally.add(protocol.to_string(), 1);
    }

    tally
        .ranked()
        .into_iter()
        .map(|e| ProtocolCount { protocol: e.key, count: e.value })
        .collect()
}

pub fn top_ips_by_traffic(records: &[TrafficRecord], role: AddressRole, top_n: usize) -> Vec<IpTraffic> {
    let mut tally = Tally::new();
    for record in records {
        if let (Some(ip), Some(bytes)) = (role.pick(record), record.bytes) {
            tally.add(ip.to_string(), bytes);
        }
    }

    tally
        .top(top_n)
        .into_iter()
        .map(|e| IpTraffic { ip: e.key, megabytes: to_megabytes(e.value) })
        .collect()
}

pub fn top_ports(records: &[TrafficRecord], metric: PortMetric, top_n: usize) -> Vec<PortValue> {
    let mut tally = Tally::new();
    for record in records {
        let Some(port) = record.dst_port else { continue };
        match metric {
            PortMetric::Connections => tally.add(port, 1),
            PortMetric::Traffic => {
                if let Some(bytes) = record.bytes {
                    tally.add(port, bytes);
                }
            }
        }
    }

    tally
        .top(top_n)
        .into_iter()
        .map(|e| PortValue {
            port: e.key,
            value: match metric {
                PortMetric::Traffic => to_megabytes(e.value),
                PortMetric::Connections => e.value as f64,
            },
        })
        .collect()
}
