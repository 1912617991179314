//! Series module: time bucketing, heatmap and chart-ready series.

pub mod resample;
pub mod heatmap;
pub mod charts;

pub use resample::{resample, BucketKey, Granularity, TimeSeriesPoint, UnknownGranularity, ValueMetric};
pub use heatmap::{hourly_heatmap, HeatmapCell};
pub use charts::{
    bandwidth_over_time, connections_over_time, protocol_distribution, top_ips_by_traffic, top_ports,
    AddressRole, BandwidthPoint, ConnectionPoint, IpTraffic, PortMetric, PortValue, ProtocolCount,
};
