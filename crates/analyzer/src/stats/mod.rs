//! Stats module: batch statistics over parsed traffic records.

pub mod aggregate;
pub mod tally;

pub use aggregate::{
    aggregate, aggregate_default, AggregateResult, DayBucket, HourBucket, TimeSpan, DEFAULT_TOP_N,
};
pub use tally::{RankedEntry, Tally};
