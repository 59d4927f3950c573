//! Analytics: layer usage events and the sinks that receive them.
//!
//! # Invariants
//! - Every event carries the `dataSource` category and the layer name as label.
//! - Sinks never fail; transport is someone else's problem.

mod event;
mod sink;

pub use event::{AnalyticsAction, AnalyticsEvent, DATA_SOURCE_CATEGORY};
pub use sink::{AnalyticsSink, NullSink, RecordingSink, TracingSink};
