pub mod activitywatch;
pub mod summarize;

pub use activitywatch::{AwClient, AwEvent, AwEventData};
pub use summarize::{
    aggregate, ingest_activities, summarize_window_activity, ActivitySummary, IngestContext,
    IngestFilters, RawActivity,
};
