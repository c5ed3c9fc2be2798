//! Ambient Twin dashboard
//!
//! View models and session logic for the fleet dashboard: feed buckets and
//! cards, the detail panel with its live telemetry loop and forecast, the
//! home health certificate, the cluster map and the application shell.
//! Rendering is left to the caller; everything here is plain data.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod certificate;
pub mod checklist;
pub mod cluster_map;
pub mod detail;
pub mod feed;
pub mod gauge;
pub mod kpi;
pub mod live;
pub mod simulator;
pub mod spotlight;
pub mod state;

pub use certificate::{Certificate, Grade};
pub use checklist::{Checklist, ChecklistItem};
pub use cluster_map::{MapEvent, MapState};
pub use detail::{
    DetailPanel, FieldService, ForecastState, PanelAction, PanelIntent, PanelOptions,
    PanelSnapshot, RefreshOutcome,
};
pub use feed::{Bucket, Card, FeedBuckets, feed_cards};
pub use gauge::RadialGauge;
pub use kpi::{KpiTile, header_tiles};
pub use live::LiveFeed;
pub use simulator::MetricSimulator;
pub use spotlight::SpotlightCard;
pub use state::{AppState, Message, View};
