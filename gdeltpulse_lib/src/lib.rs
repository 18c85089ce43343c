//! Library layer for gdeltpulse: response normalization, KPIs, cached client,
//! validation, and dashboard assembly.
//!
//! Wraps the `gdelt_api` crate with an in-memory TTL cache and retries, and
//! turns its loosely-keyed payloads into canonical series, events and KPIs.

pub mod aliases;
pub mod cache;
pub mod client;
pub mod dashboard;
pub mod error;
pub mod kpi;
pub mod normalize;
pub mod validation;

pub use gdelt_api;
pub use gdelt_api::types;
pub use gdelt_api::{
    classify, Action, ApiVersion, GdeltRequest, Granularity, ModeHint, ModeResolution, Query,
    QueryKind, SearchQuery,
};

pub use cache::MemoryCache;
pub use client::{CachedClient, RetryConfig};
pub use dashboard::{build_dashboard, DashboardSnapshot};
pub use error::PulseError;
pub use kpi::KpiSnapshot;
pub use normalize::{normalize, EventRecord, NormalizedData, SeriesPoint, SeriesSource};
