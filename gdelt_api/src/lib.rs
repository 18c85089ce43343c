mod client;
pub mod dates;
mod errors;
mod query;
pub mod types;
pub use self::client::{Client, DEFAULT_BASE_URL};
pub use self::errors::{Error, UpstreamErrorKind};
pub use self::query::{
    classify, Action, ApiVersion, DateWindow, GdeltRequest, Granularity, ModeFields, ModeHint,
    ModeResolution, Query, QueryKind, SearchQuery, DEFAULT_WINDOW_DAYS,
};
