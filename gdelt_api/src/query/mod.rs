mod common;
pub use self::common::{DateWindow, Query};

mod granularity;
pub use self::granularity::Granularity;

mod classify;
pub use self::classify::{classify, QueryKind};

mod mode;
pub use self::mode::{Action, ApiVersion, ModeHint, ModeResolution};

mod request;
pub use self::request::{GdeltRequest, ModeFields};

mod search;
pub use self::search::{SearchQuery, DEFAULT_WINDOW_DAYS};
