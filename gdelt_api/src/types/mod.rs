mod payload;
pub use self::payload::GdeltResponse;

mod row;
pub use self::row::{lenient_number, MetricKey, RawRow, ROW_DATE_KEYS};
