//! Domain types for date and schedule arithmetic.

mod date;
mod frequency;
mod period;

pub use date::Date;
pub use frequency::Frequency;
pub use period::{Period, MAX_PERIOD_DAYS, MAX_PERIOD_MONTHS};
