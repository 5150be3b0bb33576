//! # Parcurve Core
//!
//! Date arithmetic and market conventions used by the parcurve bootstrap.
//!
//! This crate provides the building blocks every curve build relies on:
//!
//! - **Types**: `Date`, `Period` (tenors and offsets) and `Frequency`
//! - **Day Count Conventions**: year fractions on ACT/360, ACT/365F and ACT/ACT ISDA
//! - **Business Day Calendars**: weekend, holiday-list and China interbank (CNBE) calendars,
//!   business day conventions and period addition rules
//!
//! ## Example
//!
//! ```rust
//! use parcurve_core::prelude::*;
//!
//! let anchor = Date::from_ymd(2024, 6, 5).unwrap();
//! let calendar = CalendarId::Cnbe.calendar();
//! let spot = calendar
//!     .adjust(anchor.add_period(Period::days(1)).unwrap(), BusinessDayConvention::Following)
//!     .unwrap();
//! assert_eq!(spot, Date::from_ymd(2024, 6, 6).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::similar_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::uninlined_format_args)]

pub mod calendars;
pub mod daycounts;
pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{
        BusinessDayConvention, Calendar, CalendarId, HolidayCalendar, PeriodAddition,
        WeekendCalendar,
    };
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{Date, Frequency, Period};
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{Date, Frequency, Period};
