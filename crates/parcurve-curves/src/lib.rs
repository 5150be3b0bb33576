//! # Parcurve Curves
//!
//! Zero-rate discount curves bootstrapped from par instruments.
//!
//! This crate provides:
//!
//! - **Discount Curve**: Piecewise-linear zero rates with flat extrapolation
//! - **Instruments**: Deposits and fixed-vs-floating swaps quoted at par
//! - **Schedules**: Settlement, maturity and cashflow generation on a business calendar
//! - **Bootstrap**: Sequential node-by-node calibration with a Newton solve
//! - **Repricing**: Validation that every input instrument prices back to par
//! - **Definitions**: JSON curve definitions and parallel group builds
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use parcurve_curves::prelude::*;
//! use parcurve_core::prelude::*;
//!
//! let anchor = Date::from_ymd(2024, 6, 5).unwrap();
//! let curve = SequentialBootstrapper::new(anchor)
//!     .add_instrument(Deposit::new("1D", Period::ZERO, Period::days(1),
//!         BusinessDayConvention::Following, 0.0184))
//!     .add_instrument(FixedLegSwap::new("1Y", Period::days(1), Period::years(1),
//!         Frequency::Quarterly, BusinessDayConvention::ModifiedFollowing, 0.018288))
//!     .bootstrap(DayCountConvention::Act365Fixed, CalendarId::Cnbe.calendar())?;
//!
//! let df = curve.discount_factor(0.75)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::uninlined_format_args)]

pub mod bootstrap;
pub mod curves;
pub mod definition;
pub mod error;
pub mod group;
pub mod instruments;
pub mod objective;
pub mod repricing;
pub mod schedule;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bootstrap::{
        bootstrap, BootstrapConfig, BootstrapState, NodeDiagnostics, NodeSeeding,
        SequentialBootstrapper,
    };
    pub use crate::curves::DiscountCurve;
    pub use crate::definition::CurveDefinition;
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::group::{CurveBuilds, CurveGroup};
    pub use crate::instruments::{
        CurveInstrument, Deposit, FixedLegSwap, InstrumentQuote, InstrumentType, ToCashflowSet,
        UnsupportedInstrumentPolicy,
    };
    pub use crate::objective::{CalibrationObjective, NodeUpdate};
    pub use crate::repricing::{BootstrapResult, RepricingCheck, RepricingReport};
    pub use crate::schedule::{Cashflow, CashflowSet, ScheduleContext};
}

pub use curves::DiscountCurve;
pub use error::{CurveError, CurveResult};
