//! Curve bootstrap.
//!
//! The sequential bootstrap turns an ordered ladder of par instruments into
//! a zero-rate curve with one node per instrument. Each node is found with a
//! Newton solve on the instrument's pricing error, holding all shorter nodes
//! fixed.
//!
//! # Example
//!
//! ```rust,ignore
//! use parcurve_curves::bootstrap::{BootstrapConfig, SequentialBootstrapper};
//!
//! let result = SequentialBootstrapper::new(anchor)
//!     .with_config(BootstrapConfig::default())
//!     .add_instruments(instruments)
//!     .bootstrap_validated(DayCountConvention::Act365Fixed, CalendarId::Cnbe.calendar())?;
//!
//! let df = result.curve.discount_factor(1.5)?;
//! ```

mod config;
mod sequential;

pub use config::{BootstrapConfig, NodeSeeding};
pub use sequential::{
    bootstrap, BootstrapState, NodeDiagnostics, SequentialBootstrapper, DEFAULT_CURVE_NAME,
};
