//! Curve instruments for the sequential bootstrap.
//!
//! Each instrument contributes one curve node at its maturity. The supported
//! instruments are:
//!
//! - [`Deposit`]: money-market deposit, one payment of principal plus simple
//!   interest at maturity
//! - [`FixedLegSwap`]: fixed-vs-floating swap calibrated through its fixed leg
//!   with the notional exchanged at maturity
//!
//! Both implement [`ToCashflowSet`], which is all the bootstrap needs.
//! [`CurveInstrument`] wraps them for heterogeneous, serializable node lists,
//! and [`InstrumentQuote`] is the loosely typed market node as it appears in
//! configuration files.

mod deposit;
pub mod quotes;
mod swap;

pub use deposit::Deposit;
pub use quotes::{InstrumentQuote, UnsupportedInstrumentPolicy};
pub use swap::FixedLegSwap;

use serde::{Deserialize, Serialize};

use parcurve_core::Period;

use crate::error::CurveResult;
use crate::schedule::{CashflowSet, ScheduleContext};

/// Instrument type for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InstrumentType {
    /// Money market deposit
    Deposit,
    /// Fixed-vs-floating swap
    Swap,
}

impl std::fmt::Display for InstrumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deposit => write!(f, "Deposit"),
            Self::Swap => write!(f, "Swap"),
        }
    }
}

/// An instrument that resolves to a fixed cashflow schedule.
pub trait ToCashflowSet {
    /// Instrument identifier used in errors and reports.
    fn id(&self) -> &str;

    /// Instrument type.
    fn instrument_type(&self) -> InstrumentType;

    /// Quoted rate; also the initial guess for the node's zero rate.
    fn quoted_rate(&self) -> f64;

    /// Start offset plus tenor, normalized. Instruments are bootstrapped in
    /// increasing order of this period.
    fn maturity_period(&self) -> Period;

    /// Generates the cashflows in the given market context.
    fn to_cashflow_set(&self, ctx: &ScheduleContext<'_>) -> CurveResult<CashflowSet>;
}

/// Any supported curve instrument.
///
/// Serialized with a `"type"` tag:
///
/// ```json
/// { "type": "Swap", "id": "FR007-1Y", "start_offset": "1D", "tenor": "1Y",
///   "frequency": "Quarterly", "convention": "ModifiedFollowing", "fixed_rate": 0.018288 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CurveInstrument {
    /// Money market deposit.
    Deposit(Deposit),
    /// Fixed-vs-floating swap.
    Swap(FixedLegSwap),
}

impl CurveInstrument {
    fn inner(&self) -> &dyn ToCashflowSet {
        match self {
            Self::Deposit(deposit) => deposit,
            Self::Swap(swap) => swap,
        }
    }
}

impl ToCashflowSet for CurveInstrument {
    fn id(&self) -> &str {
        self.inner().id()
    }

    fn instrument_type(&self) -> InstrumentType {
        self.inner().instrument_type()
    }

    fn quoted_rate(&self) -> f64 {
        self.inner().quoted_rate()
    }

    fn maturity_period(&self) -> Period {
        self.inner().maturity_period()
    }

    fn to_cashflow_set(&self, ctx: &ScheduleContext<'_>) -> CurveResult<CashflowSet> {
        self.inner().to_cashflow_set(ctx)
    }
}

impl From<Deposit> for CurveInstrument {
    fn from(deposit: Deposit) -> Self {
        Self::Deposit(deposit)
    }
}

impl From<FixedLegSwap> for CurveInstrument {
    fn from(swap: FixedLegSwap) -> Self {
        Self::Swap(swap)
    }
}
