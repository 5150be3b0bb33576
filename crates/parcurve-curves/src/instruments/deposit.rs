//! Money market deposit instrument.
//!
//! A deposit is the simplest instrument for curve bootstrap, used for the
//! short end of the curve (O/N, T/N, 1W to 12M).

use serde::{Deserialize, Serialize};

use parcurve_core::calendars::BusinessDayConvention;
use parcurve_core::Period;

use super::{InstrumentType, ToCashflowSet};
use crate::error::CurveResult;
use crate::schedule::{generate, CashflowSet, ScheduleContext, ScheduleTerms};

/// A money market deposit.
///
/// # Pricing Formula
///
/// The deposit pays `1 + rate × τ` at maturity per unit lent at settlement,
/// where τ is the accrual fraction on the curve day count. It reprices when
/// ```text
/// DF(maturity) / DF(settlement) = 1 / (1 + rate × τ)
/// ```
///
/// # Example
///
/// ```rust
/// use parcurve_core::calendars::BusinessDayConvention;
/// use parcurve_core::Period;
/// use parcurve_curves::instruments::{Deposit, ToCashflowSet};
///
/// // overnight deposit at 1.84%
/// let deposit = Deposit::new("ON", Period::ZERO, Period::days(1), BusinessDayConvention::Following, 0.0184);
/// assert_eq!(deposit.maturity_period(), Period::days(1));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
    /// Identifier
    id: String,
    /// Offset from the anchor date to settlement (0D for overnight, 1D for spot)
    #[serde(default)]
    start_offset: Period,
    /// Length of the deposit from settlement
    tenor: Period,
    /// Adjustment applied to the maturity date
    #[serde(default)]
    convention: BusinessDayConvention,
    /// Simple interest rate (e.g., 0.0184 for 1.84%)
    rate: f64,
}

impl Deposit {
    /// Creates a new deposit.
    ///
    /// # Arguments
    ///
    /// * `id` - Identifier used in reports and errors
    /// * `start_offset` - Anchor-to-settlement offset
    /// * `tenor` - Deposit length from settlement
    /// * `convention` - Maturity adjustment
    /// * `rate` - Simple interest rate
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        start_offset: Period,
        tenor: Period,
        convention: BusinessDayConvention,
        rate: f64,
    ) -> Self {
        Self {
            id: id.into(),
            start_offset,
            tenor,
            convention,
            rate,
        }
    }

    /// Returns the start offset.
    #[must_use]
    pub fn start_offset(&self) -> Period {
        self.start_offset
    }

    /// Returns the tenor.
    #[must_use]
    pub fn tenor(&self) -> Period {
        self.tenor
    }

    /// Returns the maturity adjustment convention.
    #[must_use]
    pub fn convention(&self) -> BusinessDayConvention {
        self.convention
    }

    /// Returns the deposit rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl ToCashflowSet for Deposit {
    fn id(&self) -> &str {
        &self.id
    }

    fn instrument_type(&self) -> InstrumentType {
        InstrumentType::Deposit
    }

    fn quoted_rate(&self) -> f64 {
        self.rate
    }

    fn maturity_period(&self) -> Period {
        self.start_offset.plus(self.tenor).normalized()
    }

    fn to_cashflow_set(&self, ctx: &ScheduleContext<'_>) -> CurveResult<CashflowSet> {
        generate(
            ctx,
            &ScheduleTerms {
                id: &self.id,
                start_offset: self.start_offset,
                tenor: self.tenor,
                payment_period: None,
                convention: self.convention,
                rate: self.rate,
            },
        )
    }
}
