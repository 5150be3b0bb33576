//! Market node quotes as loaded from curve configuration.
//!
//! A quote names its instrument type as free text, so a definition file can
//! list instruments this crate does not build. What happens to those is
//! decided by [`UnsupportedInstrumentPolicy`].

use serde::{Deserialize, Serialize};
use tracing::warn;

use parcurve_core::calendars::BusinessDayConvention;
use parcurve_core::{Frequency, Period};

use super::{CurveInstrument, Deposit, FixedLegSwap};
use crate::error::{CurveError, CurveResult};

/// What to do with a quote whose instrument type is not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnsupportedInstrumentPolicy {
    /// Fail the build with a configuration error.
    #[default]
    Reject,
    /// Drop the node and log a warning.
    Skip,
}

/// A market node: instrument type, terms and quoted rate.
///
/// # Example
///
/// ```rust
/// use parcurve_curves::instruments::{InstrumentQuote, UnsupportedInstrumentPolicy};
///
/// let quote: InstrumentQuote = serde_json::from_str(
///     r#"{"type": "Swap", "start_offset": "1D", "tenor": "5Y", "frequency": "P3M",
///         "convention": "MF", "rate": 0.0202}"#,
/// )
/// .unwrap();
/// let instrument = quote.resolve(UnsupportedInstrumentPolicy::Reject).unwrap();
/// assert!(instrument.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentQuote {
    /// Identifier; defaults to `<type>-<tenor>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Instrument type name, e.g. `"Deposit"` or `"Swap"`.
    #[serde(rename = "type")]
    pub instrument_type: String,
    /// Anchor-to-settlement offset; defaults to 0D for deposits, 1D for swaps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_offset: Option<Period>,
    /// Tenor from settlement.
    pub tenor: Period,
    /// Fixed leg frequency (swaps only); defaults to quarterly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    /// Maturity adjustment; defaults to Following for deposits and Modified
    /// Following for swaps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convention: Option<BusinessDayConvention>,
    /// Quoted rate.
    pub rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SupportedType {
    Deposit,
    Swap,
}

fn supported_type(name: &str) -> Option<SupportedType> {
    let key: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    match key.as_str() {
        "deposit" | "depo" | "termdeposit" => Some(SupportedType::Deposit),
        "swap" | "irs" | "fixedlegswap" | "fixedfloatswap" | "fixedfloat" => Some(SupportedType::Swap),
        _ => None,
    }
}

impl InstrumentQuote {
    /// Creates a quote with default terms for the type.
    #[must_use]
    pub fn new(instrument_type: impl Into<String>, tenor: Period, rate: f64) -> Self {
        Self {
            id: None,
            instrument_type: instrument_type.into(),
            start_offset: None,
            tenor,
            frequency: None,
            convention: None,
            rate,
        }
    }

    /// Sets the identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the start offset.
    #[must_use]
    pub fn with_start_offset(mut self, start_offset: Period) -> Self {
        self.start_offset = Some(start_offset);
        self
    }

    /// Sets the payment frequency.
    #[must_use]
    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Sets the business day convention.
    #[must_use]
    pub fn with_convention(mut self, convention: BusinessDayConvention) -> Self {
        self.convention = Some(convention);
        self
    }

    /// Identifier, falling back to `<type>-<tenor>`.
    #[must_use]
    pub fn identifier(&self) -> String {
        self.id
            .clone()
            .unwrap_or_else(|| format!("{}-{}", self.instrument_type, self.tenor))
    }

    /// True if this crate can build the quoted instrument.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        supported_type(&self.instrument_type).is_some()
    }

    /// Converts the quote into an instrument.
    ///
    /// Returns `Ok(None)` for an unsupported type under
    /// [`UnsupportedInstrumentPolicy::Skip`].
    ///
    /// # Errors
    ///
    /// Unsupported types are a configuration error under
    /// [`UnsupportedInstrumentPolicy::Reject`].
    pub fn resolve(&self, policy: UnsupportedInstrumentPolicy) -> CurveResult<Option<CurveInstrument>> {
        let id = self.identifier();
        let instrument: CurveInstrument = match supported_type(&self.instrument_type) {
            Some(SupportedType::Deposit) => Deposit::new(
                id,
                self.start_offset.unwrap_or(Period::ZERO),
                self.tenor,
                self.convention.unwrap_or(BusinessDayConvention::Following),
                self.rate,
            )
            .into(),
            Some(SupportedType::Swap) => FixedLegSwap::new(
                id,
                self.start_offset.unwrap_or(Period::days(1)),
                self.tenor,
                self.frequency.unwrap_or_default(),
                self.convention.unwrap_or(BusinessDayConvention::ModifiedFollowing),
                self.rate,
            )
            .into(),
            None => match policy {
                UnsupportedInstrumentPolicy::Reject => {
                    return Err(CurveError::configuration(format!(
                        "instrument type '{}' is not yet supported",
                        self.instrument_type
                    )));
                }
                UnsupportedInstrumentPolicy::Skip => {
                    warn!(
                        instrument = %id,
                        instrument_type = %self.instrument_type,
                        "skipping unsupported instrument"
                    );
                    return Ok(None);
                }
            },
        };
        Ok(Some(instrument))
    }

    /// Converts a list of quotes, applying the policy to each.
    pub fn resolve_all(
        quotes: &[InstrumentQuote],
        policy: UnsupportedInstrumentPolicy,
    ) -> CurveResult<Vec<CurveInstrument>> {
        let mut instruments = Vec::with_capacity(quotes.len());
        for quote in quotes {
            if let Some(instrument) = quote.resolve(policy)? {
                instruments.push(instrument);
            }
        }
        Ok(instruments)
    }
}
