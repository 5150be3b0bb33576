//! Curve definitions loaded from configuration.
//!
//! A definition carries everything needed to build one curve except the
//! anchor date: its name, day count, calendar, market nodes and bootstrap
//! settings.
//!
//! ```json
//! {
//!   "name": "CNY-FR007",
//!   "day_count": "ACT/365F",
//!   "calendar": "CNBE",
//!   "nodes": [
//!     { "type": "Deposit", "start_offset": "0D", "tenor": "1D", "convention": "F", "rate": 0.0184 },
//!     { "type": "Swap", "tenor": "3M", "frequency": "P3M", "convention": "MF", "rate": 0.018625 }
//!   ],
//!   "config": { "max_iterations": 100 }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use parcurve_core::calendars::CalendarId;
use parcurve_core::daycounts::DayCountConvention;
use parcurve_core::Date;

use crate::bootstrap::{BootstrapConfig, SequentialBootstrapper};
use crate::curves::DiscountCurve;
use crate::error::{CurveError, CurveResult};
use crate::instruments::InstrumentQuote;
use crate::repricing::BootstrapResult;

/// Everything needed to bootstrap one curve for any anchor date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveDefinition {
    /// Curve name.
    pub name: String,

    /// Day count for node times and accruals.
    #[serde(default)]
    pub day_count: DayCountConvention,

    /// Holiday calendar.
    #[serde(default)]
    pub calendar: CalendarId,

    /// Market nodes, in any order.
    #[serde(default)]
    pub nodes: Vec<InstrumentQuote>,

    /// Bootstrap settings.
    #[serde(default)]
    pub config: BootstrapConfig,
}

impl CurveDefinition {
    /// Creates an empty definition with default conventions.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            day_count: DayCountConvention::default(),
            calendar: CalendarId::default(),
            nodes: Vec::new(),
            config: BootstrapConfig::default(),
        }
    }

    /// Sets the day count.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Sets the calendar.
    #[must_use]
    pub fn with_calendar(mut self, calendar: CalendarId) -> Self {
        self.calendar = calendar;
        self
    }

    /// Adds a market node.
    #[must_use]
    pub fn with_node(mut self, node: InstrumentQuote) -> Self {
        self.nodes.push(node);
        self
    }

    /// Sets the bootstrap configuration.
    #[must_use]
    pub fn with_config(mut self, config: BootstrapConfig) -> Self {
        self.config = config;
        self
    }

    /// Checks the definition without building anything.
    pub fn validate(&self) -> CurveResult<()> {
        if self.name.trim().is_empty() {
            return Err(CurveError::configuration("curve name cannot be empty"));
        }
        if self.nodes.is_empty() {
            return Err(CurveError::configuration(format!("curve {} has no nodes", self.name)));
        }
        self.config.validate()
    }

    /// Parses a definition from JSON.
    pub fn from_json(json: &str) -> CurveResult<Self> {
        let definition: Self = serde_json::from_str(json)?;
        definition.validate()?;
        Ok(definition)
    }

    /// Loads a definition from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> CurveResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serializes the definition to pretty JSON.
    pub fn to_json(&self) -> CurveResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// A bootstrapper for this definition at `anchor`.
    pub fn bootstrapper(&self, anchor: Date) -> CurveResult<SequentialBootstrapper> {
        self.validate()?;
        SequentialBootstrapper::new(anchor)
            .with_name(self.name.clone())
            .with_config(self.config.clone())
            .add_quotes(&self.nodes)
    }

    /// Bootstraps the curve at `anchor`.
    pub fn bootstrap(&self, anchor: Date) -> CurveResult<DiscountCurve> {
        self.bootstrapper(anchor)?
            .bootstrap(self.day_count, self.calendar.calendar())
    }

    /// Bootstraps the curve at `anchor` with repricing validation.
    pub fn bootstrap_validated(&self, anchor: Date) -> CurveResult<BootstrapResult> {
        self.bootstrapper(anchor)?
            .bootstrap_validated(self.day_count, self.calendar.calendar())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcurve_core::Period;

    const JSON: &str = r#"{
        "name": "CNY-FR007",
        "day_count": "ACT/365F",
        "calendar": "CNBE",
        "nodes": [
            { "type": "Swap", "tenor": "6M", "frequency": "P3M", "convention": "MF", "rate": 0.018366 },
            { "type": "Deposit", "start_offset": "0D", "tenor": "1D", "convention": "F", "rate": 0.0184 },
            { "type": "Swap", "tenor": "3M", "frequency": "P3M", "convention": "MF", "rate": 0.018625 }
        ]
    }"#;

    #[test]
    fn test_parse_and_bootstrap() {
        let definition = CurveDefinition::from_json(JSON).unwrap();
        assert_eq!(definition.calendar, CalendarId::Cnbe);
        assert_eq!(definition.nodes.len(), 3);
        assert_eq!(definition.config, BootstrapConfig::default());

        let anchor = Date::from_ymd(2024, 6, 5).unwrap();
        let curve = definition.bootstrap(anchor).unwrap();
        assert_eq!(curve.name(), "CNY-FR007");
        assert_eq!(curve.len(), 3);
        assert!(curve.times().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_json_roundtrip() {
        let definition = CurveDefinition::new("TEST")
            .with_calendar(CalendarId::NoHolidays)
            .with_node(InstrumentQuote::new("Swap", Period::years(1), 0.02));
        let json = definition.to_json().unwrap();
        assert_eq!(CurveDefinition::from_json(&json).unwrap(), definition);
    }

    #[test]
    fn test_invalid_definitions() {
        assert!(CurveDefinition::from_json(r#"{"name": "EMPTY"}"#)
            .unwrap_err()
            .is_configuration_error());
        assert!(CurveDefinition::from_json(r#"{"nodes": []}"#).is_err());
        assert!(CurveDefinition::from_json_file("/nonexistent/curve.json").is_err());
    }

    #[test]
    fn test_oversized_tenor_is_an_error() {
        let json = JSON.replace(r#""tenor": "6M""#, r#""tenor": "200000000Y""#);
        let err = CurveDefinition::from_json(&json).unwrap_err();
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("out of range"), "{err}");

        let anchor = Date::from_ymd(2024, 6, 5).unwrap();
        let definition = CurveDefinition::from_json(JSON)
            .unwrap()
            .with_node(InstrumentQuote::new("Swap", Period::years(200_000_000), 0.02));
        let err = definition.bootstrap(anchor).unwrap_err();
        assert!(err.is_schedule_error(), "{err}");
    }

    #[test]
    fn test_unsupported_node_policy() {
        let definition = CurveDefinition::from_json(JSON)
            .unwrap()
            .with_node(InstrumentQuote::new("FRA", Period::months(9), 0.019));
        let anchor = Date::from_ymd(2024, 6, 5).unwrap();
        assert!(definition.bootstrap(anchor).unwrap_err().is_configuration_error());

        let mut skipping = definition.clone();
        skipping.config.unsupported_instruments =
            crate::instruments::UnsupportedInstrumentPolicy::Skip;
        assert_eq!(skipping.bootstrap(anchor).unwrap().len(), 3);
    }
}
