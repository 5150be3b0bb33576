//! Groups of curve definitions built together.
//!
//! Curves in a group are independent: each is bootstrapped on its own rayon
//! task and a failure is reported against that curve alone.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use parcurve_core::Date;

use crate::curves::DiscountCurve;
use crate::definition::CurveDefinition;
use crate::error::{CurveError, CurveResult};

/// Build outcome of every curve in a group, keyed by curve name.
pub type CurveBuilds = BTreeMap<String, CurveResult<DiscountCurve>>;

/// A named set of curve definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveGroup {
    /// Group name.
    pub name: String,

    /// Member curves.
    #[serde(default)]
    pub curves: Vec<CurveDefinition>,
}

impl CurveGroup {
    /// Creates an empty group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            curves: Vec::new(),
        }
    }

    /// Adds a curve definition.
    #[must_use]
    pub fn with_curve(mut self, curve: CurveDefinition) -> Self {
        self.curves.push(curve);
        self
    }

    /// Adds a curve definition, rejecting duplicate names.
    pub fn add_curve(&mut self, curve: CurveDefinition) -> CurveResult<()> {
        if self.get(&curve.name).is_some() {
            return Err(CurveError::configuration(format!(
                "curve {} is already defined in group {}",
                curve.name, self.name
            )));
        }
        self.curves.push(curve);
        Ok(())
    }

    /// Looks up a member curve by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CurveDefinition> {
        self.curves.iter().find(|c| c.name == name)
    }

    /// Number of member curves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// True if the group has no curves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Checks that curve names are unique.
    ///
    /// Member definitions are validated when built, so one bad curve does
    /// not invalidate the group.
    pub fn validate(&self) -> CurveResult<()> {
        let mut seen = HashSet::new();
        for curve in &self.curves {
            if !seen.insert(curve.name.as_str()) {
                return Err(CurveError::configuration(format!(
                    "duplicate curve name {} in group {}",
                    curve.name, self.name
                )));
            }
        }
        Ok(())
    }

    /// Parses a group from JSON.
    pub fn from_json(json: &str) -> CurveResult<Self> {
        let group: Self = serde_json::from_str(json)?;
        group.validate()?;
        Ok(group)
    }

    /// Loads a group from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> CurveResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Bootstraps every curve at `anchor` in parallel.
    pub fn bootstrap_all(&self, anchor: Date) -> CurveBuilds {
        let builds: CurveBuilds = self
            .curves
            .par_iter()
            .map(|definition| (definition.name.clone(), definition.bootstrap(anchor)))
            .collect();

        let failed = builds.values().filter(|b| b.is_err()).count();
        if failed > 0 {
            warn!(group = %self.name, %anchor, failed, "some curves failed to build");
        }
        info!(group = %self.name, %anchor, curves = builds.len(), "group built");
        builds
    }

    /// Bootstraps every curve at each anchor date in parallel.
    pub fn bootstrap_scenarios(&self, anchors: &[Date]) -> BTreeMap<Date, CurveBuilds> {
        anchors
            .par_iter()
            .map(|&anchor| (anchor, self.bootstrap_all(anchor)))
            .collect()
    }
}
