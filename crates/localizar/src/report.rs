//! Batch report assembly and JSON output.
//!
//! Flattens validation outcomes into the report shape consumed by CI
//! dashboards. All keys serialize in camelCase.

use std::fs;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::orchestrator::ElementValidation;
use crate::result::LocatorResult;
use crate::synthesizer::GeneratedLocators;

/// One selector line in an element entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorEntry {
    /// The candidate selector.
    pub selector: String,
    /// Whether it validated.
    pub is_valid: bool,
    /// Failure description, absent for valid selectors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Per-element block of the batch report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementEntry {
    /// Capture-assigned uid, null when the snapshot has none.
    pub element_uid: Option<String>,
    /// Tag name, null when unknown.
    pub element_tag: Option<String>,
    /// Whether the element met the coverage thresholds.
    pub success: bool,
    /// Count of selectors that validated.
    pub valid_selectors: usize,
    /// Count of synthesized selectors.
    pub total_selectors: usize,
    /// Detected framework.
    pub component_framework: String,
    /// Actionable advice for failed aspects.
    pub recommendations: Vec<String>,
    /// Per-selector outcomes.
    pub selectors: Vec<SelectorEntry>,
}

impl From<&ElementValidation> for ElementEntry {
    fn from(outcome: &ElementValidation) -> Self {
        let selectors = outcome
            .report
            .results
            .iter()
            .map(|result| SelectorEntry {
                selector: result.selector.clone(),
                is_valid: result.is_valid,
                reason: result.reason.as_ref().map(ToString::to_string),
            })
            .collect();
        Self {
            element_uid: outcome.element_uid.clone(),
            element_tag: outcome.element_tag.clone(),
            success: outcome.success,
            valid_selectors: outcome.report.valid_selectors,
            total_selectors: outcome.report.total_selectors,
            component_framework: outcome.locators.component_framework.to_string(),
            recommendations: outcome.report.recommendations.clone(),
            selectors,
        }
    }
}

/// Whole-run validation report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// RFC 3339 timestamp taken when the report was created.
    pub timestamp: String,
    /// Elements processed.
    pub total_elements: usize,
    /// Elements that met the thresholds.
    pub successful: usize,
    /// Elements that did not.
    pub failed: usize,
    /// Per-element blocks, batch order.
    pub results: Vec<ElementEntry>,
}

impl BatchReport {
    /// Creates an empty report stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            total_elements: 0,
            successful: 0,
            failed: 0,
            results: Vec::new(),
        }
    }

    /// Builds a report from a finished batch.
    #[must_use]
    pub fn from_outcomes(outcomes: &[ElementValidation]) -> Self {
        let mut report = Self::new();
        for outcome in outcomes {
            report.push(outcome);
        }
        report
    }

    /// Appends one element outcome and updates the counters.
    pub fn push(&mut self, outcome: &ElementValidation) {
        self.total_elements += 1;
        if outcome.success {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
        self.results.push(ElementEntry::from(outcome));
    }

    /// True when every element passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// One-line run summary.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}/{} elements passed",
            self.successful, self.total_elements
        )
    }

    /// One line per failed element: identifier plus its top recommendation.
    #[must_use]
    pub fn failure_digest(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|entry| !entry.success)
            .map(|entry| {
                let who = entry
                    .element_uid
                    .as_deref()
                    .or(entry.element_tag.as_deref())
                    .unwrap_or("<element>");
                let advice = entry
                    .recommendations
                    .first()
                    .map_or("no recommendations", String::as_str);
                format!("{who}: {advice}")
            })
            .collect()
    }

    /// Serializes the report as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> LocatorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the pretty-printed report to `path`.
    pub fn write_json(&self, path: &Path) -> LocatorResult<()> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

impl Default for BatchReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Locator set stamped with element identity, for generation output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocatorExport {
    /// Capture-assigned uid, null when the snapshot has none.
    pub element_uid: Option<String>,
    /// Tag name, null when unknown.
    pub element_tag: Option<String>,
    /// The synthesized locator set.
    #[serde(flatten)]
    pub locators: GeneratedLocators,
}
