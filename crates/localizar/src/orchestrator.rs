//! Element validation orchestration.
//!
//! Runs the full pipeline for one element or a batch: synthesize candidate
//! selectors, statically validate each against the snapshot, then judge
//! whether coverage is sufficient. Insufficient coverage surfaces as
//! `success: false` plus recommendations, never as an error.

use tracing::{debug, warn};

use crate::snapshot::{NodeId, Snapshot};
use crate::synthesizer::{synthesize, GeneratedLocators};
use crate::validator::{validate_selector, ValidationReport};

/// Valid selectors an element needs before it counts as covered.
pub const DEFAULT_MIN_VALID_SELECTORS: usize = 2;

/// Coverage thresholds for element validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Minimum number of valid selectors required.
    pub min_valid_selectors: usize,
    /// Require at least one CSS-form candidate.
    pub require_css: bool,
    /// Require at least one XPath-form candidate.
    pub require_xpath: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationOptions {
    /// Creates options with the default thresholds.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_valid_selectors: DEFAULT_MIN_VALID_SELECTORS,
            require_css: true,
            require_xpath: true,
        }
    }

    /// Overrides the minimum valid selector count.
    #[must_use]
    pub const fn with_min_valid_selectors(mut self, min: usize) -> Self {
        self.min_valid_selectors = min;
        self
    }

    /// Toggles the CSS-form presence requirement.
    #[must_use]
    pub const fn with_require_css(mut self, require: bool) -> Self {
        self.require_css = require;
        self
    }

    /// Toggles the XPath-form presence requirement.
    #[must_use]
    pub const fn with_require_xpath(mut self, require: bool) -> Self {
        self.require_xpath = require;
        self
    }
}

/// Outcome of validating one element.
#[derive(Debug, Clone)]
pub struct ElementValidation {
    /// Capture-assigned uid, when the snapshot carries one.
    pub element_uid: Option<String>,
    /// Tag name, when known.
    pub element_tag: Option<String>,
    /// Whether the element met the coverage thresholds.
    pub success: bool,
    /// Synthesized locator set.
    pub locators: GeneratedLocators,
    /// Per-selector validation outcomes.
    pub report: ValidationReport,
}

impl ElementValidation {
    /// Actionable advice attached during validation.
    #[must_use]
    pub fn recommendations(&self) -> &[String] {
        &self.report.recommendations
    }

    /// Number of candidates that validated.
    #[must_use]
    pub const fn valid_count(&self) -> usize {
        self.report.valid_selectors
    }
}

/// Validates one element end to end.
#[must_use]
pub fn validate_element(
    snapshot: &Snapshot,
    id: NodeId,
    options: ValidationOptions,
) -> ElementValidation {
    let node = snapshot.node(id);
    let locators = synthesize(snapshot, id);

    let results: Vec<_> = locators
        .selectors
        .iter()
        .map(|selector| validate_selector(snapshot, id, selector))
        .collect();
    let mut report = ValidationReport::from_results(results);

    if node.test_id().is_none() {
        report.add_warning("element has no test-id attribute");
    }
    if !locators.selectors.iter().any(|s| s.starts_with('#')) {
        report.add_warning("element id is missing or unstable");
    }
    if locators.component_framework.is_html() {
        report.add_warning("no component framework detected");
    }
    if locators.text_content.is_none()
        && locators.label_text.is_none()
        && locators.placeholder_text.is_none()
    {
        report.add_warning("element has no visible text, label, or placeholder");
    }

    let css_ok = !options.require_css || locators.has_css_candidate();
    let xpath_ok = !options.require_xpath || locators.has_xpath_candidate();
    let enough_valid = report.valid_selectors >= options.min_valid_selectors;
    let success = enough_valid && css_ok && xpath_ok;

    if !enough_valid {
        report.add_recommendation(format!(
            "only {} of {} candidate selectors validate (need {}); add a data-testid attribute",
            report.valid_selectors, report.total_selectors, options.min_valid_selectors
        ));
    }
    if !css_ok {
        report.add_recommendation(
            "no CSS selector candidates were generated; add a data-testid, id, or name attribute",
        );
    }
    if !xpath_ok {
        report.add_recommendation(
            "no XPath selector candidates were generated; give the element text, a label, or a role",
        );
    }

    let uid = node.uid.clone();
    if success {
        debug!(
            uid = uid.as_deref().unwrap_or("-"),
            valid = report.valid_selectors,
            total = report.total_selectors,
            "element validated"
        );
    } else {
        warn!(
            uid = uid.as_deref().unwrap_or("-"),
            valid = report.valid_selectors,
            total = report.total_selectors,
            "element failed validation"
        );
    }

    ElementValidation {
        element_uid: uid,
        element_tag: node.tag.clone(),
        success,
        locators,
        report,
    }
}

/// Validates a batch of elements sequentially, preserving input order.
#[must_use]
pub fn validate_batch(
    snapshot: &Snapshot,
    ids: &[NodeId],
    options: ValidationOptions,
) -> Vec<ElementValidation> {
    ids.iter()
        .map(|&id| validate_element(snapshot, id, options))
        .collect()
}

/// Validates every interactive element in the snapshot, document order.
#[must_use]
pub fn validate_interactive(
    snapshot: &Snapshot,
    options: ValidationOptions,
) -> Vec<ElementValidation> {
    validate_batch(snapshot, &snapshot.interactive_elements(), options)
}
