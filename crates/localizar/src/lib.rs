//! Localizar: Locator Engine for Captured DOM Snapshots
//!
//! Localizar (Spanish: "to locate") turns captured DOM snapshots into
//! resilient element locators: it synthesizes ranked CSS and XPath
//! candidates, validates them statically against the snapshot, and emits
//! page objects and CI reports.
//!
//! # Pipeline
//!
//! ```text
//! ┌────────────┐    ┌─────────────┐    ┌────────────┐    ┌──────────┐
//! │ Snapshot   │───►│ Synthesizer │───►│ Validator  │───►│ Report / │
//! │ (JSON)     │    │ (11 tiers)  │    │ (matcher)  │    │ PageObj  │
//! └────────────┘    └─────────────┘    └────────────┘    └──────────┘
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    clippy::doc_markdown
)]
mod driver;
#[allow(clippy::doc_markdown, clippy::missing_const_for_fn)]
mod escape;
#[allow(clippy::must_use_candidate, clippy::missing_const_for_fn)]
mod framework;
#[allow(
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    clippy::doc_markdown
)]
mod matcher;
#[allow(clippy::doc_markdown)]
mod orchestrator;
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    clippy::doc_markdown
)]
mod page_object;
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    clippy::doc_markdown
)]
mod report;
mod result;
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    clippy::doc_markdown
)]
mod snapshot;
mod stability;
#[allow(clippy::doc_markdown)]
mod synthesizer;
#[allow(clippy::must_use_candidate, clippy::missing_const_for_fn)]
mod text;
#[allow(clippy::doc_markdown)]
mod validator;

pub use driver::{PageDriver, SnapshotDriver};
pub use escape::{css_attribute_value, xpath_literal};
pub use framework::{classify, ComponentFramework, FRAMEWORK_ANCESTOR_LEVELS};
pub use matcher::{
    find_matches, matches_node, AttributeCheck, CssSelector, ParsedSelector, XPathPredicate,
    XPathSelector,
};
pub use orchestrator::{
    validate_batch, validate_element, validate_interactive, ElementValidation, ValidationOptions,
    DEFAULT_MIN_VALID_SELECTORS,
};
pub use page_object::PageObject;
pub use report::{BatchReport, ElementEntry, LocatorExport, SelectorEntry};
pub use result::{LocatorError, LocatorResult};
pub use snapshot::{
    normalize_attr_key, ElementNode, NodeId, Snapshot, TEST_ID_ATTRIBUTES,
};
pub use stability::{
    StabilityFilter, GENERATED_CLASS_MIN_LEN, HEX_RUN_MIN_LEN, SIMPLE_TOKEN_MAX_LEN,
};
pub use synthesizer::{
    synthesize, GeneratedLocators, MAX_CANDIDATES, TEXT_CONTAINS_MIN_LEN,
    TEXT_CONTAINS_PREFIX_LEN, TEXT_XPATH_MAX_LEN,
};
pub use text::{
    deep_text, label_text, normalize_whitespace, placeholder_text, span_text,
    LABEL_ANCESTOR_LEVELS, PLACEHOLDER_ANCESTOR_LEVELS,
};
pub use validator::{
    same_element, validate_selector, FailureReason, ValidationReport, ValidationResult,
};

/// Convenience re-exports for test suites.
pub mod prelude {
    pub use super::driver::*;
    pub use super::escape::*;
    pub use super::framework::*;
    pub use super::matcher::*;
    pub use super::orchestrator::*;
    pub use super::page_object::*;
    pub use super::report::*;
    pub use super::result::*;
    pub use super::snapshot::*;
    pub use super::stability::*;
    pub use super::synthesizer::*;
    pub use super::text::*;
    pub use super::validator::*;
}
