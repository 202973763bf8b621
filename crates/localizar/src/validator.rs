//! Candidate validation.
//!
//! Every synthesized selector is replayed against the snapshot it came
//! from. A candidate is valid only when it resolves to exactly its element;
//! everything else becomes a structured failure on that one candidate,
//! never an error that stops the run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::matcher;
use crate::snapshot::{ElementNode, NodeId, Snapshot};

/// Why a candidate failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The selector is outside the supported grammar.
    InvalidSyntax,
    /// No element in the snapshot matched.
    NoMatch,
    /// The selector is not unique in the snapshot.
    AmbiguousMatch {
        /// How many elements matched.
        count: usize,
    },
    /// Exactly one element matched, but identity resolution rejected it.
    IdentityMismatch,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSyntax => f.write_str("invalid selector syntax"),
            Self::NoMatch => f.write_str("no elements found"),
            Self::AmbiguousMatch { count } => write!(f, "multiple elements found ({count})"),
            Self::IdentityMismatch => f.write_str("matches different element"),
        }
    }
}

impl FailureReason {
    /// Short remediation hint, when one applies.
    #[must_use]
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidSyntax => None,
            Self::NoMatch => Some("check that the element is present in the captured snapshot"),
            Self::AmbiguousMatch { .. } => {
                Some("add more specific attributes to narrow the match")
            }
            Self::IdentityMismatch => Some("prefer a test-id attribute to disambiguate"),
        }
    }
}

/// Verdict for a single candidate selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// The candidate as synthesized.
    pub selector: String,
    /// True when the candidate resolved uniquely to its element.
    pub is_valid: bool,
    /// True when exactly one element matched and identity resolution
    /// confirmed it is the target.
    pub matches_target_element: bool,
    /// Failure description, `None` on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Remediation hint, when one applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationResult {
    /// A passing verdict.
    #[must_use]
    pub fn ok(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            is_valid: true,
            matches_target_element: true,
            reason: None,
            suggestion: None,
        }
    }

    /// A failing verdict carrying the reason and its standard suggestion.
    #[must_use]
    pub fn failed(selector: impl Into<String>, reason: &FailureReason) -> Self {
        Self {
            selector: selector.into(),
            is_valid: false,
            matches_target_element: false,
            reason: Some(reason.to_string()),
            suggestion: reason.suggestion().map(str::to_string),
        }
    }
}

/// Aggregate verdict over all candidates of one element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Number of candidates checked.
    pub total_selectors: usize,
    /// Candidates that resolved uniquely to the element.
    pub valid_selectors: usize,
    /// Candidates that failed.
    pub invalid_selectors: usize,
    /// Per-candidate verdicts, in synthesis order.
    pub results: Vec<ValidationResult>,
    /// Advisory notes about the element itself.
    pub warnings: Vec<String>,
    /// Follow-ups attached when the element fails its policy.
    pub recommendations: Vec<String>,
}

impl ValidationReport {
    /// Builds a report from per-candidate verdicts.
    #[must_use]
    pub fn from_results(results: Vec<ValidationResult>) -> Self {
        let valid = results.iter().filter(|result| result.is_valid).count();
        Self {
            total_selectors: results.len(),
            valid_selectors: valid,
            invalid_selectors: results.len() - valid,
            results,
            warnings: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    /// Adds an advisory warning.
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Adds a remediation recommendation.
    pub fn add_recommendation(&mut self, recommendation: impl Into<String>) {
        self.recommendations.push(recommendation.into());
    }

    /// Failing verdicts, in synthesis order.
    pub fn failures(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|result| !result.is_valid)
    }
}

/// Validates one candidate against the snapshot, relative to the element at
/// `target`.
#[must_use]
pub fn validate_selector(snapshot: &Snapshot, target: NodeId, selector: &str) -> ValidationResult {
    if !plausible_syntax(selector) {
        return ValidationResult::failed(selector, &FailureReason::InvalidSyntax);
    }
    let Some(parsed) = matcher::parse(selector) else {
        return ValidationResult::failed(selector, &FailureReason::InvalidSyntax);
    };
    let matches = matcher::find_matches(snapshot, &parsed);
    match matches.as_slice() {
        [] => ValidationResult::failed(selector, &FailureReason::NoMatch),
        [only] => {
            if same_element(snapshot.node(*only), snapshot.node(target)) {
                ValidationResult::ok(selector)
            } else {
                ValidationResult::failed(selector, &FailureReason::IdentityMismatch)
            }
        }
        many => ValidationResult::failed(
            selector,
            &FailureReason::AmbiguousMatch { count: many.len() },
        ),
    }
}

/// Cheap shape screen applied before parsing.
///
/// XPath must carry content after `//`. On the CSS side `:contains(` is
/// rejected outright (it is not CSS), and the first character must open a
/// supported component.
fn plausible_syntax(selector: &str) -> bool {
    let trimmed = selector.trim();
    if trimmed.is_empty() {
        return false;
    }
    if let Some(rest) = trimmed.strip_prefix("//") {
        return rest.chars().next().is_some_and(|c| !c.is_whitespace());
    }
    if trimmed.contains(":contains(") {
        return false;
    }
    match trimmed.chars().next() {
        Some('#' | '.' | '[') => true,
        Some(c) => c.is_ascii_alphanumeric() || c == '_',
        None => false,
    }
}

/// Node identity resolution, first applicable rule decides.
///
/// Both carry a uid: equal iff uids are equal. Both carry an id: equal iff
/// ids are equal. Both carry a test-id: equal iff values are equal. Same
/// tag and both carry `name`: equal iff names are equal. Anything
/// unresolved compares unequal.
#[must_use]
pub fn same_element(a: &ElementNode, b: &ElementNode) -> bool {
    if let (Some(ua), Some(ub)) = (a.uid.as_deref(), b.uid.as_deref()) {
        return ua == ub;
    }
    if let (Some(ia), Some(ib)) = (a.id.as_deref(), b.id.as_deref()) {
        return ia == ib;
    }
    if let (Some((_, ta)), Some((_, tb))) = (a.test_id(), b.test_id()) {
        return ta == tb;
    }
    if a.tag.is_some() && a.tag == b.tag {
        if let (Some(na), Some(nb)) = (a.attribute("name"), b.attribute("name")) {
            return na == nb;
        }
    }
    false
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Snapshot {
        Snapshot::from_json(json).unwrap()
    }

    mod validate_tests {
        use super::*;

        #[test]
        fn test_unique_test_id_round_trip() {
            let snapshot = parse(
                r#"[
                    {"tag": "button", "attributes": {"data-testid": "login-btn"}},
                    {"tag": "button", "text": "Other"}
                ]"#,
            );
            let target = snapshot.roots()[0];
            let result =
                validate_selector(&snapshot, target, r#"[data-testid="login-btn"]"#);
            assert!(result.is_valid);
            assert!(result.matches_target_element);
            assert!(result.reason.is_none());
        }

        #[test]
        fn test_no_match_reason() {
            let snapshot = parse(r#"{"tag": "div", "uid": "u1"}"#);
            let result = validate_selector(&snapshot, snapshot.roots()[0], "#missing");
            assert!(!result.is_valid);
            assert_eq!(result.reason.as_deref(), Some("no elements found"));
        }

        #[test]
        fn test_ambiguous_match_counts() {
            let snapshot = parse(
                r#"[
                    {"tag": "input", "attributes": {"type": "text"}},
                    {"tag": "input", "attributes": {"type": "text"}}
                ]"#,
            );
            let result =
                validate_selector(&snapshot, snapshot.roots()[0], r#"input[type="text"]"#);
            assert!(!result.is_valid);
            assert_eq!(
                result.reason.as_deref(),
                Some("multiple elements found (2)")
            );
        }

        #[test]
        fn test_identity_mismatch() {
            let snapshot = parse(
                r#"[
                    {"tag": "button", "uid": "target", "text": "Save"},
                    {"tag": "button", "uid": "other", "id": "cancel"}
                ]"#,
            );
            let target = snapshot.find_by_uid("target").unwrap();
            let result = validate_selector(&snapshot, target, "#cancel");
            assert!(!result.is_valid);
            assert_eq!(
                result.reason.as_deref(),
                Some("matches different element")
            );
        }

        #[test]
        fn test_contains_pseudo_class_is_invalid_syntax() {
            let snapshot = parse(r#"{"tag": "div", "uid": "u1"}"#);
            let result = validate_selector(
                &snapshot,
                snapshot.roots()[0],
                r#"div:contains("Sign In")"#,
            );
            assert!(!result.is_valid);
            assert_eq!(result.reason.as_deref(), Some("invalid selector syntax"));
            assert!(result.suggestion.is_none());
        }

        #[test]
        fn test_empty_xpath_is_invalid_syntax() {
            let snapshot = parse(r#"{"tag": "div", "uid": "u1"}"#);
            for selector in ["//", "// ", ""] {
                let result = validate_selector(&snapshot, snapshot.roots()[0], selector);
                assert_eq!(
                    result.reason.as_deref(),
                    Some("invalid selector syntax"),
                    "{selector:?}"
                );
            }
        }

        #[test]
        fn test_failures_carry_suggestions() {
            let snapshot = parse(r#"{"tag": "div", "uid": "u1"}"#);
            let result = validate_selector(&snapshot, snapshot.roots()[0], "#missing");
            assert!(result.suggestion.is_some());
        }
    }

    mod identity_tests {
        use super::*;

        fn nodes_of(json: &str) -> (Snapshot, NodeId, NodeId) {
            let snapshot = parse(json);
            let a = snapshot.roots()[0];
            let b = snapshot.roots()[1];
            (snapshot, a, b)
        }

        #[test]
        fn test_uid_rule_decides_first() {
            let (snapshot, a, b) = nodes_of(
                r#"[
                    {"tag": "input", "uid": "u1", "id": "same"},
                    {"tag": "input", "uid": "u2", "id": "same"}
                ]"#,
            );
            assert!(!same_element(snapshot.node(a), snapshot.node(b)));
        }

        #[test]
        fn test_matching_uids_are_equal() {
            let (snapshot, a, b) = nodes_of(
                r#"[
                    {"tag": "tr", "uid": "row-7"},
                    {"tag": "div", "uid": "row-7"}
                ]"#,
            );
            assert!(same_element(snapshot.node(a), snapshot.node(b)));
        }

        #[test]
        fn test_id_rule_without_uids() {
            let (snapshot, a, b) = nodes_of(
                r#"[
                    {"tag": "input", "id": "email"},
                    {"tag": "input", "id": "email"}
                ]"#,
            );
            assert!(same_element(snapshot.node(a), snapshot.node(b)));
        }

        #[test]
        fn test_test_id_values_compare_across_attribute_names() {
            let (snapshot, a, b) = nodes_of(
                r#"[
                    {"tag": "button", "attributes": {"data-testid": "save"}},
                    {"tag": "button", "attributes": {"data-cy": "save"}}
                ]"#,
            );
            assert!(same_element(snapshot.node(a), snapshot.node(b)));
        }

        #[test]
        fn test_tag_and_name_rule() {
            let (snapshot, a, b) = nodes_of(
                r#"[
                    {"tag": "input", "attributes": {"name": "q"}},
                    {"tag": "input", "attributes": {"name": "q"}}
                ]"#,
            );
            assert!(same_element(snapshot.node(a), snapshot.node(b)));
        }

        #[test]
        fn test_name_rule_requires_same_tag() {
            let (snapshot, a, b) = nodes_of(
                r#"[
                    {"tag": "input", "attributes": {"name": "q"}},
                    {"tag": "select", "attributes": {"name": "q"}}
                ]"#,
            );
            assert!(!same_element(snapshot.node(a), snapshot.node(b)));
        }

        #[test]
        fn test_unresolved_pairs_are_not_equal() {
            let (snapshot, a, b) = nodes_of(r#"[{"tag": "div"}, {"tag": "div"}]"#);
            assert!(!same_element(snapshot.node(a), snapshot.node(b)));
        }
    }

    mod report_tests {
        use super::*;

        #[test]
        fn test_from_results_counts() {
            let results = vec![
                ValidationResult::ok("#a"),
                ValidationResult::failed("#b", &FailureReason::NoMatch),
                ValidationResult::ok("[name]"),
            ];
            let report = ValidationReport::from_results(results);
            assert_eq!(report.total_selectors, 3);
            assert_eq!(report.valid_selectors, 2);
            assert_eq!(report.invalid_selectors, 1);
            assert_eq!(report.failures().count(), 1);
        }

        #[test]
        fn test_serializes_camel_case() {
            let report = ValidationReport::from_results(vec![ValidationResult::ok("#a")]);
            let json = serde_json::to_value(&report).unwrap();
            assert_eq!(json["totalSelectors"], 1);
            assert_eq!(json["results"][0]["isValid"], true);
            assert_eq!(json["results"][0]["matchesTargetElement"], true);
        }
    }
}
