//! Selector synthesis.
//!
//! Builds the ordered candidate list for one element, best candidates
//! first. Tiers append to a single accumulator in a fixed sequence; repeats
//! across tiers are kept (the validator tolerates them) and the list is cut
//! at [`MAX_CANDIDATES`]. Attribute scans run in sorted key order, so the
//! output is deterministic for identical input.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::escape::{css_attribute_value, xpath_literal};
use crate::framework::{classify, jet_attr_key, jet_class, spectra_attr_key, ComponentFramework};
use crate::snapshot::{normalize_attr_key, NodeId, Snapshot, TEST_ID_ATTRIBUTES};
use crate::stability::StabilityFilter;
use crate::text::{deep_text, label_text, placeholder_text, span_text};

/// Maximum candidates kept per element.
pub const MAX_CANDIDATES: usize = 5;

/// Upper bound on text length used in text-equality XPath candidates.
pub const TEXT_XPATH_MAX_LEN: usize = 100;

/// Text longer than this also gets a `contains()` candidate.
pub const TEXT_CONTAINS_MIN_LEN: usize = 10;

/// Prefix length used by the `contains()` candidate.
pub const TEXT_CONTAINS_PREFIX_LEN: usize = 20;

/// Ordered locator set synthesized for one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedLocators {
    /// Candidate selectors, best first, at most [`MAX_CANDIDATES`].
    pub selectors: Vec<String>,
    /// Framework detected for the element.
    pub component_framework: ComponentFramework,
    /// Visible text, span-aggregated when available.
    pub text_content: Option<String>,
    /// Resolved accessible label.
    pub label_text: Option<String>,
    /// Resolved placeholder.
    pub placeholder_text: Option<String>,
}

impl GeneratedLocators {
    /// Best candidate, when any was synthesized.
    #[must_use]
    pub fn primary(&self) -> Option<&str> {
        self.selectors.first().map(String::as_str)
    }

    /// True when at least one CSS-form candidate is present.
    #[must_use]
    pub fn has_css_candidate(&self) -> bool {
        self.selectors.iter().any(|s| !s.starts_with("//"))
    }

    /// True when at least one XPath-form candidate is present.
    #[must_use]
    pub fn has_xpath_candidate(&self) -> bool {
        self.selectors.iter().any(|s| s.starts_with("//"))
    }
}

/// Synthesizes the ordered locator set for the element at `id`.
#[must_use]
pub fn synthesize(snapshot: &Snapshot, id: NodeId) -> GeneratedLocators {
    let node = snapshot.node(id);
    let framework = classify(snapshot, id);
    let filter = StabilityFilter::new();

    let deep = deep_text(snapshot, id);
    let span = span_text(snapshot, id);
    let label = label_text(snapshot, id);
    let placeholder = placeholder_text(snapshot, id);
    let visible = if span.is_empty() { deep } else { span };

    let tag = node.tag.as_deref();
    let xpath_tag = tag.unwrap_or("*");

    let mut selectors = Vec::new();

    // Tier 1: test-id attributes.
    for attr in TEST_ID_ATTRIBUTES {
        if let Some(value) = node.attribute(attr) {
            selectors.push(format!(r#"[{attr}="{}"]"#, css_attribute_value(value)));
        }
    }

    // Tier 2: framework-stamped attributes.
    match framework {
        ComponentFramework::Spectra => {
            for (key, value) in &node.attributes {
                if spectra_attr_key(key) {
                    selectors.push(attr_selector(key, value));
                }
            }
        }
        ComponentFramework::Jet => {
            for (key, value) in &node.attributes {
                if jet_attr_key(key) {
                    selectors.push(attr_selector(key, value));
                }
            }
        }
        ComponentFramework::Redwood | ComponentFramework::Html => {}
    }

    // Tier 3: stable id.
    if let Some(element_id) = node.id.as_deref() {
        if filter.is_stable_id(element_id) {
            selectors.push(format!("#{element_id}"));
        }
    }

    // Tier 4: name attribute.
    if let Some(name) = node.attribute("name") {
        let escaped = css_attribute_value(name);
        selectors.push(format!(r#"[name="{escaped}"]"#));
        if let Some(tag) = tag {
            selectors.push(format!(r#"{tag}[name="{escaped}"]"#));
        }
    }

    // Tier 5: framework classes.
    let framework_classes = framework_classes(framework, node.classes.iter().map(String::as_str));
    if let Some(first) = framework_classes.first() {
        selectors.push(format!(".{first}"));
        if framework_classes.len() > 1 {
            selectors.push(combined_class_selector(&framework_classes));
        }
    }

    // Tier 6: aria.
    if let Some(value) = node.attribute("aria-label") {
        selectors.push(format!(r#"[aria-label="{}"]"#, css_attribute_value(value)));
    }
    if let Some(value) = node.attribute("aria-labelledby") {
        selectors.push(format!(
            r#"[aria-labelledby="{}"]"#,
            css_attribute_value(value)
        ));
    }
    if let Some(label) = label.as_deref() {
        selectors.push(format!(
            "//{xpath_tag}[@aria-label={}]",
            xpath_literal(label)
        ));
    }

    // Tier 7: input type.
    if let Some(type_value) = node.attribute("type") {
        let escaped = css_attribute_value(type_value);
        selectors.push(format!(r#"[type="{escaped}"]"#));
        if let Some(tag) = tag {
            selectors.push(format!(r#"{tag}[type="{escaped}"]"#));
            if let Some(name) = node.attribute("name") {
                selectors.push(format!(
                    r#"{tag}[name="{}"][type="{escaped}"]"#,
                    css_attribute_value(name)
                ));
            }
        }
    }

    // Tier 8: placeholder.
    if let Some(value) = node.attribute("placeholder") {
        let escaped = css_attribute_value(value);
        selectors.push(format!(r#"[placeholder="{escaped}"]"#));
        if let Some(tag) = tag {
            selectors.push(format!(r#"{tag}[placeholder="{escaped}"]"#));
        }
    }
    if let Some(placeholder) = placeholder.as_deref() {
        selectors.push(format!(
            "//{xpath_tag}[@placeholder={}]",
            xpath_literal(placeholder)
        ));
    }

    // Tier 9: visible text.
    if !visible.is_empty() && visible.chars().count() < TEXT_XPATH_MAX_LEN {
        selectors.push(format!(
            "//{xpath_tag}[normalize-space(text())={}]",
            xpath_literal(&visible)
        ));
        if visible.chars().count() > TEXT_CONTAINS_MIN_LEN {
            let prefix: String = visible.chars().take(TEXT_CONTAINS_PREFIX_LEN).collect();
            selectors.push(format!(
                "//{xpath_tag}[contains(text(),{})]",
                xpath_literal(&prefix)
            ));
        }
    }
    if let Some(label) = label.as_deref() {
        if label.chars().count() < TEXT_XPATH_MAX_LEN {
            selectors.push(format!(
                "//{xpath_tag}[normalize-space(.)={}]",
                xpath_literal(label)
            ));
        }
    }

    // Tier 10: stable classes.
    let stable = filter.stable_classes(node);
    if let Some(first) = stable.first() {
        selectors.push(format!(".{first}"));
        if (2..=3).contains(&stable.len()) {
            selectors.push(combined_class_selector(&stable));
        }
    }

    // Tier 11: XPath fallbacks.
    if let Some(element_id) = node.id.as_deref() {
        if filter.is_stable_id(element_id) {
            selectors.push(format!("//{xpath_tag}[@id={}]", xpath_literal(element_id)));
        }
    }
    if let Some(name) = node.attribute("name") {
        selectors.push(format!("//{xpath_tag}[@name={}]", xpath_literal(name)));
    }
    if let Some(role) = node.attribute("role") {
        selectors.push(format!("//{xpath_tag}[@role={}]", xpath_literal(role)));
    }
    match framework {
        ComponentFramework::Spectra => {
            for (key, value) in &node.attributes {
                if normalize_attr_key(key).starts_with("sp-") {
                    selectors.push(xpath_attr_selector(xpath_tag, key, value));
                }
            }
        }
        ComponentFramework::Jet => {
            for (key, value) in &node.attributes {
                if jet_attr_key(key) {
                    selectors.push(xpath_attr_selector(xpath_tag, key, value));
                }
            }
        }
        ComponentFramework::Redwood | ComponentFramework::Html => {}
    }

    selectors.truncate(MAX_CANDIDATES);
    debug!(
        count = selectors.len(),
        framework = %framework,
        "synthesized locator candidates"
    );

    GeneratedLocators {
        selectors,
        component_framework: framework,
        text_content: if visible.is_empty() {
            None
        } else {
            Some(visible)
        },
        label_text: label,
        placeholder_text: placeholder,
    }
}

/// Class tokens belonging to the classified framework, document order.
fn framework_classes<'a>(
    framework: ComponentFramework,
    classes: impl Iterator<Item = &'a str>,
) -> Vec<&'a str> {
    match framework {
        ComponentFramework::Spectra => classes
            .filter(|c| c.starts_with("sp-") || c.starts_with("oj-spectra-"))
            .collect(),
        ComponentFramework::Jet => classes.filter(|c| jet_class(c)).collect(),
        ComponentFramework::Redwood => classes.filter(|c| c.starts_with("oj-redwood-")).collect(),
        ComponentFramework::Html => Vec::new(),
    }
}

fn attr_selector(key: &str, value: &str) -> String {
    format!(
        r#"[{}="{}"]"#,
        normalize_attr_key(key),
        css_attribute_value(value)
    )
}

fn xpath_attr_selector(tag: &str, key: &str, value: &str) -> String {
    format!(
        "//{tag}[@{}={}]",
        normalize_attr_key(key),
        xpath_literal(value)
    )
}

fn combined_class_selector(classes: &[&str]) -> String {
    classes.iter().map(|class| format!(".{class}")).collect()
}
