//! Component framework classification.
//!
//! Elements rendered by a UI toolkit carry characteristic prefixes on their
//! classes, attributes, and tags. Classification inspects the element itself
//! and up to [`FRAMEWORK_ANCESTOR_LEVELS`] ancestors, so leaf nodes inherit
//! the toolkit of the component that wraps them. Spectra outranks JET, JET
//! outranks Redwood, and the nearest matching node wins.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::snapshot::{normalize_attr_key, ElementNode, NodeId, Snapshot};

/// Ancestor levels inspected when classifying an element.
pub const FRAMEWORK_ANCESTOR_LEVELS: usize = 5;

/// UI toolkit detected for an element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentFramework {
    /// Spectra design system (`sp-` prefixes)
    Spectra,
    /// Oracle JET (`oj-` prefixes)
    Jet,
    /// Redwood theme (`oj-redwood-` and `redwood-` prefixes)
    Redwood,
    /// Plain HTML, no toolkit detected
    #[default]
    Html,
}

impl ComponentFramework {
    /// True when no toolkit was detected.
    #[must_use]
    pub const fn is_html(self) -> bool {
        matches!(self, Self::Html)
    }

    /// Wire name of the framework.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spectra => "spectra",
            Self::Jet => "jet",
            Self::Redwood => "redwood",
            Self::Html => "html",
        }
    }
}

impl fmt::Display for ComponentFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies the element at `id`, walking ancestors until a toolkit signal
/// appears or [`FRAMEWORK_ANCESTOR_LEVELS`] levels are exhausted.
#[must_use]
pub fn classify(snapshot: &Snapshot, id: NodeId) -> ComponentFramework {
    let mut current = Some(id);
    for _ in 0..=FRAMEWORK_ANCESTOR_LEVELS {
        let Some(node_id) = current else { break };
        let node = snapshot.node(node_id);
        if let Some(framework) = classify_node(node) {
            return framework;
        }
        current = node.parent;
    }
    ComponentFramework::Html
}

/// Toolkit signals on a single node, checked in priority order.
fn classify_node(node: &ElementNode) -> Option<ComponentFramework> {
    if is_spectra(node) {
        return Some(ComponentFramework::Spectra);
    }
    if is_jet(node) {
        return Some(ComponentFramework::Jet);
    }
    if is_redwood(node) {
        return Some(ComponentFramework::Redwood);
    }
    None
}

/// True for attribute keys the Spectra toolkit stamps on its elements.
pub(crate) fn spectra_attr_key(key: &str) -> bool {
    let key = normalize_attr_key(key);
    key.starts_with("sp-") || key.starts_with("data-spectra-")
}

/// True for attribute keys the JET toolkit stamps on its elements.
pub(crate) fn jet_attr_key(key: &str) -> bool {
    normalize_attr_key(key).starts_with("data-oj-")
}

/// True for JET class tokens. The `oj-` namespace is shared, so Spectra and
/// Redwood sub-prefixes are excluded here.
pub(crate) fn jet_class(token: &str) -> bool {
    token.starts_with("oj-")
        && !token.starts_with("oj-spectra-")
        && !token.starts_with("oj-redwood-")
}

fn is_spectra(node: &ElementNode) -> bool {
    if node.id.as_deref().is_some_and(|id| id.starts_with("sp-")) {
        return true;
    }
    if node.classes.iter().any(|class| {
        class.starts_with("sp-") || class.starts_with("oj-spectra-") || class.starts_with("spectra-")
    }) {
        return true;
    }
    if node.attributes.keys().any(|key| spectra_attr_key(key)) {
        return true;
    }
    if node.attributes.values().any(|value| value.starts_with("sp-")) {
        return true;
    }
    node.tag.as_deref().is_some_and(|tag| tag.starts_with("sp-"))
}

fn is_jet(node: &ElementNode) -> bool {
    if node.classes.iter().any(|class| jet_class(class)) {
        return true;
    }
    if node.attributes.keys().any(|key| jet_attr_key(key)) {
        return true;
    }
    node.tag.as_deref().is_some_and(|tag| {
        tag.starts_with("oj-")
            && !tag.starts_with("oj-spectra-")
            && !tag.starts_with("oj-redwood-")
    })
}

fn is_redwood(node: &ElementNode) -> bool {
    if node
        .classes
        .iter()
        .any(|class| class.starts_with("oj-redwood-") || class.starts_with("redwood-"))
    {
        return true;
    }
    if node
        .attributes
        .keys()
        .any(|key| normalize_attr_key(key).starts_with("redwood-"))
    {
        return true;
    }
    node.attributes.values().any(|value| value.contains("redwood"))
}
