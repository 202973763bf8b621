//! Text facet resolution.
//!
//! Four views of an element's text feed selector synthesis: the deep subtree
//! text, a span-aggregated variant for fragmented markup, the accessible
//! label, and the effective placeholder. Absent facets are `None`, never an
//! empty string.

use crate::snapshot::{ElementNode, NodeId, Snapshot};

/// Ancestor levels walked when resolving a label.
pub const LABEL_ANCESTOR_LEVELS: usize = 5;

/// Ancestor levels walked when resolving an inherited placeholder.
pub const PLACEHOLDER_ANCESTOR_LEVELS: usize = 3;

/// Collapses whitespace runs to single spaces and trims the ends.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// All text under `id` in document order, whitespace-normalized. Empty when
/// the subtree has no text.
#[must_use]
pub fn deep_text(snapshot: &Snapshot, id: NodeId) -> String {
    let mut pieces = Vec::new();
    collect_deep(snapshot, id, &mut pieces);
    normalize_whitespace(&pieces.join(" "))
}

fn collect_deep<'a>(snapshot: &'a Snapshot, id: NodeId, pieces: &mut Vec<&'a str>) {
    let node = snapshot.node(id);
    if let Some(text) = node.text.as_deref() {
        if !text.trim().is_empty() {
            pieces.push(text);
        }
    }
    for &child in &node.children {
        collect_deep(snapshot, child, pieces);
    }
}

/// Text under `id` with `span` subtrees folded in as single units.
///
/// Fragmented markup splits one visible string across nested spans; taking
/// each span's deep text as one piece keeps the visible order without
/// double-counting nested spans.
#[must_use]
pub fn span_text(snapshot: &Snapshot, id: NodeId) -> String {
    let mut pieces = Vec::new();
    let node = snapshot.node(id);
    if let Some(text) = node.text.as_deref() {
        if !text.trim().is_empty() {
            pieces.push(text.to_string());
        }
    }
    for &child in &node.children {
        collect_span(snapshot, child, &mut pieces);
    }
    normalize_whitespace(&pieces.join(" "))
}

fn collect_span(snapshot: &Snapshot, id: NodeId, pieces: &mut Vec<String>) {
    let node = snapshot.node(id);
    if node.tag_is("span") {
        let aggregated = deep_text(snapshot, id);
        if !aggregated.is_empty() {
            pieces.push(aggregated);
        }
        return;
    }
    if let Some(text) = node.text.as_deref() {
        if !text.trim().is_empty() {
            pieces.push(text.to_string());
        }
    }
    for &child in &node.children {
        collect_span(snapshot, child, pieces);
    }
}

/// Accessible label for the element at `id`.
///
/// Resolution order: own `aria-label`, the element referenced by
/// `aria-labelledby`, any `label[for]` targeting the element's id, then up
/// to [`LABEL_ANCESTOR_LEVELS`] ancestors accepting a wrapping label or,
/// among the ancestor's direct children, a label whose `for` names this
/// element's id. First non-empty hit wins.
#[must_use]
pub fn label_text(snapshot: &Snapshot, id: NodeId) -> Option<String> {
    let node = snapshot.node(id);

    if let Some(label) = non_empty(node.attribute("aria-label")) {
        return Some(label);
    }

    if let Some(reference) = non_empty(node.attribute("aria-labelledby")) {
        if let Some(target) = snapshot.find_by_id(&reference) {
            let text = deep_text(snapshot, target);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }

    if let Some(element_id) = node.id.as_deref() {
        if let Some(text) = label_for_target(snapshot, element_id) {
            return Some(text);
        }
    }

    for ancestor_id in snapshot.ancestors(id).take(LABEL_ANCESTOR_LEVELS) {
        let ancestor = snapshot.node(ancestor_id);
        if ancestor.tag_is("label") {
            let text = deep_text(snapshot, ancestor_id);
            if !text.is_empty() {
                return Some(text);
            }
            continue;
        }
        let Some(element_id) = node.id.as_deref() else {
            continue;
        };
        for &child in &ancestor.children {
            let candidate = snapshot.node(child);
            if candidate.tag_is("label") && for_target(candidate) == Some(element_id) {
                let text = deep_text(snapshot, child);
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
    }

    None
}

/// Deep text of the first `label[for]` (or `htmlFor`) targeting `element_id`
/// anywhere in the snapshot.
fn label_for_target(snapshot: &Snapshot, element_id: &str) -> Option<String> {
    for (label_id, node) in snapshot.iter() {
        if !node.tag_is("label") {
            continue;
        }
        if for_target(node) == Some(element_id) {
            let text = deep_text(snapshot, label_id);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// `for` target of a label node, accepting the `htmlFor` spelling.
fn for_target(node: &ElementNode) -> Option<&str> {
    node.attribute("for").or_else(|| node.attribute("htmlFor"))
}

/// Effective placeholder for the element at `id`: its own `placeholder`,
/// its `aria-placeholder`, or one inherited from up to
/// [`PLACEHOLDER_ANCESTOR_LEVELS`] ancestors.
#[must_use]
pub fn placeholder_text(snapshot: &Snapshot, id: NodeId) -> Option<String> {
    let node = snapshot.node(id);
    if let Some(value) = non_empty(node.attribute("placeholder")) {
        return Some(value);
    }
    if let Some(value) = non_empty(node.attribute("aria-placeholder")) {
        return Some(value);
    }
    for ancestor_id in snapshot.ancestors(id).take(PLACEHOLDER_ANCESTOR_LEVELS) {
        if let Some(value) = non_empty(snapshot.node(ancestor_id).attribute("placeholder")) {
            return Some(value);
        }
    }
    None
}

/// Keeps attribute values that carry visible content, preserving them as
/// captured. Whitespace-only values count as absent.
fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}
