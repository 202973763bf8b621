//! Page snapshot model.
//!
//! Snapshots arrive as JSON trees captured from a live page. Parsing flattens
//! the tree into an arena: every element lives in a single `Vec` in document
//! order and refers to its parent and children by [`NodeId`], so traversal
//! never chases pointers and ids stay valid for the snapshot's lifetime.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::result::{LocatorError, LocatorResult};

/// Attributes test suites use to tag elements for selection, highest
/// priority first.
pub const TEST_ID_ATTRIBUTES: [&str; 3] = ["data-testid", "data-cy", "data-test"];

/// Index of an element within a [`Snapshot`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the element in document order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Canonical form of an attribute key: camelCase spellings become
/// hyphenated lowercase, hyphenated spellings pass through.
///
/// `dataTestid` and `data-testid` normalize to the same key, so lookups
/// succeed regardless of how the capture tool spelled the attribute.
#[must_use]
pub fn normalize_attr_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// A single element in a flattened snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    /// Tag name, when the capture recorded one.
    pub tag: Option<String>,
    /// The `id` attribute.
    pub id: Option<String>,
    /// Class attribute split into raw tokens, order preserved.
    pub classes: Vec<String>,
    /// Remaining attributes as captured.
    pub attributes: BTreeMap<String, String>,
    /// Direct text content.
    pub text: Option<String>,
    /// Capture-time unique identifier.
    pub uid: Option<String>,
    /// Parent element, `None` for roots.
    pub parent: Option<NodeId>,
    /// Child elements in document order.
    pub children: Vec<NodeId>,
}

impl ElementNode {
    /// Looks up an attribute, accepting hyphenated or camelCase spellings.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.attributes.get(name) {
            return Some(value);
        }
        let want = normalize_attr_key(name);
        self.attributes
            .iter()
            .find(|(key, _)| normalize_attr_key(key) == want)
            .map(|(_, value)| value.as_str())
    }

    /// True when the attribute is present under any accepted spelling.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// First test-id attribute present, as `(attribute, value)`.
    #[must_use]
    pub fn test_id(&self) -> Option<(&'static str, &str)> {
        TEST_ID_ATTRIBUTES
            .iter()
            .find_map(|attr| self.attribute(attr).map(|value| (*attr, value)))
    }

    /// True when the tag matches, ignoring case.
    #[must_use]
    pub fn tag_is(&self, name: &str) -> bool {
        self.tag
            .as_deref()
            .is_some_and(|tag| tag.eq_ignore_ascii_case(name))
    }

    /// True when the class token is present.
    #[must_use]
    pub fn has_class(&self, token: &str) -> bool {
        self.classes.iter().any(|class| class == token)
    }

    /// True for form controls, links, and elements tagged for interaction.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        const INTERACTIVE_TAGS: [&str; 6] = ["input", "button", "select", "textarea", "option", "a"];
        if self
            .tag
            .as_deref()
            .is_some_and(|tag| INTERACTIVE_TAGS.iter().any(|t| tag.eq_ignore_ascii_case(t)))
        {
            return true;
        }
        self.has_attribute("role") || self.test_id().is_some() || self.has_attribute("onclick")
    }
}

/// Wire form of a captured element: a tree node with nested children.
#[derive(Debug, Clone, Deserialize)]
struct RawElement {
    tag: Option<String>,
    id: Option<String>,
    class: Option<String>,
    #[serde(default)]
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    #[serde(default)]
    children: Vec<RawElement>,
    #[serde(alias = "_uid")]
    uid: Option<String>,
}

/// Accepted top-level snapshot shapes: a capture document, a bare element
/// array, or a single root element.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSnapshot {
    Document {
        url: Option<String>,
        timestamp: Option<String>,
        elements: Vec<RawElement>,
    },
    Elements(Vec<RawElement>),
    Single(RawElement),
}

/// A captured page snapshot, flattened into an arena.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// URL the capture was taken from, when recorded.
    pub url: Option<String>,
    /// Capture timestamp, when recorded.
    pub timestamp: Option<String>,
    nodes: Vec<ElementNode>,
    roots: Vec<NodeId>,
}

impl Snapshot {
    /// Parses a snapshot from its JSON wire form.
    pub fn from_json(input: &str) -> LocatorResult<Self> {
        let raw: RawSnapshot = serde_json::from_str(input)
            .map_err(|e| LocatorError::snapshot_parse(e.to_string()))?;
        Ok(Self::from_raw(raw))
    }

    /// Reads and parses a snapshot file.
    pub fn load(path: impl AsRef<Path>) -> LocatorResult<Self> {
        let input = std::fs::read_to_string(path)?;
        Self::from_json(&input)
    }

    fn from_raw(raw: RawSnapshot) -> Self {
        let (url, timestamp, elements) = match raw {
            RawSnapshot::Document {
                url,
                timestamp,
                elements,
            } => (url, timestamp, elements),
            RawSnapshot::Elements(elements) => (None, None, elements),
            RawSnapshot::Single(element) => (None, None, vec![element]),
        };
        let mut nodes = Vec::new();
        let mut roots = Vec::new();
        for element in elements {
            let id = flatten_into(&mut nodes, element, None);
            roots.push(id);
        }
        Self {
            url,
            timestamp,
            nodes,
            roots,
        }
    }

    /// Number of elements in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the snapshot holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrows an element by id.
    ///
    /// # Panics
    ///
    /// Panics when the id came from a different snapshot and is out of range.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &ElementNode {
        &self.nodes[id.0]
    }

    /// Borrows an element by id, `None` when out of range.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&ElementNode> {
        self.nodes.get(id.0)
    }

    /// Root elements in document order.
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// All element ids in document order.
    pub fn iter_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// All elements with their ids in document order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &ElementNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index), node))
    }

    /// First element whose capture uid equals `uid`.
    #[must_use]
    pub fn find_by_uid(&self, uid: &str) -> Option<NodeId> {
        self.iter()
            .find(|(_, node)| node.uid.as_deref() == Some(uid))
            .map(|(id, _)| id)
    }

    /// First element in document order whose `id` attribute equals `id`.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.iter()
            .find(|(_, node)| node.id.as_deref() == Some(id))
            .map(|(id, _)| id)
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut current = self.node(id).parent;
        std::iter::from_fn(move || {
            let next = current?;
            current = self.node(next).parent;
            Some(next)
        })
    }

    /// Elements a test would interact with, in document order.
    #[must_use]
    pub fn interactive_elements(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, node)| node.is_interactive())
            .map(|(id, _)| id)
            .collect()
    }
}

fn flatten_into(nodes: &mut Vec<ElementNode>, raw: RawElement, parent: Option<NodeId>) -> NodeId {
    let RawElement {
        tag,
        id,
        class,
        attributes,
        text,
        children,
        uid,
    } = raw;
    let node_id = NodeId(nodes.len());
    let classes = class
        .as_deref()
        .map(|value| value.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();
    nodes.push(ElementNode {
        tag,
        id,
        classes,
        attributes,
        text,
        uid,
        parent,
        children: Vec::new(),
    });
    let child_ids: Vec<NodeId> = children
        .into_iter()
        .map(|child| flatten_into(nodes, child, Some(node_id)))
        .collect();
    nodes[node_id.0].children = child_ids;
    node_id
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn login_form_json() -> &'static str {
        r#"{
            "url": "https://app.example.com/login",
            "timestamp": "2025-11-02T10:15:00Z",
            "elements": [{
                "tag": "form",
                "id": "login-form",
                "uid": "uid-form",
                "children": [
                    {
                        "tag": "label",
                        "attributes": {"for": "username"},
                        "text": "Username"
                    },
                    {
                        "tag": "input",
                        "id": "username",
                        "uid": "uid-username",
                        "attributes": {"type": "text", "name": "username", "data-testid": "login-username"}
                    },
                    {
                        "tag": "button",
                        "uid": "uid-submit",
                        "class": "btn btn-primary",
                        "attributes": {"type": "submit"},
                        "text": "Sign In"
                    }
                ]
            }]
        }"#
    }

    mod parse_tests {
        use super::*;

        #[test]
        fn test_parses_capture_document() {
            let snapshot = Snapshot::from_json(login_form_json()).unwrap();
            assert_eq!(snapshot.url.as_deref(), Some("https://app.example.com/login"));
            assert_eq!(snapshot.len(), 4);
            assert_eq!(snapshot.roots().len(), 1);
        }

        #[test]
        fn test_parses_bare_element_array() {
            let snapshot =
                Snapshot::from_json(r#"[{"tag": "div"}, {"tag": "span", "text": "hi"}]"#).unwrap();
            assert_eq!(snapshot.len(), 2);
            assert_eq!(snapshot.roots().len(), 2);
            assert!(snapshot.url.is_none());
        }

        #[test]
        fn test_parses_single_root_element() {
            let snapshot =
                Snapshot::from_json(r#"{"tag": "button", "text": "OK"}"#).unwrap();
            assert_eq!(snapshot.len(), 1);
            assert!(snapshot.node(snapshot.roots()[0]).tag_is("button"));
        }

        #[test]
        fn test_malformed_json_is_parse_error() {
            let err = Snapshot::from_json("{not json").unwrap_err();
            assert!(matches!(err, LocatorError::SnapshotParse { .. }));
        }

        #[test]
        fn test_parent_and_child_links() {
            let snapshot = Snapshot::from_json(login_form_json()).unwrap();
            let form = snapshot.roots()[0];
            let children = &snapshot.node(form).children;
            assert_eq!(children.len(), 3);
            for &child in children {
                assert_eq!(snapshot.node(child).parent, Some(form));
            }
        }

        #[test]
        fn test_document_order_is_depth_first() {
            let snapshot = Snapshot::from_json(
                r#"{"tag": "div", "children": [
                    {"tag": "section", "children": [{"tag": "p"}]},
                    {"tag": "footer"}
                ]}"#,
            )
            .unwrap();
            let tags: Vec<_> = snapshot
                .iter()
                .map(|(_, node)| node.tag.clone().unwrap())
                .collect();
            assert_eq!(tags, ["div", "section", "p", "footer"]);
        }

        #[test]
        fn test_class_attribute_splits_into_tokens() {
            let snapshot =
                Snapshot::from_json(r#"{"tag": "div", "class": "  oj-button   active  active "}"#)
                    .unwrap();
            let node = snapshot.node(snapshot.roots()[0]);
            assert_eq!(node.classes, ["oj-button", "active", "active"]);
        }

        #[test]
        fn test_uid_accepts_underscore_alias() {
            let snapshot = Snapshot::from_json(r#"{"tag": "div", "_uid": "alias-uid"}"#).unwrap();
            assert_eq!(
                snapshot.node(snapshot.roots()[0]).uid.as_deref(),
                Some("alias-uid")
            );
        }
    }

    mod attribute_tests {
        use super::*;

        #[test]
        fn test_normalize_attr_key() {
            assert_eq!(normalize_attr_key("dataTestid"), "data-testid");
            assert_eq!(normalize_attr_key("data-testid"), "data-testid");
            assert_eq!(normalize_attr_key("htmlFor"), "html-for");
            assert_eq!(normalize_attr_key("placeholder"), "placeholder");
        }

        #[test]
        fn test_attribute_lookup_accepts_either_spelling() {
            let snapshot = Snapshot::from_json(
                r#"{"tag": "input", "attributes": {"dataTestid": "first-name", "aria-label": "First name"}}"#,
            )
            .unwrap();
            let node = snapshot.node(snapshot.roots()[0]);
            assert_eq!(node.attribute("data-testid"), Some("first-name"));
            assert_eq!(node.attribute("dataTestid"), Some("first-name"));
            assert_eq!(node.attribute("ariaLabel"), Some("First name"));
            assert_eq!(node.attribute("missing"), None);
        }

        #[test]
        fn test_test_id_priority_order() {
            let snapshot = Snapshot::from_json(
                r#"{"tag": "div", "attributes": {"data-cy": "cy-id", "data-testid": "test-id"}}"#,
            )
            .unwrap();
            let node = snapshot.node(snapshot.roots()[0]);
            assert_eq!(node.test_id(), Some(("data-testid", "test-id")));
        }

        #[test]
        fn test_test_id_falls_back_to_later_attributes() {
            let snapshot =
                Snapshot::from_json(r#"{"tag": "div", "attributes": {"data-test": "plain"}}"#)
                    .unwrap();
            let node = snapshot.node(snapshot.roots()[0]);
            assert_eq!(node.test_id(), Some(("data-test", "plain")));
        }
    }

    mod lookup_tests {
        use super::*;

        #[test]
        fn test_find_by_uid() {
            let snapshot = Snapshot::from_json(login_form_json()).unwrap();
            let id = snapshot.find_by_uid("uid-submit").unwrap();
            assert!(snapshot.node(id).tag_is("button"));
            assert!(snapshot.find_by_uid("uid-missing").is_none());
        }

        #[test]
        fn test_find_by_id_takes_first_in_document_order() {
            let snapshot = Snapshot::from_json(
                r#"[{"tag": "div", "id": "dup"}, {"tag": "span", "id": "dup"}]"#,
            )
            .unwrap();
            let id = snapshot.find_by_id("dup").unwrap();
            assert!(snapshot.node(id).tag_is("div"));
        }

        #[test]
        fn test_ancestors_nearest_first() {
            let snapshot = Snapshot::from_json(
                r#"{"tag": "main", "children": [{"tag": "section", "children": [{"tag": "p"}]}]}"#,
            )
            .unwrap();
            let p = snapshot
                .iter()
                .find(|(_, node)| node.tag_is("p"))
                .map(|(id, _)| id)
                .unwrap();
            let tags: Vec<_> = snapshot
                .ancestors(p)
                .map(|id| snapshot.node(id).tag.clone().unwrap())
                .collect();
            assert_eq!(tags, ["section", "main"]);
        }
    }

    mod interactive_tests {
        use super::*;

        #[test]
        fn test_form_controls_and_links_are_interactive() {
            let snapshot = Snapshot::from_json(
                r#"[{"tag": "input"}, {"tag": "a"}, {"tag": "div"}, {"tag": "p", "text": "copy"}]"#,
            )
            .unwrap();
            assert_eq!(snapshot.interactive_elements().len(), 2);
        }

        #[test]
        fn test_role_and_test_id_mark_interactive() {
            let snapshot = Snapshot::from_json(
                r#"[
                    {"tag": "div", "attributes": {"role": "button"}},
                    {"tag": "div", "attributes": {"data-cy": "card"}},
                    {"tag": "div", "attributes": {"onclick": "go()"}}
                ]"#,
            )
            .unwrap();
            assert_eq!(snapshot.interactive_elements().len(), 3);
        }
    }
}
