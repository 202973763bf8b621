//! Static selector engine.
//!
//! Parses the candidate grammar into typed selectors and evaluates them
//! against a snapshot without touching a browser. The CSS side covers
//! compound selectors over one element (`tag`, `#id`, `.class`, `[attr]`,
//! `[attr="value"]`); the XPath side covers the `//tag[predicate]` shapes
//! synthesis emits, including `concat()` literals. Anything outside the
//! grammar fails to parse, and the validator reports that as invalid
//! syntax rather than guessing.

use crate::snapshot::{ElementNode, NodeId, Snapshot};
use crate::text::{deep_text, normalize_whitespace};

/// A parsed selector in either supported language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedSelector {
    /// Compound CSS selector.
    Css(CssSelector),
    /// Single-step XPath with one predicate.
    XPath(XPathSelector),
}

/// Compound CSS selector over a single element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssSelector {
    /// Required tag name, if any.
    pub tag: Option<String>,
    /// Required id, if any.
    pub id: Option<String>,
    /// Class tokens that must all be present.
    pub classes: Vec<String>,
    /// Attribute checks that must all hold.
    pub attributes: Vec<AttributeCheck>,
}

impl CssSelector {
    /// True when `node` satisfies every component of the selector.
    #[must_use]
    pub fn matches(&self, node: &ElementNode) -> bool {
        if let Some(tag) = &self.tag {
            if !node.tag_is(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| node.has_class(class)) {
            return false;
        }
        self.attributes.iter().all(|check| check.matches(node))
    }
}

/// One `[attr]` or `[attr="value"]` component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeCheck {
    /// Attribute name as written in the selector.
    pub name: String,
    /// Expected value; `None` means bare existence.
    pub value: Option<String>,
}

impl AttributeCheck {
    /// True when the check holds for `node`. Lookup accepts hyphenated and
    /// camelCase spellings of the attribute name.
    #[must_use]
    pub fn matches(&self, node: &ElementNode) -> bool {
        match &self.value {
            Some(expected) => node.attribute(&self.name) == Some(expected.as_str()),
            None => node.has_attribute(&self.name),
        }
    }
}

/// Single-step XPath selector: `//tag[predicate]`, tag `*` for any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XPathSelector {
    /// Tag name, `*` matching any element.
    pub tag: String,
    /// The bracketed predicate.
    pub predicate: XPathPredicate,
}

/// Supported XPath predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XPathPredicate {
    /// `[@name="value"]`
    AttributeEquals {
        /// Attribute name.
        name: String,
        /// Expected value.
        value: String,
    },
    /// `[contains(text(), "value")]`
    TextContains(String),
    /// `[normalize-space(text())="value"]`
    TextEquals(String),
    /// `[normalize-space(.)="value"]`
    DeepTextEquals(String),
}

impl XPathSelector {
    /// True when the element at `id` satisfies tag and predicate.
    ///
    /// Text predicates tolerate fragmented markup: `text()` forms accept a
    /// match on either the node's direct text or its deep text, while the
    /// `.` form compares deep text only.
    #[must_use]
    pub fn matches(&self, snapshot: &Snapshot, id: NodeId) -> bool {
        let node = snapshot.node(id);
        if self.tag != "*" && !node.tag_is(&self.tag) {
            return false;
        }
        match &self.predicate {
            XPathPredicate::AttributeEquals { name, value } => {
                node.attribute(name) == Some(value.as_str())
            }
            XPathPredicate::TextContains(value) => {
                direct_text(node).contains(value.as_str())
                    || deep_text(snapshot, id).contains(value.as_str())
            }
            XPathPredicate::TextEquals(value) => {
                direct_text(node) == *value || deep_text(snapshot, id) == *value
            }
            XPathPredicate::DeepTextEquals(value) => deep_text(snapshot, id) == *value,
        }
    }
}

fn direct_text(node: &ElementNode) -> String {
    normalize_whitespace(node.text.as_deref().unwrap_or(""))
}

/// Parses a selector string, `None` when it falls outside the supported
/// grammar.
#[must_use]
pub fn parse(selector: &str) -> Option<ParsedSelector> {
    let trimmed = selector.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(rest) = trimmed.strip_prefix("//") {
        parse_xpath(rest).map(ParsedSelector::XPath)
    } else {
        parse_css(trimmed).map(ParsedSelector::Css)
    }
}

/// All elements matching `selector`, collected depth-first in document
/// order. Every node is visited; the engine never stops at the first hit.
#[must_use]
pub fn find_matches(snapshot: &Snapshot, selector: &ParsedSelector) -> Vec<NodeId> {
    snapshot
        .iter_ids()
        .filter(|&id| matches_node(snapshot, id, selector))
        .collect()
}

/// True when the element at `id` matches `selector`.
#[must_use]
pub fn matches_node(snapshot: &Snapshot, id: NodeId, selector: &ParsedSelector) -> bool {
    match selector {
        ParsedSelector::Css(css) => css.matches(snapshot.node(id)),
        ParsedSelector::XPath(xpath) => xpath.matches(snapshot, id),
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn parse_css(input: &str) -> Option<CssSelector> {
    let chars: Vec<char> = input.chars().collect();
    let mut pos = 0;
    let mut selector = CssSelector::default();

    if pos < chars.len() && (chars[pos].is_ascii_alphabetic() || chars[pos] == '_') {
        let name = take_name(&chars, &mut pos);
        selector.tag = Some(name);
    }

    while pos < chars.len() {
        match chars[pos] {
            '#' => {
                pos += 1;
                let name = take_name(&chars, &mut pos);
                if name.is_empty() {
                    return None;
                }
                selector.id = Some(name);
            }
            '.' => {
                pos += 1;
                let name = take_name(&chars, &mut pos);
                if name.is_empty() {
                    return None;
                }
                selector.classes.push(name);
            }
            '[' => {
                pos += 1;
                let check = take_attribute(&chars, &mut pos)?;
                selector.attributes.push(check);
            }
            // Combinators, pseudo-classes, and whitespace are outside the
            // supported grammar.
            _ => return None,
        }
    }

    if selector == CssSelector::default() {
        return None;
    }
    Some(selector)
}

fn take_name(chars: &[char], pos: &mut usize) -> String {
    let start = *pos;
    while *pos < chars.len() && is_name_char(chars[*pos]) {
        *pos += 1;
    }
    chars[start..*pos].iter().collect()
}

/// Parses the remainder of an attribute component after the opening `[`.
fn take_attribute(chars: &[char], pos: &mut usize) -> Option<AttributeCheck> {
    let name = take_name(chars, pos);
    if name.is_empty() || *pos >= chars.len() {
        return None;
    }
    match chars[*pos] {
        ']' => {
            *pos += 1;
            Some(AttributeCheck { name, value: None })
        }
        '=' => {
            *pos += 1;
            let value = take_quoted(chars, pos)?;
            if *pos >= chars.len() || chars[*pos] != ']' {
                return None;
            }
            *pos += 1;
            Some(AttributeCheck {
                name,
                value: Some(value),
            })
        }
        _ => None,
    }
}

/// Parses a quoted value with backslash escapes.
fn take_quoted(chars: &[char], pos: &mut usize) -> Option<String> {
    if *pos >= chars.len() {
        return None;
    }
    let quote = chars[*pos];
    if quote != '"' && quote != '\'' {
        return None;
    }
    *pos += 1;
    let mut value = String::new();
    while *pos < chars.len() && chars[*pos] != quote {
        if chars[*pos] == '\\' && *pos + 1 < chars.len() {
            *pos += 1;
        }
        value.push(chars[*pos]);
        *pos += 1;
    }
    if *pos >= chars.len() {
        return None;
    }
    *pos += 1;
    Some(value)
}

fn parse_xpath(rest: &str) -> Option<XPathSelector> {
    let open = rest.find('[')?;
    let tag = rest[..open].trim();
    if tag.is_empty() || (tag != "*" && !tag.chars().all(is_name_char)) {
        return None;
    }
    let body = rest[open + 1..].strip_suffix(']')?;
    let predicate = parse_predicate(body.trim())?;
    Some(XPathSelector {
        tag: tag.to_string(),
        predicate,
    })
}

fn parse_predicate(body: &str) -> Option<XPathPredicate> {
    if let Some(rest) = body.strip_prefix('@') {
        let eq = rest.find('=')?;
        let name = rest[..eq].trim();
        if name.is_empty() || !name.chars().all(is_name_char) {
            return None;
        }
        let value = parse_literal(rest[eq + 1..].trim())?;
        return Some(XPathPredicate::AttributeEquals {
            name: name.to_string(),
            value,
        });
    }
    if let Some(rest) = body.strip_prefix("contains(text()") {
        let rest = rest.trim_start().strip_prefix(',')?;
        let inner = rest.trim().strip_suffix(')')?;
        let value = parse_literal(inner.trim())?;
        return Some(XPathPredicate::TextContains(value));
    }
    if let Some(rest) = body.strip_prefix("normalize-space(text())") {
        let value = parse_literal(rest.trim_start().strip_prefix('=')?.trim())?;
        return Some(XPathPredicate::TextEquals(value));
    }
    if let Some(rest) = body.strip_prefix("normalize-space(.)") {
        let value = parse_literal(rest.trim_start().strip_prefix('=')?.trim())?;
        return Some(XPathPredicate::DeepTextEquals(value));
    }
    None
}

/// Parses an XPath string literal: a quoted run or a `concat(...)` of
/// quoted runs.
fn parse_literal(input: &str) -> Option<String> {
    if let Some(rest) = input.strip_prefix("concat(") {
        let inner = rest.strip_suffix(')')?;
        let mut out = String::new();
        for piece in split_concat_args(inner)? {
            out.push_str(&piece);
        }
        return Some(out);
    }
    parse_quoted(input)
}

fn parse_quoted(input: &str) -> Option<String> {
    let first = input.chars().next()?;
    if first != '"' && first != '\'' {
        return None;
    }
    let rest = &input[1..];
    let end = rest.find(first)?;
    if end + first.len_utf8() != rest.len() {
        return None;
    }
    Some(rest[..end].to_string())
}

fn split_concat_args(input: &str) -> Option<Vec<String>> {
    let mut args = Vec::new();
    let mut rest = input.trim_start();
    loop {
        let quote = rest.chars().next()?;
        if quote != '"' && quote != '\'' {
            return None;
        }
        let body = &rest[1..];
        let end = body.find(quote)?;
        args.push(body[..end].to_string());
        rest = body[end + 1..].trim_start();
        if rest.is_empty() {
            break;
        }
        rest = rest.strip_prefix(',')?.trim_start();
        if rest.is_empty() {
            return None;
        }
    }
    Some(args)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn parse_snapshot(json: &str) -> Snapshot {
        Snapshot::from_json(json).unwrap()
    }

    mod css_parse_tests {
        use super::*;

        fn css(selector: &str) -> CssSelector {
            match parse(selector) {
                Some(ParsedSelector::Css(css)) => css,
                other => panic!("expected CSS selector, got {other:?}"),
            }
        }

        #[test]
        fn test_parse_id() {
            let parsed = css("#login-form");
            assert_eq!(parsed.id.as_deref(), Some("login-form"));
            assert!(parsed.tag.is_none());
        }

        #[test]
        fn test_parse_tag_with_attribute() {
            let parsed = css(r#"input[type="text"]"#);
            assert_eq!(parsed.tag.as_deref(), Some("input"));
            assert_eq!(
                parsed.attributes,
                [AttributeCheck {
                    name: "type".to_string(),
                    value: Some("text".to_string()),
                }]
            );
        }

        #[test]
        fn test_parse_bare_attribute() {
            let parsed = css("[data-testid]");
            assert_eq!(
                parsed.attributes,
                [AttributeCheck {
                    name: "data-testid".to_string(),
                    value: None,
                }]
            );
        }

        #[test]
        fn test_parse_class_chain() {
            let parsed = css(".oj-button.oj-button-full-chrome");
            assert_eq!(parsed.classes, ["oj-button", "oj-button-full-chrome"]);
        }

        #[test]
        fn test_parse_compound() {
            let parsed = css(r#"input[name="user"][type="text"]"#);
            assert_eq!(parsed.attributes.len(), 2);
        }

        #[test]
        fn test_escaped_quote_in_value() {
            let parsed = css(r#"[title="say \"hi\""]"#);
            assert_eq!(
                parsed.attributes[0].value.as_deref(),
                Some(r#"say "hi""#)
            );
        }

        #[test]
        fn test_unsupported_syntax_rejected() {
            for selector in [
                "div span",
                "div > span",
                "li:nth-child(3)",
                "button:hover",
                "#",
                ".",
                "[=\"x\"]",
                "[attr",
                "[attr=\"unterminated]",
                "",
                "  ",
            ] {
                assert!(parse(selector).is_none(), "{selector:?} should not parse");
            }
        }
    }

    mod xpath_parse_tests {
        use super::*;

        fn xpath(selector: &str) -> XPathSelector {
            match parse(selector) {
                Some(ParsedSelector::XPath(xpath)) => xpath,
                other => panic!("expected XPath selector, got {other:?}"),
            }
        }

        #[test]
        fn test_parse_attribute_equals() {
            let parsed = xpath(r#"//input[@name="user"]"#);
            assert_eq!(parsed.tag, "input");
            assert_eq!(
                parsed.predicate,
                XPathPredicate::AttributeEquals {
                    name: "name".to_string(),
                    value: "user".to_string(),
                }
            );
        }

        #[test]
        fn test_parse_wildcard_tag() {
            let parsed = xpath(r#"//*[@role="dialog"]"#);
            assert_eq!(parsed.tag, "*");
        }

        #[test]
        fn test_parse_text_contains() {
            let parsed = xpath(r#"//button[contains(text(),"Sign")]"#);
            assert_eq!(
                parsed.predicate,
                XPathPredicate::TextContains("Sign".to_string())
            );
        }

        #[test]
        fn test_parse_normalize_space_text() {
            let parsed = xpath(r#"//button[normalize-space(text())="Sign In"]"#);
            assert_eq!(
                parsed.predicate,
                XPathPredicate::TextEquals("Sign In".to_string())
            );
        }

        #[test]
        fn test_parse_normalize_space_dot() {
            let parsed = xpath(r#"//div[normalize-space(.)="Total 42"]"#);
            assert_eq!(
                parsed.predicate,
                XPathPredicate::DeepTextEquals("Total 42".to_string())
            );
        }

        #[test]
        fn test_parse_single_quoted_literal() {
            let parsed = xpath(r#"//span[normalize-space(text())='say "hi"']"#);
            assert_eq!(
                parsed.predicate,
                XPathPredicate::TextEquals(r#"say "hi""#.to_string())
            );
        }

        #[test]
        fn test_parse_concat_literal() {
            let parsed = xpath(
                r#"//p[normalize-space(text())=concat("Say ", '"', "hi", '"', " and 'bye'")]"#,
            );
            assert_eq!(
                parsed.predicate,
                XPathPredicate::TextEquals(r#"Say "hi" and 'bye'"#.to_string())
            );
        }

        #[test]
        fn test_unsupported_xpath_rejected() {
            for selector in [
                "//",
                "//button",
                "//button[]",
                "//button[text()=\"x\"]",
                "//div[@id=unquoted]",
                "//div[last()]",
                "//a/b[@id=\"x\"]",
            ] {
                assert!(parse(selector).is_none(), "{selector:?} should not parse");
            }
        }
    }

    mod matching_tests {
        use super::*;

        fn page() -> Snapshot {
            parse_snapshot(
                r#"{"tag": "form", "id": "login", "children": [
                    {"tag": "input", "id": "user", "class": "field wide",
                     "attributes": {"type": "text", "name": "user", "dataTestid": "login-user"}},
                    {"tag": "input", "class": "field",
                     "attributes": {"type": "password", "name": "pass"}},
                    {"tag": "button", "text": "Sign  In",
                     "attributes": {"type": "submit"},
                     "children": [{"tag": "span", "text": "now"}]}
                ]}"#,
            )
        }

        fn matched_tags(snapshot: &Snapshot, selector: &str) -> Vec<String> {
            let parsed = parse(selector).unwrap();
            find_matches(snapshot, &parsed)
                .into_iter()
                .map(|id| snapshot.node(id).tag.clone().unwrap())
                .collect()
        }

        #[test]
        fn test_id_match() {
            let snapshot = page();
            assert_eq!(matched_tags(&snapshot, "#login"), ["form"]);
        }

        #[test]
        fn test_class_match_collects_all() {
            let snapshot = page();
            assert_eq!(matched_tags(&snapshot, ".field"), ["input", "input"]);
        }

        #[test]
        fn test_attribute_value_match() {
            let snapshot = page();
            assert_eq!(
                matched_tags(&snapshot, r#"input[type="password"]"#),
                ["input"]
            );
        }

        #[test]
        fn test_attribute_alias_match() {
            // Stored as camelCase dataTestid; selector uses the hyphen form.
            let snapshot = page();
            assert_eq!(
                matched_tags(&snapshot, r#"[data-testid="login-user"]"#),
                ["input"]
            );
        }

        #[test]
        fn test_bare_attribute_match() {
            let snapshot = page();
            assert_eq!(matched_tags(&snapshot, "[name]"), ["input", "input"]);
        }

        #[test]
        fn test_xpath_attribute_match() {
            let snapshot = page();
            assert_eq!(
                matched_tags(&snapshot, r#"//input[@name="user"]"#),
                ["input"]
            );
        }

        #[test]
        fn test_xpath_wildcard_matches_any_tag() {
            let snapshot = page();
            assert_eq!(
                matched_tags(&snapshot, r#"//*[@type="submit"]"#),
                ["button"]
            );
        }

        #[test]
        fn test_text_equals_normalizes_whitespace() {
            let snapshot = page();
            // Direct text is "Sign  In"; normalize-space collapses the run.
            assert_eq!(
                matched_tags(&snapshot, r#"//button[normalize-space(text())="Sign In"]"#),
                ["button"]
            );
        }

        #[test]
        fn test_text_equals_accepts_deep_text() {
            let snapshot = page();
            assert_eq!(
                matched_tags(
                    &snapshot,
                    r#"//button[normalize-space(text())="Sign In now"]"#
                ),
                ["button"]
            );
        }

        #[test]
        fn test_deep_text_equals() {
            let snapshot = page();
            assert_eq!(
                matched_tags(&snapshot, r#"//button[normalize-space(.)="Sign In now"]"#),
                ["button"]
            );
            assert!(matched_tags(&snapshot, r#"//button[normalize-space(.)="Sign In"]"#)
                .is_empty());
        }

        #[test]
        fn test_text_contains() {
            let snapshot = page();
            assert_eq!(
                matched_tags(&snapshot, r#"//button[contains(text(),"Sign")]"#),
                ["button"]
            );
            // contains() evaluates deep text, so the span's ancestors match too
            assert_eq!(
                matched_tags(&snapshot, r#"//*[contains(text(),"now")]"#),
                ["form", "button", "span"]
            );
        }

        #[test]
        fn test_no_match_is_empty() {
            let snapshot = page();
            assert!(matched_tags(&snapshot, "#missing").is_empty());
        }

        #[test]
        fn test_document_order_preserved() {
            let snapshot = page();
            assert_eq!(matched_tags(&snapshot, "input"), ["input", "input"]);
        }
    }
}
