//! Page objects generated from snapshots.
//!
//! A page object is a named map from human-readable entry names to
//! synthesized locator sets. Interactions replay the candidate chain through
//! a [`PageDriver`] until one selector works, so a page object survives the
//! loss of its best selector.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::driver::PageDriver;
use crate::result::{LocatorError, LocatorResult};
use crate::snapshot::{ElementNode, Snapshot};
use crate::synthesizer::{synthesize, GeneratedLocators};

/// Named locator sets for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageObject {
    /// Page name, chosen by the caller.
    pub name: String,
    /// Page URL, when the snapshot recorded one.
    pub url: Option<String>,
    /// Entry name to locator set, sorted by name.
    pub entries: BTreeMap<String, GeneratedLocators>,
}

impl PageObject {
    /// Creates an empty page object.
    #[must_use]
    pub fn new(name: impl Into<String>, url: Option<String>) -> Self {
        Self {
            name: name.into(),
            url,
            entries: BTreeMap::new(),
        }
    }

    /// Builds a page object covering every interactive element.
    ///
    /// Entries are named from the resolved label, falling back to the
    /// test-id value, the element id, and finally the tag name. Name
    /// collisions get a numeric suffix.
    #[must_use]
    pub fn from_snapshot(name: impl Into<String>, snapshot: &Snapshot) -> Self {
        let mut page = Self::new(name, snapshot.url.clone());
        for id in snapshot.interactive_elements() {
            let node = snapshot.node(id);
            let locators = synthesize(snapshot, id);
            let base = preferred_name(node, &locators);
            let key = page.uniquify(&base);
            page.entries.insert(key, locators);
        }
        debug!(page = %page.name, entries = page.entries.len(), "built page object");
        page
    }

    /// Adds an entry under `key`, replacing any previous one.
    pub fn insert(&mut self, key: impl Into<String>, locators: GeneratedLocators) {
        self.entries.insert(key.into(), locators);
    }

    /// Locator set for `name`, when present.
    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&GeneratedLocators> {
        self.entries.get(name)
    }

    /// Entry names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the page object has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Navigates the driver to the page URL, when one is recorded.
    pub fn open(&self, driver: &mut dyn PageDriver) -> LocatorResult<()> {
        match self.url.as_deref() {
            Some(url) => driver.navigate(url),
            None => Ok(()),
        }
    }

    /// Clicks the entry, trying each candidate selector in order.
    pub fn click(&self, driver: &mut dyn PageDriver, name: &str) -> LocatorResult<()> {
        let locators = self.require(name)?;
        for selector in &locators.selectors {
            if driver.click(selector).is_ok() {
                return Ok(());
            }
        }
        Err(LocatorError::element_not_found(name))
    }

    /// Fills the entry with `value`, trying each candidate selector in order.
    pub fn fill(&self, driver: &mut dyn PageDriver, name: &str, value: &str) -> LocatorResult<()> {
        let locators = self.require(name)?;
        for selector in &locators.selectors {
            if driver.fill(selector, value).is_ok() {
                return Ok(());
            }
        }
        Err(LocatorError::element_not_found(name))
    }

    /// Parses a page object from JSON.
    pub fn from_json(json: &str) -> LocatorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a page object from a JSON file.
    pub fn load(path: &Path) -> LocatorResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serializes the page object as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> LocatorResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the page object to a JSON file.
    pub fn save(&self, path: &Path) -> LocatorResult<()> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    fn require(&self, name: &str) -> LocatorResult<&GeneratedLocators> {
        self.entries
            .get(name)
            .ok_or_else(|| LocatorError::element_not_found(name))
    }

    fn uniquify(&self, base: &str) -> String {
        if !self.entries.contains_key(base) {
            return base.to_string();
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}-{n}");
            if !self.entries.contains_key(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

fn preferred_name(node: &ElementNode, locators: &GeneratedLocators) -> String {
    let candidates = [
        locators.label_text.as_deref(),
        node.test_id().map(|(_, value)| value),
        node.id.as_deref(),
    ];
    for candidate in candidates.into_iter().flatten() {
        let slug = slugify(candidate);
        if !slug.is_empty() {
            return slug;
        }
    }
    let tag = node.tag.as_deref().map(slugify).unwrap_or_default();
    if tag.is_empty() {
        "element".to_string()
    } else {
        tag
    }
}

/// Lowercases and joins alphanumeric runs with hyphens.
fn slugify(text: &str) -> String {
    let mut slug = String::new();
    let mut pending_break = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_break && !slug.is_empty() {
                slug.push('-');
            }
            pending_break = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_break = true;
        }
    }
    slug
}
