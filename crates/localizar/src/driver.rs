//! Driver seam for replaying locators against a live page.
//!
//! The engine itself never talks to a browser; callers hand in a
//! [`PageDriver`] and page objects replay selectors through it.
//! [`SnapshotDriver`] is the built-in implementation: it resolves selectors
//! statically against a captured snapshot and records every action, which is
//! enough for dry runs and for tests.

use crate::matcher;
use crate::result::{LocatorError, LocatorResult};
use crate::snapshot::{NodeId, Snapshot};
use crate::text::deep_text;

/// Minimal surface a page object needs from a browser session.
pub trait PageDriver {
    /// Navigates to `url`.
    fn navigate(&mut self, url: &str) -> LocatorResult<()>;

    /// Clicks the element addressed by `selector`.
    fn click(&mut self, selector: &str) -> LocatorResult<()>;

    /// Types `value` into the element addressed by `selector`.
    fn fill(&mut self, selector: &str, value: &str) -> LocatorResult<()>;

    /// Blocks until `text` is visible on the page.
    fn wait_for_text(&mut self, text: &str) -> LocatorResult<()>;

    /// Current page URL.
    fn current_url(&self) -> LocatorResult<String>;
}

/// Driver that executes against a captured snapshot instead of a browser.
///
/// Without a snapshot it accepts every action and only records it.
#[derive(Debug, Default)]
pub struct SnapshotDriver {
    snapshot: Option<Snapshot>,
    url: String,
    calls: Vec<String>,
}

impl SnapshotDriver {
    /// Pure recorder: every action succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder that resolves selectors against `snapshot` first.
    #[must_use]
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            url: String::new(),
            calls: Vec::new(),
        }
    }

    /// Actions performed so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.calls
    }

    /// True when any recorded action starts with `prefix`.
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.calls.iter().any(|call| call.starts_with(prefix))
    }

    /// Requires `selector` to address exactly one element of the snapshot.
    fn resolve(&self, selector: &str) -> LocatorResult<Option<NodeId>> {
        let Some(snapshot) = &self.snapshot else {
            return Ok(None);
        };
        let Some(parsed) = matcher::parse(selector) else {
            return Err(LocatorError::driver(format!(
                "selector `{selector}` does not parse"
            )));
        };
        let matches = matcher::find_matches(snapshot, &parsed);
        match matches.as_slice() {
            [only] => Ok(Some(*only)),
            [] => Err(LocatorError::driver(format!(
                "selector `{selector}` matches nothing"
            ))),
            _ => Err(LocatorError::driver(format!(
                "selector `{selector}` matches {} elements",
                matches.len()
            ))),
        }
    }
}

impl PageDriver for SnapshotDriver {
    fn navigate(&mut self, url: &str) -> LocatorResult<()> {
        self.url = url.to_string();
        self.calls.push(format!("navigate {url}"));
        Ok(())
    }

    fn click(&mut self, selector: &str) -> LocatorResult<()> {
        self.resolve(selector)?;
        self.calls.push(format!("click {selector}"));
        Ok(())
    }

    fn fill(&mut self, selector: &str, value: &str) -> LocatorResult<()> {
        self.resolve(selector)?;
        self.calls.push(format!("fill {selector}={value}"));
        Ok(())
    }

    fn wait_for_text(&mut self, text: &str) -> LocatorResult<()> {
        if let Some(snapshot) = &self.snapshot {
            let found = snapshot
                .roots()
                .iter()
                .any(|&root| deep_text(snapshot, root).contains(text));
            if !found {
                return Err(LocatorError::driver(format!(
                    "text `{text}` not present in snapshot"
                )));
            }
        }
        self.calls.push(format!("wait_for_text {text}"));
        Ok(())
    }

    fn current_url(&self) -> LocatorResult<String> {
        Ok(self.url.clone())
    }
}
