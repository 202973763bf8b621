//! Stability heuristics for ids and class tokens.
//!
//! Generated markup leaks build artifacts into ids and classes: numeric
//! suffixes, hash blobs, CSS-module digests. Selectors built on those break
//! on the next deploy, so synthesis screens every id and class token before
//! using one.

use regex::Regex;

use crate::snapshot::ElementNode;

/// Minimum hex-run length treated as a generated hash.
pub const HEX_RUN_MIN_LEN: usize = 32;

/// Minimum length of an undashed alphanumeric token treated as generated.
pub const GENERATED_CLASS_MIN_LEN: usize = 10;

/// Length bound under which simple lowercase tokens are accepted outright.
pub const SIMPLE_TOKEN_MAX_LEN: usize = 20;

/// Substrings that mark an id as machine-generated, matched
/// case-insensitively.
const UNSTABLE_ID_MARKERS: [&str; 4] = ["timestamp", "random", "temp", "gen"];

/// Class prefixes from design systems and component kits, always accepted.
const SEMANTIC_CLASS_PREFIXES: [&str; 10] = [
    "btn-", "input-", "form-", "oxd-", "ant-", "mui-", "sp-", "oj-", "spectra-", "redwood-",
];

/// Screens ids and class tokens for machine-generated shapes.
///
/// Compiles its patterns once; build a single filter and reuse it across a
/// synthesis run.
#[derive(Debug, Clone)]
pub struct StabilityFilter {
    hex_run: Regex,
    word_digits: Regex,
    generated_token: Regex,
    simple_token: Regex,
}

impl StabilityFilter {
    /// Builds the filter, compiling the heuristic patterns.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hex_run: Regex::new(&format!("(?i)[0-9a-f]{{{HEX_RUN_MIN_LEN},}}")).unwrap(),
            word_digits: Regex::new(r"^[A-Za-z][A-Za-z-]*-\d+$").unwrap(),
            generated_token: Regex::new(&format!("^[A-Za-z0-9]{{{GENERATED_CLASS_MIN_LEN},}}$"))
                .unwrap(),
            simple_token: Regex::new(r"^[a-z][a-z0-9-]*$").unwrap(),
        }
    }

    /// True when an id looks hand-written rather than generated.
    ///
    /// Rejects all-digit ids, runs of [`HEX_RUN_MIN_LEN`]+ hex characters,
    /// ids containing timestamp/random/temp/gen markers, and word-then-digit
    /// shapes like `element-12345`.
    #[must_use]
    pub fn is_stable_id(&self, id: &str) -> bool {
        if id.is_empty() {
            return false;
        }
        if id.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        if self.hex_run.is_match(id) {
            return false;
        }
        let lower = id.to_lowercase();
        if UNSTABLE_ID_MARKERS
            .iter()
            .any(|marker| lower.contains(marker))
        {
            return false;
        }
        !self.word_digits.is_match(id)
    }

    /// True when a class token is safe to build a selector on.
    ///
    /// Semantic prefixes are always kept, as are simple lowercase tokens
    /// shorter than [`SIMPLE_TOKEN_MAX_LEN`]. What remains is rejected when
    /// it is an undashed alphanumeric blob of
    /// [`GENERATED_CLASS_MIN_LEN`]+ characters.
    #[must_use]
    pub fn is_stable_class(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        if SEMANTIC_CLASS_PREFIXES
            .iter()
            .any(|prefix| token.starts_with(prefix))
        {
            return true;
        }
        if token.chars().count() < SIMPLE_TOKEN_MAX_LEN && self.simple_token.is_match(token) {
            return true;
        }
        !self.generated_token.is_match(token)
    }

    /// Class tokens of `node` that pass the screen, order preserved.
    #[must_use]
    pub fn stable_classes<'a>(&self, node: &'a ElementNode) -> Vec<&'a str> {
        node.classes
            .iter()
            .map(String::as_str)
            .filter(|token| self.is_stable_class(token))
            .collect()
    }
}

impl Default for StabilityFilter {
    fn default() -> Self {
        Self::new()
    }
}
