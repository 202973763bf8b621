//! Selector string escaping.
//!
//! Attribute values land inside quoted CSS strings and XPath literals. CSS
//! values take backslash escapes; XPath string literals have no escape
//! syntax at all, so text mixing both quote kinds falls back to a
//! `concat()` expression.

/// Escapes embedded quotes for a double-quoted CSS attribute string.
#[must_use]
pub fn css_attribute_value(value: &str) -> String {
    value.replace('"', "\\\"").replace('\'', "\\'")
}

/// Quotes a value as an XPath string literal.
///
/// A value free of one quote kind is wrapped in that kind directly; text
/// containing both becomes a `concat()` of safe pieces.
#[must_use]
pub fn xpath_literal(value: &str) -> String {
    let has_double = value.contains('"');
    let has_single = value.contains('\'');
    match (has_double, has_single) {
        (true, true) => xpath_concat(value),
        (true, false) => format!("'{value}'"),
        _ => format!("\"{value}\""),
    }
}

/// Splits on double quotes and stitches the pieces back together, quoting
/// each piece with whichever kind it cannot contain.
fn xpath_concat(value: &str) -> String {
    let mut parts = Vec::new();
    for (index, piece) in value.split('"').enumerate() {
        if index > 0 {
            parts.push("'\"'".to_string());
        }
        if !piece.is_empty() {
            parts.push(format!("\"{piece}\""));
        }
    }
    format!("concat({})", parts.join(", "))
}
