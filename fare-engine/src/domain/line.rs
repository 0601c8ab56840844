//! Metro line records and their display colors.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::LineId;

/// Color used when neither the canonical table nor the stored color apply.
pub const FALLBACK_COLOR: &str = "#999";

/// A metro line as supplied by the topology store.
///
/// The display name may carry a directional suffix, e.g. `"3号线 (石马-星桥)"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub name: String,
    pub color: Option<String>,
    pub code: String,
    pub is_active: bool,
}

impl Line {
    /// Create an active line with no stored color.
    pub fn new(id: LineId, name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: None,
            code: code.into(),
            is_active: true,
        }
    }

    /// Set the stored display color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Resolve the color to show for this line.
    pub fn display_color(&self) -> String {
        resolve_line_color(Some(&self.name), self.color.as_deref())
    }
}

fn canonical_colors() -> &'static HashMap<&'static str, &'static str> {
    static COLORS: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    COLORS.get_or_init(|| {
        HashMap::from([
            ("1号线", "#DF4749"),
            ("2号线", "#E57B46"),
            ("3号线", "#FFCD00"),
            ("4号线", "#6CB53F"),
            ("5号线", "#39A4A6"),
            ("6号线", "#2C6BA8"),
            ("7号线", "#895E9A"),
            ("8号线", "#D32E52"),
            ("9号线", "#B24C38"),
            ("10号线", "#C79F25"),
            ("16号线", "#FFAD7C"),
            ("19号线", "#4298B5"),
        ])
    })
}

/// Strip a parenthetical directional suffix from a line name.
///
/// ```
/// use fare_engine::domain::normalize_line_name;
///
/// assert_eq!(normalize_line_name("3号线 (石马-星桥)"), "3号线");
/// assert_eq!(normalize_line_name("3号线(石马-星桥)"), "3号线");
/// assert_eq!(normalize_line_name("1号线"), "1号线");
/// ```
pub fn normalize_line_name(name: &str) -> &str {
    // A leading parenthesis is part of the name, not a suffix.
    let main = match name.find(" (") {
        Some(idx) if idx > 0 => &name[..idx],
        _ => match name.find('(') {
            Some(idx) if idx > 0 => &name[..idx],
            _ => name,
        },
    };
    main.trim()
}

/// Resolve a presentation color for a line.
///
/// The canonical table, keyed by the normalized line name, wins over the
/// stored color. A stored color that is bare hex gains a `#` prefix.
pub fn resolve_line_color(line_name: Option<&str>, stored: Option<&str>) -> String {
    if let Some(name) = line_name
        && let Some(color) = canonical_colors().get(normalize_line_name(name))
    {
        return (*color).to_string();
    }

    match stored {
        Some(color) => ensure_hash_prefix(color),
        None => FALLBACK_COLOR.to_string(),
    }
}

/// Prefix bare 3-6 digit hex colors with `#`; pass anything else through.
pub fn ensure_hash_prefix(color: &str) -> String {
    if color.is_empty() {
        return FALLBACK_COLOR.to_string();
    }
    if color.starts_with('#') {
        return color.to_string();
    }
    let is_hex = (3..=6).contains(&color.len()) && color.chars().all(|c| c.is_ascii_hexdigit());
    if is_hex {
        format!("#{color}")
    } else {
        color.to_string()
    }
}
