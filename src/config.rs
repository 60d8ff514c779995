//! Root configuration - host name translation tables.
//!
//! Completion translates prop names into host names through three tables:
//!
//! - **events**: `onClick` → `click`. Handler props not in the table are
//!   skipped with a warning.
//! - **style aliases**: style keys the host spells differently
//!   (`float` → `cssFloat`).
//! - **attribute aliases**: attribute props the host spells differently
//!   (`className` → `class`).
//!
//! Defaults describe a DOM-like host. Other hosts start from
//! [`RootOptions::empty`] or extend the defaults.

use std::collections::HashMap;

// =============================================================================
// Name Table
// =============================================================================

/// A fixed prop-name → host-name translation table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    entries: HashMap<String, String>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        NameTable {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.entries.insert(from.into(), to.into());
    }

    /// Translated name, if the table knows it.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Translated name, or the name itself.
    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.get(name).unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Default Tables
// =============================================================================

const DOM_EVENTS: &[(&str, &str)] = &[
    ("onClick", "click"),
    ("onDoubleClick", "dblclick"),
    ("onContextMenu", "contextmenu"),
    ("onMouseDown", "mousedown"),
    ("onMouseUp", "mouseup"),
    ("onMouseMove", "mousemove"),
    ("onMouseEnter", "mouseenter"),
    ("onMouseLeave", "mouseleave"),
    ("onMouseOver", "mouseover"),
    ("onMouseOut", "mouseout"),
    ("onKeyDown", "keydown"),
    ("onKeyUp", "keyup"),
    ("onKeyPress", "keypress"),
    ("onFocus", "focus"),
    ("onBlur", "blur"),
    ("onChange", "change"),
    ("onInput", "input"),
    ("onSubmit", "submit"),
    ("onScroll", "scroll"),
    ("onWheel", "wheel"),
    ("onTouchStart", "touchstart"),
    ("onTouchEnd", "touchend"),
    ("onTouchMove", "touchmove"),
];

const DOM_STYLE_ALIASES: &[(&str, &str)] = &[("float", "cssFloat")];

const DOM_ATTRIBUTE_ALIASES: &[(&str, &str)] = &[("className", "class"), ("htmlFor", "for")];

// =============================================================================
// Root Options
// =============================================================================

/// Options a [`Root`](crate::Root) hands to every render session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootOptions {
    pub events: NameTable,
    pub style_aliases: NameTable,
    pub attribute_aliases: NameTable,
}

impl Default for RootOptions {
    fn default() -> Self {
        RootOptions {
            events: NameTable::from_pairs(DOM_EVENTS.iter().copied()),
            style_aliases: NameTable::from_pairs(DOM_STYLE_ALIASES.iter().copied()),
            attribute_aliases: NameTable::from_pairs(DOM_ATTRIBUTE_ALIASES.iter().copied()),
        }
    }
}

impl RootOptions {
    /// No translations at all: no handler prop is recognized.
    pub fn empty() -> Self {
        RootOptions {
            events: NameTable::new(),
            style_aliases: NameTable::new(),
            attribute_aliases: NameTable::new(),
        }
    }

    /// Builder: recognize one more event prop.
    pub fn with_event(mut self, prop: &str, host_event: &str) -> Self {
        self.events.insert(prop, host_event);
        self
    }

    /// Builder: alias one more style key.
    pub fn with_style_alias(mut self, key: &str, host_key: &str) -> Self {
        self.style_aliases.insert(key, host_key);
        self
    }

    /// Builder: alias one more attribute name.
    pub fn with_attribute_alias(mut self, name: &str, host_name: &str) -> Self {
        self.attribute_aliases.insert(name, host_name);
        self
    }
}
