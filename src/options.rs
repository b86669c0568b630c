//! OptionMap — the ordered keyword set handed to a native engine call.

use std::fmt;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::error::{PlotError, Result};

// ─── OptionValue ──────────────────────────────────────────────────────────────

/// A single keyword value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Number(f64),
    Text(String),
    TextList(Vec<String>),
    NumberList(Vec<f64>),
}

impl OptionValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Number of per-artist entries this value carries (1 for scalars).
    pub fn entry_count(&self) -> usize {
        match self {
            OptionValue::TextList(v) => v.len(),
            OptionValue::NumberList(v) => v.len(),
            _ => 1,
        }
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, OptionValue::TextList(_) | OptionValue::NumberList(_))
    }

    /// Repeat a text or number scalar `count` times. Booleans and sequences
    /// are returned unchanged.
    pub fn broadcast(self, count: usize) -> OptionValue {
        match self {
            OptionValue::Text(s) => OptionValue::TextList(vec![s; count]),
            OptionValue::Number(n) => OptionValue::NumberList(vec![n; count]),
            other => other,
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<f64> for OptionValue {
    fn from(n: f64) -> Self {
        OptionValue::Number(n)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Text(s)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(v: Vec<String>) -> Self {
        OptionValue::TextList(v)
    }
}

impl From<Vec<&str>> for OptionValue {
    fn from(v: Vec<&str>) -> Self {
        OptionValue::TextList(v.into_iter().map(str::to_owned).collect())
    }
}

impl From<Vec<f64>> for OptionValue {
    fn from(v: Vec<f64>) -> Self {
        OptionValue::NumberList(v)
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{b}"),
            OptionValue::Number(n) => write!(f, "{n}"),
            OptionValue::Text(s) => write!(f, "{s}"),
            OptionValue::TextList(v) => write!(f, "{}", v.join(",")),
            OptionValue::NumberList(v) => {
                let parts: Vec<String> = v.iter().map(|n| n.to_string()).collect();
                write!(f, "{}", parts.join(","))
            }
        }
    }
}

// ─── OptionMap ────────────────────────────────────────────────────────────────

/// Insertion-ordered `name → value` map.
///
/// Removing a key keeps the relative order of the remaining entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionMap {
    entries: IndexMap<String, OptionValue>,
}

impl OptionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace; a replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<OptionValue> {
        self.entries.shift_remove(key)
    }

    /// Remove every key in `old` and insert `key` where the earliest of them
    /// sat, or at the end when none was present.
    pub fn collapse(&mut self, old: &[&str], key: impl Into<String>, value: impl Into<OptionValue>) {
        let key = key.into();
        if !old.contains(&key.as_str()) {
            self.entries.shift_remove(&key);
        }
        let position = old
            .iter()
            .filter_map(|k| self.entries.get_index_of(*k))
            .min();
        for k in old {
            self.entries.shift_remove(*k);
        }
        match position {
            Some(idx) if idx <= self.entries.len() => {
                self.entries.shift_insert(idx, key, value.into());
            }
            _ => {
                self.entries.insert(key, value.into());
            }
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copy every entry of `other` into `self`, `other` winning on conflicts.
    pub fn merge(&mut self, other: &OptionMap) {
        for (k, v) in other.iter() {
            self.insert(k, v.clone());
        }
    }

    /// Parse `key=value` tokens as typed on a command line.
    ///
    /// `true`/`false` become booleans, numbers become numbers, and a value
    /// containing commas becomes a list (numeric if every item parses).
    pub fn parse_assignments<S: AsRef<str>>(tokens: &[S]) -> Result<Self> {
        let mut map = OptionMap::new();
        for token in tokens {
            let token = token.as_ref();
            let caps = assignment_pattern()
                .captures(token)
                .ok_or_else(|| PlotError::InvalidOption {
                    key: token.to_string(),
                    expected: "a key=value assignment",
                })?;
            map.insert(&caps[1], parse_value(&caps[2]));
        }
        Ok(map)
    }
}

impl<K: Into<String>, V: Into<OptionValue>> FromIterator<(K, V)> for OptionMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = OptionMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl fmt::Display for OptionMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "{}", parts.join(" "))
    }
}

fn assignment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)=(.*)$").expect("assignment pattern is a valid regex")
    })
}

fn parse_value(raw: &str) -> OptionValue {
    match raw {
        "true" => return OptionValue::Bool(true),
        "false" => return OptionValue::Bool(false),
        _ => {}
    }
    if raw.contains(',') {
        let items: Vec<&str> = raw.split(',').map(str::trim).collect();
        let numbers: Option<Vec<f64>> = items.iter().map(|s| s.parse::<f64>().ok()).collect();
        return match numbers {
            Some(ns) => OptionValue::NumberList(ns),
            None => OptionValue::TextList(items.into_iter().map(str::to_owned).collect()),
        };
    }
    match raw.parse::<f64>() {
        Ok(n) => OptionValue::Number(n),
        Err(_) => OptionValue::Text(raw.to_string()),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
