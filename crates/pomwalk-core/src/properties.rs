//! Ordered property tables and `${...}` placeholder expansion.

use serde::Serialize;

use crate::coordinate::PLACEHOLDER_START;

/// Upper bound on expansion passes, so self-referencing properties terminate.
pub const MAX_INTERPOLATION_PASSES: usize = 20;

/// Prefix of environment-derived property keys (`env.HOME`).
pub const ENV_PREFIX: &str = "env.";

/// A single `key = value` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    pub key: String,
    pub value: String,
}

/// An ordered property table. Lookups are first-match; an insert for a key
/// that is already present is ignored rather than shadowing it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PropertyTable {
    entries: Vec<Property>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `key = value` unless `key` is already present. Returns whether it was added.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        if self.contains_key(&key) {
            return false;
        }
        self.entries.push(Property {
            key,
            value: value.into(),
        });
        true
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|p| p.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.entries.iter()
    }
}

/// Map process environment variables to `env.NAME` properties.
///
/// Names are upper-cased so lookups behave the same on case-insensitive
/// platforms.
pub fn environment_properties<I, K, V>(vars: I) -> Vec<Property>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    vars.into_iter()
        .map(|(k, v)| Property {
            key: format!("{ENV_PREFIX}{}", k.as_ref().to_uppercase()),
            value: v.into(),
        })
        .collect()
}

/// Whether `value` still contains a `${` placeholder.
pub fn has_placeholder(value: &str) -> bool {
    value.contains(PLACEHOLDER_START)
}

/// Expand every `${token}` in `input` using `lookup`.
///
/// Values may themselves contain placeholders; expansion repeats until the
/// string stops changing or [`MAX_INTERPOLATION_PASSES`] is reached. Tokens
/// that `lookup` cannot resolve are left in place verbatim.
pub fn interpolate_with<F>(input: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut result = input.to_string();
    for _ in 0..MAX_INTERPOLATION_PASSES {
        if !has_placeholder(&result) {
            break;
        }
        let expanded = expand_once(&result, &mut lookup);
        if expanded == result {
            break;
        }
        result = expanded;
    }
    result
}

fn expand_once<F>(input: &str, lookup: &mut F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find(PLACEHOLDER_START) {
        out.push_str(&rest[..start]);
        let after = &rest[start + PLACEHOLDER_START.len()..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let token = &after[..end];
        match lookup(token) {
            Some(value) => out.push_str(&value),
            None => {
                out.push_str(PLACEHOLDER_START);
                out.push_str(token);
                out.push('}');
            }
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}
