//! The parsed-manifest tree handed to the resolver.
//!
//! The shape mirrors the manifest markup: every element maps to a *sequence*
//! of values, even when it occurs once, and an absent element is an empty
//! sequence. Elements with only text become [`PomValue::Text`]; elements with
//! child elements become [`PomValue::Node`].

/// One value in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PomValue {
    Text(String),
    Node(PomMap),
}

impl PomValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PomValue::Text(s) => Some(s),
            PomValue::Node(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&PomMap> {
        match self {
            PomValue::Node(map) => Some(map),
            PomValue::Text(_) => None,
        }
    }
}

/// An ordered mapping from element name to its sequence of values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomMap {
    entries: Vec<(String, Vec<PomValue>)>,
}

impl PomMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the sequence under `key`, creating it if needed.
    pub fn push(&mut self, key: impl Into<String>, value: PomValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Builder form of [`PomMap::push`] for text values.
    pub fn with_text(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.push(key, PomValue::Text(text.into()));
        self
    }

    /// Builder form of [`PomMap::push`] for nested nodes.
    pub fn with_node(mut self, key: impl Into<String>, node: PomMap) -> Self {
        self.push(key, PomValue::Node(node));
        self
    }

    /// All values under `key`; empty when the element is absent.
    pub fn get(&self, key: &str) -> &[PomValue] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    /// Text of the first value under `key`, if it is a text value.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).first().and_then(PomValue::as_text)
    }

    /// The first value under `key`, if it is a node.
    pub fn node(&self, key: &str) -> Option<&PomMap> {
        self.get(key).first().and_then(PomValue::as_node)
    }

    /// Follow the first node along `path[..n-1]` and return the values under `path[n-1]`.
    ///
    /// `at(&["dependencies", "dependency"])` yields every dependency element.
    pub fn at(&self, path: &[&str]) -> &[PomValue] {
        let Some((last, parents)) = path.split_last() else {
            return &[];
        };
        let mut current = self;
        for segment in parents {
            match current.node(segment) {
                Some(next) => current = next,
                None => return &[],
            }
        }
        current.get(last)
    }

    /// Iterate `(name, values)` in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PomValue])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
