//! Namespaced attribute store
//!
//! Every line, token and file carries an [`AttributeStore`]: a three-level
//! `ns1 -> ns2 -> key` map of string values. Reads are permissive: an absent
//! key yields an empty string, 0, false or a zero rational, never an error.
//! Each value may remember the token it was parsed from (its origin).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::rational::Rational;
use super::token::TokenId;

/// Escape sequence used for ':' inside values written to comments
const COLON_ESCAPE: &str = "&colon;";

/// Fully qualified parameter name.
///
/// Convertible from a colon-joined shorthand: `"key"`, `"ns2:key"` or
/// `"ns1:ns2:key"`, and from `(ns2, key)` / `(ns1, ns2, key)` tuples.
/// Missing namespaces are empty strings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamKey {
    pub ns1: String,
    pub ns2: String,
    pub key: String,
}

impl ParamKey {
    pub fn new(ns1: &str, ns2: &str, key: &str) -> Self {
        Self {
            ns1: ns1.to_string(),
            ns2: ns2.to_string(),
            key: key.to_string(),
        }
    }
}

impl From<&str> for ParamKey {
    fn from(text: &str) -> Self {
        let mut parts = text.splitn(3, ':');
        let first = parts.next().unwrap_or("");
        match (parts.next(), parts.next()) {
            (None, _) => ParamKey::new("", "", first),
            (Some(second), None) => ParamKey::new("", first, second),
            (Some(second), Some(third)) => ParamKey::new(first, second, third),
        }
    }
}

impl From<&String> for ParamKey {
    fn from(text: &String) -> Self {
        ParamKey::from(text.as_str())
    }
}

impl From<(&str, &str)> for ParamKey {
    fn from((ns2, key): (&str, &str)) -> Self {
        ParamKey::new("", ns2, key)
    }
}

impl From<(&str, &str, &str)> for ParamKey {
    fn from((ns1, ns2, key): (&str, &str, &str)) -> Self {
        ParamKey::new(ns1, ns2, key)
    }
}

impl std::fmt::Display for ParamKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.ns1, self.ns2, self.key)
    }
}

/// Stored value plus the token that supplied it
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ParamValue {
    pub value: String,
    pub origin: Option<TokenId>,
}

type KeyMap = BTreeMap<String, ParamValue>;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct AttributeStore {
    entries: BTreeMap<String, BTreeMap<String, KeyMap>>,
}

impl AttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, key: &ParamKey) -> Option<&ParamValue> {
        self.entries.get(&key.ns1)?.get(&key.ns2)?.get(&key.key)
    }

    fn entry_mut(&mut self, key: &ParamKey) -> Option<&mut ParamValue> {
        self.entries
            .get_mut(&key.ns1)?
            .get_mut(&key.ns2)?
            .get_mut(&key.key)
    }

    /// String value, or "" when absent.
    pub fn get(&self, key: impl Into<ParamKey>) -> &str {
        self.entry(&key.into())
            .map(|entry| entry.value.as_str())
            .unwrap_or("")
    }

    /// Integer value. Fractions are truncated; unparsable text gives 0.
    pub fn get_int(&self, key: impl Into<ParamKey>) -> i64 {
        Rational::parse(self.get(key)).into_value().to_integer(0.0)
    }

    pub fn get_float(&self, key: impl Into<ParamKey>) -> f64 {
        let value = self.get(key);
        if value.contains('/') {
            Rational::parse(value).into_value().to_float()
        } else {
            value.trim().parse().unwrap_or(0.0)
        }
    }

    /// False when absent, "false" or "0"; true otherwise.
    pub fn get_bool(&self, key: impl Into<ParamKey>) -> bool {
        let key = key.into();
        match self.entry(&key) {
            None => false,
            Some(entry) => !matches!(entry.value.as_str(), "false" | "0"),
        }
    }

    pub fn get_rational(&self, key: impl Into<ParamKey>) -> Rational {
        Rational::parse(self.get(key)).into_value()
    }

    pub fn set(&mut self, key: impl Into<ParamKey>, value: impl ToString) {
        let key = key.into();
        let slot = self
            .entries
            .entry(key.ns1)
            .or_default()
            .entry(key.ns2)
            .or_default()
            .entry(key.key)
            .or_default();
        slot.value = value.to_string();
    }

    /// Set a value and record where it came from.
    pub fn set_with_origin(&mut self, key: impl Into<ParamKey>, value: impl ToString, origin: TokenId) {
        let key = key.into();
        self.set(key.clone(), value);
        self.set_origin(key, origin);
    }

    /// Remove a key. Returns true if it was present.
    pub fn remove(&mut self, key: impl Into<ParamKey>) -> bool {
        let key = key.into();
        let Some(ns2_map) = self.entries.get_mut(&key.ns1) else {
            return false;
        };
        let Some(key_map) = ns2_map.get_mut(&key.ns2) else {
            return false;
        };
        let removed = key_map.remove(&key.key).is_some();
        if key_map.is_empty() {
            ns2_map.remove(&key.ns2);
        }
        if ns2_map.is_empty() {
            self.entries.remove(&key.ns1);
        }
        removed
    }

    pub fn is_defined(&self, key: impl Into<ParamKey>) -> bool {
        self.entry(&key.into()).is_some()
    }

    /// Attach an origin to an existing key. Does nothing if the key is absent.
    pub fn set_origin(&mut self, key: impl Into<ParamKey>, origin: TokenId) {
        if let Some(entry) = self.entry_mut(&key.into()) {
            entry.origin = Some(origin);
        }
    }

    pub fn origin(&self, key: impl Into<ParamKey>) -> Option<TokenId> {
        self.entry(&key.into()).and_then(|entry| entry.origin)
    }

    pub fn has_parameters(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn parameter_count(&self) -> usize {
        self.iter().count()
    }

    /// All stored entries in (ns1, ns2, key) order.
    pub fn iter(&self) -> impl Iterator<Item = (ParamKey, &ParamValue)> + '_ {
        self.entries.iter().flat_map(|(ns1, ns2_map)| {
            ns2_map.iter().flat_map(move |(ns2, key_map)| {
                key_map
                    .iter()
                    .map(move |(key, value)| (ParamKey::new(ns1, ns2, key), value))
            })
        })
    }

    /// Every key as `ns1:ns2:key`.
    pub fn keys(&self) -> Vec<String> {
        self.iter().map(|(key, _)| key.to_string()).collect()
    }

    /// Bare key names inside one namespace pair.
    pub fn keys_in(&self, ns1: &str, ns2: &str) -> Vec<String> {
        self.entries
            .get(ns1)
            .and_then(|ns2_map| ns2_map.get(ns2))
            .map(|key_map| key_map.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Parse the body of a parameter comment (`ns1:ns2:key=value:flag`).
    ///
    /// Pieces after the two namespaces set `key=value`, or `"true"` for a bare
    /// key. `&colon;` in values is unescaped. Returns false when the body has
    /// fewer than three colon-separated pieces.
    pub fn set_parameters(&mut self, body: &str, origin: Option<TokenId>) -> bool {
        let pieces: Vec<&str> = body.split(':').collect();
        if pieces.len() < 3 {
            return false;
        }
        let (ns1, ns2) = (pieces[0], pieces[1]);
        for piece in &pieces[2..] {
            if piece.is_empty() {
                continue;
            }
            let piece = piece.replace(COLON_ESCAPE, ":");
            let (key, value) = match piece.split_once('=') {
                Some((key, value)) => (key, value),
                None => (piece.as_str(), "true"),
            };
            let param = ParamKey::new(ns1, ns2, key);
            self.set(param.clone(), value);
            if let Some(origin) = origin {
                self.set_origin(param, origin);
            }
        }
        true
    }

    /// Serialize each entry as a parameter comment line with the given prefix
    /// (`"!"` or `"!!"`). `"true"` values are written as bare keys.
    pub fn to_comments(&self, prefix: &str) -> Vec<String> {
        self.iter()
            .map(|(key, entry)| {
                if entry.value == "true" {
                    format!("{}{}", prefix, key)
                } else {
                    format!(
                        "{}{}={}",
                        prefix,
                        key,
                        entry.value.replace(':', COLON_ESCAPE)
                    )
                }
            })
            .collect()
    }
}

/// True if a comment body has the `ns1:ns2:...` parameter shape: at least two
/// colons, with no space or tab before the second one.
pub fn is_parameter_body(body: &str) -> bool {
    let mut colons = 0;
    for ch in body.chars() {
        match ch {
            ':' => {
                colons += 1;
                if colons == 2 {
                    return true;
                }
            }
            ' ' | '\t' => return false,
            _ => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_defaults() {
        let store = AttributeStore::new();
        assert_eq!(store.get("missing"), "");
        assert_eq!(store.get_int(("a", "b")), 0);
        assert_eq!(store.get_float("x:y:z"), 0.0);
        assert!(!store.get_bool("flag"));
        assert_eq!(store.get_rational("dur"), Rational::zero());
        assert!(!store.has_parameters());
    }

    #[test]
    fn test_shorthand_keys() {
        assert_eq!(ParamKey::from("k"), ParamKey::new("", "", "k"));
        assert_eq!(ParamKey::from("n:k"), ParamKey::new("", "n", "k"));
        assert_eq!(ParamKey::from("a:b:k"), ParamKey::new("a", "b", "k"));

        let mut store = AttributeStore::new();
        store.set("LO:N:vis", "1");
        assert_eq!(store.get(("LO", "N", "vis")), "1");
        assert_eq!(store.get_int("LO:N:vis"), 1);
        assert_eq!(store.keys(), vec!["LO:N:vis".to_string()]);
        assert_eq!(store.keys_in("LO", "N"), vec!["vis".to_string()]);
    }

    #[test]
    fn test_typed_reads() {
        let mut store = AttributeStore::new();
        store.set("auto:dur", "3/2");
        store.set("auto:count", 7);
        store.set("auto:off", "false");
        store.set("auto:zero", "0");
        store.set("auto:on", "yes");
        store.set("auto:ratio", "2.5");

        assert_eq!(store.get_int("auto:dur"), 1);
        assert_eq!(store.get_float("auto:dur"), 1.5);
        assert_eq!(store.get_rational("auto:dur"), Rational::new(3, 2));
        assert_eq!(store.get_int("auto:count"), 7);
        assert!(!store.get_bool("auto:off"));
        assert!(!store.get_bool("auto:zero"));
        assert!(store.get_bool("auto:on"));
        assert_eq!(store.get_float("auto:ratio"), 2.5);
        assert_eq!(store.parameter_count(), 6);
    }

    #[test]
    fn test_remove_and_origin() {
        let mut store = AttributeStore::new();
        let origin = TokenId::new(4, 1);
        store.set_with_origin("LO:N:vis", "1", origin);
        assert_eq!(store.origin("LO:N:vis"), Some(origin));
        assert!(store.is_defined("LO:N:vis"));

        assert!(store.remove("LO:N:vis"));
        assert!(!store.remove("LO:N:vis"));
        assert!(!store.has_parameters());
        assert_eq!(store.origin("LO:N:vis"), None);
    }

    #[test]
    fn test_parameter_comment_round_trip() {
        let mut store = AttributeStore::new();
        let origin = TokenId::new(2, 0);
        assert!(store.set_parameters("LO:TX:t=Allegro&colon; fast:a", Some(origin)));
        assert_eq!(store.get("LO:TX:t"), "Allegro: fast");
        assert_eq!(store.get("LO:TX:a"), "true");
        assert_eq!(store.origin("LO:TX:t"), Some(origin));

        let lines = store.to_comments("!");
        assert_eq!(
            lines,
            vec!["!LO:TX:a".to_string(), "!LO:TX:t=Allegro&colon; fast".to_string()]
        );

        let mut reread = AttributeStore::new();
        for line in &lines {
            reread.set_parameters(&line[1..], None);
        }
        assert_eq!(reread.get("LO:TX:t"), "Allegro: fast");
        assert!(reread.get_bool("LO:TX:a"));
    }

    #[test]
    fn test_parameter_shape() {
        assert!(is_parameter_body("LO:N:vis=1"));
        assert!(is_parameter_body("LO:TX:t=a b"));
        assert!(!is_parameter_body("just a comment: really"));
        assert!(!is_parameter_body("LO:N"));
        assert!(!AttributeStore::new().set_parameters("LO:N", None));
    }
}
