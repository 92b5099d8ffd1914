//! Flat, ordered key -> string-value record
//!
//! Every persisted object is one of these, serialized as a single JSON
//! object whose values are all strings. Insertion order is preserved so a
//! record round-trips byte-for-byte. Typed readers recover locally from
//! missing or malformed values: they substitute the documented default and
//! warn, never failing the surrounding object.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    fields: Vec<(String, String)>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a key, keeping the original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Insert only when the value is present: an absent reference omits its
    /// key entirely so re-decoding never constructs a spurious empty name.
    pub fn insert_optional(&mut self, key: impl Into<String>, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// String field; missing keys default to empty without a warning.
    pub fn get_string(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    /// Integer field with default + warn recovery. `object` names the
    /// record being decoded, for the diagnostic only.
    pub fn get_i64(&self, object: &str, key: &str, default: i64) -> i64 {
        match self.get(key) {
            None => {
                warn!(object, key, default, "missing integer field, using default");
                default
            }
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(object, key, raw, default, "malformed integer field, using default");
                default
            }),
        }
    }

    /// Float field with default + warn recovery.
    pub fn get_f64(&self, object: &str, key: &str, default: f64) -> f64 {
        match self.get(key) {
            None => {
                warn!(object, key, default, "missing float field, using default");
                default
            }
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(object, key, raw, default, "malformed float field, using default");
                default
            }),
        }
    }

    /// Boolean field ("true"/"false") with default + warn recovery.
    pub fn get_bool(&self, object: &str, key: &str, default: bool) -> bool {
        match self.get(key) {
            None => {
                warn!(object, key, default, "missing boolean field, using default");
                default
            }
            Some("true") => true,
            Some("false") => false,
            Some(raw) => {
                warn!(object, key, raw, default, "malformed boolean field, using default");
                default
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldMapVisitor;

        impl<'de> Visitor<'de> for FieldMapVisitor {
            type Value = FieldMap;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a flat object of string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = FieldMap::new();
                while let Some((key, value)) = access.next_entry::<String, String>()? {
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(FieldMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_preserves_insertion_order() {
        let mut fields = FieldMap::new();
        fields.insert("name", "waterskin");
        fields.insert("goldValue", "12");
        fields.insert("aLaterKey", "x");

        let json = fields.to_json().expect("serializable");
        let parsed = FieldMap::from_json(&json).expect("parseable");
        assert_eq!(parsed, fields);
        let keys: Vec<_> = parsed.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["name", "goldValue", "aLaterKey"]);
    }

    #[test]
    fn test_insert_optional_omits_absent_values() {
        let mut fields = FieldMap::new();
        fields.insert_optional("itemDrop", None::<String>);
        fields.insert_optional("movement", Some("patrol"));
        assert!(!fields.contains("itemDrop"));
        assert_eq!(fields.get("movement"), Some("patrol"));
    }

    #[test]
    fn test_missing_and_malformed_numerics_fall_back() {
        let mut fields = FieldMap::new();
        fields.insert("goldValue", "not a number");
        assert_eq!(fields.get_i64("item 'x'", "goldValue", 7), 7);
        assert_eq!(fields.get_i64("item 'x'", "foodValue", 3), 3);
        assert_eq!(fields.get_f64("trader 'y'", "stealSuccessRate", 0.5), 0.5);
    }

    #[test]
    fn test_boolean_parsing_is_strict() {
        let mut fields = FieldMap::new();
        fields.insert("isAggro", "true");
        fields.insert("repeating", "yes");
        assert!(fields.get_bool("trader 'y'", "isAggro", false));
        assert!(!fields.get_bool("movement 'm'", "repeating", false));
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut fields = FieldMap::new();
        fields.insert("a", "1");
        fields.insert("b", "2");
        fields.insert("a", "3");
        let pairs: Vec<_> = fields.iter().collect();
        assert_eq!(pairs, vec![("a", "3"), ("b", "2")]);
    }
}
