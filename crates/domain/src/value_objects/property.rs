//! Property model: type-tagged field descriptors and the generic value bag
//!
//! Descriptors (`Property`, `ClassDefinition`) are advisory metadata that a
//! presentation layer binds to; nothing validates live instances against
//! them. The `PropertyBag` is the reflective view of an entity: every typed
//! setter writes through to the bag so generic readers always observe
//! current values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The type tag a field descriptor carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyKind {
    String,
    Integer,
    Float,
    Boolean,
    Enum,
    Image,
    Reference,
}

/// A tagged field value, matching one of the [`PropertyKind`] tags
///
/// `Reference` holds the referenced object's name, or `None` for an unset
/// reference; references are never stored structurally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Enum(String),
    Image(String),
    Reference(Option<String>),
}

impl PropertyValue {
    /// Default-value policy per kind: empty string for String/Enum/Image,
    /// zero for Integer, 0.0 for Float, false for Boolean, unset for
    /// Reference.
    pub fn default_for(kind: PropertyKind) -> Self {
        match kind {
            PropertyKind::String => Self::String(String::new()),
            PropertyKind::Integer => Self::Integer(0),
            PropertyKind::Float => Self::Float(0.0),
            PropertyKind::Boolean => Self::Boolean(false),
            PropertyKind::Enum => Self::Enum(String::new()),
            PropertyKind::Image => Self::Image(String::new()),
            PropertyKind::Reference => Self::Reference(None),
        }
    }

    pub fn kind(&self) -> PropertyKind {
        match self {
            Self::String(_) => PropertyKind::String,
            Self::Integer(_) => PropertyKind::Integer,
            Self::Float(_) => PropertyKind::Float,
            Self::Boolean(_) => PropertyKind::Boolean,
            Self::Enum(_) => PropertyKind::Enum,
            Self::Image(_) => PropertyKind::Image,
            Self::Reference(_) => PropertyKind::Reference,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(v) | Self::Enum(v) | Self::Image(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            // Integers widen losslessly enough for authoring-tool input.
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<Option<&str>> {
        match self {
            Self::Reference(v) => Some(v.as_deref()),
            _ => None,
        }
    }
}

/// A type-tagged field descriptor
///
/// Immutable after construction except via the explicit setters. The default
/// value always matches the descriptor's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    name: String,
    kind: PropertyKind,
    description: String,
    default_value: PropertyValue,
}

impl Property {
    /// Create a descriptor with the policy default for `kind`.
    pub fn new(name: impl Into<String>, kind: PropertyKind, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            default_value: PropertyValue::default_for(kind),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn default_value(&self) -> &PropertyValue {
        &self.default_value
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Replace the default value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when the value's kind does not
    /// match the descriptor's kind.
    pub fn set_default_value(&mut self, value: PropertyValue) -> Result<(), DomainError> {
        if value.kind() != self.kind {
            return Err(DomainError::validation(format!(
                "Default for property '{}' must be {:?}, got {:?}",
                self.name,
                self.kind,
                value.kind()
            )));
        }
        self.default_value = value;
        Ok(())
    }
}

/// Descriptive metadata for one entity type: an ordered sequence of
/// property descriptors with unique names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDefinition {
    type_name: String,
    description: String,
    properties: Vec<Property>,
}

impl ClassDefinition {
    pub fn new(type_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            description: description.into(),
            properties: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Append a descriptor, keeping names unique: a descriptor with an
    /// already-present name replaces the earlier one in place.
    pub fn add_property(&mut self, property: Property) {
        match self.properties.iter_mut().find(|p| p.name() == property.name()) {
            Some(existing) => *existing = property,
            None => self.properties.push(property),
        }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.add_property(property);
        self
    }
}

/// The generic name → value view of an entity
///
/// Mirrors every typed field; unknown names set through the generic API are
/// stored here as well so nothing is silently dropped.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PropertyBag {
    values: BTreeMap<String, PropertyValue>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: PropertyValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_value_policy() {
        assert_eq!(
            PropertyValue::default_for(PropertyKind::String),
            PropertyValue::String(String::new())
        );
        assert_eq!(
            PropertyValue::default_for(PropertyKind::Integer),
            PropertyValue::Integer(0)
        );
        assert_eq!(
            PropertyValue::default_for(PropertyKind::Float),
            PropertyValue::Float(0.0)
        );
        assert_eq!(
            PropertyValue::default_for(PropertyKind::Boolean),
            PropertyValue::Boolean(false)
        );
        assert_eq!(
            PropertyValue::default_for(PropertyKind::Reference),
            PropertyValue::Reference(None)
        );
    }

    #[test]
    fn test_set_default_rejects_kind_mismatch() {
        let mut property = Property::new("goldValue", PropertyKind::Integer, "Gold value");
        let result = property.set_default_value(PropertyValue::String("10".into()));
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(property.default_value(), &PropertyValue::Integer(0));

        property
            .set_default_value(PropertyValue::Integer(25))
            .expect("matching kind must be accepted");
        assert_eq!(property.default_value(), &PropertyValue::Integer(25));
    }

    #[test]
    fn test_property_value_serializes_kind_tagged() {
        let gold = serde_json::to_value(PropertyValue::Integer(5)).expect("serializable");
        assert_eq!(gold, serde_json::json!({"kind": "integer", "value": 5}));

        let unset = serde_json::to_value(PropertyValue::Reference(None)).expect("serializable");
        assert_eq!(unset, serde_json::json!({"kind": "reference", "value": null}));

        let parsed: PropertyValue =
            serde_json::from_value(gold).expect("tagged form parses back");
        assert_eq!(parsed, PropertyValue::Integer(5));
    }

    #[test]
    fn test_class_definition_keeps_property_names_unique() {
        let mut definition = ClassDefinition::new("item", "An item");
        definition.add_property(Property::new("goldValue", PropertyKind::Integer, "Gold"));
        definition.add_property(Property::new("foodValue", PropertyKind::Integer, "Food"));

        let mut replacement = Property::new("goldValue", PropertyKind::Integer, "Gold, revised");
        replacement
            .set_default_value(PropertyValue::Integer(5))
            .expect("matching kind");
        definition.add_property(replacement);

        assert_eq!(definition.properties().len(), 2);
        // Replacement keeps the original position.
        assert_eq!(definition.properties()[0].description(), "Gold, revised");
    }
}
