//! Item entity - objects a player can pick up, consume, or trade

use crate::entities::object::{expect_integer, expect_string, ObjectCore, ObjectInstance, ObjectType};
use crate::error::DomainError;
use crate::value_objects::{PropertyBag, PropertyValue};

/// An authorable item definition
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    core: ObjectCore,
    gold_value: i64,
    food_value: i64,
    water_value: i64,
    difficulties: String,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        let mut item = Self {
            core: ObjectCore::new(name),
            gold_value: 0,
            food_value: 0,
            water_value: 0,
            difficulties: String::new(),
        };
        item.set_gold_value(0);
        item.set_food_value(0);
        item.set_water_value(0);
        item.set_difficulties("");
        item
    }

    pub fn gold_value(&self) -> i64 {
        self.gold_value
    }

    pub fn set_gold_value(&mut self, value: i64) {
        self.gold_value = value;
        self.core.mirror("goldValue", PropertyValue::Integer(value));
    }

    pub fn food_value(&self) -> i64 {
        self.food_value
    }

    pub fn set_food_value(&mut self, value: i64) {
        self.food_value = value;
        self.core.mirror("foodValue", PropertyValue::Integer(value));
    }

    pub fn water_value(&self) -> i64 {
        self.water_value
    }

    pub fn set_water_value(&mut self, value: i64) {
        self.water_value = value;
        self.core.mirror("waterValue", PropertyValue::Integer(value));
    }

    pub fn difficulties(&self) -> &str {
        &self.difficulties
    }

    pub fn set_difficulties(&mut self, difficulties: &str) {
        self.difficulties = difficulties.to_string();
        self.core
            .mirror("difficulties", PropertyValue::String(self.difficulties.clone()));
    }
}

impl ObjectInstance for Item {
    fn object_type(&self) -> ObjectType {
        ObjectType::Item
    }

    fn name(&self) -> &str {
        self.core.name()
    }

    fn set_name(&mut self, name: &str) {
        self.core.set_name(name);
    }

    fn description(&self) -> &str {
        self.core.description()
    }

    fn set_description(&mut self, description: &str) {
        self.core.set_description(description);
    }

    fn image_path(&self) -> Option<&str> {
        self.core.image_path()
    }

    fn set_image_path(&mut self, path: Option<&str>) {
        self.core.set_image_path(path);
    }

    fn properties(&self) -> &PropertyBag {
        self.core.bag()
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), DomainError> {
        if let Some(result) = self.core.try_set_common(name, &value) {
            return result;
        }
        match name {
            "goldValue" => self.set_gold_value(expect_integer(name, &value)?),
            "foodValue" => self.set_food_value(expect_integer(name, &value)?),
            "waterValue" => self.set_water_value(expect_integer(name, &value)?),
            "difficulties" => {
                let v = expect_string(name, &value)?;
                self.set_difficulties(&v);
            }
            _ => self.core.mirror(name, value),
        }
        Ok(())
    }

    // Items carry no identity and no references: a duplicate is a plain
    // value copy.
    fn duplicate(&self) -> Self {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_setter_mirrors_into_bag() {
        let mut item = Item::new("waterskin");
        item.set_gold_value(12);
        assert_eq!(
            item.properties().get("goldValue"),
            Some(&PropertyValue::Integer(12))
        );
    }

    #[test]
    fn test_set_property_dispatches_to_typed_setter() {
        let mut item = Item::new("waterskin");
        item.set_property("waterValue", PropertyValue::Integer(30))
            .expect("known field with matching kind");
        assert_eq!(item.water_value(), 30);
    }

    #[test]
    fn test_set_property_rejects_kind_mismatch() {
        let mut item = Item::new("waterskin");
        let result = item.set_property("goldValue", PropertyValue::Boolean(true));
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert_eq!(item.gold_value(), 0);
    }

    #[test]
    fn test_set_property_stores_unknown_names_in_bag() {
        let mut item = Item::new("waterskin");
        item.set_property("customFlavour", PropertyValue::String("salty".into()))
            .expect("unknown names are stored, not rejected");
        assert_eq!(
            item.properties().get("customFlavour"),
            Some(&PropertyValue::String("salty".into()))
        );
    }

    #[test]
    fn test_duplicate_copies_values() {
        let mut item = Item::new("waterskin");
        item.set_gold_value(5);
        item.set_difficulties("easy,normal");

        let copy = item.duplicate();
        assert_eq!(copy, item);
    }
}
