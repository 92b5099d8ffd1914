//! Terrain entity - per-cell movement and resource costs
//!
//! Terrain is shared, not owned: cells alias one terrain definition through
//! `Arc`, and filling a map never copies the terrain object.

use crate::entities::object::{expect_integer, ObjectCore, ObjectInstance, ObjectType};
use crate::error::DomainError;
use crate::value_objects::{PropertyBag, PropertyValue};

#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    core: ObjectCore,
    strength_cost: i64,
    movement_cost: i64,
    hunger_cost: i64,
    thirst_cost: i64,
    gold_cost: i64,
}

impl Terrain {
    pub fn new(name: impl Into<String>) -> Self {
        let mut terrain = Self {
            core: ObjectCore::new(name),
            strength_cost: 0,
            movement_cost: 0,
            hunger_cost: 0,
            thirst_cost: 0,
            gold_cost: 0,
        };
        terrain.set_strength_cost(0);
        terrain.set_movement_cost(0);
        terrain.set_hunger_cost(0);
        terrain.set_thirst_cost(0);
        terrain.set_gold_cost(0);
        terrain
    }

    pub fn strength_cost(&self) -> i64 {
        self.strength_cost
    }

    pub fn set_strength_cost(&mut self, value: i64) {
        self.strength_cost = value;
        self.core.mirror("strengthCost", PropertyValue::Integer(value));
    }

    pub fn movement_cost(&self) -> i64 {
        self.movement_cost
    }

    pub fn set_movement_cost(&mut self, value: i64) {
        self.movement_cost = value;
        self.core.mirror("movementCost", PropertyValue::Integer(value));
    }

    pub fn hunger_cost(&self) -> i64 {
        self.hunger_cost
    }

    pub fn set_hunger_cost(&mut self, value: i64) {
        self.hunger_cost = value;
        self.core.mirror("hungerCost", PropertyValue::Integer(value));
    }

    pub fn thirst_cost(&self) -> i64 {
        self.thirst_cost
    }

    pub fn set_thirst_cost(&mut self, value: i64) {
        self.thirst_cost = value;
        self.core.mirror("thirstCost", PropertyValue::Integer(value));
    }

    pub fn gold_cost(&self) -> i64 {
        self.gold_cost
    }

    pub fn set_gold_cost(&mut self, value: i64) {
        self.gold_cost = value;
        self.core.mirror("goldCost", PropertyValue::Integer(value));
    }
}

impl ObjectInstance for Terrain {
    fn object_type(&self) -> ObjectType {
        ObjectType::Terrain
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
            "strengthCost" => self.set_strength_cost(expect_integer(name, &value)?),
            "movementCost" => self.set_movement_cost(expect_integer(name, &value)?),
            "hungerCost" => self.set_hunger_cost(expect_integer(name, &value)?),
            "thirstCost" => self.set_thirst_cost(expect_integer(name, &value)?),
            "goldCost" => self.set_gold_cost(expect_integer(name, &value)?),
            _ => self.core.mirror(name, value),
        }
        Ok(())
    }

    fn duplicate(&self) -> Self {
        self.clone()
    }
}
