//! Creature entity - hostile or neutral inhabitants of the world
//!
//! Creatures carry identity (a duplicate gets a fresh id) and two shared
//! references: the item they drop and the movement pattern they follow.
//! Both are persisted by name and resolved in the loader's second pass.

use std::sync::Arc;

use crate::entities::object::{
    expect_integer, expect_reference, expect_string, ObjectCore, ObjectInstance, ObjectType,
};
use crate::entities::{Item, Movement};
use crate::error::DomainError;
use crate::ids::CreatureId;
use crate::value_objects::{Direction, PropertyBag, PropertyValue};

#[derive(Debug, Clone, PartialEq)]
pub struct Creature {
    id: CreatureId,
    core: ObjectCore,
    strength_penalty: i64,
    water_penalty: i64,
    gold_penalty: i64,
    difficulties: String,
    orientation: Option<Direction>,
    item_drop: Option<Arc<Item>>,
    movement: Option<Arc<Movement>>,
}

impl Creature {
    pub fn new(name: impl Into<String>) -> Self {
        let mut creature = Self {
            id: CreatureId::new(),
            core: ObjectCore::new(name),
            strength_penalty: 0,
            water_penalty: 0,
            gold_penalty: 0,
            difficulties: String::new(),
            orientation: None,
            item_drop: None,
            movement: None,
        };
        creature.assign_id(creature.id);
        creature.set_strength_penalty(0);
        creature.set_water_penalty(0);
        creature.set_gold_penalty(0);
        creature.set_difficulties("");
        creature.set_orientation(None);
        creature.set_item_drop(None);
        creature.set_movement(None);
        creature
    }

    /// Reconstruct from stored data, keeping the persisted identity.
    pub fn from_parts(id: CreatureId, name: impl Into<String>) -> Self {
        let mut creature = Self::new(name);
        creature.assign_id(id);
        creature
    }

    pub fn id(&self) -> CreatureId {
        self.id
    }

    fn assign_id(&mut self, id: CreatureId) {
        self.id = id;
        self.core.mirror("id", PropertyValue::String(id.to_string()));
    }

    pub fn strength_penalty(&self) -> i64 {
        self.strength_penalty
    }

    pub fn set_strength_penalty(&mut self, value: i64) {
        self.strength_penalty = value;
        self.core.mirror("strengthPenalty", PropertyValue::Integer(value));
    }

    pub fn water_penalty(&self) -> i64 {
        self.water_penalty
    }

    pub fn set_water_penalty(&mut self, value: i64) {
        self.water_penalty = value;
        self.core.mirror("waterPenalty", PropertyValue::Integer(value));
    }

    pub fn gold_penalty(&self) -> i64 {
        self.gold_penalty
    }

    pub fn set_gold_penalty(&mut self, value: i64) {
        self.gold_penalty = value;
        self.core.mirror("goldPenalty", PropertyValue::Integer(value));
    }

    pub fn difficulties(&self) -> &str {
        &self.difficulties
    }

    pub fn set_difficulties(&mut self, difficulties: &str) {
        self.difficulties = difficulties.to_string();
        self.core
            .mirror("difficulties", PropertyValue::String(self.difficulties.clone()));
    }

    pub fn orientation(&self) -> Option<Direction> {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Option<Direction>) {
        self.orientation = orientation;
        self.core.mirror(
            "orientation",
            PropertyValue::Enum(orientation.map(|d| d.as_str().to_string()).unwrap_or_default()),
        );
    }

    pub fn item_drop(&self) -> Option<&Arc<Item>> {
        self.item_drop.as_ref()
    }

    /// The name currently carried by the `itemDrop` reference, whether or
    /// not a resolved target is attached.
    pub fn item_drop_name(&self) -> Option<&str> {
        self.core.reference_name("itemDrop")
    }

    pub fn set_item_drop(&mut self, item: Option<Arc<Item>>) {
        let reference = item.as_ref().map(|i| i.name().to_string());
        self.item_drop = item;
        self.core.mirror("itemDrop", PropertyValue::Reference(reference));
    }

    pub fn movement(&self) -> Option<&Arc<Movement>> {
        self.movement.as_ref()
    }

    pub fn movement_name(&self) -> Option<&str> {
        self.core.reference_name("movement")
    }

    pub fn set_movement(&mut self, movement: Option<Arc<Movement>>) {
        let reference = movement.as_ref().map(|m| m.name().to_string());
        self.movement = movement;
        self.core.mirror("movement", PropertyValue::Reference(reference));
    }
}

impl ObjectInstance for Creature {
    fn object_type(&self) -> ObjectType {
        ObjectType::Creature
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
            "strengthPenalty" => self.set_strength_penalty(expect_integer(name, &value)?),
            "waterPenalty" => self.set_water_penalty(expect_integer(name, &value)?),
            "goldPenalty" => self.set_gold_penalty(expect_integer(name, &value)?),
            "difficulties" => {
                let v = expect_string(name, &value)?;
                self.set_difficulties(&v);
            }
            "orientation" => {
                let token = expect_string(name, &value)?;
                let orientation = if token.is_empty() {
                    None
                } else {
                    Some(token.parse()?)
                };
                self.set_orientation(orientation);
            }
            // Reference fields hold names. The generic API cannot resolve a
            // target here, so the stale target is dropped and the new name
            // waits for the loader's second pass; the bag never disagrees
            // with the structural field's name.
            "itemDrop" => {
                let target = expect_reference(name, &value)?;
                self.item_drop = None;
                self.core.mirror(name, PropertyValue::Reference(target));
            }
            "movement" => {
                let target = expect_reference(name, &value)?;
                self.movement = None;
                self.core.mirror(name, PropertyValue::Reference(target));
            }
            _ => self.core.mirror(name, value),
        }
        Ok(())
    }

    fn duplicate(&self) -> Self {
        // Values copy, references alias; identity regenerates.
        let mut copy = self.clone();
        copy.assign_id(CreatureId::new());
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_regenerates_identity_and_aliases_references() {
        let drop = Arc::new(Item::new("fang"));
        let movement = Arc::new(Movement::new("patrol"));

        let mut creature = Creature::new("wolf");
        creature.set_strength_penalty(4);
        creature.set_water_penalty(1);
        creature.set_gold_penalty(2);
        creature.set_difficulties("normal,hard");
        creature.set_item_drop(Some(Arc::clone(&drop)));
        creature.set_movement(Some(Arc::clone(&movement)));

        let copy = creature.duplicate();
        assert_ne!(copy.id(), creature.id());
        assert_eq!(copy.strength_penalty(), 4);
        assert_eq!(copy.water_penalty(), 1);
        assert_eq!(copy.gold_penalty(), 2);
        assert_eq!(copy.difficulties(), "normal,hard");
        // Shared references alias, they are not deep-copied.
        assert!(Arc::ptr_eq(
            copy.item_drop().expect("drop carried over"),
            &drop
        ));
        assert!(Arc::ptr_eq(
            copy.movement().expect("movement carried over"),
            &movement
        ));
    }

    #[test]
    fn test_duplicate_keeps_null_references_null() {
        let creature = Creature::new("slime");
        let copy = creature.duplicate();
        assert!(copy.item_drop().is_none());
        assert!(copy.movement().is_none());
    }

    #[test]
    fn test_generic_reference_write_drops_the_stale_target() {
        let mut creature = Creature::new("wolf");
        creature.set_item_drop(Some(Arc::new(Item::new("fang"))));

        creature
            .set_property("itemDrop", PropertyValue::Reference(Some("claw".into())))
            .expect("reference kind");

        // The old target is gone and both views carry the new name.
        assert!(creature.item_drop().is_none());
        assert_eq!(creature.item_drop_name(), Some("claw"));
        assert_eq!(
            creature.properties().get("itemDrop"),
            Some(&PropertyValue::Reference(Some("claw".into())))
        );
    }

    #[test]
    fn test_generic_reference_write_rejects_non_reference_kinds() {
        let mut creature = Creature::new("wolf");
        let result = creature.set_property("movement", PropertyValue::String("patrol".into()));
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_reference_setter_mirrors_name_into_bag() {
        let mut creature = Creature::new("wolf");
        creature.set_item_drop(Some(Arc::new(Item::new("fang"))));
        assert_eq!(
            creature.properties().get("itemDrop"),
            Some(&PropertyValue::Reference(Some("fang".into())))
        );

        creature.set_item_drop(None);
        assert_eq!(
            creature.properties().get("itemDrop"),
            Some(&PropertyValue::Reference(None))
        );
    }
}
