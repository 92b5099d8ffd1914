//! Process-wide class registry
//!
//! Descriptive metadata for presentation layers: a catalog mapping a type
//! name to its ordered property descriptors. Lazily initialized on first
//! access with the built-in definitions, alive for the process lifetime,
//! never torn down. Nothing here validates live instances; unknown type
//! names are a normal "not found".

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::entities::ObjectType;
use crate::value_objects::{ClassDefinition, Property, PropertyKind};

static REGISTRY: Lazy<RwLock<BTreeMap<String, ClassDefinition>>> =
    Lazy::new(|| RwLock::new(builtin_definitions()));

/// Insert or replace the catalog entry for the definition's type name.
pub fn register_class_definition(definition: ClassDefinition) {
    REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(definition.type_name().to_string(), definition);
}

/// Look up a definition by type name; unknown names are a normal `None`.
pub fn class_definition(type_name: &str) -> Option<ClassDefinition> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(type_name)
        .cloned()
}

/// Snapshot of every registered definition, ordered by type name. Mutating
/// the snapshot does not affect the registry.
pub fn all_class_definitions() -> Vec<ClassDefinition> {
    REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .values()
        .cloned()
        .collect()
}

fn base_definition(object_type: ObjectType, description: &str) -> ClassDefinition {
    ClassDefinition::new(object_type.as_str(), description)
        .with_property(Property::new("name", PropertyKind::String, "Display name"))
        .with_property(Property::new(
            "description",
            PropertyKind::String,
            "Descriptive text",
        ))
        .with_property(Property::new(
            "imagePath",
            PropertyKind::Image,
            "Image resource path",
        ))
}

fn builtin_definitions() -> BTreeMap<String, ClassDefinition> {
    let item = base_definition(ObjectType::Item, "An object a player can pick up or trade")
        .with_property(Property::new("goldValue", PropertyKind::Integer, "Gold value"))
        .with_property(Property::new("foodValue", PropertyKind::Integer, "Food value"))
        .with_property(Property::new("waterValue", PropertyKind::Integer, "Water value"))
        .with_property(Property::new(
            "difficulties",
            PropertyKind::String,
            "Difficulty tiers this item appears in",
        ));

    let creature = base_definition(ObjectType::Creature, "A hostile or neutral inhabitant")
        .with_property(Property::new(
            "strengthPenalty",
            PropertyKind::Integer,
            "Strength cost of an encounter",
        ))
        .with_property(Property::new(
            "waterPenalty",
            PropertyKind::Integer,
            "Water cost of an encounter",
        ))
        .with_property(Property::new(
            "goldPenalty",
            PropertyKind::Integer,
            "Gold cost of an encounter",
        ))
        .with_property(Property::new(
            "difficulties",
            PropertyKind::String,
            "Difficulty tiers this creature appears in",
        ))
        .with_property(Property::new(
            "itemDrop",
            PropertyKind::Reference,
            "Item dropped when defeated",
        ))
        .with_property(Property::new(
            "movement",
            PropertyKind::Reference,
            "Movement pattern",
        ));

    let trader = base_definition(ObjectType::Trader, "An NPC that barters with the player")
        .with_property(Property::new(
            "greetingDialogue",
            PropertyKind::String,
            "Line spoken on first contact",
        ))
        .with_property(Property::new(
            "offerDialogue",
            PropertyKind::String,
            "Line spoken when presenting an offer",
        ))
        .with_property(Property::new(
            "acceptDialogue",
            PropertyKind::String,
            "Line spoken when an offer is accepted",
        ))
        .with_property(Property::new(
            "declineDialogue",
            PropertyKind::String,
            "Line spoken when an offer is declined",
        ))
        .with_property(Property::new(
            "aggroDialogue",
            PropertyKind::String,
            "Line spoken while aggressive",
        ))
        .with_property(Property::new(
            "maxOffersBeforeDecline",
            PropertyKind::Integer,
            "Offers tolerated before declining outright",
        ))
        .with_property(Property::new("isAggro", PropertyKind::Boolean, "Currently aggressive"))
        .with_property(Property::new(
            "aggroOnMaxReject",
            PropertyKind::Boolean,
            "Turns aggressive after too many rejections",
        ))
        .with_property(Property::new(
            "maxAggroDuration",
            PropertyKind::Integer,
            "Turns aggression lasts",
        ))
        .with_property(Property::new(
            "stealSuccessRate",
            PropertyKind::Float,
            "Chance a steal attempt succeeds, within [0, 1]",
        ))
        .with_property(Property::new(
            "minPlayerResourcePercentage",
            PropertyKind::Float,
            "Lower bound of the player-resource window, within [0, 1]",
        ))
        .with_property(Property::new(
            "maxPlayerResourcePercentage",
            PropertyKind::Float,
            "Upper bound of the player-resource window, within [0, 1]",
        ))
        .with_property(Property::new(
            "strengthPenalty",
            PropertyKind::Integer,
            "Strength cost of an encounter",
        ))
        .with_property(Property::new(
            "waterPenalty",
            PropertyKind::Integer,
            "Water cost of an encounter",
        ))
        .with_property(Property::new(
            "foodPenalty",
            PropertyKind::Integer,
            "Food cost of an encounter",
        ))
        .with_property(Property::new(
            "tradeOffers",
            PropertyKind::String,
            "Names of offered items",
        ))
        .with_property(Property::new(
            "passiveMovement",
            PropertyKind::Reference,
            "Movement pattern while passive",
        ))
        .with_property(Property::new(
            "aggroMovement",
            PropertyKind::Reference,
            "Movement pattern while aggressive",
        ));

    let terrain = base_definition(ObjectType::Terrain, "Per-cell movement and resource costs")
        .with_property(Property::new("strengthCost", PropertyKind::Integer, "Strength cost"))
        .with_property(Property::new("movementCost", PropertyKind::Integer, "Movement cost"))
        .with_property(Property::new("hungerCost", PropertyKind::Integer, "Hunger cost"))
        .with_property(Property::new("thirstCost", PropertyKind::Integer, "Thirst cost"))
        .with_property(Property::new("goldCost", PropertyKind::Integer, "Gold cost"));

    let movement = base_definition(ObjectType::Movement, "An ordered movement pattern")
        .with_property(Property::new(
            "directions",
            PropertyKind::String,
            "Direction tokens, one per line",
        ))
        .with_property(Property::new(
            "repeating",
            PropertyKind::Boolean,
            "Restart the pattern when it ends",
        ))
        .with_property(Property::new(
            "random",
            PropertyKind::Boolean,
            "Pick steps at random instead of in order",
        ))
        .with_property(Property::new(
            "reversible",
            PropertyKind::Boolean,
            "Play the pattern backwards when it ends",
        ))
        .with_property(Property::new(
            "moveInterval",
            PropertyKind::Integer,
            "Turns between steps",
        ));

    let spawner = base_definition(ObjectType::Spawner, "A turn-driven population generator")
        .with_property(Property::new(
            "maxSpawnCap",
            PropertyKind::Integer,
            "Population bound",
        ))
        .with_property(Property::new(
            "spawnFrequency",
            PropertyKind::Integer,
            "Turns between spawns",
        ))
        .with_property(Property::new(
            "isDirected",
            PropertyKind::Boolean,
            "Orient fresh instances along the spawner's direction",
        ))
        .with_property(Property::new(
            "direction",
            PropertyKind::Enum,
            "Compass direction for directed spawning",
        ))
        .with_property(Property::new(
            "randomOrientation",
            PropertyKind::Boolean,
            "Reassign random facings each turn",
        ))
        .with_property(Property::new(
            "objectType",
            PropertyKind::String,
            "Type token of the spawned objects",
        ))
        .with_property(Property::new(
            "objectTemplate",
            PropertyKind::Reference,
            "Template the spawner instantiates",
        ))
        .with_property(Property::new(
            "turnCounter",
            PropertyKind::Integer,
            "Turns since the last spawn",
        ));

    [item, creature, trader, terrain, movement, spawner]
        .into_iter()
        .map(|definition| (definition.type_name().to_string(), definition))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_are_available_on_first_access() {
        for type_name in ["item", "creature", "trader", "terrain", "movement", "spawner"] {
            let definition = class_definition(type_name);
            assert!(definition.is_some(), "missing builtin for {}", type_name);
        }
    }

    #[test]
    fn test_unknown_type_name_is_a_normal_miss() {
        assert!(class_definition("wormhole").is_none());
    }

    #[test]
    fn test_register_replaces_by_type_name() {
        let definition = ClassDefinition::new("testOnlyWidget", "First registration");
        register_class_definition(definition);
        let replacement = ClassDefinition::new("testOnlyWidget", "Second registration")
            .with_property(Property::new("size", PropertyKind::Integer, "Size"));
        register_class_definition(replacement);

        let fetched = class_definition("testOnlyWidget").expect("registered");
        assert_eq!(fetched.description(), "Second registration");
        assert_eq!(fetched.properties().len(), 1);
    }

    #[test]
    fn test_snapshot_mutation_does_not_touch_registry() {
        let mut snapshot = all_class_definitions();
        let before = snapshot.len();
        snapshot.clear();
        assert_eq!(all_class_definitions().len(), before);
    }

    #[test]
    fn test_creature_definition_lists_reference_fields() {
        let definition = class_definition("creature").expect("builtin");
        let item_drop = definition.property("itemDrop").expect("described field");
        assert_eq!(item_drop.kind(), PropertyKind::Reference);
    }
}
