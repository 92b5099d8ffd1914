use mapwright_domain::{Direction, ObjectInstance, Spawner};
use tracing::warn;

use crate::codec::{decode_common, encode_common};
use crate::field_map::FieldMap;

/// Name-valued reference fields awaiting the loader's second pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnerRefs {
    pub object_template: Option<String>,
}

/// Configuration and the turn counter persist; the spawned population is
/// runtime state owned by the live spawner and is not written out.
pub fn encode_spawner(spawner: &Spawner) -> FieldMap {
    let mut fields = FieldMap::new();
    encode_common(&mut fields, spawner);
    fields.insert("maxSpawnCap", spawner.max_spawn_cap().to_string());
    fields.insert("spawnFrequency", spawner.spawn_frequency().to_string());
    fields.insert("isDirected", spawner.is_directed().to_string());
    fields.insert("direction", spawner.direction().as_str());
    fields.insert("randomOrientation", spawner.random_orientation().to_string());
    fields.insert("objectType", spawner.object_type());
    fields.insert("turnCounter", spawner.turn_counter().to_string());
    fields.insert_optional(
        "objectTemplate",
        spawner.object_template_name().map(str::to_string),
    );
    fields
}

pub fn decode_spawner(fields: &FieldMap) -> (Spawner, SpawnerRefs) {
    let name = fields.get_string("name");
    let context = format!("spawner '{}'", name);

    let mut spawner = Spawner::new(name);
    decode_common(fields, &mut spawner);

    let cap = fields.get_i64(&context, "maxSpawnCap", 0);
    spawner.set_max_spawn_cap(usize::try_from(cap).unwrap_or(0));
    let frequency = fields.get_i64(&context, "spawnFrequency", 0);
    spawner.set_spawn_frequency(u32::try_from(frequency).unwrap_or(0));
    spawner.set_is_directed(fields.get_bool(&context, "isDirected", false));
    spawner.set_direction(decode_direction(fields, &context));
    spawner.set_random_orientation(fields.get_bool(&context, "randomOrientation", false));
    spawner.set_object_type(&fields.get_string("objectType"));
    let counter = fields.get_i64(&context, "turnCounter", 0);
    spawner.set_turn_counter(u32::try_from(counter).unwrap_or(0));

    let refs = SpawnerRefs {
        object_template: fields.get("objectTemplate").map(str::to_string),
    };
    (spawner, refs)
}

fn decode_direction(fields: &FieldMap, object: &str) -> Direction {
    let Some(token) = fields.get("direction") else {
        warn!(object, "missing direction, defaulting to north");
        return Direction::North;
    };
    token.parse().unwrap_or_else(|_| {
        warn!(object, token, "malformed direction token, defaulting to north");
        Direction::North
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapwright_domain::{Creature, FixedRandomSource, WorldObject};
    use std::sync::Arc;

    fn configured_spawner() -> Spawner {
        let mut spawner = Spawner::new("den");
        spawner.set_max_spawn_cap(4);
        spawner.set_spawn_frequency(3);
        spawner.set_is_directed(true);
        spawner.set_direction(Direction::SouthEast);
        spawner.set_object_type("creature");
        spawner.set_object_template(Some(Arc::new(WorldObject::from(Creature::new("wolf")))));
        spawner
    }

    #[test]
    fn test_configuration_round_trips() {
        let spawner = configured_spawner();
        let encoded = encode_spawner(&spawner);
        let (decoded, refs) = decode_spawner(&encoded);

        assert_eq!(decoded.max_spawn_cap(), 4);
        assert_eq!(decoded.spawn_frequency(), 3);
        assert!(decoded.is_directed());
        assert_eq!(decoded.direction(), Direction::SouthEast);
        assert_eq!(decoded.object_type(), "creature");
        assert_eq!(refs.object_template.as_deref(), Some("wolf"));
    }

    #[test]
    fn test_turn_counter_persists_but_population_does_not() {
        let mut spawner = configured_spawner();
        let rng = FixedRandomSource::new(vec![0]);
        spawner.process_turn(&rng);
        spawner.process_turn(&rng);
        spawner.process_turn(&rng);
        assert_eq!(spawner.spawned_objects().len(), 1);
        assert_eq!(spawner.turn_counter(), 0);
        spawner.process_turn(&rng);
        assert_eq!(spawner.turn_counter(), 1);

        let encoded = encode_spawner(&spawner);
        assert_eq!(encoded.get("turnCounter"), Some("1"));

        let (decoded, _) = decode_spawner(&encoded);
        assert_eq!(decoded.turn_counter(), 1);
        assert!(decoded.spawned_objects().is_empty());
    }

    #[test]
    fn test_missing_template_omits_the_key() {
        let mut spawner = configured_spawner();
        spawner.set_object_template(None);
        let encoded = encode_spawner(&spawner);
        assert!(!encoded.contains("objectTemplate"));
        let (_, refs) = decode_spawner(&encoded);
        assert_eq!(refs.object_template, None);
    }

    #[test]
    fn test_unknown_object_type_token_survives_the_round_trip() {
        let mut spawner = configured_spawner();
        spawner.set_object_type("portal");
        let (decoded, _) = decode_spawner(&encode_spawner(&spawner));
        assert_eq!(decoded.object_type(), "portal");
    }

    #[test]
    fn test_malformed_direction_defaults_to_north() {
        let mut fields = encode_spawner(&configured_spawner());
        fields.insert("direction", "sideways");
        let (decoded, _) = decode_spawner(&fields);
        assert_eq!(decoded.direction(), Direction::North);
    }
}
