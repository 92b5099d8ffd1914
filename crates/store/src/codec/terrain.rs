use mapwright_domain::Terrain;

use crate::codec::{decode_common, encode_common};
use crate::field_map::FieldMap;

pub fn encode_terrain(terrain: &Terrain) -> FieldMap {
    let mut fields = FieldMap::new();
    encode_common(&mut fields, terrain);
    fields.insert("strengthCost", terrain.strength_cost().to_string());
    fields.insert("movementCost", terrain.movement_cost().to_string());
    fields.insert("hungerCost", terrain.hunger_cost().to_string());
    fields.insert("thirstCost", terrain.thirst_cost().to_string());
    fields.insert("goldCost", terrain.gold_cost().to_string());
    fields
}

pub fn decode_terrain(fields: &FieldMap) -> Terrain {
    let name = fields.get_string("name");
    let context = format!("terrain '{}'", name);
    let mut terrain = Terrain::new(name);
    decode_common(fields, &mut terrain);
    terrain.set_strength_cost(fields.get_i64(&context, "strengthCost", 0));
    terrain.set_movement_cost(fields.get_i64(&context, "movementCost", 0));
    terrain.set_hunger_cost(fields.get_i64(&context, "hungerCost", 0));
    terrain.set_thirst_cost(fields.get_i64(&context, "thirstCost", 0));
    terrain.set_gold_cost(fields.get_i64(&context, "goldCost", 0));
    terrain
}
