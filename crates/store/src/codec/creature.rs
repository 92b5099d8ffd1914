use mapwright_domain::{Creature, CreatureId, ObjectInstance};
use tracing::warn;

use crate::codec::{decode_common, decode_orientation, encode_common};
use crate::field_map::FieldMap;

/// Name-valued reference fields awaiting the loader's second pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatureRefs {
    pub item_drop: Option<String>,
    pub movement: Option<String>,
}

pub fn encode_creature(creature: &Creature) -> FieldMap {
    let mut fields = FieldMap::new();
    encode_common(&mut fields, creature);
    fields.insert("id", creature.id().to_string());
    fields.insert("strengthPenalty", creature.strength_penalty().to_string());
    fields.insert("waterPenalty", creature.water_penalty().to_string());
    fields.insert("goldPenalty", creature.gold_penalty().to_string());
    fields.insert("difficulties", creature.difficulties());
    fields.insert_optional(
        "orientation",
        creature.orientation().map(|d| d.as_str().to_string()),
    );
    // References persist as the referenced object's name; an unset
    // reference omits its key entirely.
    // Reference fields persist the names the bag carries, so a pending
    // (not yet re-resolved) reference write still round-trips.
    fields.insert_optional("itemDrop", creature.item_drop_name().map(str::to_string));
    fields.insert_optional("movement", creature.movement_name().map(str::to_string));
    fields
}

pub fn decode_creature(fields: &FieldMap) -> (Creature, CreatureRefs) {
    let name = fields.get_string("name");
    let context = format!("creature '{}'", name);

    let id = match fields.get("id").map(str::parse) {
        Some(Ok(uuid)) => CreatureId::from_uuid(uuid),
        Some(Err(_)) | None => {
            warn!(object = %context, "missing or malformed creature id, generating a fresh one");
            CreatureId::new()
        }
    };

    let mut creature = Creature::from_parts(id, name);
    decode_common(fields, &mut creature);
    creature.set_strength_penalty(fields.get_i64(&context, "strengthPenalty", 0));
    creature.set_water_penalty(fields.get_i64(&context, "waterPenalty", 0));
    creature.set_gold_penalty(fields.get_i64(&context, "goldPenalty", 0));
    creature.set_difficulties(&fields.get_string("difficulties"));
    creature.set_orientation(decode_orientation(fields, &context));

    let refs = CreatureRefs {
        item_drop: fields.get("itemDrop").map(str::to_string),
        movement: fields.get("movement").map(str::to_string),
    };
    (creature, refs)
}
