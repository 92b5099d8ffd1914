//! Per-type encode/decode between entities and flat [`FieldMap`] records
//!
//! Encoding stringifies scalars locale-independently, writes reference
//! fields as the referenced object's name (omitting the key for an absent
//! reference), and joins multi-line lists with `"\n"`. Decoding never fails
//! on a single bad scalar: it substitutes the documented default and warns.
//! Reference fields cannot be resolved from one record in isolation, so
//! decoders hand back the raw names for the loader's second pass.

mod creature;
mod item;
mod movement;
mod spawner;
mod terrain;
mod trader;

pub use creature::{decode_creature, encode_creature, CreatureRefs};
pub use item::{decode_item, encode_item};
pub use movement::{decode_movement, encode_movement};
pub use spawner::{decode_spawner, encode_spawner, SpawnerRefs};
pub use terrain::{decode_terrain, encode_terrain};
pub use trader::{decode_trader, encode_trader, TraderRefs};

use mapwright_domain::{Direction, ObjectInstance};

use crate::field_map::FieldMap;

/// The common identity fields every record starts with.
pub(crate) fn encode_common(fields: &mut FieldMap, object: &impl ObjectInstance) {
    fields.insert("name", object.name());
    fields.insert("description", object.description());
    fields.insert_optional("imagePath", object.image_path());
}

pub(crate) fn decode_common(fields: &FieldMap, object: &mut impl ObjectInstance) {
    object.set_description(&fields.get_string("description"));
    object.set_image_path(fields.get("imagePath"));
}

/// Optional direction token: absent key means no orientation; a bad token
/// falls back to none with a warning.
pub(crate) fn decode_orientation(fields: &FieldMap, object: &str) -> Option<Direction> {
    let token = fields.get("orientation")?;
    match token.parse() {
        Ok(direction) => Some(direction),
        Err(_) => {
            tracing::warn!(object, token, "malformed orientation token, leaving unset");
            None
        }
    }
}

/// Comma-delimited name list (trade offers); blanks are trimmed away.
pub(crate) fn split_name_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
