use mapwright_domain::Movement;

use crate::codec::{decode_common, encode_common};
use crate::field_map::FieldMap;

pub fn encode_movement(movement: &Movement) -> FieldMap {
    let mut fields = FieldMap::new();
    encode_common(&mut fields, movement);
    // Direction tokens use a line-based join; decode splits on the same
    // delimiter and discards blanks.
    fields.insert("directions", Movement::join_directions(movement.directions()));
    fields.insert("repeating", movement.repeating().to_string());
    fields.insert("random", movement.random().to_string());
    fields.insert("reversible", movement.reversible().to_string());
    fields.insert("moveInterval", movement.move_interval().to_string());
    fields
}

pub fn decode_movement(fields: &FieldMap) -> Movement {
    let name = fields.get_string("name");
    let context = format!("movement '{}'", name);
    let mut movement = Movement::new(name);
    decode_common(fields, &mut movement);
    movement.set_directions(Movement::split_directions(&fields.get_string("directions")));
    movement.set_repeating(fields.get_bool(&context, "repeating", false));
    movement.set_random(fields.get_bool(&context, "random", false));
    movement.set_reversible(fields.get_bool(&context, "reversible", false));
    movement.set_move_interval(fields.get_i64(&context, "moveInterval", 0));
    movement
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapwright_domain::Direction;

    #[test]
    fn test_movement_round_trip_is_field_equal() {
        let mut movement = Movement::new("patrol");
        movement.set_directions(vec![Direction::North, Direction::East, Direction::North]);
        movement.set_repeating(true);
        movement.set_reversible(true);
        movement.set_move_interval(2);

        let encoded = encode_movement(&movement);
        assert_eq!(encoded.get("directions"), Some("north\neast\nnorth"));
        let decoded = decode_movement(&encoded);
        assert_eq!(encode_movement(&decoded), encoded);
        assert_eq!(decoded, movement);
    }

    #[test]
    fn test_blank_direction_lines_are_discarded_on_decode() {
        let mut fields = FieldMap::new();
        fields.insert("name", "patrol");
        fields.insert("directions", "north\n\n  \nsouth\n");
        let movement = decode_movement(&fields);
        assert_eq!(
            movement.directions(),
            &[Direction::North, Direction::South]
        );
    }
}
