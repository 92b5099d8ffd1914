use mapwright_domain::Item;

use crate::codec::{decode_common, encode_common};
use crate::field_map::FieldMap;

pub fn encode_item(item: &Item) -> FieldMap {
    let mut fields = FieldMap::new();
    encode_common(&mut fields, item);
    fields.insert("goldValue", item.gold_value().to_string());
    fields.insert("foodValue", item.food_value().to_string());
    fields.insert("waterValue", item.water_value().to_string());
    fields.insert("difficulties", item.difficulties());
    fields
}

pub fn decode_item(fields: &FieldMap) -> Item {
    let name = fields.get_string("name");
    let context = format!("item '{}'", name);
    let mut item = Item::new(name);
    decode_common(fields, &mut item);
    item.set_gold_value(fields.get_i64(&context, "goldValue", 0));
    item.set_food_value(fields.get_i64(&context, "foodValue", 0));
    item.set_water_value(fields.get_i64(&context, "waterValue", 0));
    item.set_difficulties(&fields.get_string("difficulties"));
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapwright_domain::ObjectInstance;

    #[test]
    fn test_item_round_trip_is_field_equal() {
        let mut item = Item::new("waterskin");
        item.set_description("Holds three days of water");
        item.set_image_path(Some("items/waterskin.png"));
        item.set_gold_value(12);
        item.set_food_value(0);
        item.set_water_value(30);
        item.set_difficulties("easy,normal");

        let encoded = encode_item(&item);
        let decoded = decode_item(&encoded);
        assert_eq!(encode_item(&decoded), encoded);
        assert_eq!(decoded, item);
    }

    #[test]
    fn test_missing_numerics_default_without_failing() {
        let mut fields = FieldMap::new();
        fields.insert("name", "bare");
        let item = decode_item(&fields);
        assert_eq!(item.name(), "bare");
        assert_eq!(item.gold_value(), 0);
        assert!(item.image_path().is_none());
    }

    #[test]
    fn test_malformed_numeric_defaults_and_rest_still_loads() {
        let mut fields = FieldMap::new();
        fields.insert("name", "odd");
        fields.insert("goldValue", "plenty");
        fields.insert("foodValue", "4");
        let item = decode_item(&fields);
        assert_eq!(item.gold_value(), 0);
        assert_eq!(item.food_value(), 4);
    }
}
