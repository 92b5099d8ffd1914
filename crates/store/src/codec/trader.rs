use mapwright_domain::{ObjectInstance, Trader};
use tracing::warn;

use crate::codec::{decode_common, decode_orientation, encode_common, split_name_list};
use crate::field_map::FieldMap;

/// Name-valued reference fields awaiting the loader's second pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraderRefs {
    pub passive_movement: Option<String>,
    pub aggro_movement: Option<String>,
    pub trade_offers: Vec<String>,
}

pub fn encode_trader(trader: &Trader) -> FieldMap {
    let mut fields = FieldMap::new();
    encode_common(&mut fields, trader);
    fields.insert("greetingDialogue", trader.greeting_dialogue());
    fields.insert("offerDialogue", trader.offer_dialogue());
    fields.insert("acceptDialogue", trader.accept_dialogue());
    fields.insert("declineDialogue", trader.decline_dialogue());
    fields.insert("aggroDialogue", trader.aggro_dialogue());
    fields.insert(
        "maxOffersBeforeDecline",
        trader.max_offers_before_decline().to_string(),
    );
    fields.insert("isAggro", trader.is_aggro().to_string());
    fields.insert("aggroOnMaxReject", trader.aggro_on_max_reject().to_string());
    fields.insert("maxAggroDuration", trader.max_aggro_duration().to_string());
    // Debug formatting keeps the fractional part ("0.0", not "0"), so rate
    // fields always read back as floats.
    fields.insert(
        "stealSuccessRate",
        format!("{:?}", trader.steal_success_rate()),
    );
    fields.insert(
        "minPlayerResourcePercentage",
        format!("{:?}", trader.min_player_resource_percentage()),
    );
    fields.insert(
        "maxPlayerResourcePercentage",
        format!("{:?}", trader.max_player_resource_percentage()),
    );
    fields.insert("strengthPenalty", trader.strength_penalty().to_string());
    fields.insert("waterPenalty", trader.water_penalty().to_string());
    fields.insert("foodPenalty", trader.food_penalty().to_string());
    fields.insert_optional(
        "orientation",
        trader.orientation().map(|d| d.as_str().to_string()),
    );
    // Name-valued fields persist as the bag carries them. The stored offer
    // list, not the aggro-filtered view, backs the bag, so an aggro trader
    // does not lose its authored offers across a save.
    fields.insert("tradeOffers", trader.trade_offer_names());
    fields.insert_optional(
        "passiveMovement",
        trader.passive_movement_name().map(str::to_string),
    );
    fields.insert_optional(
        "aggroMovement",
        trader.aggro_movement_name().map(str::to_string),
    );
    fields
}

pub fn decode_trader(fields: &FieldMap) -> (Trader, TraderRefs) {
    let name = fields.get_string("name");
    let context = format!("trader '{}'", name);

    let mut trader = Trader::new(name);
    decode_common(fields, &mut trader);
    trader.set_greeting_dialogue(&fields.get_string("greetingDialogue"));
    trader.set_offer_dialogue(&fields.get_string("offerDialogue"));
    trader.set_accept_dialogue(&fields.get_string("acceptDialogue"));
    trader.set_decline_dialogue(&fields.get_string("declineDialogue"));
    trader.set_aggro_dialogue(&fields.get_string("aggroDialogue"));
    trader.set_max_offers_before_decline(fields.get_i64(&context, "maxOffersBeforeDecline", 0));
    trader.set_is_aggro(fields.get_bool(&context, "isAggro", false));
    trader.set_aggro_on_max_reject(fields.get_bool(&context, "aggroOnMaxReject", false));
    trader.set_max_aggro_duration(fields.get_i64(&context, "maxAggroDuration", 0));
    decode_rate(&mut trader, &context, fields, "stealSuccessRate", |t, v| {
        t.set_steal_success_rate(v)
    });
    decode_rate(
        &mut trader,
        &context,
        fields,
        "minPlayerResourcePercentage",
        |t, v| t.set_min_player_resource_percentage(v),
    );
    decode_rate(
        &mut trader,
        &context,
        fields,
        "maxPlayerResourcePercentage",
        |t, v| t.set_max_player_resource_percentage(v),
    );
    trader.set_strength_penalty(fields.get_i64(&context, "strengthPenalty", 0));
    trader.set_water_penalty(fields.get_i64(&context, "waterPenalty", 0));
    trader.set_food_penalty(fields.get_i64(&context, "foodPenalty", 0));
    trader.set_orientation(decode_orientation(fields, &context));

    let refs = TraderRefs {
        passive_movement: fields.get("passiveMovement").map(str::to_string),
        aggro_movement: fields.get("aggroMovement").map(str::to_string),
        trade_offers: split_name_list(&fields.get_string("tradeOffers")),
    };
    (trader, refs)
}

/// Rates are validated by their setters. A stored value outside [0, 1]
/// leaves the default in place with a warning rather than failing the
/// trader.
fn decode_rate(
    trader: &mut Trader,
    context: &str,
    fields: &FieldMap,
    key: &str,
    set: impl FnOnce(&mut Trader, f64) -> Result<(), mapwright_domain::DomainError>,
) {
    let value = fields.get_f64(context, key, 0.0);
    if let Err(error) = set(trader, value) {
        warn!(object = context, key, value, %error, "out-of-range rate, keeping default");
    }
}
