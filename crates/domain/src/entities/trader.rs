//! Trader entity - NPCs that barter with the player
//!
//! A trader owns its list of trade offers (the container is destroyed with
//! the trader) while the offered items themselves are shared definitions.
//! Aggression suppresses offer visibility without discarding the stored
//! list.

use std::sync::Arc;

use crate::entities::object::{
    expect_boolean, expect_float, expect_integer, expect_reference, expect_string, ObjectCore,
    ObjectInstance, ObjectType,
};
use crate::entities::{Item, Movement};
use crate::error::DomainError;
use crate::value_objects::{Direction, PropertyBag, PropertyValue};

#[derive(Debug, Clone, PartialEq)]
pub struct Trader {
    core: ObjectCore,
    greeting_dialogue: String,
    offer_dialogue: String,
    accept_dialogue: String,
    decline_dialogue: String,
    aggro_dialogue: String,
    max_offers_before_decline: i64,
    is_aggro: bool,
    aggro_on_max_reject: bool,
    max_aggro_duration: i64,
    steal_success_rate: f64,
    min_player_resource_percentage: f64,
    max_player_resource_percentage: f64,
    strength_penalty: i64,
    water_penalty: i64,
    food_penalty: i64,
    orientation: Option<Direction>,
    trade_offers: Vec<Arc<Item>>,
    passive_movement: Option<Arc<Movement>>,
    aggro_movement: Option<Arc<Movement>>,
}

impl Trader {
    pub fn new(name: impl Into<String>) -> Self {
        let mut trader = Self {
            core: ObjectCore::new(name),
            greeting_dialogue: String::new(),
            offer_dialogue: String::new(),
            accept_dialogue: String::new(),
            decline_dialogue: String::new(),
            aggro_dialogue: String::new(),
            max_offers_before_decline: 0,
            is_aggro: false,
            aggro_on_max_reject: false,
            max_aggro_duration: 0,
            steal_success_rate: 0.0,
            min_player_resource_percentage: 0.0,
            max_player_resource_percentage: 0.0,
            strength_penalty: 0,
            water_penalty: 0,
            food_penalty: 0,
            orientation: None,
            trade_offers: Vec::new(),
            passive_movement: None,
            aggro_movement: None,
        };
        trader.set_greeting_dialogue("");
        trader.set_offer_dialogue("");
        trader.set_accept_dialogue("");
        trader.set_decline_dialogue("");
        trader.set_aggro_dialogue("");
        trader.set_max_offers_before_decline(0);
        trader.set_is_aggro(false);
        trader.set_aggro_on_max_reject(false);
        trader.set_max_aggro_duration(0);
        trader.set_strength_penalty(0);
        trader.set_water_penalty(0);
        trader.set_food_penalty(0);
        trader.set_orientation(None);
        trader.mirror_trade_offers();
        trader.set_passive_movement(None);
        trader.set_aggro_movement(None);
        trader
    }

    pub fn greeting_dialogue(&self) -> &str {
        &self.greeting_dialogue
    }

    pub fn set_greeting_dialogue(&mut self, text: &str) {
        self.greeting_dialogue = text.to_string();
        self.core
            .mirror("greetingDialogue", PropertyValue::String(text.to_string()));
    }

    pub fn offer_dialogue(&self) -> &str {
        &self.offer_dialogue
    }

    pub fn set_offer_dialogue(&mut self, text: &str) {
        self.offer_dialogue = text.to_string();
        self.core
            .mirror("offerDialogue", PropertyValue::String(text.to_string()));
    }

    pub fn accept_dialogue(&self) -> &str {
        &self.accept_dialogue
    }

    pub fn set_accept_dialogue(&mut self, text: &str) {
        self.accept_dialogue = text.to_string();
        self.core
            .mirror("acceptDialogue", PropertyValue::String(text.to_string()));
    }

    pub fn decline_dialogue(&self) -> &str {
        &self.decline_dialogue
    }

    pub fn set_decline_dialogue(&mut self, text: &str) {
        self.decline_dialogue = text.to_string();
        self.core
            .mirror("declineDialogue", PropertyValue::String(text.to_string()));
    }

    pub fn aggro_dialogue(&self) -> &str {
        &self.aggro_dialogue
    }

    pub fn set_aggro_dialogue(&mut self, text: &str) {
        self.aggro_dialogue = text.to_string();
        self.core
            .mirror("aggroDialogue", PropertyValue::String(text.to_string()));
    }

    pub fn max_offers_before_decline(&self) -> i64 {
        self.max_offers_before_decline
    }

    pub fn set_max_offers_before_decline(&mut self, value: i64) {
        self.max_offers_before_decline = value;
        self.core
            .mirror("maxOffersBeforeDecline", PropertyValue::Integer(value));
    }

    pub fn is_aggro(&self) -> bool {
        self.is_aggro
    }

    pub fn set_is_aggro(&mut self, value: bool) {
        self.is_aggro = value;
        self.core.mirror("isAggro", PropertyValue::Boolean(value));
    }

    pub fn aggro_on_max_reject(&self) -> bool {
        self.aggro_on_max_reject
    }

    pub fn set_aggro_on_max_reject(&mut self, value: bool) {
        self.aggro_on_max_reject = value;
        self.core
            .mirror("aggroOnMaxReject", PropertyValue::Boolean(value));
    }

    pub fn max_aggro_duration(&self) -> i64 {
        self.max_aggro_duration
    }

    pub fn set_max_aggro_duration(&mut self, value: i64) {
        self.max_aggro_duration = value;
        self.core
            .mirror("maxAggroDuration", PropertyValue::Integer(value));
    }

    pub fn steal_success_rate(&self) -> f64 {
        self.steal_success_rate
    }

    pub fn set_steal_success_rate(&mut self, value: f64) -> Result<(), DomainError> {
        Self::check_rate("stealSuccessRate", value)?;
        self.steal_success_rate = value;
        self.core
            .mirror("stealSuccessRate", PropertyValue::Float(value));
        Ok(())
    }

    pub fn min_player_resource_percentage(&self) -> f64 {
        self.min_player_resource_percentage
    }

    pub fn set_min_player_resource_percentage(&mut self, value: f64) -> Result<(), DomainError> {
        Self::check_rate("minPlayerResourcePercentage", value)?;
        self.min_player_resource_percentage = value;
        self.core
            .mirror("minPlayerResourcePercentage", PropertyValue::Float(value));
        Ok(())
    }

    pub fn max_player_resource_percentage(&self) -> f64 {
        self.max_player_resource_percentage
    }

    pub fn set_max_player_resource_percentage(&mut self, value: f64) -> Result<(), DomainError> {
        Self::check_rate("maxPlayerResourcePercentage", value)?;
        self.max_player_resource_percentage = value;
        self.core
            .mirror("maxPlayerResourcePercentage", PropertyValue::Float(value));
        Ok(())
    }

    fn check_rate(field: &str, value: f64) -> Result<(), DomainError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(DomainError::validation(format!(
                "{} must be within [0, 1], got {}",
                field, value
            )));
        }
        Ok(())
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

    pub fn food_penalty(&self) -> i64 {
        self.food_penalty
    }

    pub fn set_food_penalty(&mut self, value: i64) {
        self.food_penalty = value;
        self.core.mirror("foodPenalty", PropertyValue::Integer(value));
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

    /// The offers visible to a buyer. Empty while the trader is aggro,
    /// regardless of stored contents.
    pub fn trade_offers(&self) -> &[Arc<Item>] {
        if self.is_aggro {
            &[]
        } else {
            &self.trade_offers
        }
    }

    /// The stored offer list, ignoring aggro suppression. Persistence reads
    /// this so aggression never discards authored offers.
    pub fn stored_trade_offers(&self) -> &[Arc<Item>] {
        &self.trade_offers
    }

    /// The comma-joined offer names as the bag carries them: stored names,
    /// never the aggro-filtered view.
    pub fn trade_offer_names(&self) -> &str {
        self.core
            .bag()
            .get("tradeOffers")
            .and_then(PropertyValue::as_string)
            .unwrap_or_default()
    }

    pub fn set_trade_offers(&mut self, offers: Vec<Arc<Item>>) {
        self.trade_offers = offers;
        self.mirror_trade_offers();
    }

    pub fn add_trade_offer(&mut self, offer: Arc<Item>) {
        self.trade_offers.push(offer);
        self.mirror_trade_offers();
    }

    /// Remove the first stored offer with the given name; reports whether
    /// anything was removed.
    pub fn remove_trade_offer(&mut self, name: &str) -> bool {
        match self.trade_offers.iter().position(|o| o.name() == name) {
            Some(index) => {
                self.trade_offers.remove(index);
                self.mirror_trade_offers();
                true
            }
            None => false,
        }
    }

    fn mirror_trade_offers(&mut self) {
        let names = self
            .trade_offers
            .iter()
            .map(|o| o.name().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.core.mirror("tradeOffers", PropertyValue::String(names));
    }

    pub fn passive_movement(&self) -> Option<&Arc<Movement>> {
        self.passive_movement.as_ref()
    }

    /// The name currently carried by the `passiveMovement` reference,
    /// whether or not a resolved target is attached.
    pub fn passive_movement_name(&self) -> Option<&str> {
        self.core.reference_name("passiveMovement")
    }

    pub fn set_passive_movement(&mut self, movement: Option<Arc<Movement>>) {
        let reference = movement.as_ref().map(|m| m.name().to_string());
        self.passive_movement = movement;
        self.core
            .mirror("passiveMovement", PropertyValue::Reference(reference));
    }

    pub fn aggro_movement(&self) -> Option<&Arc<Movement>> {
        self.aggro_movement.as_ref()
    }

    pub fn aggro_movement_name(&self) -> Option<&str> {
        self.core.reference_name("aggroMovement")
    }

    pub fn set_aggro_movement(&mut self, movement: Option<Arc<Movement>>) {
        let reference = movement.as_ref().map(|m| m.name().to_string());
        self.aggro_movement = movement;
        self.core
            .mirror("aggroMovement", PropertyValue::Reference(reference));
    }
}

impl ObjectInstance for Trader {
    fn object_type(&self) -> ObjectType {
        ObjectType::Trader
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
            "greetingDialogue" => {
                let v = expect_string(name, &value)?;
                self.set_greeting_dialogue(&v);
            }
            "offerDialogue" => {
                let v = expect_string(name, &value)?;
                self.set_offer_dialogue(&v);
            }
            "acceptDialogue" => {
                let v = expect_string(name, &value)?;
                self.set_accept_dialogue(&v);
            }
            "declineDialogue" => {
                let v = expect_string(name, &value)?;
                self.set_decline_dialogue(&v);
            }
            "aggroDialogue" => {
                let v = expect_string(name, &value)?;
                self.set_aggro_dialogue(&v);
            }
            "maxOffersBeforeDecline" => {
                self.set_max_offers_before_decline(expect_integer(name, &value)?)
            }
            "isAggro" => self.set_is_aggro(expect_boolean(name, &value)?),
            "aggroOnMaxReject" => self.set_aggro_on_max_reject(expect_boolean(name, &value)?),
            "maxAggroDuration" => self.set_max_aggro_duration(expect_integer(name, &value)?),
            "stealSuccessRate" => self.set_steal_success_rate(expect_float(name, &value)?)?,
            "minPlayerResourcePercentage" => {
                self.set_min_player_resource_percentage(expect_float(name, &value)?)?
            }
            "maxPlayerResourcePercentage" => {
                self.set_max_player_resource_percentage(expect_float(name, &value)?)?
            }
            "strengthPenalty" => self.set_strength_penalty(expect_integer(name, &value)?),
            "waterPenalty" => self.set_water_penalty(expect_integer(name, &value)?),
            "foodPenalty" => self.set_food_penalty(expect_integer(name, &value)?),
            "orientation" => {
                let token = expect_string(name, &value)?;
                let orientation = if token.is_empty() {
                    None
                } else {
                    Some(token.parse()?)
                };
                self.set_orientation(orientation);
            }
            // Name-valued fields. The generic API cannot resolve targets
            // here, so the stale target (or owned list) is dropped and the
            // names wait for the loader's second pass; the bag never
            // disagrees with the structural fields.
            "passiveMovement" => {
                let target = expect_reference(name, &value)?;
                self.passive_movement = None;
                self.core.mirror(name, PropertyValue::Reference(target));
            }
            "aggroMovement" => {
                let target = expect_reference(name, &value)?;
                self.aggro_movement = None;
                self.core.mirror(name, PropertyValue::Reference(target));
            }
            "tradeOffers" => {
                let v = expect_string(name, &value)?;
                self.trade_offers.clear();
                self.core.mirror(name, PropertyValue::String(v));
            }
            _ => self.core.mirror(name, value),
        }
        Ok(())
    }

    fn duplicate(&self) -> Self {
        // Clone gives value copies, aliased Arc references, and a fresh
        // Vec container whose elements alias the originals.
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trader_with_offers(count: usize) -> Trader {
        let mut trader = Trader::new("pedlar");
        for i in 0..count {
            trader.add_trade_offer(Arc::new(Item::new(format!("ware-{}", i))));
        }
        trader
    }

    #[test]
    fn test_aggro_suppresses_offer_visibility_without_discarding() {
        let mut trader = trader_with_offers(3);
        assert_eq!(trader.trade_offers().len(), 3);

        trader.set_is_aggro(true);
        assert_eq!(trader.trade_offers().len(), 0);
        assert_eq!(trader.stored_trade_offers().len(), 3);

        trader.set_is_aggro(false);
        assert_eq!(trader.trade_offers().len(), 3);
    }

    #[test]
    fn test_rates_outside_unit_interval_are_rejected() {
        let mut trader = Trader::new("pedlar");
        assert!(trader.set_steal_success_rate(1.5).is_err());
        assert_eq!(trader.steal_success_rate(), 0.0);
        assert!(trader.set_min_player_resource_percentage(-0.1).is_err());
        trader
            .set_max_player_resource_percentage(0.75)
            .expect("in-range rate");
        assert_eq!(trader.max_player_resource_percentage(), 0.75);
    }

    #[test]
    fn test_duplicate_rebuilds_offer_container_with_aliased_elements() {
        let trader = trader_with_offers(2);
        let copy = trader.duplicate();

        assert_eq!(copy.stored_trade_offers().len(), 2);
        for (original, copied) in trader
            .stored_trade_offers()
            .iter()
            .zip(copy.stored_trade_offers())
        {
            assert!(Arc::ptr_eq(original, copied));
        }
    }

    #[test]
    fn test_duplicate_offer_lists_are_independent_containers() {
        let trader = trader_with_offers(1);
        let mut copy = trader.duplicate();
        copy.add_trade_offer(Arc::new(Item::new("extra")));

        assert_eq!(trader.stored_trade_offers().len(), 1);
        assert_eq!(copy.stored_trade_offers().len(), 2);
    }

    #[test]
    fn test_remove_trade_offer_reports_outcome() {
        let mut trader = trader_with_offers(2);
        assert!(trader.remove_trade_offer("ware-0"));
        assert!(!trader.remove_trade_offer("ware-0"));
        assert_eq!(trader.stored_trade_offers().len(), 1);
    }

    #[test]
    fn test_generic_movement_write_drops_the_stale_target() {
        let mut trader = Trader::new("pedlar");
        trader.set_passive_movement(Some(Arc::new(Movement::new("amble"))));

        trader
            .set_property(
                "passiveMovement",
                PropertyValue::Reference(Some("patrol".to_string())),
            )
            .expect("reference write");

        assert!(trader.passive_movement().is_none());
        assert_eq!(trader.passive_movement_name(), Some("patrol"));
    }

    #[test]
    fn test_generic_offer_write_drops_the_stale_list() {
        let mut trader = trader_with_offers(2);

        trader
            .set_property(
                "tradeOffers",
                PropertyValue::String("relic,charm".to_string()),
            )
            .expect("offer list write");

        assert!(trader.stored_trade_offers().is_empty());
        assert_eq!(trader.trade_offer_names(), "relic,charm");
    }
}
