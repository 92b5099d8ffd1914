//! Polymorphic object surface shared by every authorable entity
//!
//! Each concrete variant keeps its typed fields as the source of truth and
//! mirrors every typed change into a generic [`PropertyBag`], so reflective
//! readers (UI binding, persistence) always see current values without
//! per-type code.

use std::fmt;
use std::str::FromStr;

use crate::entities::{Creature, Item, Movement, Spawner, Terrain, Trader};
use crate::error::DomainError;
use crate::value_objects::{Direction, PropertyBag, PropertyValue};

/// Discriminator for the concrete entity variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Item,
    Creature,
    Trader,
    Terrain,
    Movement,
    Spawner,
}

impl ObjectType {
    /// Stable discriminator token, also used as the persistence collection
    /// name for the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Creature => "creature",
            Self::Trader => "trader",
            Self::Terrain => "terrain",
            Self::Movement => "movement",
            Self::Spawner => "spawner",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "item" => Ok(Self::Item),
            "creature" => Ok(Self::Creature),
            "trader" => Ok(Self::Trader),
            "terrain" => Ok(Self::Terrain),
            "movement" => Ok(Self::Movement),
            "spawner" => Ok(Self::Spawner),
            other => Err(DomainError::parse(format!("Unknown object type: {}", other))),
        }
    }
}

/// Capability set every concrete entity exposes
pub trait ObjectInstance {
    fn object_type(&self) -> ObjectType;

    fn name(&self) -> &str;
    fn set_name(&mut self, name: &str);

    fn description(&self) -> &str;
    fn set_description(&mut self, description: &str);

    fn image_path(&self) -> Option<&str>;
    fn set_image_path(&mut self, path: Option<&str>);

    /// The reflective view of this entity's fields.
    fn properties(&self) -> &PropertyBag;

    /// Set a field by name: dispatches to the matching typed setter, falls
    /// back to plain bag storage for unknown names.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when a known field receives a value
    /// of the wrong kind, or when the typed setter rejects the value.
    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), DomainError>;

    /// Produce a new instance per the duplication policy: value fields copy,
    /// identity fields regenerate, reference fields alias, owned containers
    /// are rebuilt around aliased elements.
    fn duplicate(&self) -> Self
    where
        Self: Sized;
}

/// The state every concrete variant embeds: identity, descriptive text,
/// image reference, and the mirrored bag.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ObjectCore {
    name: String,
    description: String,
    image_path: Option<String>,
    bag: PropertyBag,
}

impl ObjectCore {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        let mut core = Self {
            name: String::new(),
            description: String::new(),
            image_path: None,
            bag: PropertyBag::new(),
        };
        core.set_name(&name.into());
        core.set_description("");
        core.set_image_path(None);
        core
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
        self.bag.set("name", PropertyValue::String(self.name.clone()));
    }

    pub(crate) fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
        self.bag
            .set("description", PropertyValue::String(self.description.clone()));
    }

    pub(crate) fn image_path(&self) -> Option<&str> {
        self.image_path.as_deref()
    }

    pub(crate) fn set_image_path(&mut self, path: Option<&str>) {
        self.image_path = path.map(str::to_string);
        self.bag.set(
            "imagePath",
            PropertyValue::Image(self.image_path.clone().unwrap_or_default()),
        );
    }

    pub(crate) fn bag(&self) -> &PropertyBag {
        &self.bag
    }

    /// Mirror a typed field change into the bag.
    pub(crate) fn mirror(&mut self, key: &str, value: PropertyValue) {
        self.bag.set(key, value);
    }

    /// The name currently carried by a reference field in the bag. This is
    /// the authoritative name for persistence; the structural `Arc` is the
    /// resolved target when one is attached.
    pub(crate) fn reference_name(&self, key: &str) -> Option<&str> {
        self.bag.get(key).and_then(PropertyValue::as_reference).flatten()
    }

    /// Handle the fields every variant shares. Returns `None` when the name
    /// is not a common field and the caller should keep dispatching.
    pub(crate) fn try_set_common(
        &mut self,
        name: &str,
        value: &PropertyValue,
    ) -> Option<Result<(), DomainError>> {
        match name {
            "name" => Some(expect_string(name, value).map(|v| self.set_name(&v))),
            "description" => Some(expect_string(name, value).map(|v| self.set_description(&v))),
            "imagePath" => Some(expect_string(name, value).map(|v| {
                let path = if v.is_empty() { None } else { Some(v.as_str()) };
                self.set_image_path(path);
            })),
            _ => None,
        }
    }
}

pub(crate) fn expect_string(field: &str, value: &PropertyValue) -> Result<String, DomainError> {
    value
        .as_string()
        .map(str::to_string)
        .ok_or_else(|| kind_mismatch(field, "a string", value))
}

pub(crate) fn expect_integer(field: &str, value: &PropertyValue) -> Result<i64, DomainError> {
    value
        .as_integer()
        .ok_or_else(|| kind_mismatch(field, "an integer", value))
}

pub(crate) fn expect_float(field: &str, value: &PropertyValue) -> Result<f64, DomainError> {
    value
        .as_float()
        .ok_or_else(|| kind_mismatch(field, "a float", value))
}

pub(crate) fn expect_boolean(field: &str, value: &PropertyValue) -> Result<bool, DomainError> {
    value
        .as_boolean()
        .ok_or_else(|| kind_mismatch(field, "a boolean", value))
}

pub(crate) fn expect_reference(
    field: &str,
    value: &PropertyValue,
) -> Result<Option<String>, DomainError> {
    value
        .as_reference()
        .map(|name| name.map(str::to_string))
        .ok_or_else(|| kind_mismatch(field, "a reference", value))
}

fn kind_mismatch(field: &str, expected: &str, value: &PropertyValue) -> DomainError {
    DomainError::validation(format!(
        "Property '{}' expects {}, got {:?}",
        field,
        expected,
        value.kind()
    ))
}

macro_rules! dispatch {
    ($self:expr, $obj:ident => $body:expr) => {
        match $self {
            WorldObject::Item($obj) => $body,
            WorldObject::Creature($obj) => $body,
            WorldObject::Trader($obj) => $body,
            WorldObject::Terrain($obj) => $body,
            WorldObject::Movement($obj) => $body,
            WorldObject::Spawner($obj) => $body,
        }
    };
}

/// A placeable entity of any concrete variant
///
/// Cells and spawn lists hold these by value; shared references (templates,
/// terrain, drops) alias through `Arc` instead.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldObject {
    Item(Item),
    Creature(Creature),
    Trader(Trader),
    Terrain(Terrain),
    Movement(Movement),
    Spawner(Spawner),
}

impl WorldObject {
    pub fn as_item(&self) -> Option<&Item> {
        match self {
            Self::Item(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_creature(&self) -> Option<&Creature> {
        match self {
            Self::Creature(creature) => Some(creature),
            _ => None,
        }
    }

    pub fn as_trader(&self) -> Option<&Trader> {
        match self {
            Self::Trader(trader) => Some(trader),
            _ => None,
        }
    }

    /// Assign an orientation token to movement-capable variants.
    ///
    /// Returns whether the token was applied; items, terrain, movement
    /// patterns, and spawners have no facing of their own.
    pub fn set_orientation(&mut self, direction: Direction) -> bool {
        match self {
            Self::Creature(creature) => {
                creature.set_orientation(Some(direction));
                true
            }
            Self::Trader(trader) => {
                trader.set_orientation(Some(direction));
                true
            }
            _ => false,
        }
    }
}

impl ObjectInstance for WorldObject {
    fn object_type(&self) -> ObjectType {
        // UFCS: `Spawner` has an inherent `object_type()` returning its
        // spawn-type token, which would shadow the trait method here.
        dispatch!(self, obj => ObjectInstance::object_type(obj))
    }

    fn name(&self) -> &str {
        dispatch!(self, obj => obj.name())
    }

    fn set_name(&mut self, name: &str) {
        dispatch!(self, obj => obj.set_name(name))
    }

    fn description(&self) -> &str {
        dispatch!(self, obj => obj.description())
    }

    fn set_description(&mut self, description: &str) {
        dispatch!(self, obj => obj.set_description(description))
    }

    fn image_path(&self) -> Option<&str> {
        dispatch!(self, obj => obj.image_path())
    }

    fn set_image_path(&mut self, path: Option<&str>) {
        dispatch!(self, obj => obj.set_image_path(path))
    }

    fn properties(&self) -> &PropertyBag {
        dispatch!(self, obj => obj.properties())
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), DomainError> {
        dispatch!(self, obj => obj.set_property(name, value))
    }

    fn duplicate(&self) -> Self {
        match self {
            Self::Item(item) => Self::Item(item.duplicate()),
            Self::Creature(creature) => Self::Creature(creature.duplicate()),
            Self::Trader(trader) => Self::Trader(trader.duplicate()),
            Self::Terrain(terrain) => Self::Terrain(terrain.duplicate()),
            Self::Movement(movement) => Self::Movement(movement.duplicate()),
            Self::Spawner(spawner) => Self::Spawner(spawner.duplicate()),
        }
    }
}

impl From<Item> for WorldObject {
    fn from(value: Item) -> Self {
        Self::Item(value)
    }
}

impl From<Creature> for WorldObject {
    fn from(value: Creature) -> Self {
        Self::Creature(value)
    }
}

impl From<Trader> for WorldObject {
    fn from(value: Trader) -> Self {
        Self::Trader(value)
    }
}

impl From<Terrain> for WorldObject {
    fn from(value: Terrain) -> Self {
        Self::Terrain(value)
    }
}

impl From<Movement> for WorldObject {
    fn from(value: Movement) -> Self {
        Self::Movement(value)
    }
}

impl From<Spawner> for WorldObject {
    fn from(value: Spawner) -> Self {
        Self::Spawner(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_spawner_reports_its_own_variant_type() {
        // The spawner's spawn-type token is independent of what the
        // spawner itself is.
        let mut spawner = Spawner::new("den");
        spawner.set_object_type("creature");
        let wrapped = WorldObject::from(spawner);

        assert_eq!(wrapped.object_type(), ObjectType::Spawner);
        assert_eq!(wrapped.object_type().as_str(), "spawner");
    }

    #[test]
    fn test_every_variant_reports_its_type_through_the_enum() {
        let objects: Vec<WorldObject> = vec![
            Item::new("rope").into(),
            Creature::new("wolf").into(),
            Trader::new("pedlar").into(),
            Terrain::new("grass").into(),
            Movement::new("patrol").into(),
            Spawner::new("den").into(),
        ];
        let types: Vec<_> = objects.iter().map(|o| o.object_type()).collect();
        assert_eq!(
            types,
            vec![
                ObjectType::Item,
                ObjectType::Creature,
                ObjectType::Trader,
                ObjectType::Terrain,
                ObjectType::Movement,
                ObjectType::Spawner,
            ]
        );
    }
}
