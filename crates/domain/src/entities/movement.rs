//! Movement pattern entity
//!
//! An ordered list of direction tokens plus playback flags. Creatures and
//! traders alias movement patterns through `Arc`; a pattern is authored
//! once and shared.

use crate::entities::object::{expect_boolean, expect_integer, expect_string, ObjectCore, ObjectInstance, ObjectType};
use crate::error::DomainError;
use crate::value_objects::{Direction, PropertyBag, PropertyValue};

#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    core: ObjectCore,
    directions: Vec<Direction>,
    repeating: bool,
    random: bool,
    reversible: bool,
    move_interval: i64,
}

impl Movement {
    pub fn new(name: impl Into<String>) -> Self {
        let mut movement = Self {
            core: ObjectCore::new(name),
            directions: Vec::new(),
            repeating: false,
            random: false,
            reversible: false,
            move_interval: 0,
        };
        movement.set_directions(Vec::new());
        movement.set_repeating(false);
        movement.set_random(false);
        movement.set_reversible(false);
        movement.set_move_interval(0);
        movement
    }

    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    pub fn set_directions(&mut self, directions: Vec<Direction>) {
        self.directions = directions;
        self.core.mirror(
            "directions",
            PropertyValue::String(Self::join_directions(&self.directions)),
        );
    }

    /// The persisted multi-line form: one token per line.
    pub fn join_directions(directions: &[Direction]) -> String {
        directions
            .iter()
            .map(Direction::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Parse the multi-line form, trimming entries and discarding blanks.
    /// Tokens that fail to parse are dropped along with the blanks; a
    /// malformed line never fails the whole list.
    pub fn split_directions(text: &str) -> Vec<Direction> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| line.parse().ok())
            .collect()
    }

    pub fn repeating(&self) -> bool {
        self.repeating
    }

    pub fn set_repeating(&mut self, value: bool) {
        self.repeating = value;
        self.core.mirror("repeating", PropertyValue::Boolean(value));
    }

    pub fn random(&self) -> bool {
        self.random
    }

    pub fn set_random(&mut self, value: bool) {
        self.random = value;
        self.core.mirror("random", PropertyValue::Boolean(value));
    }

    pub fn reversible(&self) -> bool {
        self.reversible
    }

    pub fn set_reversible(&mut self, value: bool) {
        self.reversible = value;
        self.core.mirror("reversible", PropertyValue::Boolean(value));
    }

    pub fn move_interval(&self) -> i64 {
        self.move_interval
    }

    pub fn set_move_interval(&mut self, value: i64) {
        self.move_interval = value;
        self.core.mirror("moveInterval", PropertyValue::Integer(value));
    }
}

impl ObjectInstance for Movement {
    fn object_type(&self) -> ObjectType {
        ObjectType::Movement
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
            "directions" => {
                let text = expect_string(name, &value)?;
                self.set_directions(Self::split_directions(&text));
            }
            "repeating" => self.set_repeating(expect_boolean(name, &value)?),
            "random" => self.set_random(expect_boolean(name, &value)?),
            "reversible" => self.set_reversible(expect_boolean(name, &value)?),
            "moveInterval" => self.set_move_interval(expect_integer(name, &value)?),
            _ => self.core.mirror(name, value),
        }
        Ok(())
    }

    fn duplicate(&self) -> Self {
        self.clone()
    }
}
