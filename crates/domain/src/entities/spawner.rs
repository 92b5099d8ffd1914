//! Spawner entity - turn-driven generator bounding a population
//!
//! A spawner aliases a shared template and owns the instances it produces.
//! `process_turn` is the single state transition; callers pace it (once per
//! game tick) and must serialize concurrent access themselves.

use std::sync::Arc;

use crate::entities::object::{
    expect_boolean, expect_integer, expect_reference, expect_string, ObjectCore, ObjectInstance,
    ObjectType,
};
use crate::entities::WorldObject;
use crate::error::DomainError;
use crate::random::RandomSource;
use crate::value_objects::{Direction, PropertyBag, PropertyValue};

#[derive(Debug, Clone, PartialEq)]
pub struct Spawner {
    core: ObjectCore,
    max_spawn_cap: usize,
    spawn_frequency: u32,
    is_directed: bool,
    direction: Direction,
    random_orientation: bool,
    // Free string rather than ObjectType: unknown type tokens must stay
    // representable and persistable; they simply never spawn.
    object_type: String,
    object_template: Option<Arc<WorldObject>>,
    spawned_objects: Vec<WorldObject>,
    turn_counter: u32,
}

impl Spawner {
    pub fn new(name: impl Into<String>) -> Self {
        let mut spawner = Self {
            core: ObjectCore::new(name),
            max_spawn_cap: 0,
            spawn_frequency: 0,
            is_directed: false,
            direction: Direction::North,
            random_orientation: false,
            object_type: String::new(),
            object_template: None,
            spawned_objects: Vec::new(),
            turn_counter: 0,
        };
        spawner.set_max_spawn_cap(0);
        spawner.set_spawn_frequency(0);
        spawner.set_is_directed(false);
        spawner.set_direction(Direction::North);
        spawner.set_random_orientation(false);
        spawner.set_object_type("");
        spawner.set_object_template(None);
        spawner.set_turn_counter(0);
        spawner
    }

    pub fn max_spawn_cap(&self) -> usize {
        self.max_spawn_cap
    }

    pub fn set_max_spawn_cap(&mut self, value: usize) {
        self.max_spawn_cap = value;
        self.core
            .mirror("maxSpawnCap", PropertyValue::Integer(value as i64));
    }

    pub fn spawn_frequency(&self) -> u32 {
        self.spawn_frequency
    }

    pub fn set_spawn_frequency(&mut self, value: u32) {
        self.spawn_frequency = value;
        self.core
            .mirror("spawnFrequency", PropertyValue::Integer(i64::from(value)));
    }

    pub fn is_directed(&self) -> bool {
        self.is_directed
    }

    pub fn set_is_directed(&mut self, value: bool) {
        self.is_directed = value;
        self.core.mirror("isDirected", PropertyValue::Boolean(value));
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
        self.core
            .mirror("direction", PropertyValue::Enum(direction.as_str().to_string()));
    }

    pub fn random_orientation(&self) -> bool {
        self.random_orientation
    }

    pub fn set_random_orientation(&mut self, value: bool) {
        self.random_orientation = value;
        self.core
            .mirror("randomOrientation", PropertyValue::Boolean(value));
    }

    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    pub fn set_object_type(&mut self, object_type: &str) {
        self.object_type = object_type.to_string();
        self.core
            .mirror("objectType", PropertyValue::String(self.object_type.clone()));
    }

    pub fn object_template(&self) -> Option<&Arc<WorldObject>> {
        self.object_template.as_ref()
    }

    /// Template name as the bag carries it, resolved or not.
    pub fn object_template_name(&self) -> Option<&str> {
        self.core.reference_name("objectTemplate")
    }

    pub fn set_object_template(&mut self, template: Option<Arc<WorldObject>>) {
        let reference = template.as_ref().map(|t| t.name().to_string());
        self.object_template = template;
        self.core
            .mirror("objectTemplate", PropertyValue::Reference(reference));
    }

    pub fn spawned_objects(&self) -> &[WorldObject] {
        &self.spawned_objects
    }

    pub fn turn_counter(&self) -> u32 {
        self.turn_counter
    }

    /// Restore a persisted counter value. Normal advancement goes through
    /// [`Spawner::process_turn`].
    pub fn set_turn_counter(&mut self, value: u32) {
        self.turn_counter = value;
        self.core
            .mirror("turnCounter", PropertyValue::Integer(i64::from(value)));
    }

    /// Advance the spawner by one turn.
    ///
    /// Increments the turn counter; when the counter has reached the spawn
    /// frequency and the population is below the cap, instantiates one
    /// object from the template, resets the counter, and returns the new
    /// instance. On a "still waiting" turn the incremented counter stands.
    /// With `random_orientation` set, every movement-capable spawned object
    /// gets a fresh random facing each turn (cosmetic only).
    pub fn process_turn(&mut self, rng: &dyn RandomSource) -> Option<&WorldObject> {
        self.set_turn_counter(self.turn_counter + 1);

        let mut spawned = false;
        if self.turn_counter >= self.spawn_frequency
            && self.spawned_objects.len() < self.max_spawn_cap
        {
            if let Some(fresh) = self.instantiate_from_template() {
                self.spawned_objects.push(fresh);
                self.set_turn_counter(0);
                spawned = true;
            }
        }

        if self.random_orientation {
            for object in &mut self.spawned_objects {
                object.set_orientation(rng.random_direction());
            }
        }

        if spawned {
            self.spawned_objects.last()
        } else {
            None
        }
    }

    /// Build one instance from the template. Yields `None` when there is no
    /// template or the configured type token is not a spawnable kind;
    /// unsupported tokens are a silent no-op, not an error.
    fn instantiate_from_template(&self) -> Option<WorldObject> {
        let template = self.object_template.as_ref()?;
        let spawnable = matches!(
            (self.object_type.as_str(), template.as_ref()),
            ("item", WorldObject::Item(_))
                | ("creature", WorldObject::Creature(_))
                | ("trader", WorldObject::Trader(_))
        );
        if !spawnable {
            return None;
        }

        let mut fresh = template.as_ref().duplicate();
        fresh.set_description(&format!("{} spawned by {}", fresh.name(), self.name()));
        if self.is_directed {
            fresh.set_orientation(self.direction);
        }
        Some(fresh)
    }

    /// Remove the first spawned object structurally equal to `object`;
    /// reports whether anything was removed. The turn counter is untouched.
    pub fn remove_spawned_object(&mut self, object: &WorldObject) -> bool {
        match self.spawned_objects.iter().position(|o| o == object) {
            Some(index) => {
                self.spawned_objects.remove(index);
                true
            }
            None => false,
        }
    }

    /// Drop every spawned object. The turn counter is untouched.
    pub fn clear_spawned_objects(&mut self) {
        self.spawned_objects.clear();
    }
}

impl ObjectInstance for Spawner {
    fn object_type(&self) -> ObjectType {
        ObjectType::Spawner
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
            "maxSpawnCap" => {
                let v = expect_integer(name, &value)?;
                self.set_max_spawn_cap(usize::try_from(v).unwrap_or(0));
            }
            "spawnFrequency" => {
                let v = expect_integer(name, &value)?;
                self.set_spawn_frequency(u32::try_from(v).unwrap_or(0));
            }
            "isDirected" => self.set_is_directed(expect_boolean(name, &value)?),
            "direction" => {
                let token = expect_string(name, &value)?;
                self.set_direction(token.parse()?);
            }
            "randomOrientation" => self.set_random_orientation(expect_boolean(name, &value)?),
            "objectType" => {
                let v = expect_string(name, &value)?;
                self.set_object_type(&v);
            }
            "objectTemplate" => {
                let target = expect_reference(name, &value)?;
                self.object_template = None;
                self.core.mirror(name, PropertyValue::Reference(target));
            }
            _ => self.core.mirror(name, value),
        }
        Ok(())
    }

    fn duplicate(&self) -> Self {
        // Configuration copies and the template aliases; the spawn list is
        // owned state bound to the original, so a duplicate starts empty
        // with a zeroed counter.
        let mut copy = self.clone();
        copy.clear_spawned_objects();
        copy.set_turn_counter(0);
        copy
    }
}
