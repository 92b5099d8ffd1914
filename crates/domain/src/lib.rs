//! Mapwright domain: the content-authoring data layer for a grid-based
//! game world.
//!
//! Typed entity definitions (items, creatures, traders, terrain, movement
//! patterns, spawners), a generic property/reflection model for UI binding,
//! a 2-D grid composing terrain and entities into cells, and a turn-driven
//! spawner. Persistence lives in `mapwright-store`.

pub mod entities;
pub mod error;
pub mod ids;
pub mod random;
pub mod registry;
pub mod value_objects;

pub use entities::{
    cell_layout, CellLayout, Creature, GameMap, Item, MapCell, Movement, ObjectInstance,
    ObjectType, Spawner, Terrain, Trader, WorldObject,
};
pub use error::DomainError;
pub use ids::CreatureId;
pub use random::{FixedRandomSource, RandomSource, ThreadRngSource};
pub use registry::{all_class_definitions, class_definition, register_class_definition};
pub use value_objects::{
    ClassDefinition, Direction, Property, PropertyBag, PropertyKind, PropertyValue,
};
