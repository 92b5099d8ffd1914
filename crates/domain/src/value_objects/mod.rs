//! Value objects for the mapwright domain

mod direction;
mod property;

pub use direction::Direction;
pub use property::{ClassDefinition, Property, PropertyBag, PropertyKind, PropertyValue};
