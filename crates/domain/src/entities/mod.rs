//! Concrete entity variants and the polymorphic object surface

mod creature;
mod game_map;
mod item;
mod movement;
mod object;
mod spawner;
mod terrain;
mod trader;

pub use creature::Creature;
pub use game_map::{cell_layout, CellLayout, GameMap, MapCell};
pub use item::Item;
pub use movement::Movement;
pub use object::{ObjectInstance, ObjectType, WorldObject};
pub use spawner::Spawner;
pub use terrain::Terrain;
pub use trader::Trader;
