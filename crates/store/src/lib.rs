//! Mapwright store: name-keyed textual persistence for the domain model.
//!
//! Objects serialize to flat key/value records ([`FieldMap`]) behind the
//! [`TextStorage`](ports::TextStorage) port; [`WorldStore`] layers per-type
//! codecs and the two-pass reference resolver on top.

pub mod adapters;
pub mod codec;
pub mod error;
pub mod field_map;
pub mod map_document;
pub mod ports;
pub mod world;


pub use adapters::{FsStorage, MemoryStorage};
pub use error::StoreError;
pub use field_map::FieldMap;
pub use map_document::{CellRecord, EntityRecord, MapDocument};
pub use ports::{ImageSource, NullImageSource, RasterImage, TextStorage};
pub use world::{ResolveReport, UnresolvedReference, WorldSnapshot, WorldStore};
