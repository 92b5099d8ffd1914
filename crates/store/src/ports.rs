//! Ports for the collaborators this crate consumes
//!
//! Storage and image resolution are narrow contracts: implementations may
//! be the local filesystem, an in-memory map, or mocks. Everything is
//! synchronous; the core has no suspension points.

use crate::error::StoreError;

/// Port for named textual resources grouped in type-named collections.
///
/// One resource per object; the resource name is the object's name.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TextStorage: Send + Sync {
    /// Write a resource, creating or replacing it.
    fn write(&self, collection: &str, name: &str, contents: &str) -> Result<(), StoreError>;

    /// Read a resource's full contents.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` when the resource does not exist,
    /// `StoreError::Io` when it exists but cannot be read.
    fn read(&self, collection: &str, name: &str) -> Result<String, StoreError>;

    /// List the resource names in a collection. A collection that was never
    /// written to lists as empty, not as an error.
    fn list(&self, collection: &str) -> Result<Vec<String>, StoreError>;

    /// Whether the named resource exists.
    fn exists(&self, collection: &str, name: &str) -> bool;

    /// Remove a resource. Removing an absent resource is a no-op.
    fn remove(&self, collection: &str, name: &str) -> Result<(), StoreError>;
}

/// Decoded raster data handed back by the image collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    /// Packed RGBA, row-major.
    pub pixels: Vec<u8>,
}

/// Port for resolving an image resource path to raster data.
///
/// Total failure is a normal `None`: the collaborator never raises, and
/// callers substitute a placeholder.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait ImageSource: Send + Sync {
    fn load_image(&self, path: &str) -> Option<RasterImage>;
}

/// Image source that resolves nothing; callers fall back to placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullImageSource;

impl ImageSource for NullImageSource {
    fn load_image(&self, _path: &str) -> Option<RasterImage> {
        None
    }
}
