//! Grid composition: map cells and the 2-D game map
//!
//! A cell owns its entity list and aliases at most one shared terrain. The
//! grid index is authoritative for coordinates; the copies cached on each
//! cell are a convenience for callers holding a cell without its map.

use std::sync::Arc;

use crate::entities::{Terrain, WorldObject};
use crate::error::DomainError;

/// One grid cell: an optional shared terrain plus an owned, insertion-ordered
/// entity list (duplicate-looking entries allowed).
#[derive(Debug, Clone, PartialEq)]
pub struct MapCell {
    x: u32,
    y: u32,
    terrain: Option<Arc<Terrain>>,
    entities: Vec<WorldObject>,
}

impl MapCell {
    pub fn new(x: u32, y: u32) -> Self {
        Self {
            x,
            y,
            terrain: None,
            entities: Vec::new(),
        }
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub(crate) fn set_coordinates(&mut self, x: u32, y: u32) {
        self.x = x;
        self.y = y;
    }

    pub fn terrain(&self) -> Option<&Arc<Terrain>> {
        self.terrain.as_ref()
    }

    pub fn set_terrain(&mut self, terrain: Option<Arc<Terrain>>) {
        self.terrain = terrain;
    }

    pub fn entities(&self) -> &[WorldObject] {
        &self.entities
    }

    /// Append unconditionally; no identity de-duplication.
    pub fn add_entity(&mut self, entity: WorldObject) {
        self.entities.push(entity);
    }

    /// Remove the first structurally-equal match; reports whether a removal
    /// occurred.
    pub fn remove_entity(&mut self, entity: &WorldObject) -> bool {
        match self.entities.iter().position(|e| e == entity) {
            Some(index) => {
                self.entities.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terrain.is_none() && self.entities.is_empty()
    }

    /// The presentation sub-grid for this cell's current population.
    pub fn layout(&self) -> CellLayout {
        cell_layout(self.entities.len())
    }
}

/// The slot arrangement a cell presents its entities in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellLayout {
    pub rows: u32,
    pub cols: u32,
    /// Entities beyond the available slots: counted, not placed.
    pub overflow: usize,
}

impl CellLayout {
    pub fn slots(&self) -> u32 {
        self.rows * self.cols
    }
}

/// Authoritative capacity/overflow table: 0 entities use the single terrain
/// slot, 1-2 a 1x2 strip, 3-4 a 2x2 square, 5+ a six-slot block of 2 rows by
/// 3 columns with at most 6 placed and the rest reported as overflow.
pub fn cell_layout(entity_count: usize) -> CellLayout {
    let (rows, cols) = match entity_count {
        0 => (1, 1),
        1..=2 => (1, 2),
        3..=4 => (2, 2),
        _ => (2, 3),
    };
    CellLayout {
        rows,
        cols,
        overflow: entity_count.saturating_sub(6),
    }
}

/// A dense 2-D grid of cells
#[derive(Debug, Clone, PartialEq)]
pub struct GameMap {
    name: String,
    width: u32,
    height: u32,
    // Row-major: cells[y][x]
    cells: Vec<Vec<MapCell>>,
}

impl GameMap {
    /// Create a map of empty cells.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when either dimension is zero.
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Result<Self, DomainError> {
        Self::check_dimensions(width, height)?;
        let cells = (0..height)
            .map(|y| (0..width).map(|x| MapCell::new(x, y)).collect())
            .collect();
        Ok(Self {
            name: name.into(),
            width,
            height,
            cells,
        })
    }

    fn check_dimensions(width: u32, height: u32) -> Result<(), DomainError> {
        if width == 0 || height == 0 {
            return Err(DomainError::validation(format!(
                "Map dimensions must be at least 1x1, got {}x{}",
                width, height
            )));
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Soft cell access: out-of-range coordinates are a normal "absent".
    pub fn cell(&self, x: u32, y: u32) -> Option<&MapCell> {
        self.cells.get(y as usize)?.get(x as usize)
    }

    pub fn cell_mut(&mut self, x: u32, y: u32) -> Option<&mut MapCell> {
        self.cells.get_mut(y as usize)?.get_mut(x as usize)
    }

    /// Replace the cell at `(x, y)`, re-anchoring the stored coordinates to
    /// the grid index. Returns whether the coordinates were in range.
    pub fn set_cell(&mut self, x: u32, y: u32, mut cell: MapCell) -> bool {
        match self
            .cells
            .get_mut(y as usize)
            .and_then(|row| row.get_mut(x as usize))
        {
            Some(slot) => {
                cell.set_coordinates(x, y);
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// Hard indexed terrain access: out-of-range coordinates are a
    /// validation error, unlike the soft `cell` accessors.
    pub fn terrain_at(&self, x: u32, y: u32) -> Result<Option<&Arc<Terrain>>, DomainError> {
        self.cell(x, y)
            .map(MapCell::terrain)
            .ok_or_else(|| Self::out_of_bounds(x, y, self.width, self.height))
    }

    /// Hard indexed terrain assignment; see [`Self::terrain_at`].
    pub fn set_terrain_at(
        &mut self,
        x: u32,
        y: u32,
        terrain: Option<Arc<Terrain>>,
    ) -> Result<(), DomainError> {
        let (width, height) = (self.width, self.height);
        match self.cell_mut(x, y) {
            Some(cell) => {
                cell.set_terrain(terrain);
                Ok(())
            }
            None => Err(Self::out_of_bounds(x, y, width, height)),
        }
    }

    fn out_of_bounds(x: u32, y: u32, width: u32, height: u32) -> DomainError {
        DomainError::validation(format!(
            "Terrain index ({}, {}) out of bounds for {}x{} map",
            x, y, width, height
        ))
    }

    /// Rebuild the grid at the new extents: cells valid in both old and new
    /// extents carry over, newly exposed indices get fresh empty cells.
    /// Cells dropped by a shrink are gone; growing back later yields fresh
    /// cells, not the old contents.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when either dimension is zero.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), DomainError> {
        Self::check_dimensions(width, height)?;

        let mut cells: Vec<Vec<MapCell>> = (0..height)
            .map(|y| (0..width).map(|x| MapCell::new(x, y)).collect())
            .collect();
        let old = std::mem::take(&mut self.cells);
        for (y, row) in old.into_iter().enumerate().take(height as usize) {
            for (x, cell) in row.into_iter().enumerate().take(width as usize) {
                cells[y][x] = cell;
            }
        }

        self.cells = cells;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Alias the same shared terrain into every cell: O(width x height),
    /// no terrain copies.
    pub fn fill_with_terrain(&mut self, terrain: &Arc<Terrain>) {
        for row in &mut self.cells {
            for cell in row {
                cell.set_terrain(Some(Arc::clone(terrain)));
            }
        }
    }

    /// Iterate cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &MapCell> {
        self.cells.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Item;

    #[test]
    fn test_dimensions_must_be_positive() {
        assert!(GameMap::new("m", 0, 4).is_err());
        assert!(GameMap::new("m", 4, 0).is_err());
        assert!(GameMap::new("m", 1, 1).is_ok());
    }

    #[test]
    fn test_every_cell_exists_after_resize() {
        let mut map = GameMap::new("m", 3, 3).expect("valid dimensions");
        map.resize(5, 2).expect("valid dimensions");
        for y in 0..2 {
            for x in 0..5 {
                assert!(map.cell(x, y).is_some(), "missing cell ({}, {})", x, y);
            }
        }
        assert!(map.cell(0, 2).is_none());
    }

    #[test]
    fn test_resize_rejects_zero_dimensions() {
        let mut map = GameMap::new("m", 3, 3).expect("valid dimensions");
        assert!(matches!(map.resize(0, 3), Err(DomainError::Validation(_))));
        assert_eq!(map.width(), 3);
    }

    #[test]
    fn test_resize_preserves_intersection_and_forgets_the_rest() {
        let mut map = GameMap::new("m", 3, 3).expect("valid dimensions");
        map.cell_mut(1, 1)
            .expect("in range")
            .add_entity(Item::new("kept").into());
        map.cell_mut(2, 2)
            .expect("in range")
            .add_entity(Item::new("dropped").into());

        map.resize(2, 2).expect("valid dimensions");
        assert_eq!(map.cell(1, 1).expect("in range").entity_count(), 1);

        // Growing back exposes fresh cells, not the dropped contents.
        map.resize(3, 3).expect("valid dimensions");
        assert_eq!(map.cell(2, 2).expect("in range").entity_count(), 0);
        assert_eq!(map.cell(1, 1).expect("in range").entity_count(), 1);
    }

    #[test]
    fn test_soft_and_hard_out_of_bounds_access() {
        let map = GameMap::new("m", 2, 2).expect("valid dimensions");
        // Soft style: absent, not an error.
        assert!(map.cell(5, 0).is_none());
        // Hard style: indexed terrain access fails loudly.
        assert!(matches!(
            map.terrain_at(5, 0),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(map.terrain_at(0, 0), Ok(None)));
    }

    #[test]
    fn test_fill_with_terrain_aliases_one_object() {
        let mut map = GameMap::new("m", 4, 3).expect("valid dimensions");
        let terrain = Arc::new(Terrain::new("grass"));
        map.fill_with_terrain(&terrain);

        // 12 cells + the original handle all point at the same terrain.
        assert_eq!(Arc::strong_count(&terrain), 13);
        assert!(map
            .cells()
            .all(|cell| cell.terrain().is_some_and(|t| Arc::ptr_eq(t, &terrain))));
    }

    #[test]
    fn test_add_entity_permits_duplicates_and_remove_takes_first() {
        let mut cell = MapCell::new(0, 0);
        let item: WorldObject = Item::new("rock").into();
        cell.add_entity(item.clone());
        cell.add_entity(item.clone());
        assert_eq!(cell.entity_count(), 2);

        assert!(cell.remove_entity(&item));
        assert_eq!(cell.entity_count(), 1);
        assert!(cell.remove_entity(&item));
        assert!(!cell.remove_entity(&item));
    }

    #[test]
    fn test_set_cell_reanchors_coordinates() {
        let mut map = GameMap::new("m", 2, 2).expect("valid dimensions");
        let stale = MapCell::new(9, 9);
        assert!(map.set_cell(1, 0, stale));
        let cell = map.cell(1, 0).expect("in range");
        assert_eq!((cell.x(), cell.y()), (1, 0));
        assert!(!map.set_cell(2, 0, MapCell::new(0, 0)));
    }

    #[test]
    fn test_layout_threshold_table() {
        let expectations = [
            (0, 1, 0),
            (1, 2, 0),
            (2, 2, 0),
            (3, 4, 0),
            (4, 4, 0),
            (5, 6, 0),
            (6, 6, 0),
            (7, 6, 1),
            (12, 6, 6),
        ];
        for (count, slots, overflow) in expectations {
            let layout = cell_layout(count);
            assert_eq!(layout.slots(), slots, "slots for {} entities", count);
            assert_eq!(layout.overflow, overflow, "overflow for {} entities", count);
        }
    }
}
