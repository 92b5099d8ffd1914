//! Serialized form of a [`GameMap`]
//!
//! A map persists as one JSON document: its dimensions plus one record per
//! occupied cell (empty cells are implied by the dimensions). Cells reference
//! their terrain by name and list their entities as `(objectType, name)`
//! pairs; re-attachment happens in the loader's second pass against the
//! already-decoded object indexes.

use mapwright_domain::{GameMap, ObjectInstance};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDocument {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub cells: Vec<CellRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRecord {
    pub x: u32,
    pub y: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub terrain: Option<String>,
    pub entity_count: usize,
    pub entities: Vec<EntityRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    pub object_type: String,
    pub name: String,
}

impl MapDocument {
    pub fn from_map(map: &GameMap) -> Self {
        let cells = map
            .cells()
            .filter(|cell| !cell.is_empty())
            .map(|cell| CellRecord {
                x: cell.x(),
                y: cell.y(),
                terrain: cell.terrain().map(|t| t.name().to_string()),
                entity_count: cell.entity_count(),
                entities: cell
                    .entities()
                    .iter()
                    .map(|entity| EntityRecord {
                        object_type: entity.object_type().as_str().to_string(),
                        name: entity.name().to_string(),
                    })
                    .collect(),
            })
            .collect();
        Self {
            name: map.name().to_string(),
            width: map.width(),
            height: map.height(),
            cells,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
